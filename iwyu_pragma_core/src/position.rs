use std::fmt::Display;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

/// A point in a source file. Lines and columns are 1-indexed, columns count
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
	/// The name of the file the location points into.
	pub file: Arc<str>,
	pub line: usize,
	pub column: usize,
}

impl Location {
	pub fn new(file: impl Into<Arc<str>>, line: usize, column: usize) -> Self {
		Self {
			file: file.into(),
			line,
			column,
		}
	}
}

impl Display for Location {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}:{}", self.file, self.line, self.column)
	}
}

/// Pre-computed table of line-start byte offsets. Built once per file so each
/// offset lookup is a binary search instead of a rescan of the content.
#[derive(Debug, Clone)]
pub(crate) struct LineTable {
	file: Arc<str>,
	/// Byte offsets of the start of each line. `line_starts[0]` is always 0.
	line_starts: Vec<usize>,
}

impl LineTable {
	pub(crate) fn new(file: Arc<str>, content: &str) -> Self {
		let mut line_starts = vec![0];
		for (i, byte) in content.bytes().enumerate() {
			if byte == b'\n' {
				line_starts.push(i + 1);
			}
		}
		Self { file, line_starts }
	}

	pub(crate) fn file(&self) -> &Arc<str> {
		&self.file
	}

	/// Convert a byte offset into a [`Location`].
	pub(crate) fn location(&self, offset: usize) -> Location {
		let line_idx = match self.line_starts.binary_search(&offset) {
			Ok(exact) => exact,
			Err(insert) => insert.saturating_sub(1),
		};

		Location {
			file: Arc::clone(&self.file),
			line: line_idx + 1,
			column: offset - self.line_starts[line_idx] + 1,
		}
	}
}
