use std::fmt::Display;
use std::sync::Arc;

use derive_more::Deref;
use serde::Deserialize;
use serde::Serialize;

use crate::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
	/// Every malformed or misplaced pragma is an error.
	Error,
}

impl Display for Severity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Error => write!(f, "error"),
		}
	}
}

/// The three families of pragma problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
	/// The instruction after the pragma marker is not one we know.
	UnrecognizedDirective,
	/// A known directive whose argument is syntactically broken.
	MalformedArgument,
	/// `begin_exports` / `end_exports` pairing is violated.
	UnbalancedRegion,
}

/// What went wrong. Each kind has a fixed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum DiagnosticKind {
	/// `IWYU pragma: <text>` with an instruction outside the known set.
	UnknownPragma { text: String },
	/// `@headername{...` without a `}` before the comment ends.
	MissingClosingBrace { argument: String },
	/// `end_exports` while no export region is open.
	EndWithoutBegin,
	/// `begin_exports` still open at the end of the file.
	BeginWithoutEnd,
	/// An open export region was interrupted before its `end_exports`.
	ExpectedEndExports,
}

impl DiagnosticKind {
	pub fn category(&self) -> DiagnosticCategory {
		match self {
			Self::UnknownPragma { .. } => DiagnosticCategory::UnrecognizedDirective,
			Self::MissingClosingBrace { .. } => DiagnosticCategory::MalformedArgument,
			Self::EndWithoutBegin | Self::BeginWithoutEnd | Self::ExpectedEndExports => {
				DiagnosticCategory::UnbalancedRegion
			}
		}
	}

	/// Stable identifier used by reporting layers.
	pub fn code(&self) -> &'static str {
		match self {
			Self::UnknownPragma { .. } => "iwyu_pragma::unknown_pragma",
			Self::MissingClosingBrace { .. } => "iwyu_pragma::missing_closing_brace",
			Self::EndWithoutBegin => "iwyu_pragma::end_without_begin",
			Self::BeginWithoutEnd => "iwyu_pragma::begin_without_end",
			Self::ExpectedEndExports => "iwyu_pragma::expected_end_exports",
		}
	}

	pub fn message(&self) -> String {
		match self {
			Self::UnknownPragma { text } => format!("Unknown or malformed pragma ({text})"),
			Self::MissingClosingBrace { .. } => {
				"@headername directive missing a closing brace".to_string()
			}
			Self::EndWithoutBegin => "end_exports without a begin_exports".to_string(),
			Self::BeginWithoutEnd => "begin_exports without an end_exports".to_string(),
			Self::ExpectedEndExports => "Expected end_exports pragma".to_string(),
		}
	}

	pub fn help(&self) -> String {
		match self {
			Self::UnknownPragma { .. } => {
				"known pragmas: `keep`, `begin_exports`, `end_exports`".to_string()
			}
			Self::MissingClosingBrace { argument } => {
				format!("close the directive as `@headername{{{argument}}}`")
			}
			Self::EndWithoutBegin => {
				"remove this pragma or add `// IWYU pragma: begin_exports` before it".to_string()
			}
			Self::BeginWithoutEnd => {
				"add `// IWYU pragma: end_exports` after the exported includes".to_string()
			}
			Self::ExpectedEndExports => {
				"close the export region with `// IWYU pragma: end_exports` first".to_string()
			}
		}
	}
}

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub location: Location,
	pub severity: Severity,
	pub kind: DiagnosticKind,
	pub message: String,
}

impl Diagnostic {
	pub fn new(location: Location, kind: DiagnosticKind) -> Self {
		Self {
			location,
			severity: Severity::Error,
			message: kind.message(),
			kind,
		}
	}

	pub fn file(&self) -> &Arc<str> {
		&self.location.file
	}

	pub fn line(&self) -> usize {
		self.location.line
	}

	pub fn category(&self) -> DiagnosticCategory {
		self.kind.category()
	}

	/// Whether this diagnostic is a structural mismatch of a single
	/// `begin_exports` or `end_exports` marker.
	pub fn is_pairing_violation(&self) -> bool {
		matches!(
			self.kind,
			DiagnosticKind::EndWithoutBegin | DiagnosticKind::BeginWithoutEnd
		)
	}
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {}: {}", self.location, self.severity, self.message)
	}
}

/// Append-only collector for diagnostics. The caller owns the sink and passes
/// it into every validation pass, one sink may span many files.
#[derive(Debug, Clone, Default, Deref)]
pub struct DiagnosticSink {
	#[deref]
	diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, diagnostic: Diagnostic) {
		tracing::trace!(%diagnostic, "diagnostic");
		self.diagnostics.push(diagnostic);
	}

	pub fn emit(&mut self, location: Location, kind: DiagnosticKind) {
		self.push(Diagnostic::new(location, kind));
	}

	/// Diagnostics reported for a single file, in order.
	pub fn for_file<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
		self.diagnostics
			.iter()
			.filter(move |diagnostic| &*diagnostic.location.file == file)
	}

	pub fn into_vec(self) -> Vec<Diagnostic> {
		self.diagnostics
	}

	/// Put everything reported since `start` into source order. End-of-file
	/// checks point back at earlier lines, the sort is stable so diagnostics
	/// sharing a location keep the order they were reported in.
	pub(crate) fn order_from(&mut self, start: usize) {
		self.diagnostics[start..]
			.sort_by_key(|diagnostic| (diagnostic.location.line, diagnostic.location.column));
	}
}

impl IntoIterator for DiagnosticSink {
	type IntoIter = std::vec::IntoIter<Diagnostic>;
	type Item = Diagnostic;

	fn into_iter(self) -> Self::IntoIter {
		self.diagnostics.into_iter()
	}
}
