use std::sync::Arc;

use logos::Logos;
use logos::SpannedIter;
use serde::Deserialize;
use serde::Serialize;

use crate::Location;
use crate::position::LineTable;

/// The fixed marker that introduces an IWYU pragma inside a comment.
pub const PRAGMA_MARKER: &str = "IWYU pragma:";
/// The doxygen-style annotation naming the public header for a private one.
pub const HEADERNAME_MARKER: &str = "@headername";

/// Raw tokens produced by logos. Only the constructs that can hide or carry a
/// directive are recognized, everything else is skipped. A quote, `#` or `/`
/// that does not start a complete token falls back to a single-byte `Stray`
/// token so the rest of the line is still scanned.
#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[^/\x22'#]+")]
enum RawToken {
	#[regex(r"//[^\n]*", allow_greedy = true)]
	LineComment,
	#[token("/*", block_comment)]
	BlockComment,
	#[regex(r#""([^"\\\n]|\\.)*""#)]
	StringLiteral,
	#[regex(r"'([^'\\\n]|\\.)*'")]
	CharLiteral,
	#[regex(r#"#[ \t]*(include|include_next|import)[ \t]*("[^"\n]*"|<[^>\n]*>)"#)]
	Include,
	#[token("'")]
	#[token("\"")]
	#[token("#")]
	#[token("/")]
	Stray,
}

/// Extend a `/*` token to the matching `*/`, or to the end of the source when
/// the comment is never terminated.
fn block_comment(lex: &mut logos::Lexer<'_, RawToken>) {
	let rest = lex.remainder();
	let len = memstr(rest.as_bytes(), b"*/").map_or(rest.len(), |idx| idx + 2);
	lex.bump(len);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentStyle {
	/// `// ...`
	Line,
	/// `/* ... */`
	Block,
}

/// A single source comment, including its delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment<'a> {
	/// The comment text as spelled in the source, delimiters included.
	pub text: &'a str,
	/// Where the comment starts.
	pub location: Location,
}

impl<'a> Comment<'a> {
	pub fn new(text: &'a str, location: Location) -> Self {
		Self { text, location }
	}

	pub fn style(&self) -> CommentStyle {
		if self.text.starts_with("/*") {
			CommentStyle::Block
		} else {
			CommentStyle::Line
		}
	}

	/// The comment content without its delimiters, together with the byte
	/// offset of that content inside [`Comment::text`].
	pub fn body(&self) -> (usize, &'a str) {
		if let Some(rest) = self.text.strip_prefix("/*") {
			(2, rest.strip_suffix("*/").unwrap_or(rest))
		} else if let Some(rest) = self.text.strip_prefix("//") {
			(2, rest)
		} else {
			(0, self.text)
		}
	}

	/// Resolve a byte offset inside the comment text to a source location.
	pub fn location_at(&self, offset: usize) -> Location {
		let prefix = &self.text[..offset.min(self.text.len())];
		let newlines = prefix.bytes().filter(|byte| *byte == b'\n').count();

		let column = match prefix.rfind('\n') {
			Some(last_newline) => offset - last_newline,
			None => self.location.column + offset,
		};

		Location {
			file: Arc::clone(&self.location.file),
			line: self.location.line + newlines,
			column,
		}
	}
}

/// An `#include`, `#include_next` or `#import` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
	/// Where the `#` of the include line sits.
	pub location: Location,
}

/// Everything the lexer reports while walking a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent<'a> {
	Comment(Comment<'a>),
	Include(Include),
}

/// The marker which introduced a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
	/// `IWYU pragma:`
	Pragma,
	/// `@headername`
	Headername,
}

impl Marker {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Pragma => PRAGMA_MARKER,
			Self::Headername => HEADERNAME_MARKER,
		}
	}
}

/// A comment which carries a directive marker, split into its raw parts. The
/// content is not judged here, that is left to the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveOccurrence {
	/// Location of the marker itself.
	pub location: Location,
	pub marker: Marker,
	/// The first word after an `IWYU pragma:` marker. Always empty for
	/// `@headername`.
	pub instruction: String,
	/// Everything after the instruction (or after `@headername`) up to the end
	/// of the comment.
	pub arguments: String,
}

/// Lazily walks a source file and yields its comments and include lines in
/// source order. Create a new scanner to restart.
pub struct Scanner<'a> {
	source: &'a str,
	tokens: SpannedIter<'a, RawToken>,
	lines: LineTable,
}

impl<'a> Scanner<'a> {
	pub fn new(file: impl Into<Arc<str>>, source: &'a str) -> Self {
		Self {
			source,
			tokens: RawToken::lexer(source).spanned(),
			lines: LineTable::new(file.into(), source),
		}
	}

	pub fn file(&self) -> &Arc<str> {
		self.lines.file()
	}
}

impl<'a> Iterator for Scanner<'a> {
	type Item = SourceEvent<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		for (result, span) in self.tokens.by_ref() {
			let Ok(raw) = result else {
				continue;
			};

			match raw {
				RawToken::LineComment | RawToken::BlockComment => {
					let comment = Comment {
						text: &self.source[span.clone()],
						location: self.lines.location(span.start),
					};
					return Some(SourceEvent::Comment(comment));
				}
				RawToken::Include => {
					let include = Include {
						location: self.lines.location(span.start),
					};
					return Some(SourceEvent::Include(include));
				}
				RawToken::StringLiteral | RawToken::CharLiteral | RawToken::Stray => {}
			}
		}

		None
	}
}

/// Find the directive carried by a single comment, if any. A comment holds at
/// most one directive: an `IWYU pragma:` at the start of its content wins over
/// any `@headername{` further in.
pub fn occurrence_in_comment(comment: &Comment<'_>) -> Option<DirectiveOccurrence> {
	let (body_offset, body) = comment.body();
	let content =
		body.trim_start_matches(|c: char| c == '/' || c == '!' || c == '*' || c.is_whitespace());

	if let Some(after_marker) = content.strip_prefix(PRAGMA_MARKER) {
		let marker_offset = body_offset + (body.len() - content.len());
		let rest = after_marker.trim_start();
		let instruction_end = rest.find(char::is_whitespace).unwrap_or(rest.len());

		return Some(DirectiveOccurrence {
			location: comment.location_at(marker_offset),
			marker: Marker::Pragma,
			instruction: rest[..instruction_end].to_string(),
			arguments: rest[instruction_end..].trim().to_string(),
		});
	}

	let marker_idx = memstr(body.as_bytes(), b"@headername{")?;
	let arguments_start = marker_idx + HEADERNAME_MARKER.len();

	Some(DirectiveOccurrence {
		location: comment.location_at(body_offset + marker_idx),
		marker: Marker::Headername,
		instruction: String::new(),
		arguments: body[arguments_start..].to_string(),
	})
}

/// Lazily yield every directive occurrence in a source file.
pub fn scan_directives<'a>(
	file: &str,
	source: &'a str,
) -> impl Iterator<Item = DirectiveOccurrence> + 'a {
	Scanner::new(file, source).filter_map(|event| {
		match event {
			SourceEvent::Comment(comment) => occurrence_in_comment(&comment),
			SourceEvent::Include(_) => None,
		}
	})
}

/// Byte offset of the first occurrence of `needle` in `haystack`.
pub(crate) fn memstr(haystack: &[u8], needle: &[u8]) -> Option<usize> {
	if needle.is_empty() {
		return Some(0);
	}

	haystack
		.windows(needle.len())
		.position(|window| window == needle)
}
