use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

use crate::Diagnostic;
use crate::DiagnosticKind;
use crate::Location;
use crate::lexer::DirectiveOccurrence;
use crate::lexer::Marker;

/// The closed set of instruction keywords accepted after `IWYU pragma:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
	Keep,
	BeginExports,
	EndExports,
}

impl Instruction {
	pub const ALL: [Instruction; 3] = [Self::Keep, Self::BeginExports, Self::EndExports];

	/// Case-sensitive lookup of an instruction keyword.
	pub fn from_keyword(keyword: &str) -> Option<Self> {
		Self::ALL
			.into_iter()
			.find(|instruction| instruction.keyword() == keyword)
	}

	pub fn keyword(self) -> &'static str {
		match self {
			Self::Keep => "keep",
			Self::BeginExports => "begin_exports",
			Self::EndExports => "end_exports",
		}
	}
}

impl Display for Instruction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.keyword())
	}
}

/// A classified directive.
///
/// ```cpp
/// #include "detail/impl.h"  // IWYU pragma: keep
///
/// // IWYU pragma: begin_exports
/// #include "public/api.h"
/// // IWYU pragma: end_exports
///
/// /** @headername{vector} */
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum Directive {
	/// `IWYU pragma: keep`
	Keep,
	/// `IWYU pragma: begin_exports`
	BeginExports,
	/// `IWYU pragma: end_exports`
	EndExports,
	/// `@headername{name}`. `well_formed` is false when the closing brace is
	/// missing, in which case `name` holds everything up to the end of the
	/// comment.
	PrivateHeadername { name: String, well_formed: bool },
	/// `IWYU pragma: <text>` with an instruction we do not know.
	Unknown { text: String },
}

impl From<Instruction> for Directive {
	fn from(instruction: Instruction) -> Self {
		match instruction {
			Instruction::Keep => Self::Keep,
			Instruction::BeginExports => Self::BeginExports,
			Instruction::EndExports => Self::EndExports,
		}
	}
}

impl Display for Directive {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Keep => write!(f, "keep"),
			Self::BeginExports => write!(f, "begin_exports"),
			Self::EndExports => write!(f, "end_exports"),
			Self::PrivateHeadername {
				name,
				well_formed: true,
			} => write!(f, "@headername{{{name}}}"),
			Self::PrivateHeadername {
				name,
				well_formed: false,
			} => write!(f, "@headername{{{name}"),
			Self::Unknown { text } => write!(f, "unknown ({text})"),
		}
	}
}

/// The result of parsing one occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDirective {
	pub directive: Directive,
	pub location: Location,
	/// Set when the directive is unknown or malformed.
	pub diagnostic: Option<Diagnostic>,
}

/// Classify a directive occurrence. Never fails: problems are carried in the
/// returned diagnostic.
pub fn parse_directive(occurrence: DirectiveOccurrence) -> ParsedDirective {
	let DirectiveOccurrence {
		location,
		marker,
		instruction,
		arguments,
	} = occurrence;

	let (directive, kind) = match marker {
		Marker::Headername => parse_headername(&arguments),
		Marker::Pragma => {
			match Instruction::from_keyword(&instruction) {
				Some(known) => (known.into(), None),
				None => {
					let kind = DiagnosticKind::UnknownPragma {
						text: instruction.clone(),
					};
					(Directive::Unknown { text: instruction }, Some(kind))
				}
			}
		}
	};

	let diagnostic = kind.map(|kind| Diagnostic::new(location.clone(), kind));

	ParsedDirective {
		directive,
		location,
		diagnostic,
	}
}

/// `arguments` is the raw text following `@headername`, starting at the
/// opening brace.
fn parse_headername(arguments: &str) -> (Directive, Option<DiagnosticKind>) {
	let inner = arguments.strip_prefix('{').unwrap_or(arguments);

	if let Some(end) = inner.find('}') {
		let directive = Directive::PrivateHeadername {
			name: inner[..end].trim().to_string(),
			well_formed: true,
		};
		return (directive, None);
	}

	let name = inner.trim().to_string();
	let kind = DiagnosticKind::MissingClosingBrace {
		argument: name.clone(),
	};

	(
		Directive::PrivateHeadername {
			name,
			well_formed: false,
		},
		Some(kind),
	)
}
