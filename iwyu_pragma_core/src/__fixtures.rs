use crate::Diagnostic;
use crate::DiagnosticKind;
use crate::Location;

/// A header exercising every failure path, annotated with `// IWYU:`
/// expectation comments.
pub const FAULTY_PRAGMAS: &str = include_str!("../fixtures/comment_pragmas-d7.h");

pub const TEST_FILE: &str = "test.h";

pub fn location(line: usize, column: usize) -> Location {
	Location::new(TEST_FILE, line, column)
}

pub fn diagnostic(line: usize, column: usize, kind: DiagnosticKind) -> Diagnostic {
	Diagnostic::new(location(line, column), kind)
}

/// The diagnostics [`FAULTY_PRAGMAS`] produces, in source order.
pub fn faulty_pragma_diagnostics() -> Vec<Diagnostic> {
	vec![
		diagnostic(
			15,
			5,
			DiagnosticKind::MissingClosingBrace {
				argument: "missing_close_brace".to_string(),
			},
		),
		diagnostic(22, 4, DiagnosticKind::EndWithoutBegin),
		diagnostic(26, 37, DiagnosticKind::ExpectedEndExports),
		diagnostic(
			30,
			4,
			DiagnosticKind::UnknownPragma {
				text: "foo".to_string(),
			},
		),
		diagnostic(33, 4, DiagnosticKind::BeginWithoutEnd),
	]
}

/// Build a source file from lines.
pub fn source(lines: &[&str]) -> String {
	let mut content = lines.join("\n");
	content.push('\n');
	content
}

pub const KEEP: &str = "// IWYU pragma: keep";
pub const BEGIN: &str = "// IWYU pragma: begin_exports";
pub const END: &str = "// IWYU pragma: end_exports";
