use crate::Diagnostic;
use crate::DiagnosticSink;
use crate::ParsedDirective;
use crate::RegionTracker;
use crate::lexer::Scanner;
use crate::lexer::SourceEvent;
use crate::lexer::occurrence_in_comment;
use crate::lexer::scan_directives;
use crate::parser::parse_directive;

/// Validate every directive in a source file, reporting into `sink`.
///
/// Returns the number of directives found. The diagnostics added by this
/// pass are in source order once it returns.
pub fn validate_source(file: &str, source: &str, sink: &mut DiagnosticSink) -> usize {
	validate_events(Scanner::new(file, source), sink)
}

/// Validate a stream of comments and include lines belonging to a single
/// file. This is the entry point for hosts which tokenize sources themselves.
pub fn validate_events<'a>(
	events: impl IntoIterator<Item = SourceEvent<'a>>,
	sink: &mut DiagnosticSink,
) -> usize {
	let start = sink.len();
	let mut tracker = RegionTracker::new();
	let mut directives = 0;

	for event in events {
		match event {
			SourceEvent::Include(include) => tracker.observe_include(&include.location),
			SourceEvent::Comment(comment) => {
				let Some(occurrence) = occurrence_in_comment(&comment) else {
					continue;
				};

				directives += 1;
				let ParsedDirective {
					directive,
					location,
					diagnostic,
				} = parse_directive(occurrence);
				tracing::trace!(%location, %directive, "directive");

				if let Some(diagnostic) = diagnostic {
					sink.push(diagnostic);
				}

				tracker.observe_directive(&directive, &location, sink);
			}
		}
	}

	tracker.finish(sink);
	sink.order_from(start);

	directives
}

/// Validate a single source file with a fresh sink.
pub fn check_source(file: &str, source: &str) -> Vec<Diagnostic> {
	let mut sink = DiagnosticSink::new();
	validate_source(file, source, &mut sink);
	sink.into_vec()
}

/// Parse every directive in a source file without region validation.
pub fn collect_directives(file: &str, source: &str) -> Vec<ParsedDirective> {
	scan_directives(file, source).map(parse_directive).collect()
}
