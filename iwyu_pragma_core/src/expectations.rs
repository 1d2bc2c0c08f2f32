use std::collections::BTreeSet;
use std::sync::Arc;

use regex::Regex;

use crate::Diagnostic;
use crate::Location;
use crate::PragmaError;
use crate::PragmaResult;
use crate::check_source;

/// Line comments starting with this marker state a diagnostic the next line
/// must produce: `// IWYU: end_exports without a begin_exports`.
pub const EXPECTATION_MARKER: &str = "IWYU:";

/// A diagnostic a fixture file claims to produce.
#[derive(Debug, Clone)]
pub struct Expectation {
	/// The line the expectation applies to.
	pub location: Location,
	/// Searched for in the diagnostic message.
	pub pattern: Regex,
}

impl Expectation {
	pub fn matches(&self, diagnostic: &Diagnostic) -> bool {
		diagnostic.location.line == self.location.line && self.pattern.is_match(&diagnostic.message)
	}
}

/// The outcome of comparing diagnostics against expectations.
#[derive(Debug, Clone, Default)]
pub struct ExpectationReport {
	/// Expectations no diagnostic satisfied.
	pub unsatisfied: Vec<Expectation>,
	/// Diagnostics no expectation accounted for.
	pub unexpected: Vec<Diagnostic>,
	/// Number of diagnostic / expectation pairs that matched.
	pub matched: usize,
}

impl ExpectationReport {
	pub fn is_ok(&self) -> bool {
		self.unsatisfied.is_empty() && self.unexpected.is_empty()
	}
}

fn expectation_pattern(line: &str) -> Option<&str> {
	let comment = line.trim_start().strip_prefix("//")?;
	comment
		.trim_start()
		.strip_prefix(EXPECTATION_MARKER)
		.map(str::trim)
}

/// Collect the expectation comments of a source file. Each applies to the
/// next line which is not itself an expectation.
pub fn collect_expectations(file: &str, source: &str) -> PragmaResult<Vec<Expectation>> {
	let file: Arc<str> = file.into();
	let lines: Vec<&str> = source.lines().collect();
	let expectation_lines: BTreeSet<usize> = lines
		.iter()
		.enumerate()
		.filter(|(_, line)| expectation_pattern(line).is_some())
		.map(|(idx, _)| idx)
		.collect();

	let mut expectations = Vec::with_capacity(expectation_lines.len());

	for &idx in &expectation_lines {
		let Some(pattern) = expectation_pattern(lines[idx]) else {
			continue;
		};

		let target = (idx + 1..).find(|next| !expectation_lines.contains(next)).unwrap_or(idx + 1);
		let pattern = Regex::new(pattern).map_err(|e| {
			PragmaError::InvalidExpectation {
				file: file.to_string(),
				line: idx + 1,
				pattern: pattern.to_string(),
				reason: e.to_string(),
			}
		})?;

		expectations.push(Expectation {
			location: Location::new(Arc::clone(&file), target + 1, 1),
			pattern,
		});
	}

	Ok(expectations)
}

/// Pair diagnostics with expectations. Each expectation satisfies at most one
/// diagnostic.
pub fn verify_expectations(
	expectations: Vec<Expectation>,
	diagnostics: &[Diagnostic],
) -> ExpectationReport {
	let mut remaining: Vec<Option<Expectation>> = expectations.into_iter().map(Some).collect();
	let mut report = ExpectationReport::default();

	for diagnostic in diagnostics {
		let slot = remaining
			.iter_mut()
			.find(|slot| slot.as_ref().is_some_and(|e| e.matches(diagnostic)));

		match slot {
			Some(slot) => {
				*slot = None;
				report.matched += 1;
			}
			None => report.unexpected.push(diagnostic.clone()),
		}
	}

	report.unsatisfied = remaining.into_iter().flatten().collect();
	report
}

/// Validate a source file and compare the result with its own expectation
/// comments.
pub fn verify_source(file: &str, source: &str) -> PragmaResult<ExpectationReport> {
	let expectations = collect_expectations(file, source)?;
	let diagnostics = check_source(file, source);
	Ok(verify_expectations(expectations, &diagnostics))
}
