use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use iwyu_pragma_core::Diagnostic;
use iwyu_pragma_core::PragmaError;
use iwyu_pragma_core::ProjectReport;
use iwyu_pragma_core::ScanOptions;
use iwyu_pragma_core::check_paths;
use iwyu_pragma_core::collect_directives;
use iwyu_pragma_core::expectations::collect_expectations;
use iwyu_pragma_core::expectations::verify_expectations;
use iwyu_pragma_cli::Commands;
use iwyu_pragma_cli::IwyuPragmaCli;
use iwyu_pragma_cli::ListOutputFormat;
use iwyu_pragma_cli::OutputFormat;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

type CommandResult = Result<bool, Box<dyn std::error::Error>>;

fn main() {
	let args = IwyuPragmaCli::parse();

	// Respect NO_COLOR env var, --no-color flag and terminal support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let default_level = if args.verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_ansi(use_color)
		.with_writer(std::io::stderr)
		.init();

	let result = match &args.command {
		Some(Commands::Check { paths, format }) => run_check(&args, paths, *format),
		Some(Commands::Verify { paths }) => run_verify(&args, paths),
		Some(Commands::List { paths, format }) => run_list(&args, paths, *format),
		None => {
			eprintln!("No subcommand specified. Run `iwyu-pragma --help` for usage.");
			process::exit(2);
		}
	};

	match result {
		Ok(false) => {}
		Ok(true) => process::exit(1),
		Err(e) => {
			match e.downcast::<PragmaError>() {
				Ok(pragma_err) => {
					let report: miette::Report = (*pragma_err).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

fn resolve_root(args: &IwyuPragmaCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Load the project config and validate the requested paths.
fn scan(args: &IwyuPragmaCli, paths: &[PathBuf]) -> Result<ProjectReport, PragmaError> {
	let root = resolve_root(args);
	let options = ScanOptions::load(&root)?;
	let targets = if paths.is_empty() {
		vec![root.clone()]
	} else {
		paths.to_vec()
	};

	let report = check_paths(&root, &targets, &options)?;

	if args.verbose {
		eprintln!(
			"Scanned {} file(s), {} directive(s)",
			report.files.len(),
			report.directive_count()
		);
	}

	Ok(report)
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
	file: &'a str,
	line: usize,
	column: usize,
	severity: String,
	code: &'static str,
	message: &'a str,
}

impl<'a> From<&'a Diagnostic> for JsonDiagnostic<'a> {
	fn from(diagnostic: &'a Diagnostic) -> Self {
		Self {
			file: &diagnostic.location.file,
			line: diagnostic.location.line,
			column: diagnostic.location.column,
			severity: diagnostic.severity.to_string(),
			code: diagnostic.kind.code(),
			message: &diagnostic.message,
		}
	}
}

#[derive(Serialize)]
struct CheckOutput<'a> {
	ok: bool,
	diagnostics: Vec<JsonDiagnostic<'a>>,
}

fn run_check(args: &IwyuPragmaCli, paths: &[PathBuf], format: OutputFormat) -> CommandResult {
	let report = scan(args, paths)?;

	if let OutputFormat::Json = format {
		let output = CheckOutput {
			ok: report.is_ok(),
			diagnostics: report.diagnostics().map(JsonDiagnostic::from).collect(),
		};
		println!("{}", serde_json::to_string(&output)?);
		return Ok(!report.is_ok());
	}

	if report.is_ok() {
		println!(
			"Check passed: {} directive(s) in {} file(s).",
			report.directive_count(),
			report.files.len()
		);
		return Ok(false);
	}

	match format {
		OutputFormat::Github => {
			for diagnostic in report.diagnostics() {
				let location = &diagnostic.location;
				println!(
					"::error file={},line={},col={}::{}",
					location.file, location.line, location.column, diagnostic.message
				);
			}
		}
		OutputFormat::Text | OutputFormat::Json => {
			for diagnostic in report.diagnostics() {
				println!(
					"{}: {}: {}",
					diagnostic.location,
					colored!(diagnostic.severity, red),
					diagnostic.message
				);

				if args.verbose {
					eprintln!("{:?}", diagnostic_to_report(diagnostic));
				}
			}
		}
	}

	let failing_files = report.files.iter().filter(|file| !file.is_ok()).count();
	eprintln!(
		"{} {} diagnostic(s) in {failing_files} file(s)",
		colored!("Check failed:", bold),
		report.diagnostic_count()
	);

	Ok(true)
}

fn run_verify(args: &IwyuPragmaCli, paths: &[PathBuf]) -> CommandResult {
	let report = scan(args, paths)?;
	let mut matched = 0;
	let mut mismatches = 0;

	for file in &report.files {
		let source = read_lossy(&file.path)?;
		let expectations = collect_expectations(&file.name, &source)?;
		let result = verify_expectations(expectations, &file.diagnostics);
		matched += result.matched;

		for expectation in &result.unsatisfied {
			mismatches += 1;
			println!(
				"{}:{}: {} no diagnostic matches `{}`",
				expectation.location.file,
				expectation.location.line,
				colored!("unsatisfied:", red),
				expectation.pattern
			);
		}

		for diagnostic in &result.unexpected {
			mismatches += 1;
			println!(
				"{}: {} {}",
				diagnostic.location,
				colored!("unexpected:", red),
				diagnostic.message
			);
		}
	}

	if mismatches == 0 {
		println!(
			"{} {matched} expectation(s) matched in {} file(s).",
			colored!("Verify passed:", green),
			report.files.len()
		);
		return Ok(false);
	}

	eprintln!(
		"{} {mismatches} mismatch(es), {matched} expectation(s) matched",
		colored!("Verify failed:", bold)
	);

	Ok(true)
}

#[derive(Serialize)]
struct ListEntry<'a> {
	file: &'a str,
	line: usize,
	column: usize,
	directive: String,
	ok: bool,
}

fn run_list(args: &IwyuPragmaCli, paths: &[PathBuf], format: ListOutputFormat) -> CommandResult {
	let report = scan(args, paths)?;
	let mut listed = Vec::new();

	for file in &report.files {
		let source = read_lossy(&file.path)?;
		listed.extend(collect_directives(&file.name, &source));
	}

	match format {
		ListOutputFormat::Json => {
			let entries: Vec<ListEntry<'_>> = listed
				.iter()
				.map(|parsed| {
					ListEntry {
						file: &parsed.location.file,
						line: parsed.location.line,
						column: parsed.location.column,
						directive: parsed.directive.to_string(),
						ok: parsed.diagnostic.is_none(),
					}
				})
				.collect();
			println!("{}", serde_json::to_string(&entries)?);
		}
		ListOutputFormat::Text => {
			if listed.is_empty() {
				println!("No directives found.");
				return Ok(false);
			}

			for parsed in &listed {
				let directive = if parsed.diagnostic.is_some() {
					colored!(parsed.directive, red)
				} else {
					parsed.directive.to_string()
				};
				println!("{} {directive}", parsed.location);
			}

			println!(
				"\n{} directive(s) in {} file(s)",
				listed.len(),
				report.files.len()
			);
		}
	}

	Ok(false)
}

fn read_lossy(path: &Path) -> Result<String, PragmaError> {
	let bytes = std::fs::read(path)?;
	Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Convert a [`Diagnostic`] into a `miette::Report` with its error code and
/// help text for rich terminal display.
fn diagnostic_to_report(diagnostic: &Diagnostic) -> miette::Report {
	let message = format!("[{}] {}", diagnostic.location, diagnostic.message);
	let value = miette::MietteDiagnostic::new(message)
		.with_code(diagnostic.kind.code())
		.with_help(diagnostic.kind.help())
		.with_severity(miette::Severity::Error);

	miette::Report::new(value)
}
