use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Validate IWYU pragma comments in C and C++ sources.",
	long_about = "iwyu-pragma checks the `// IWYU pragma:` and `@headername{...}` comments that \
	              annotate include intent. It reports unknown pragmas, malformed \
	              `@headername` directives and unbalanced `begin_exports` / `end_exports` \
	              regions.\n\nQuick start:\n  iwyu-pragma check   Validate every source file\n  \
	              iwyu-pragma list    Print every directive found\n  iwyu-pragma verify  \
	              Compare diagnostics with `// IWYU:` expectation comments"
)]
pub struct IwyuPragmaCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output and debug logging.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Validate the pragma comments of every source file.
	///
	/// Walks the project root (or the given paths) and reports every unknown
	/// pragma, malformed `@headername` directive and unbalanced export region.
	/// Exits with status 1 when any diagnostic is found and 2 when the files
	/// could not be read.
	Check {
		/// Files or directories to check. Defaults to the project root.
		paths: Vec<PathBuf>,

		/// Output format for check results. Use `text` for human-readable
		/// output, `json` for programmatic consumption, or `github` for
		/// GitHub Actions annotations that appear inline on PRs.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Compare diagnostics with the `// IWYU:` expectation comments.
	///
	/// Each `// IWYU: <regex>` comment states that the next line produces a
	/// diagnostic whose message matches the regex. Exits with status 1 when a
	/// diagnostic is unexpected or an expectation is unsatisfied.
	Verify {
		/// Files or directories to verify. Defaults to the project root.
		paths: Vec<PathBuf>,
	},
	/// List every directive found in the project.
	List {
		/// Files or directories to list. Defaults to the project root.
		paths: Vec<PathBuf>,

		/// Output format for the listing.
		#[arg(long, value_enum, default_value_t = ListOutputFormat::Text)]
		format: ListOutputFormat,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable `file:line:column: error: message` lines.
	Text,
	/// JSON output for programmatic consumption.
	Json,
	/// GitHub Actions annotation format. Emits `::error` annotations that
	/// appear inline on pull request diffs.
	Github,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListOutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
