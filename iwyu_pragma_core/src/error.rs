use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum PragmaError {
	#[error(transparent)]
	#[diagnostic(code(iwyu_pragma::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(iwyu_pragma::config_parse),
		help("check that iwyu-pragma.toml is valid TOML with optional [exclude] and [include] sections")
	)]
	ConfigParse(String),

	#[error("invalid pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(iwyu_pragma::invalid_pattern),
		help("exclude patterns follow .gitignore syntax, include patterns are globs")
	)]
	InvalidPattern { pattern: String, reason: String },

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(iwyu_pragma::file_too_large),
		help("increase `max_file_size` in iwyu-pragma.toml or exclude this file")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("invalid expectation regex `{pattern}` at {file}:{line}: {reason}")]
	#[diagnostic(
		code(iwyu_pragma::invalid_expectation),
		help("expectation comments are regular expressions, escape `(` and `)` as `\\(` and `\\)`")
	)]
	InvalidExpectation {
		file: String,
		line: usize,
		pattern: String,
		reason: String,
	},

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(iwyu_pragma::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },

	#[error("path does not exist: `{0}`")]
	#[diagnostic(code(iwyu_pragma::missing_path))]
	MissingPath(String),
}

pub type PragmaResult<T> = Result<T, PragmaError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
