use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::PragmaError;
use crate::PragmaResult;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"iwyu-pragma.toml",
	".iwyu-pragma.toml",
	".config/iwyu-pragma.toml",
];

/// File extensions scanned when no `extensions` key is configured.
pub const DEFAULT_EXTENSIONS: [&str; 12] = [
	"h", "hh", "hpp", "hxx", "h++", "inl", "c", "cc", "cpp", "cxx", "m", "mm",
];

/// Configuration loaded from an `iwyu-pragma.toml` file.
///
/// ```toml
/// extensions = ["h", "hpp", "cc"]
/// max_file_size = 1048576
/// disable_gitignore = false
///
/// [exclude]
/// patterns = ["third_party/", "*.generated.h"]
///
/// [include]
/// patterns = ["tools/**/*.inc"]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PragmaConfig {
	/// File extensions (without the dot) which are scanned.
	#[serde(default = "default_extensions")]
	pub extensions: Vec<String>,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Inclusion configuration: additional glob patterns to scan regardless
	/// of their extension.
	#[serde(default)]
	pub include: IncludeConfig,
	/// Maximum file size in bytes to scan. Larger files are an error.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// When true, `.gitignore` files are not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
}

impl Default for PragmaConfig {
	fn default() -> Self {
		Self {
			extensions: default_extensions(),
			exclude: ExcludeConfig::default(),
			include: IncludeConfig::default(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

/// Exclusion configuration.
///
/// ```toml
/// [exclude]
/// patterns = ["third_party/", "build/"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ExcludeConfig {
	/// Gitignore-style patterns for files and directories to skip.
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Extra files to scan.
///
/// ```toml
/// [include]
/// patterns = ["tools/**/*.inc"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct IncludeConfig {
	/// Glob patterns, relative to the project root.
	#[serde(default)]
	pub patterns: Vec<String>,
}

fn default_extensions() -> Vec<String> {
	DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

impl PragmaConfig {
	/// Find the config file for a project root, if any.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the project configuration from `root`. Returns `None` when no
	/// config file exists.
	pub fn load(root: &Path) -> PragmaResult<Option<PragmaConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;
		Self::from_toml(&content).map(Some)
	}

	pub fn from_toml(content: &str) -> PragmaResult<PragmaConfig> {
		toml::from_str(content).map_err(|e| PragmaError::ConfigParse(e.to_string()))
	}
}
