use std::collections::BTreeSet;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use rayon::prelude::*;
use serde::Deserialize;
use serde::Serialize;

use crate::Diagnostic;
use crate::DiagnosticSink;
use crate::PragmaConfig;
use crate::PragmaError;
use crate::PragmaResult;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::validate_source;

/// Options for controlling how a project is scanned.
///
/// Use [`ScanOptions::default()`] for sensible defaults or
/// [`ScanOptions::from_config`] to construct from a [`PragmaConfig`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// File extensions which are scanned.
	pub extensions: Vec<String>,
	/// Gitignore-style patterns to exclude from scanning.
	pub exclude_patterns: Vec<String>,
	/// Glob patterns for extra files to scan.
	pub include_set: GlobSet,
	/// Maximum file size to scan in bytes.
	pub max_file_size: u64,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		let config = PragmaConfig::default();

		Self {
			extensions: config.extensions,
			exclude_patterns: Vec::new(),
			include_set: GlobSet::empty(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

impl ScanOptions {
	/// Construct [`ScanOptions`] from a [`PragmaConfig`].
	pub fn from_config(config: Option<&PragmaConfig>) -> PragmaResult<Self> {
		let Some(config) = config else {
			return Ok(Self::default());
		};

		Ok(Self {
			extensions: config.extensions.clone(),
			exclude_patterns: config.exclude.patterns.clone(),
			include_set: build_glob_set(&config.include.patterns)?,
			max_file_size: config.max_file_size,
			disable_gitignore: config.disable_gitignore,
		})
	}

	/// Load `iwyu-pragma.toml` from `root` (if present) and build options
	/// from it.
	pub fn load(root: &Path) -> PragmaResult<Self> {
		let config = PragmaConfig::load(root)?;
		Self::from_config(config.as_ref())
	}

	fn is_scannable(&self, path: &Path, relative: &Path) -> bool {
		let by_extension = path
			.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| {
				self.extensions
					.iter()
					.any(|candidate| candidate.eq_ignore_ascii_case(ext))
			});

		by_extension || self.include_set.is_match(relative)
	}
}

/// The validation result for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
	/// The file on disk.
	pub path: PathBuf,
	/// The name used in diagnostic locations, relative to the scan root when
	/// possible.
	pub name: String,
	/// Number of directives found in the file.
	pub directives: usize,
	/// Diagnostics in source order.
	pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
	pub fn is_ok(&self) -> bool {
		self.diagnostics.is_empty()
	}
}

/// The validation results for a set of files, ordered by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReport {
	pub files: Vec<FileReport>,
}

impl ProjectReport {
	pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
		self.files.iter().flat_map(|file| file.diagnostics.iter())
	}

	pub fn diagnostic_count(&self) -> usize {
		self.files.iter().map(|file| file.diagnostics.len()).sum()
	}

	pub fn directive_count(&self) -> usize {
		self.files.iter().map(|file| file.directives).sum()
	}

	pub fn is_ok(&self) -> bool {
		self.files.iter().all(FileReport::is_ok)
	}
}

/// Read and validate a single file. `name` is the file name used in
/// diagnostic locations.
pub fn check_file(path: &Path, name: &str, max_file_size: u64) -> PragmaResult<FileReport> {
	let metadata = std::fs::metadata(path)?;
	if metadata.len() > max_file_size {
		return Err(PragmaError::FileTooLarge {
			path: path.display().to_string(),
			size: metadata.len(),
			limit: max_file_size,
		});
	}

	let bytes = std::fs::read(path)?;
	let source = String::from_utf8_lossy(&bytes);
	let mut sink = DiagnosticSink::new();
	let directives = validate_source(name, &source, &mut sink);
	tracing::debug!(
		file = name,
		directives,
		diagnostics = sink.len(),
		"validated file"
	);

	Ok(FileReport {
		path: path.to_path_buf(),
		name: name.to_string(),
		directives,
		diagnostics: sink.into_vec(),
	})
}

/// Scan every matching file below `root`.
pub fn scan_project(root: &Path, options: &ScanOptions) -> PragmaResult<ProjectReport> {
	check_paths(root, &[root.to_path_buf()], options)
}

/// Validate a mix of files and directories. Directories are walked, files are
/// validated regardless of their extension. Diagnostic file names are made
/// relative to `root`.
///
/// Files are validated in parallel, each with its own sink; the report is
/// ordered by path.
pub fn check_paths(
	root: &Path,
	paths: &[PathBuf],
	options: &ScanOptions,
) -> PragmaResult<ProjectReport> {
	let mut files = BTreeSet::new();

	for path in paths {
		if path.is_dir() {
			files.extend(collect_files(path, options)?);
		} else if path.is_file() {
			files.insert(path.clone());
		} else {
			return Err(PragmaError::MissingPath(path.display().to_string()));
		}
	}

	tracing::debug!(count = files.len(), "collected files");

	let files: Vec<PathBuf> = files.into_iter().collect();
	let reports = files
		.par_iter()
		.map(|path| check_file(path, &make_relative(path, root), options.max_file_size))
		.collect::<PragmaResult<Vec<_>>>()?;

	Ok(ProjectReport { files: reports })
}

/// Render `path` relative to `root` with forward slashes.
pub fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.ok()
		.filter(|relative| !relative.as_os_str().is_empty())
		.unwrap_or(path)
		.to_string_lossy()
		.replace('\\', "/")
}

/// Build a `GlobSet` from a list of glob pattern strings.
fn build_glob_set(patterns: &[String]) -> PragmaResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			PragmaError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
		builder.add(glob);
	}

	builder.build().map_err(|e| {
		PragmaError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a `Gitignore` matcher from the `[exclude]` patterns. These follow
/// `.gitignore` syntax and are applied on top of any `.gitignore` rules.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> PragmaResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			PragmaError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
	}

	builder.build().map_err(|e| {
		PragmaError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a `Gitignore` matcher from the root's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

struct Walker<'a> {
	root: &'a Path,
	options: &'a ScanOptions,
	gitignore: Gitignore,
	exclude: Gitignore,
	visited_dirs: HashSet<PathBuf>,
	files: Vec<PathBuf>,
}

/// Collect all scannable files below `root`, sorted.
fn collect_files(root: &Path, options: &ScanOptions) -> PragmaResult<Vec<PathBuf>> {
	let gitignore = if options.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};

	let mut walker = Walker {
		root,
		options,
		gitignore,
		exclude: build_exclude_matcher(root, &options.exclude_patterns)?,
		visited_dirs: HashSet::new(),
		files: Vec::new(),
	};

	walker.walk(root)?;
	walker.files.sort();
	Ok(walker.files)
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

impl Walker<'_> {
	fn walk(&mut self, dir: &Path) -> PragmaResult<()> {
		// Detect symlink cycles by tracking canonical paths.
		let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
		if !self.visited_dirs.insert(canonical) {
			return Err(PragmaError::SymlinkCycle {
				path: dir.display().to_string(),
			});
		}

		for entry in std::fs::read_dir(dir)? {
			let path = entry?.path();
			let is_dir = path.is_dir();

			if is_dir
				&& path
					.file_name()
					.and_then(|name| name.to_str())
					.is_some_and(is_ignored_directory_name)
			{
				continue;
			}

			if self.gitignore.matched(&path, is_dir).is_ignore()
				|| self.exclude.matched(&path, is_dir).is_ignore()
			{
				continue;
			}

			if is_dir {
				self.walk(&path)?;
				continue;
			}

			let relative = path.strip_prefix(self.root).unwrap_or(&path);
			if self.options.is_scannable(&path, relative) {
				self.files.push(path);
			}
		}

		Ok(())
	}
}
