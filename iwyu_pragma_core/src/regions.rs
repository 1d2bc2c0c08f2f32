use crate::Directive;
use crate::DiagnosticKind;
use crate::DiagnosticSink;
use crate::Location;

/// An export region opened by `IWYU pragma: begin_exports` and not yet closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRegion {
	/// Where the region was opened.
	pub opening: Location,
	/// The most recent include seen while the region was open.
	pub last_include: Option<Location>,
	/// Set once the region was cut off before its `end_exports`: by another
	/// pragma, or by a nested `begin_exports` after an include.
	pub interrupted: bool,
}

/// Tracks `begin_exports` / `end_exports` nesting for one file.
///
/// Regions form a strict stack: `end_exports` always closes the innermost
/// open region. Whatever is still open when [`RegionTracker::finish`] runs is
/// reported, nothing is auto-closed.
#[derive(Debug, Default)]
pub struct RegionTracker {
	stack: Vec<ExportRegion>,
}

impl RegionTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of currently open regions.
	pub fn depth(&self) -> usize {
		self.stack.len()
	}

	pub fn open_regions(&self) -> &[ExportRegion] {
		&self.stack
	}

	/// Record an include line.
	pub fn observe_include(&mut self, location: &Location) {
		for region in &mut self.stack {
			region.last_include = Some(location.clone());
		}
	}

	/// Apply a parsed directive to the region state.
	pub fn observe_directive(
		&mut self,
		directive: &Directive,
		location: &Location,
		sink: &mut DiagnosticSink,
	) {
		match directive {
			Directive::Keep | Directive::Unknown { .. } => {
				if let Some(innermost) = self.stack.last_mut() {
					innermost.interrupted = true;
					sink.emit(location.clone(), DiagnosticKind::ExpectedEndExports);
				}
			}
			// Nesting is legal, it only cuts off includes already exported.
			Directive::BeginExports => {
				if let Some(innermost) = self.stack.last_mut() {
					if let Some(last_include) = &innermost.last_include {
						innermost.interrupted = true;
						sink.emit(last_include.clone(), DiagnosticKind::ExpectedEndExports);
					}
				}
			}
			Directive::EndExports | Directive::PrivateHeadername { .. } => {}
		}

		match directive {
			Directive::BeginExports => {
				self.stack.push(ExportRegion {
					opening: location.clone(),
					last_include: None,
					interrupted: false,
				});
			}
			Directive::EndExports => {
				if self.stack.pop().is_none() {
					sink.emit(location.clone(), DiagnosticKind::EndWithoutBegin);
				}
			}
			Directive::Keep | Directive::PrivateHeadername { .. } | Directive::Unknown { .. } => {}
		}
	}

	/// Drain the stack at the end of the file, reporting every region that is
	/// still open.
	pub fn finish(self, sink: &mut DiagnosticSink) {
		for region in self.stack {
			tracing::debug!(opening = %region.opening, "unterminated export region");
			sink.emit(region.opening, DiagnosticKind::BeginWithoutEnd);

			if region.interrupted {
				continue;
			}

			if let Some(last_include) = region.last_include {
				sink.emit(last_include, DiagnosticKind::ExpectedEndExports);
			}
		}
	}
}
