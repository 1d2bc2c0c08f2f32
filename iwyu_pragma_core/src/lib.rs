//! `iwyu_pragma_core` validates the pragma comments that annotate header
//! inclusion intent for include-what-you-use style analysis. It finds the
//! directives in C and C++ sources, classifies them, checks that export
//! regions are balanced and reports every malformed occurrence. It does not
//! decide whether an include is needed.
//!
//! ## Directives
//!
//! ```cpp
//! #include "detail/impl.h"  // IWYU pragma: keep
//!
//! // IWYU pragma: begin_exports
//! #include "public/api.h"
//! // IWYU pragma: end_exports
//!
//! /** @headername{vector} */
//! ```
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source file
//!   → Lexer (comments and include lines, one DirectiveOccurrence per marked comment)
//!   → Parser (Directive, plus a diagnostic when unknown or malformed)
//!   → Region tracker (begin_exports / end_exports stack)
//!   → DiagnosticSink (owned by the caller, source-ordered per file)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `iwyu-pragma.toml`.
//! - [`expectations`]: `// IWYU: <regex>` expectation comments for fixture
//!   files.
//! - [`lexer`]: Comment and include scanning.
//! - [`project`]: Directory walking and parallel validation.
//!
//! ## Quick Start
//!
//! ```rust
//! use iwyu_pragma_core::DiagnosticSink;
//! use iwyu_pragma_core::validate_source;
//!
//! let source = "// IWYU pragma: end_exports\n";
//! let mut sink = DiagnosticSink::new();
//! validate_source("example.h", source, &mut sink);
//!
//! assert_eq!(sink.len(), 1);
//! assert_eq!(sink[0].message, "end_exports without a begin_exports");
//! ```

pub use config::*;
pub use diagnostics::*;
pub use error::*;
pub use parser::*;
pub use position::*;
pub use project::*;
pub use regions::*;
pub use validator::*;

pub mod config;
mod diagnostics;
#[allow(unused_assignments)]
mod error;
pub mod expectations;
pub mod lexer;
mod parser;
mod position;
pub mod project;
mod regions;
mod validator;

#[cfg(test)]
mod __fixtures;
