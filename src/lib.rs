//! Semantic analysis for a small statically-typed imperative language.
//!
//! Takes a parsed [`Program`], checks scoping, declarations and types,
//! annotates every checked expression with its type and collects
//! diagnostics. A later stage may proceed when [`Analysis::is_success`].

pub mod diagnostics;
pub mod feedback;
pub mod frontend;
pub mod types;
pub mod utils;

pub use diagnostics::{Diagnostic, Diagnostics, HALT_BANNER};
pub use frontend::ast::Program;
pub use frontend::semantic::{analyze, Analysis, AnalyzerOptions, SemanticAnalyzer};
pub use types::{Checked, Type};
pub use utils::{Error, Result, Span};
