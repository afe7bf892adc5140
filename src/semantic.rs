//! Scoped symbol table and two-pass semantic analysis of a parsed tree.

mod analyzer;
mod builtins;
mod error;
mod operators;
mod symbol_table;

pub use analyzer::{AnalysisResult, Analyzer};
pub use builtins::BuiltinFunction;
pub use error::AnalysisError;
pub use operators::OperatorClass;
pub use symbol_table::{DuplicateDeclaration, Symbol, SymbolTable};

use crate::ast::Node;
use crate::config::FrontendConfig;

/// Analyzes `tree` with the default limits, annotating each visited node
/// with its type.
pub fn analyze(tree: &mut Node) -> AnalysisResult {
    analyze_with(tree, &FrontendConfig::default())
}

pub fn analyze_with(tree: &mut Node, config: &FrontendConfig) -> AnalysisResult {
    Analyzer::new(config).analyze(tree)
}
