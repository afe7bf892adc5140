use thiserror::Error;

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::token::Span;

/// Failures that abort a traversal. The analyzer turns them into a single
/// `ERRO_INTERNO` diagnostic instead of propagating them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Calls nested deeper than {limit} levels")]
    DepthExceeded { limit: usize, span: Span },
}

impl AnalysisError {
    pub fn span(&self) -> Span {
        match self {
            Self::DepthExceeded { span, .. } => *span,
        }
    }

    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic::new(
            DiagnosticCode::Internal,
            self.span(),
            format!("Internal error during analysis: {self}"),
        )
    }
}
