use thiserror::Error;

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::lexer::LexError;
use crate::token::Span;

/// The single error a failed parse reports.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("Expected {expected} after '{after}', found end of input")]
    UnexpectedEnd {
        expected: String,
        after: String,
        span: Span,
    },
    #[error("Invalid token: {error}")]
    Lexical { error: LexError, span: Span },
    #[error("Expression nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize, span: Span },
    #[error("Expression has more than {limit} operators")]
    TooManyOperators { limit: usize, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEnd { span, .. }
            | Self::Lexical { span, .. }
            | Self::NestingTooDeep { span, .. }
            | Self::TooManyOperators { span, .. } => *span,
        }
    }

    pub fn diagnostic(&self) -> Diagnostic {
        let span = self.span();
        Diagnostic::new(
            DiagnosticCode::SyntaxError,
            span,
            format!("line {}, column {}: {self}", span.line, span.column),
        )
    }
}
