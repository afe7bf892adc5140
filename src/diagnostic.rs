//! Diagnostics shared by every stage of the frontend.
//!
//! Each stage keeps its own typed error enum and converts it into a
//! [`Diagnostic`] at its boundary, so callers see one uniform list of
//! `[line:column] CODE: message` entries.

use std::fmt;

use crate::token::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    LexicalError,
    SyntaxError,
    UndeclaredVariable,
    DuplicateVariable,
    InvalidNumber,
    UnknownOperator,
    OperandType,
    IncompatibleTypes,
    UndefinedFunction,
    WrongArgumentCount,
    ArgumentType,
    InvalidAssignment,
    IncompatibleAssignment,
    UnusedVariable,
    Internal,
}

impl DiagnosticCode {
    /// Stable machine-readable tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LexicalError => "ERRO_LEXICO",
            Self::SyntaxError => "ERRO_SINTATICO",
            Self::UndeclaredVariable => "VAR_NAO_DECLARADA",
            Self::DuplicateVariable => "VAR_DUPLICADA",
            Self::InvalidNumber => "NUMERO_INVALIDO",
            Self::UnknownOperator => "OPERADOR_DESCONHECIDO",
            Self::OperandType => "TIPO_OPERANDO",
            Self::IncompatibleTypes => "TIPOS_INCOMPATIVEIS",
            Self::UndefinedFunction => "FUNCAO_NAO_DEFINIDA",
            Self::WrongArgumentCount => "ARGUMENTOS_INCORRETOS",
            Self::ArgumentType => "TIPO_ARGUMENTO",
            Self::InvalidAssignment => "ATRIBUICAO_INVALIDA",
            Self::IncompatibleAssignment => "ATRIBUICAO_INCOMPATIVEL",
            Self::UnusedVariable => "VAR_NAO_UTILIZADA",
            Self::Internal => "ERRO_INTERNO",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_str() == tag)
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::UnusedVariable => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub const ALL: [DiagnosticCode; 15] = [
        Self::LexicalError,
        Self::SyntaxError,
        Self::UndeclaredVariable,
        Self::DuplicateVariable,
        Self::InvalidNumber,
        Self::UnknownOperator,
        Self::OperandType,
        Self::IncompatibleTypes,
        Self::UndefinedFunction,
        Self::WrongArgumentCount,
        Self::ArgumentType,
        Self::InvalidAssignment,
        Self::IncompatibleAssignment,
        Self::UnusedVariable,
        Self::Internal,
    ];
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub span: Span,
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    /// Builds a diagnostic with the code's default severity. The message is
    /// sanitized on the way in.
    pub fn new(code: DiagnosticCode, span: Span, message: impl AsRef<str>) -> Self {
        Self {
            span,
            code,
            severity: code.severity(),
            message: sanitize_message(message.as_ref()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}] {}: {}",
            self.span.line, self.span.column, self.code, self.message
        )
    }
}

/// Folds accented Latin letters to ASCII and drops stray accent marks, so
/// messages render on terminals without UTF-8 support.
pub fn sanitize_message(message: &str) -> String {
    message
        .chars()
        .filter_map(|c| match c {
            '\u{FFFD}' | '´' | '`' | '^' => None,
            'ã' | 'á' | 'à' | 'â' => Some('a'),
            'Ã' | 'Á' | 'À' | 'Â' => Some('A'),
            'é' | 'ê' => Some('e'),
            'É' | 'Ê' => Some('E'),
            'í' => Some('i'),
            'Í' => Some('I'),
            'ó' | 'ô' | 'õ' => Some('o'),
            'Ó' | 'Ô' | 'Õ' => Some('O'),
            'ú' => Some('u'),
            'Ú' => Some('U'),
            'ç' => Some('c'),
            'Ç' => Some('C'),
            other => Some(other),
        })
        .collect()
}

pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}
