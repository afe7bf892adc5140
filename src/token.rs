use std::fmt;

use crate::lexer::LexError;

/// 1-based source position of a token or tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Number,
    String,
    Boolean,

    // Operators
    ArithmeticOp, // + - * / %
    RelationalOp, // < > <= >= == !=
    LogicalOp,    // && || !
    Assign,       // =

    // Delimiters
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semicolon, // ;
    Comma,     // ,
    Dot,       // .

    Error(LexError),
    Eof,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Keyword => "KEYWORD",
            Self::Identifier => "IDENTIFIER",
            Self::Number => "NUMBER",
            Self::String => "STRING",
            Self::Boolean => "BOOLEAN",
            Self::ArithmeticOp => "OP_ARITHMETIC",
            Self::RelationalOp => "OP_RELATIONAL",
            Self::LogicalOp => "OP_LOGICAL",
            Self::Assign => "OP_ASSIGNMENT",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::LBracket => "LBRACKET",
            Self::RBracket => "RBRACKET",
            Self::Semicolon => "SEMICOLON",
            Self::Comma => "COMMA",
            Self::Dot => "DOT",
            Self::Error(_) => "ERROR",
            Self::Eof => "EOF",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lexeme carried by the end-of-input token.
pub const EOF_LEXEME: &str = "$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn eof(span: Span) -> Self {
        Self::new(TokenKind::Eof, EOF_LEXEME, span)
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn is(&self, kind: &TokenKind) -> bool {
        &self.kind == kind
    }

    /// True for a token of `kind` whose text is exactly `lexeme`.
    pub fn is_lexeme(&self, kind: &TokenKind, lexeme: &str) -> bool {
        &self.kind == kind && self.lexeme == lexeme
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token({}, '{}', line:{}, column:{})",
            self.kind,
            self.lexeme.replace('\n', "\\n").replace('\t', "\\t"),
            self.span.line,
            self.span.column
        )
    }
}
