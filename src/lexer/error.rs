use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("Malformed number '{0}'")]
    MalformedNumber(String),
    #[error("Malformed identifier '{0}'")]
    MalformedIdentifier(String),
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
}

impl LexError {
    /// Fatal errors stop token generation for the rest of the input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnterminatedString | Self::InvalidEscape(_))
    }
}
