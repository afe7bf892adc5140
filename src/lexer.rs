mod cursor;
mod error;

pub use cursor::Cursor;
pub use error::LexError;

use tracing::{debug, trace};

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::token::{Token, TokenKind};

const KEYWORDS: [&str; 9] = [
    "if", "else", "while", "for", "return", "class", "public", "private", "var",
];
const BOOLEANS: [&str; 2] = ["true", "false"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Default,
    InString,
    InLineComment,
    InBlockComment,
}

/// Scans one token starting at `cursor` and returns it together with the
/// cursor just past it. Comments and whitespace are consumed on the way.
pub fn scan(input: &str, cursor: Cursor) -> (Token, Cursor) {
    let mut cursor = cursor;
    let mut state = LexState::Default;
    loop {
        match state {
            LexState::Default => {
                cursor = skip_whitespace(input, cursor);
                let Some(c) = cursor.peek(input) else {
                    return (Token::eof(cursor.span()), cursor);
                };
                match c {
                    c if c.is_alphabetic() || c == '_' => return scan_identifier(input, cursor),
                    c if c.is_ascii_digit() => return scan_number(input, cursor),
                    '"' => state = LexState::InString,
                    '/' if cursor.peek_second(input) == Some('/') => {
                        cursor = cursor.advance_by(input, 2);
                        state = LexState::InLineComment;
                    }
                    '/' if cursor.peek_second(input) == Some('*') => {
                        cursor = cursor.advance_by(input, 2);
                        state = LexState::InBlockComment;
                    }
                    _ => return scan_operator(input, cursor),
                }
            }
            LexState::InString => return scan_string(input, cursor),
            LexState::InLineComment => {
                cursor = skip_line_comment(input, cursor);
                state = LexState::Default;
            }
            LexState::InBlockComment => {
                cursor = skip_block_comment(input, cursor);
                state = LexState::Default;
            }
        }
    }
}

fn skip_whitespace(input: &str, mut cursor: Cursor) -> Cursor {
    while cursor.peek(input).is_some_and(char::is_whitespace) {
        cursor = cursor.advance(input);
    }
    cursor
}

fn skip_line_comment(input: &str, mut cursor: Cursor) -> Cursor {
    while let Some(c) = cursor.peek(input) {
        cursor = cursor.advance(input);
        if c == '\n' {
            break;
        }
    }
    cursor
}

// An unterminated block comment simply ends at end of input.
fn skip_block_comment(input: &str, mut cursor: Cursor) -> Cursor {
    while let Some(c) = cursor.peek(input) {
        if c == '*' && cursor.peek_second(input) == Some('/') {
            return cursor.advance_by(input, 2);
        }
        cursor = cursor.advance(input);
    }
    cursor
}

fn scan_identifier(input: &str, start: Cursor) -> (Token, Cursor) {
    let mut cursor = start.advance(input); // Consume first char
    while cursor
        .peek(input)
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
    {
        cursor = cursor.advance(input);
    }

    let text = start.slice_to(input, cursor);
    let kind = if !is_valid_identifier(text) {
        TokenKind::Error(LexError::MalformedIdentifier(text.to_string()))
    } else if KEYWORDS.contains(&text) {
        TokenKind::Keyword
    } else if BOOLEANS.contains(&text) {
        TokenKind::Boolean
    } else {
        TokenKind::Identifier
    };
    (Token::new(kind, text, start.span()), cursor)
}

// Signs are consumed anywhere in the run, not only after an exponent
// marker, so `1+2` is a single malformed number.
fn scan_number(input: &str, start: Cursor) -> (Token, Cursor) {
    let mut cursor = start;
    while cursor
        .peek(input)
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        cursor = cursor.advance(input);
    }

    let text = start.slice_to(input, cursor);
    let kind = if is_valid_number(text) {
        TokenKind::Number
    } else {
        TokenKind::Error(LexError::MalformedNumber(text.to_string()))
    };
    (Token::new(kind, text, start.span()), cursor)
}

fn scan_string(input: &str, start: Cursor) -> (Token, Cursor) {
    let mut cursor = start.advance(input); // Consume opening quote
    let mut value = String::new();
    loop {
        let Some(c) = cursor.peek(input) else {
            return fatal(input, start, cursor, LexError::UnterminatedString);
        };
        match c {
            '"' => {
                cursor = cursor.advance(input);
                return (Token::new(TokenKind::String, value, start.span()), cursor);
            }
            '\\' => {
                cursor = cursor.advance(input);
                let Some(escaped) = cursor.peek(input) else {
                    return fatal(input, start, cursor, LexError::UnterminatedString);
                };
                cursor = cursor.advance(input);
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    '"' => value.push('"'),
                    '\\' => value.push('\\'),
                    other => return fatal(input, start, cursor, LexError::InvalidEscape(other)),
                }
            }
            other => {
                value.push(other);
                cursor = cursor.advance(input);
            }
        }
    }
}

fn fatal(input: &str, start: Cursor, end: Cursor, error: LexError) -> (Token, Cursor) {
    let raw = start.slice_to(input, end);
    (Token::new(TokenKind::Error(error), raw, start.span()), end)
}

fn scan_operator(input: &str, start: Cursor) -> (Token, Cursor) {
    let Some(c) = start.peek(input) else {
        return (Token::eof(start.span()), start);
    };
    let next = start.advance(input);
    let second = next.peek(input);
    let one = |kind: TokenKind| (Token::new(kind, c.to_string(), start.span()), next);
    let two = |kind: TokenKind| {
        let end = next.advance(input);
        (Token::new(kind, start.slice_to(input, end), start.span()), end)
    };

    match (c, second) {
        ('+' | '-' | '*' | '/' | '%', _) => one(TokenKind::ArithmeticOp),
        ('>' | '<', Some('=')) => two(TokenKind::RelationalOp),
        ('>' | '<', _) => one(TokenKind::RelationalOp),
        ('!', Some('=')) => two(TokenKind::RelationalOp),
        ('!', _) => one(TokenKind::LogicalOp),
        ('&', Some('&')) | ('|', Some('|')) => two(TokenKind::LogicalOp),
        ('=', Some('=')) => two(TokenKind::RelationalOp),
        ('=', _) => one(TokenKind::Assign),
        ('(', _) => one(TokenKind::LParen),
        (')', _) => one(TokenKind::RParen),
        ('{', _) => one(TokenKind::LBrace),
        ('}', _) => one(TokenKind::RBrace),
        ('[', _) => one(TokenKind::LBracket),
        (']', _) => one(TokenKind::RBracket),
        (';', _) => one(TokenKind::Semicolon),
        (',', _) => one(TokenKind::Comma),
        ('.', _) => one(TokenKind::Dot),
        (other, _) => one(TokenKind::Error(LexError::UnexpectedCharacter(other))),
    }
}

/// Checks `[a-zA-Z_][a-zA-Z0-9_]*`.
pub fn is_valid_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Checks `\d+(\.\d+)?([eE][+-]?\d+)?`.
pub fn is_valid_number(text: &str) -> bool {
    fn eat_digits(bytes: &[u8], from: usize) -> usize {
        from + bytes[from.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    }

    let bytes = text.as_bytes();
    let mut index = eat_digits(bytes, 0);
    if index == 0 {
        return false;
    }
    if bytes.get(index) == Some(&b'.') {
        let end = eat_digits(bytes, index + 1);
        if end == index + 1 {
            return false;
        }
        index = end;
    }
    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        index += 1;
        if matches!(bytes.get(index), Some(b'+' | b'-')) {
            index += 1;
        }
        let end = eat_digits(bytes, index);
        if end == index {
            return false;
        }
        index = end;
    }
    index == bytes.len()
}

pub struct Lexer<'a> {
    input: &'a str,
    cursor: Cursor,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            cursor: Cursor::start(),
            finished: false,
        }
    }

    /// Produces the next token, even past the end of the stream (where it
    /// keeps returning end-of-input).
    pub fn next_token(&mut self) -> Token {
        let (token, next) = scan(self.input, self.cursor);
        trace!(token = %token, "scanned");
        self.cursor = next;
        token
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = match &token.kind {
            TokenKind::Eof => true,
            TokenKind::Error(error) => error.is_fatal(),
            _ => false,
        };
        Some(token)
    }
}

/// Tokenizes the whole input. The result always ends with the end-of-input
/// token, or with a fatal error token if a string literal could not be read.
#[tracing::instrument(skip_all, fields(len = input.len()))]
pub fn tokenize(input: &str) -> Vec<Token> {
    let tokens: Vec<Token> = Lexer::new(input).collect();
    debug!(
        tokens = tokens.len(),
        errors = tokens.iter().filter(|t| t.kind.is_error()).count(),
        "tokenized"
    );
    tokens
}

/// One lexical diagnostic per error token.
pub fn diagnostics(tokens: &[Token]) -> Vec<Diagnostic> {
    tokens
        .iter()
        .filter_map(|token| match &token.kind {
            TokenKind::Error(error) => Some(Diagnostic::new(
                DiagnosticCode::LexicalError,
                token.span,
                error.to_string(),
            )),
            _ => None,
        })
        .collect()
}
