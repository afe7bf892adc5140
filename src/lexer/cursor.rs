use crate::token::Span;

/// Position inside the lexer input.
///
/// The input itself is never stored here: every scan step borrows it and
/// hands back a new cursor, so a step can be replayed from any position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn span(self) -> Span {
        Span::new(self.line, self.column)
    }

    pub fn peek(self, input: &str) -> Option<char> {
        input.get(self.offset..)?.chars().next()
    }

    pub fn peek_second(self, input: &str) -> Option<char> {
        let mut chars = input.get(self.offset..)?.chars();
        chars.next();
        chars.next()
    }

    /// Moves past the current character. At end of input the cursor is
    /// returned unchanged.
    pub fn advance(self, input: &str) -> Self {
        match self.peek(input) {
            Some('\n') => Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            },
            Some(c) => Self {
                offset: self.offset + c.len_utf8(),
                line: self.line,
                column: self.column + 1,
            },
            None => self,
        }
    }

    pub fn advance_by(self, input: &str, count: usize) -> Self {
        (0..count).fold(self, |cursor, _| cursor.advance(input))
    }

    /// Input text between this cursor and a later one.
    pub fn slice_to<'a>(self, input: &'a str, end: Cursor) -> &'a str {
        input.get(self.offset..end.offset).unwrap_or("")
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start()
    }
}
