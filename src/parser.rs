//! Recursive-descent parser over the lexer's token stream.
//!
//! Grammar:
//!
//! ```text
//! Start     := Statement (';')?
//! Statement := IDENT '=' Expr | Expr
//! Expr      := Term (('+' | '-') Term)*
//! Term      := Factor (('*' | '/') Factor)*
//! Factor    := IDENT '(' Expr ')' | '(' Expr ')' | IDENT | NUMBER
//! ```
//!
//! Parsing stops at the first error. Only the first statement is parsed;
//! whatever follows its `;` is left untouched. A statement may hold at most
//! [`FrontendConfig::max_operators`] binary operators, which bounds the depth
//! of the left-leaning chains the loops below build.

mod error;

pub use error::ParseError;

use tracing::debug;

use crate::ast::{Node, Operator};
use crate::config::FrontendConfig;
use crate::lexer;
use crate::token::{Span, Token, TokenKind};

const FACTOR: &str = "identifier, number or '('";

pub struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
    depth: usize,
    max_depth: usize,
    operators: usize,
    max_operators: usize,
    eof: Token,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token], config: &FrontendConfig) -> Self {
        let eof_span = tokens.last().map(Token::span).unwrap_or_default();
        Self {
            tokens,
            position: 0,
            depth: 0,
            max_depth: config.max_depth,
            operators: 0,
            max_operators: config.max_operators,
            eof: Token::eof(eof_span),
        }
    }

    pub fn parse(mut self) -> Result<Node, ParseError> {
        let tree = self.parse_statement()?;
        match self.current().kind {
            TokenKind::Eof => {}
            TokenKind::Semicolon => {
                self.advance();
            }
            _ => return Err(self.unexpected("end of expression or ';'")),
        }
        Ok(tree)
    }

    fn parse_statement(&mut self) -> Result<Node, ParseError> {
        if self.current().is(&TokenKind::Identifier)
            && self.peek().is_some_and(|token| token.is(&TokenKind::Assign))
        {
            let target = self.advance();
            let assign = self.advance();
            let value = self.parse_expression()?;
            return Ok(Node::assignment(
                Node::identifier(target.lexeme, target.span),
                value,
                assign.span,
            ));
        }
        self.parse_expression()
    }

    fn parse_expression(&mut self) -> Result<Node, ParseError> {
        let mut expr = self.parse_term()?;
        while let Some(op) = self.binary_operator(&[Operator::Add, Operator::Sub]) {
            let token = self.operator_token()?;
            let right = self.parse_term()?;
            expr = Node::binary(op, expr, right, token.span);
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> Result<Node, ParseError> {
        let mut expr = self.parse_factor()?;
        while let Some(op) = self.binary_operator(&[Operator::Mul, Operator::Div]) {
            let token = self.operator_token()?;
            let right = self.parse_factor()?;
            expr = Node::binary(op, expr, right, token.span);
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> Result<Node, ParseError> {
        match self.current().kind {
            TokenKind::Identifier => {
                let name = self.advance();
                if !self.current().is(&TokenKind::LParen) {
                    return Ok(Node::identifier(name.lexeme, name.span));
                }
                self.advance();
                let argument = self.nested(name.span, Self::parse_expression)?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(Node::call(name.lexeme, vec![argument], name.span))
            }
            TokenKind::LParen => {
                let open = self.advance();
                let expr = self.nested(open.span, Self::parse_expression)?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            TokenKind::Number => {
                let literal = self.advance();
                Ok(Node::number(literal.lexeme, literal.span))
            }
            _ => Err(self.unexpected(FACTOR)),
        }
    }

    fn nested(
        &mut self,
        opened_at: Span,
        parse: impl FnOnce(&mut Self) -> Result<Node, ParseError>,
    ) -> Result<Node, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.max_depth,
                span: opened_at,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn operator_token(&mut self) -> Result<Token, ParseError> {
        if self.operators >= self.max_operators {
            return Err(ParseError::TooManyOperators {
                limit: self.max_operators,
                span: self.current().span,
            });
        }
        self.operators += 1;
        Ok(self.advance())
    }

    fn binary_operator(&self, accepted: &[Operator]) -> Option<Operator> {
        let token = self.current();
        if !token.is(&TokenKind::ArithmeticOp) {
            return None;
        }
        Operator::from_symbol(&token.lexeme).filter(|op| accepted.contains(op))
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.current().is(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&self.eof)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position + 1)
    }

    fn previous(&self) -> Option<&Token> {
        self.position
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current();
        match (&token.kind, self.previous()) {
            (TokenKind::Error(error), _) => ParseError::Lexical {
                error: error.clone(),
                span: token.span,
            },
            (TokenKind::Eof, Some(previous)) => ParseError::UnexpectedEnd {
                expected: expected.to_string(),
                after: previous.lexeme.clone(),
                span: previous.span,
            },
            (TokenKind::Eof, None) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: "end of input".to_string(),
                span: token.span,
            },
            _ => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("{} '{}'", token.kind, token.lexeme),
                span: token.span,
            },
        }
    }
}

pub fn parse_tokens(tokens: &[Token]) -> Result<Node, ParseError> {
    parse_tokens_with(tokens, &FrontendConfig::default())
}

#[tracing::instrument(skip_all, fields(tokens = tokens.len()))]
pub fn parse_tokens_with(tokens: &[Token], config: &FrontendConfig) -> Result<Node, ParseError> {
    let result = Parser::new(tokens, config).parse();
    match &result {
        Ok(tree) => debug!(nodes = tree.size(), "parsed"),
        Err(error) => debug!(%error, "parse failed"),
    }
    result
}

/// Tokenizes and parses `input` in one step.
pub fn parse(input: &str) -> Result<Node, ParseError> {
    parse_tokens(&lexer::tokenize(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::diagnostic::DiagnosticCode;
    use crate::lexer::LexError;
    use indoc::indoc;

    fn token(kind: TokenKind, lexeme: &str, line: usize, column: usize) -> Token {
        Token::new(kind, lexeme, Span::new(line, column))
    }

    #[test]
    fn parses_precedence_and_left_associativity() {
        let tree = parse("a - b - c * d").expect("parse failed");
        let expected = Node::binary(
            Operator::Sub,
            Node::binary(
                Operator::Sub,
                Node::identifier("a", Span::new(1, 1)),
                Node::identifier("b", Span::new(1, 5)),
                Span::new(1, 3),
            ),
            Node::binary(
                Operator::Mul,
                Node::identifier("c", Span::new(1, 9)),
                Node::identifier("d", Span::new(1, 13)),
                Span::new(1, 11),
            ),
            Span::new(1, 7),
        );
        assert_eq!(tree, expected);
    }

    #[test]
    fn parses_assignment() {
        let tree = parse("x = 5").expect("parse failed");
        let expected = Node::assignment(
            Node::identifier("x", Span::new(1, 1)),
            Node::number("5", Span::new(1, 5)),
            Span::new(1, 3),
        );
        assert_eq!(tree, expected);
    }

    #[test]
    fn parses_function_call_with_single_argument() {
        let tree = parse("sqrt(a + 1)").expect("parse failed");
        let NodeKind::Call { name, args } = &tree.kind else {
            panic!("expected call, got {tree:?}");
        };
        assert_eq!(name, "sqrt");
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].to_string(), "a + 1");
    }

    #[test]
    fn parenthesized_expression_has_no_node_of_its_own() {
        let tree = parse("(a)").expect("parse failed");
        assert_eq!(tree, Node::identifier("a", Span::new(1, 2)));
    }

    #[test]
    fn accepts_valid_inputs() {
        for input in [
            "x+y*z",
            "a*(b+c)",
            "var1*(var2+var3)",
            "(a+b)*(c/d)",
            "5",
            "xyz",
            "42 + 3.14",
            "func(a + id)",
            "a * (b + (c / 2))",
            "total = sqrt(16) * 2;",
        ] {
            assert!(parse(input).is_ok(), "valid input rejected: {input}");
        }
    }

    #[test]
    fn rejects_invalid_inputs() {
        for input in ["x+y*", "*a+b", "(a+b", "a+)b", "a++b", "soma a", "42 = a", "a % b", "true"] {
            assert!(parse(input).is_err(), "invalid input accepted: {input}");
        }
    }

    #[test]
    fn dangling_operator_is_reported_at_the_operator() {
        let err = parse("a+b*").expect_err("expected syntax error");
        assert_eq!(err.span(), Span::new(1, 4));
        assert_eq!(
            err.to_string(),
            "Expected identifier, number or '(' after '*', found end of input"
        );
    }

    #[test]
    fn consecutive_operators_report_the_second_one() {
        let tokens = vec![
            token(TokenKind::Identifier, "a", 1, 1),
            token(TokenKind::ArithmeticOp, "+", 1, 3),
            token(TokenKind::ArithmeticOp, "*", 1, 5),
            token(TokenKind::Identifier, "b", 1, 7),
            token(TokenKind::Eof, "$", 1, 8),
        ];
        let err = parse_tokens(&tokens).expect_err("expected syntax error");
        assert_eq!(err.span(), Span::new(1, 5));
        let diagnostic = err.diagnostic();
        assert_eq!(diagnostic.code, DiagnosticCode::SyntaxError);
        assert!(diagnostic.message.contains("line 1, column 5"));
        assert!(diagnostic.message.contains("Expected identifier"));
    }

    #[test]
    fn empty_input_fails() {
        let err = parse("").expect_err("expected syntax error");
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: FACTOR.to_string(),
                found: "end of input".to_string(),
                span: Span::new(1, 1),
            }
        );
    }

    #[test]
    fn empty_token_slice_fails_without_panicking() {
        assert!(parse_tokens(&[]).is_err());
    }

    #[test]
    fn only_the_first_statement_is_parsed() {
        let input = indoc! {"
            a + b;
            c * 2
        "};
        let tree = parse(input).expect("parse failed");
        assert_eq!(tree.to_string(), "a + b");
    }

    #[test]
    fn trailing_content_without_semicolon_is_an_error() {
        let err = parse("a b").expect_err("expected syntax error");
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: "end of expression or ';'".to_string(),
                found: "IDENTIFIER 'b'".to_string(),
                span: Span::new(1, 3),
            }
        );
    }

    #[test]
    fn error_tokens_surface_the_lexical_error() {
        let err = parse("a + @").expect_err("expected syntax error");
        assert_eq!(
            err,
            ParseError::Lexical {
                error: LexError::UnexpectedCharacter('@'),
                span: Span::new(1, 5),
            }
        );
    }

    #[test]
    fn unterminated_string_fails_parse() {
        let err = parse("\"abc").expect_err("expected syntax error");
        assert!(matches!(
            err,
            ParseError::Lexical {
                error: LexError::UnterminatedString,
                ..
            }
        ));
    }

    #[test]
    fn nesting_limit_is_enforced() {
        let config = FrontendConfig::default().with_max_depth(3);
        let shallow = lexer::tokenize("((1))");
        assert!(parse_tokens_with(&shallow, &config).is_ok());

        let deep = lexer::tokenize("((((1))))");
        let err = parse_tokens_with(&deep, &config).expect_err("expected nesting error");
        assert_eq!(
            err,
            ParseError::NestingTooDeep {
                limit: 3,
                span: Span::new(1, 4),
            }
        );
    }

    #[test]
    fn deeply_nested_input_within_default_limit_parses() {
        let depth = 200;
        let input = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        let tree = parse(&input).expect("parse failed");
        assert_eq!(tree.to_string(), "x");
    }

    #[test]
    fn operator_limit_counts_every_binary_operator() {
        let config = FrontendConfig::default().with_max_operators(3);
        let within = lexer::tokenize("a + b + c + d");
        assert!(parse_tokens_with(&within, &config).is_ok());

        let over = lexer::tokenize("a + b * c + d - e");
        let err = parse_tokens_with(&over, &config).expect_err("expected operator limit error");
        assert_eq!(
            err,
            ParseError::TooManyOperators {
                limit: 3,
                span: Span::new(1, 15),
            }
        );
        assert_eq!(
            err.diagnostic().message,
            "line 1, column 15: Expression has more than 3 operators"
        );
    }

    #[test]
    fn long_flat_chain_stays_within_nesting_limit() {
        let config = FrontendConfig::default().with_max_depth(1);
        let input = format!("x = 1{}", " + 1".repeat(300));
        let tree = parse_tokens_with(&lexer::tokenize(&input), &config).expect("parse failed");
        assert_eq!(tree.size(), 603);
    }

    #[test]
    fn oversized_chain_is_rejected_instead_of_built() {
        let input = format!("1{}", " + 1".repeat(300_000));
        let err = parse(&input).expect_err("expected operator limit error");
        assert!(matches!(
            err,
            ParseError::TooManyOperators {
                limit: crate::config::DEFAULT_MAX_OPERATORS,
                ..
            }
        ));
    }

    #[test]
    fn parsing_rendered_tree_reproduces_lexemes() {
        let input = "a * (b + c) - sqrt(d / 2)";
        let tree = parse(input).expect("parse failed");
        let rendered = tree.to_string();
        let lexemes = |text: &str| {
            lexer::tokenize(text)
                .into_iter()
                .map(|token| token.lexeme)
                .collect::<Vec<_>>()
        };
        assert_eq!(lexemes(&rendered), lexemes(input));
    }
}
