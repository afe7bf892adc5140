//! Runs every stage over one source text and collects what each produced.

use tracing::debug;

use crate::ast::Node;
use crate::config::FrontendConfig;
use crate::diagnostic::{self, Diagnostic};
use crate::lexer;
use crate::parser::{self, ParseError};
use crate::semantic::{self, AnalysisResult};
use crate::token::Token;

#[derive(Debug, Clone)]
pub enum Outcome {
    /// Parsing failed; no tree was built.
    Rejected(ParseError),
    Analyzed { tree: Node, analysis: AnalysisResult },
}

#[derive(Debug, Clone)]
pub struct FrontendReport {
    pub tokens: Vec<Token>,
    /// One `ERRO_LEXICO` entry per error token, including tokens the parser
    /// never reached.
    pub lexical: Vec<Diagnostic>,
    pub outcome: Outcome,
}

impl FrontendReport {
    pub fn tree(&self) -> Option<&Node> {
        match &self.outcome {
            Outcome::Analyzed { tree, .. } => Some(tree),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match &self.outcome {
            Outcome::Analyzed { analysis, .. } => Some(analysis),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        match &self.outcome {
            Outcome::Rejected(error) => Some(error),
            Outcome::Analyzed { .. } => None,
        }
    }

    /// Lexical diagnostics followed by the syntax error or the analyzer's
    /// diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.lexical.clone();
        match &self.outcome {
            Outcome::Rejected(error) => diagnostics.push(error.diagnostic()),
            Outcome::Analyzed { analysis, .. } => {
                diagnostics.extend(analysis.diagnostics().iter().cloned())
            }
        }
        diagnostics
    }

    pub fn has_errors(&self) -> bool {
        diagnostic::has_errors(&self.diagnostics())
    }
}

#[tracing::instrument(skip_all, fields(len = source.len()))]
pub fn run(source: &str, config: &FrontendConfig) -> FrontendReport {
    let tokens = lexer::tokenize(source);
    let lexical = lexer::diagnostics(&tokens);
    let outcome = match parser::parse_tokens_with(&tokens, config) {
        Ok(mut tree) => {
            let analysis = semantic::analyze_with(&mut tree, config);
            Outcome::Analyzed { tree, analysis }
        }
        Err(error) => Outcome::Rejected(error),
    };
    debug!(
        tokens = tokens.len(),
        lexical = lexical.len(),
        parsed = matches!(outcome, Outcome::Analyzed { .. }),
        "frontend finished"
    );
    FrontendReport {
        tokens,
        lexical,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCode;
    use crate::token::{Span, TokenKind};
    use crate::types::DataType;

    fn codes(report: &FrontendReport) -> Vec<DiagnosticCode> {
        report.diagnostics().iter().map(|d| d.code).collect()
    }

    #[test]
    fn successful_run_keeps_tree_and_analysis() {
        let report = run("x = 5", &FrontendConfig::default());
        let kinds: Vec<_> = report.tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            [
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
        let tree = report.tree().expect("tree built");
        assert_eq!(tree.inferred, Some(DataType::Integer));
        assert!(report.analysis().is_some_and(AnalysisResult::is_success));
        assert_eq!(codes(&report), [DiagnosticCode::UnusedVariable]);
        assert!(!report.has_errors());
    }

    #[test]
    fn syntax_error_skips_analysis() {
        let report = run("a+b*", &FrontendConfig::default());
        assert!(report.tree().is_none());
        assert_eq!(
            report.parse_error().map(ParseError::span),
            Some(Span::new(1, 4))
        );
        assert_eq!(codes(&report), [DiagnosticCode::SyntaxError]);
        assert!(report.has_errors());
    }

    #[test]
    fn lexical_errors_past_the_statement_are_still_reported() {
        let report = run("a + 1; @", &FrontendConfig::default());
        assert!(report.tree().is_some());
        assert_eq!(codes(&report), [DiagnosticCode::LexicalError, DiagnosticCode::UndeclaredVariable]);
        assert_eq!(report.lexical[0].span, Span::new(1, 8));
    }

    #[test]
    fn lexical_error_inside_statement_reports_both_stages() {
        let report = run("a # b", &FrontendConfig::default());
        assert_eq!(
            codes(&report),
            [DiagnosticCode::LexicalError, DiagnosticCode::SyntaxError]
        );
    }

    #[test]
    fn nesting_limit_ignores_flat_chains() {
        let config = FrontendConfig::default().with_max_depth(2);
        let chain = format!("x = 1{}", " + 1".repeat(300));
        let report = run(&chain, &config);
        assert!(!report.has_errors(), "{:?}", report.diagnostics());
        assert_eq!(codes(&report), [DiagnosticCode::UnusedVariable]);

        let report = run("y = sqrt(sqrt(2 * (3 + 4)))", &config);
        assert!(matches!(
            report.parse_error(),
            Some(ParseError::NestingTooDeep { limit: 2, .. })
        ));
    }

    #[test]
    fn oversized_chain_fails_as_a_syntax_error() {
        let chain = format!("1{}", " + 1".repeat(300_000));
        let report = run(&chain, &FrontendConfig::default());
        assert!(matches!(
            report.parse_error(),
            Some(ParseError::TooManyOperators { .. })
        ));
        assert_eq!(codes(&report), [DiagnosticCode::SyntaxError]);
    }

    #[test]
    fn configured_depth_reaches_parser() {
        let config = FrontendConfig::default().with_max_depth(2);
        let report = run("(((1)))", &config);
        assert!(matches!(
            report.parse_error(),
            Some(ParseError::NestingTooDeep { limit: 2, .. })
        ));
    }
}
