use std::fmt;

use tracing::{debug, warn};

use super::builtins::BuiltinFunction;
use super::error::AnalysisError;
use super::operators::OperatorClass;
use super::symbol_table::SymbolTable;
use crate::ast::{Node, NodeKind};
use crate::config::FrontendConfig;
use crate::diagnostic::{Diagnostic, DiagnosticCode, Severity};
use crate::lexer;
use crate::token::Span;
use crate::types::DataType;

/// Outcome of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    success: bool,
    diagnostics: Vec<Diagnostic>,
    symbols: SymbolTable,
}

impl AnalysisResult {
    /// True when no diagnostic has error severity. Warnings do not fail an
    /// analysis.
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn codes(&self) -> Vec<DiagnosticCode> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors().count();
        let warnings = self.warnings().count();
        if self.success {
            writeln!(f, "Analysis succeeded ({warnings} warning(s))")?;
        } else {
            writeln!(f, "Analysis failed ({errors} error(s), {warnings} warning(s))")?;
        }
        writeln!(f, "Symbol table:")?;
        write!(f, "{}", self.symbols)?;
        writeln!(f, "Diagnostics:")?;
        if self.diagnostics.is_empty() {
            writeln!(f, "  none")?;
        }
        for diagnostic in &self.diagnostics {
            writeln!(f, "  {diagnostic}")?;
        }
        Ok(())
    }
}

/// Two-pass checker over a single tree.
///
/// The declaration pass declares every assignment target with the type its
/// value would have, without reporting anything but duplicates. The
/// verification pass then types every node, records the type in
/// [`Node::inferred`] and reports problems. A final sweep warns about
/// variables that were never read.
///
/// Only call arguments add a nesting level, so the analyzer accepts every
/// tree the parser builds under the same [`FrontendConfig`].
pub struct Analyzer {
    symbols: SymbolTable,
    diagnostics: Vec<Diagnostic>,
    max_depth: usize,
}

impl Analyzer {
    pub fn new(config: &FrontendConfig) -> Self {
        Self {
            symbols: SymbolTable::new(),
            diagnostics: Vec::new(),
            max_depth: config.max_depth,
        }
    }

    #[tracing::instrument(skip_all, fields(nodes = tree.size()))]
    pub fn analyze(mut self, tree: &mut Node) -> AnalysisResult {
        if let Err(error) = self.run(tree) {
            warn!(%error, "analysis aborted");
            self.diagnostics.push(error.diagnostic());
        }
        let success = !self.diagnostics.iter().any(Diagnostic::is_error);
        debug!(
            success,
            diagnostics = self.diagnostics.len(),
            symbols = self.symbols.len(),
            "analysis finished"
        );
        AnalysisResult {
            success,
            diagnostics: self.diagnostics,
            symbols: self.symbols,
        }
    }

    fn run(&mut self, tree: &mut Node) -> Result<(), AnalysisError> {
        self.declare(tree, 0)?;
        debug!(
            symbols = self.symbols.len(),
            diagnostics = self.diagnostics.len(),
            "declaration pass finished"
        );
        self.verify(tree, 0)?;
        debug!(diagnostics = self.diagnostics.len(), "verification pass finished");
        self.report_unused();
        Ok(())
    }

    fn report(&mut self, code: DiagnosticCode, span: Span, message: String) {
        self.diagnostics.push(Diagnostic::new(code, span, message));
    }

    /// `depth` counts the calls enclosing `node`.
    fn enter(&self, node: &Node, depth: usize) -> Result<(), AnalysisError> {
        if depth > self.max_depth {
            return Err(AnalysisError::DepthExceeded {
                limit: self.max_depth,
                span: node.span,
            });
        }
        Ok(())
    }

    fn declare(&mut self, node: &Node, depth: usize) -> Result<(), AnalysisError> {
        self.enter(node, depth)?;
        if let NodeKind::Assignment { target, value } = &node.kind
            && let NodeKind::Identifier(name) = &target.kind
        {
            let data_type = self.infer(value, depth)?;
            if let Err(duplicate) = self.symbols.declare(name, data_type, target.span) {
                self.report(
                    DiagnosticCode::DuplicateVariable,
                    target.span,
                    duplicate.to_string(),
                );
            }
        }
        let depth = match node.kind {
            NodeKind::Call { .. } => depth + 1,
            _ => depth,
        };
        for child in node.children() {
            self.declare(child, depth)?;
        }
        Ok(())
    }

    /// Type a node would have, computed without reporting anything or
    /// touching usage flags.
    fn infer(&self, node: &Node, depth: usize) -> Result<DataType, AnalysisError> {
        self.enter(node, depth)?;
        Ok(match &node.kind {
            NodeKind::Identifier(name) => self
                .symbols
                .lookup(name)
                .map_or(DataType::Undefined, |symbol| symbol.data_type),
            NodeKind::Number(literal) => DataType::of_number(literal),
            NodeKind::Operator { op, left, .. } => match OperatorClass::of(*op) {
                Some(class) => class.result_type(self.infer(left, depth)?),
                None => DataType::Undefined,
            },
            NodeKind::Call { name, .. } => BuiltinFunction::from_name(name)
                .map_or(DataType::Undefined, BuiltinFunction::return_type),
            NodeKind::Assignment { value, .. } => self.infer(value, depth)?,
        })
    }

    fn verify(&mut self, node: &mut Node, depth: usize) -> Result<DataType, AnalysisError> {
        self.enter(node, depth)?;
        let span = node.span;
        let data_type = match &mut node.kind {
            NodeKind::Identifier(name) => self.verify_identifier(name, span),
            NodeKind::Number(literal) => {
                if !lexer::is_valid_number(literal) {
                    self.report(
                        DiagnosticCode::InvalidNumber,
                        span,
                        format!("Invalid number '{literal}'"),
                    );
                }
                DataType::of_number(literal)
            }
            NodeKind::Operator { op, left, right } => {
                let op = *op;
                let left_type = self.verify(left, depth)?;
                let right_type = match right {
                    Some(right) => Some(self.verify(right, depth)?),
                    None => None,
                };
                match OperatorClass::of(op) {
                    None => {
                        self.report(
                            DiagnosticCode::UnknownOperator,
                            span,
                            format!("Unknown operator '{op}'"),
                        );
                        DataType::Undefined
                    }
                    Some(class) => {
                        for (side, operand) in [("left", Some(left_type)), ("right", right_type)] {
                            if let Some(operand) = operand
                                && !class.accepts(operand)
                            {
                                self.report(
                                    DiagnosticCode::OperandType,
                                    span,
                                    format!(
                                        "{} operator '{op}' does not accept {side} operand of type {operand}",
                                        capitalize(class.name())
                                    ),
                                );
                            }
                        }
                        if class == OperatorClass::Comparison
                            && let Some(right_type) = right_type
                            && left_type != right_type
                            && left_type != DataType::Undefined
                            && right_type != DataType::Undefined
                        {
                            self.report(
                                DiagnosticCode::IncompatibleTypes,
                                span,
                                format!(
                                    "Incompatible types for '{op}': {left_type} and {right_type}"
                                ),
                            );
                        }
                        class.result_type(left_type)
                    }
                }
            }
            NodeKind::Call { name, args } => {
                let mut found = Vec::with_capacity(args.len());
                for arg in args.iter_mut() {
                    found.push((arg.span, self.verify(arg, depth + 1)?));
                }
                self.verify_call(name, &found, span)
            }
            NodeKind::Assignment { target, value } => {
                let value_type = self.verify(value, depth)?;
                match &target.kind {
                    NodeKind::Identifier(name) => {
                        let declared = self.verify_assignment(name, value_type, span);
                        target.inferred = Some(declared);
                        declared
                    }
                    _ => {
                        self.report(
                            DiagnosticCode::InvalidAssignment,
                            span,
                            format!(
                                "Assignment target must be an identifier, found {}",
                                target.kind_name()
                            ),
                        );
                        self.verify(target, depth)?;
                        DataType::Undefined
                    }
                }
            }
        };
        node.inferred = Some(data_type);
        Ok(data_type)
    }

    fn verify_identifier(&mut self, name: &str, span: Span) -> DataType {
        match self.symbols.lookup_mut(name) {
            Some(symbol) => {
                symbol.mark_used();
                symbol.data_type
            }
            None => {
                self.report(
                    DiagnosticCode::UndeclaredVariable,
                    span,
                    format!("Variable '{name}' is not declared"),
                );
                DataType::Undefined
            }
        }
    }

    fn verify_call(&mut self, name: &str, found: &[(Span, DataType)], span: Span) -> DataType {
        let Some(function) = BuiltinFunction::from_name(name) else {
            self.report(
                DiagnosticCode::UndefinedFunction,
                span,
                format!("Function '{name}' is not defined"),
            );
            return DataType::Undefined;
        };
        let params = function.params();
        if params.len() != found.len() {
            self.report(
                DiagnosticCode::WrongArgumentCount,
                span,
                format!(
                    "Function '{}' expects {} argument(s), found {}",
                    function.name(),
                    params.len(),
                    found.len()
                ),
            );
        } else {
            for (position, (&expected, &(arg_span, arg_type))) in
                params.iter().zip(found).enumerate()
            {
                if !DataType::is_compatible(expected, arg_type) {
                    self.report(
                        DiagnosticCode::ArgumentType,
                        arg_span,
                        format!(
                            "Argument {} of '{}' expects {expected}, found {arg_type}",
                            position + 1,
                            function.name()
                        ),
                    );
                }
            }
        }
        function.return_type()
    }

    /// Checks the value against the target's declared type. Reading the
    /// target here does not count as a use.
    fn verify_assignment(&mut self, name: &str, value_type: DataType, span: Span) -> DataType {
        let Some(symbol) = self.symbols.lookup_mut(name) else {
            return value_type;
        };
        symbol.mark_initialized();
        let declared = symbol.data_type;
        if !DataType::is_compatible(declared, value_type) {
            self.report(
                DiagnosticCode::IncompatibleAssignment,
                span,
                format!("Cannot assign {value_type} to '{name}' of type {declared}"),
            );
        }
        declared
    }

    fn report_unused(&mut self) {
        let unused: Vec<_> = self
            .symbols
            .all_symbols()
            .into_iter()
            .filter(|symbol| !symbol.used)
            .map(|symbol| (symbol.name.clone(), symbol.span))
            .collect();
        for (name, span) in unused {
            self.report(
                DiagnosticCode::UnusedVariable,
                span,
                format!("Variable '{name}' is declared but never used"),
            );
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
