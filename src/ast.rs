//! Syntax tree built by the parser and annotated by the semantic analyzer.
//!
//! Every node owns its children, so the tree is acyclic and no node is
//! shared between parents. `inferred` stays `None` until the analyzer's
//! verification pass visits the node.

use std::fmt::{self, Write};

use crate::token::Span;
use crate::types::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
    Or,
    Not,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Not => "!",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Mod,
            "<" => Self::Less,
            ">" => Self::Greater,
            "<=" => Self::LessEqual,
            ">=" => Self::GreaterEqual,
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            "&&" => Self::And,
            "||" => Self::Or,
            "!" => Self::Not,
            _ => return None,
        })
    }

    /// Binding strength used when rendering; higher binds tighter.
    fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Equal | Self::NotEqual => 3,
            Self::Less | Self::Greater | Self::LessEqual | Self::GreaterEqual => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Mod => 6,
            Self::Not => 7,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum NodeKind {
    Identifier(String),
    Number(String),
    /// Binary operation, or unary when `right` is absent.
    Operator {
        op: Operator,
        left: Box<Node>,
        right: Option<Box<Node>>,
    },
    Call {
        name: String,
        args: Vec<Node>,
    },
    Assignment {
        target: Box<Node>,
        value: Box<Node>,
    },
}

#[derive(Debug, PartialEq, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub inferred: Option<DataType>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            span,
            inferred: None,
        }
    }

    pub fn identifier(name: impl Into<String>, span: Span) -> Self {
        Self::new(NodeKind::Identifier(name.into()), span)
    }

    pub fn number(literal: impl Into<String>, span: Span) -> Self {
        Self::new(NodeKind::Number(literal.into()), span)
    }

    pub fn binary(op: Operator, left: Node, right: Node, span: Span) -> Self {
        Self::new(
            NodeKind::Operator {
                op,
                left: Box::new(left),
                right: Some(Box::new(right)),
            },
            span,
        )
    }

    pub fn unary(op: Operator, operand: Node, span: Span) -> Self {
        Self::new(
            NodeKind::Operator {
                op,
                left: Box::new(operand),
                right: None,
            },
            span,
        )
    }

    pub fn call(name: impl Into<String>, args: Vec<Node>, span: Span) -> Self {
        Self::new(
            NodeKind::Call {
                name: name.into(),
                args,
            },
            span,
        )
    }

    pub fn assignment(target: Node, value: Node, span: Span) -> Self {
        Self::new(
            NodeKind::Assignment {
                target: Box::new(target),
                value: Box::new(value),
            },
            span,
        )
    }

    /// Source text carried by the node: a name, a literal, an operator
    /// symbol, or `=` for assignments.
    pub fn value(&self) -> &str {
        match &self.kind {
            NodeKind::Identifier(name) | NodeKind::Call { name, .. } => name,
            NodeKind::Number(literal) => literal,
            NodeKind::Operator { op, .. } => op.symbol(),
            NodeKind::Assignment { .. } => "=",
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Identifier(_) => "IDENTIFIER",
            NodeKind::Number(_) => "NUMBER",
            NodeKind::Operator { .. } => "OPERATOR",
            NodeKind::Call { .. } => "FUNCTION_CALL",
            NodeKind::Assignment { .. } => "ASSIGNMENT",
        }
    }

    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Identifier(_) | NodeKind::Number(_) => Vec::new(),
            NodeKind::Operator { left, right, .. } => {
                std::iter::once(&**left).chain(right.as_deref()).collect()
            }
            NodeKind::Call { args, .. } => args.iter().collect(),
            NodeKind::Assignment { target, value } => vec![&**target, &**value],
        }
    }

    /// Number of nodes in the tree rooted here.
    pub fn size(&self) -> usize {
        let mut pending = vec![self];
        let mut count = 0;
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children());
        }
        count
    }

    /// Indented dump of the tree, one `[KIND: value (Type)]` line per node.
    pub fn pretty(&self) -> String {
        let mut output = String::new();
        self.write_pretty(&mut output, 0);
        output
    }

    fn write_pretty(&self, output: &mut String, depth: usize) {
        let _ = write!(
            output,
            "{}[{}: {}",
            "  ".repeat(depth),
            self.kind_name(),
            self.value()
        );
        if let Some(ty) = self.inferred {
            let _ = write!(output, " ({ty})");
        }
        output.push_str("]\n");
        for child in self.children() {
            child.write_pretty(output, depth + 1);
        }
    }

    fn precedence(&self) -> u8 {
        match &self.kind {
            NodeKind::Operator { op, .. } => op.precedence(),
            NodeKind::Assignment { .. } => 0,
            _ => u8::MAX,
        }
    }

    fn render_operand(&self, f: &mut fmt::Formatter<'_>, parenthesize: bool) -> fmt::Result {
        if parenthesize {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

// Detaches children onto a worklist so that dropping a long operator chain
// never recurses once per level.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(&mut self.kind, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node.kind, &mut pending);
        }
    }
}

fn detach_children(kind: &mut NodeKind, pending: &mut Vec<Node>) {
    match kind {
        NodeKind::Identifier(_) | NodeKind::Number(_) => {}
        NodeKind::Operator { left, right, .. } => {
            pending.push(detach(left));
            if let Some(right) = right.take() {
                pending.push(*right);
            }
        }
        NodeKind::Call { args, .. } => pending.append(args),
        NodeKind::Assignment { target, value } => {
            pending.push(detach(target));
            pending.push(detach(value));
        }
    }
}

fn detach(slot: &mut Node) -> Node {
    let span = slot.span;
    std::mem::replace(slot, Node::number("", span))
}

/// Renders source text with the fewest parentheses that keep the tree's
/// shape, so operators associate to the left.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Identifier(name) => f.write_str(name),
            NodeKind::Number(literal) => f.write_str(literal),
            NodeKind::Operator {
                op,
                left,
                right: Some(right),
            } => {
                let precedence = op.precedence();
                left.render_operand(f, left.precedence() < precedence)?;
                write!(f, " {op} ")?;
                right.render_operand(f, right.precedence() <= precedence)
            }
            NodeKind::Operator {
                op,
                left,
                right: None,
            } => {
                f.write_str(op.symbol())?;
                left.render_operand(f, left.precedence() < op.precedence())
            }
            NodeKind::Call { name, args } => {
                write!(f, "{name}(")?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            NodeKind::Assignment { target, value } => write!(f, "{target} = {value}"),
        }
    }
}
