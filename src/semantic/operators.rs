use crate::ast::Operator;
use crate::types::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorClass {
    Arithmetic,
    Relational,
    Logical,
    Comparison,
}

impl OperatorClass {
    /// Operators the analyzer knows how to type. `%` is lexed and parsed in
    /// hand-built trees but has no entry.
    pub fn of(op: Operator) -> Option<Self> {
        match op {
            Operator::Add | Operator::Sub | Operator::Mul | Operator::Div => Some(Self::Arithmetic),
            Operator::Less | Operator::Greater | Operator::LessEqual | Operator::GreaterEqual => {
                Some(Self::Relational)
            }
            Operator::And | Operator::Or | Operator::Not => Some(Self::Logical),
            Operator::Equal | Operator::NotEqual => Some(Self::Comparison),
            Operator::Mod => None,
        }
    }

    /// Whether an operand of type `ty` is allowed. Undefined operands are
    /// always allowed; they were already reported where they arose.
    pub fn accepts(self, ty: DataType) -> bool {
        match (self, ty) {
            (_, DataType::Undefined) => true,
            (Self::Arithmetic | Self::Relational, DataType::Integer | DataType::Decimal) => true,
            (Self::Logical, DataType::Boolean) => true,
            (Self::Comparison, _) => true,
            _ => false,
        }
    }

    pub fn result_type(self, left: DataType) -> DataType {
        match self {
            Self::Arithmetic => left,
            Self::Relational | Self::Logical | Self::Comparison => DataType::Boolean,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Arithmetic => "arithmetic",
            Self::Relational => "relational",
            Self::Logical => "logical",
            Self::Comparison => "comparison",
        }
    }
}
