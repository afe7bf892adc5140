use std::fmt;

/// Static type of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Integer,
    Decimal,
    Boolean,
    String,
    /// Unknown or unconstrained. Compatible with every other type.
    Undefined,
}

impl DataType {
    /// Whether a value of type `found` may be used where `expected` is
    /// required. Integer widens to Decimal, never the other way round.
    pub fn is_compatible(expected: DataType, found: DataType) -> bool {
        match (expected, found) {
            (Self::Undefined, _) | (_, Self::Undefined) => true,
            (Self::Decimal, Self::Integer) => true,
            (expected, found) => expected == found,
        }
    }

    /// Type of a numeric literal, decided by the presence of a decimal point.
    pub fn of_number(literal: &str) -> Self {
        if literal.contains('.') {
            Self::Decimal
        } else {
            Self::Integer
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "Integer",
            Self::Decimal => "Decimal",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::Undefined => "Undefined",
        })
    }
}
