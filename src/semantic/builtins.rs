use crate::types::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFunction {
    Sqrt,
    Pow,
    Print,
}

impl BuiltinFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sqrt" => Some(Self::Sqrt),
            "pow" => Some(Self::Pow),
            "print" => Some(Self::Print),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Pow => "pow",
            Self::Print => "print",
        }
    }

    pub fn params(self) -> &'static [DataType] {
        match self {
            Self::Sqrt => &[DataType::Decimal],
            Self::Pow => &[DataType::Decimal, DataType::Decimal],
            Self::Print => &[DataType::Undefined],
        }
    }

    pub fn return_type(self) -> DataType {
        match self {
            Self::Sqrt | Self::Pow => DataType::Decimal,
            Self::Print => DataType::Undefined,
        }
    }
}
