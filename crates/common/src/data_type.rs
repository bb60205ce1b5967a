//! The `type` operand of `READ`.

use std::fmt;
use std::str::FromStr;

use crate::error::OperandError;

/// A data type that can be requested from the input reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    Bool,
    String,
}

/// All readable data types, in definition order.
pub const ALL_DATA_TYPES: [DataType; 3] = [DataType::Int, DataType::Bool, DataType::String];

impl DataType {
    /// The source-level name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Bool => "bool",
            DataType::String => "string",
        }
    }
}

impl FromStr for DataType {
    type Err = OperandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_DATA_TYPES
            .iter()
            .find(|ty| ty.name() == s)
            .copied()
            .ok_or_else(|| OperandError::TypeName(s.to_string()))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_names() {
        for ty in ALL_DATA_TYPES {
            assert_eq!(ty.name().parse::<DataType>(), Ok(ty));
        }
    }

    #[test]
    fn nil_is_not_readable() {
        assert_eq!(
            "nil".parse::<DataType>(),
            Err(OperandError::TypeName("nil".to_string()))
        );
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!("INT".parse::<DataType>().is_err());
    }
}
