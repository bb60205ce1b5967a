//! Instruction operands: variable references, symbols, labels and types.
//!
//! Operands are parsed from their textual form once, when the program is
//! loaded. The VM only ever sees the typed representation.

use std::fmt;
use std::str::FromStr;

use crate::data_type::DataType;
use crate::error::OperandError;
use crate::value::Value;

/// Selects one of the three frame kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// `GF`: lives for the whole run.
    Global,
    /// `LF`: the top of the local-frame stack.
    Local,
    /// `TF`: staging frame between CREATEFRAME and PUSHFRAME.
    Temporary,
}

impl FrameKind {
    /// The two-letter prefix used in variable references.
    pub fn prefix(&self) -> &'static str {
        match self {
            FrameKind::Global => "GF",
            FrameKind::Local => "LF",
            FrameKind::Temporary => "TF",
        }
    }
}

/// A variable reference, `FRAME@name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarRef {
    pub frame: FrameKind,
    pub name: String,
}

impl VarRef {
    /// Build a reference, validating the name.
    pub fn new(frame: FrameKind, name: impl Into<String>) -> Result<Self, OperandError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(OperandError::Identifier(name));
        }
        Ok(Self { frame, name })
    }

    /// Split `GF@x`, `LF@x` or `TF@x` into frame selector and bare name.
    pub fn parse(text: &str) -> Result<Self, OperandError> {
        let (prefix, name) = text
            .split_once('@')
            .ok_or_else(|| OperandError::VarRef(text.to_string()))?;
        let frame = match prefix {
            "GF" => FrameKind::Global,
            "LF" => FrameKind::Local,
            "TF" => FrameKind::Temporary,
            _ => return Err(OperandError::VarRef(text.to_string())),
        };
        Self::new(frame, name)
    }
}

impl FromStr for VarRef {
    type Err = OperandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VarRef::parse(s)
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.frame.prefix(), self.name)
    }
}

/// A `symb` operand: either a variable or a constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Var(VarRef),
    Const(Value),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Var(var) => write!(f, "{var}"),
            Symbol::Const(value) => f.write_str(&value.literal()),
        }
    }
}

/// An operand as it comes out of the front end, before it is matched
/// against an opcode's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Var(VarRef),
    Const(Value),
    Label(String),
    Type(DataType),
}

impl Operand {
    /// Parse a variable or constant operand (`GF@x`, `int@5`, ...).
    pub fn parse_symbol(text: &str) -> Result<Self, OperandError> {
        let (prefix, rest) = text
            .split_once('@')
            .ok_or_else(|| OperandError::VarRef(text.to_string()))?;
        match prefix {
            "GF" | "LF" | "TF" => VarRef::parse(text).map(Operand::Var),
            "int" | "bool" | "string" | "nil" => {
                Value::parse_literal(prefix, rest).map(Operand::Const)
            }
            _ => Err(OperandError::VarRef(text.to_string())),
        }
    }

    /// Parse a label operand.
    pub fn parse_label(text: &str) -> Result<Self, OperandError> {
        if is_identifier(text) {
            Ok(Operand::Label(text.to_string()))
        } else {
            Err(OperandError::Identifier(text.to_string()))
        }
    }

    /// Parse a type operand.
    pub fn parse_type(text: &str) -> Result<Self, OperandError> {
        text.parse().map(Operand::Type)
    }

    /// Human-readable kind, used in shape errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Operand::Var(_) => "var",
            Operand::Const(value) => value.type_name(),
            Operand::Label(_) => "label",
            Operand::Type(_) => "type",
        }
    }
}

/// One position of an opcode's operand signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// Must be a variable reference.
    Var,
    /// Variable or constant.
    Symb,
    Label,
    Type,
}

impl OperandKind {
    pub fn name(&self) -> &'static str {
        match self {
            OperandKind::Var => "var",
            OperandKind::Symb => "symb",
            OperandKind::Label => "label",
            OperandKind::Type => "type",
        }
    }
}

/// Variable and label names: a letter or special character followed by
/// letters, digits or special characters.
pub fn is_identifier(text: &str) -> bool {
    const SPECIAL: &str = "_-$&%*!?";
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || SPECIAL.contains(c) => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || SPECIAL.contains(c))
}
