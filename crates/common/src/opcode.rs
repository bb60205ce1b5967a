//! Opcode definitions for the IPPcode24 instruction set.

use crate::operand::OperandKind;
use crate::operand::OperandKind::{Label as L, Symb as S, Type as T, Var as V};

/// Identifies the operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Frames and calls
    Move,
    CreateFrame,
    PushFrame,
    PopFrame,
    Defvar,
    Call,
    Return,

    // Data stack
    Pushs,
    Pops,

    // Arithmetic, relational, logical
    Add,
    Sub,
    Mul,
    Idiv,
    Lt,
    Gt,
    Eq,
    And,
    Or,
    Not,

    // Conversions
    Int2Char,
    Stri2Int,

    // Input/output
    Read,
    Write,

    // Strings
    Concat,
    Strlen,
    GetChar,
    SetChar,

    // Types
    Type,

    // Control flow
    Label,
    Jump,
    JumpIfEq,
    JumpIfNeq,
    Exit,

    // Debugging
    Dprint,
    Break,
}

/// All opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 35] = [
    Opcode::Move,
    Opcode::CreateFrame,
    Opcode::PushFrame,
    Opcode::PopFrame,
    Opcode::Defvar,
    Opcode::Call,
    Opcode::Return,
    Opcode::Pushs,
    Opcode::Pops,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Idiv,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Eq,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Int2Char,
    Opcode::Stri2Int,
    Opcode::Read,
    Opcode::Write,
    Opcode::Concat,
    Opcode::Strlen,
    Opcode::GetChar,
    Opcode::SetChar,
    Opcode::Type,
    Opcode::Label,
    Opcode::Jump,
    Opcode::JumpIfEq,
    Opcode::JumpIfNeq,
    Opcode::Exit,
    Opcode::Dprint,
    Opcode::Break,
];

impl Opcode {
    /// Returns the canonical (uppercase) mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Move => "MOVE",
            Opcode::CreateFrame => "CREATEFRAME",
            Opcode::PushFrame => "PUSHFRAME",
            Opcode::PopFrame => "POPFRAME",
            Opcode::Defvar => "DEFVAR",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::Pushs => "PUSHS",
            Opcode::Pops => "POPS",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Idiv => "IDIV",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Eq => "EQ",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Int2Char => "INT2CHAR",
            Opcode::Stri2Int => "STRI2INT",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Concat => "CONCAT",
            Opcode::Strlen => "STRLEN",
            Opcode::GetChar => "GETCHAR",
            Opcode::SetChar => "SETCHAR",
            Opcode::Type => "TYPE",
            Opcode::Label => "LABEL",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfEq => "JUMPIFEQ",
            Opcode::JumpIfNeq => "JUMPIFNEQ",
            Opcode::Exit => "EXIT",
            Opcode::Dprint => "DPRINT",
            Opcode::Break => "BREAK",
        }
    }

    /// Look up an opcode by mnemonic. Matching is case-insensitive and
    /// accepts `STR2INT` as an alias of `STRI2INT`.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        let upper = mnemonic.to_ascii_uppercase();
        if upper == "STR2INT" {
            return Some(Opcode::Stri2Int);
        }
        ALL_OPCODES.iter().find(|op| op.mnemonic() == upper).copied()
    }

    /// The operand signature: one entry per expected operand.
    pub fn signature(&self) -> &'static [OperandKind] {
        match self {
            Opcode::CreateFrame
            | Opcode::PushFrame
            | Opcode::PopFrame
            | Opcode::Return
            | Opcode::Break => &[],

            Opcode::Defvar | Opcode::Pops => &[V],

            Opcode::Call | Opcode::Label | Opcode::Jump => &[L],

            Opcode::Pushs | Opcode::Write | Opcode::Exit | Opcode::Dprint => &[S],

            Opcode::Move | Opcode::Int2Char | Opcode::Strlen | Opcode::Type | Opcode::Not => {
                &[V, S]
            }

            Opcode::Read => &[V, T],

            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Idiv
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::And
            | Opcode::Or
            | Opcode::Stri2Int
            | Opcode::Concat
            | Opcode::GetChar
            | Opcode::SetChar => &[V, S, S],

            Opcode::JumpIfEq | Opcode::JumpIfNeq => &[L, S, S],
        }
    }
}
