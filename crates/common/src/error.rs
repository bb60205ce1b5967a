//! Error types shared by the front end and the VM.
//!
//! These errors carry no instruction index. The VM attaches one when it
//! converts them into its own runtime errors.

use thiserror::Error;

/// Errors raised while building an instruction from raw operands.
///
/// Arity and operand kinds are checked exactly once, when the
/// instruction is constructed. A successfully built instruction can
/// never fail these checks at run time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperandError {
    /// The opcode received the wrong number of operands.
    #[error("{opcode} expects {expected} operand(s), got {found}")]
    Arity {
        opcode: &'static str,
        expected: usize,
        found: usize,
    },

    /// An operand of the wrong kind appeared at `position` (1-based).
    #[error("{opcode} operand {position} must be {expected}, got {found}")]
    Kind {
        opcode: &'static str,
        position: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// A constant literal that does not match its declared type.
    #[error("invalid {ty} literal '{text}'")]
    Literal { ty: &'static str, text: String },

    /// A variable reference without a `GF@`, `LF@` or `TF@` prefix.
    #[error("invalid variable reference '{0}'")]
    VarRef(String),

    /// An identifier that violates the naming rules.
    #[error("invalid identifier '{0}'")]
    Identifier(String),

    /// A type operand other than `int`, `bool` or `string`.
    #[error("invalid type name '{0}'")]
    TypeName(String),
}

/// Errors raised while assembling an instruction list into a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// The same label is defined twice.
    #[error("label '{label}' redefined at instruction {second} (first defined at {first})")]
    DuplicateLabel {
        label: String,
        first: usize,
        second: usize,
    },
}

/// Errors raised by operations on [`Value`](crate::Value).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpError {
    /// An operand holds no value yet.
    #[error("read of uninitialized value")]
    Uninitialized,

    /// The operand kinds are outside the operation's domain.
    #[error("{op}: incompatible operand types {lhs} and {rhs}")]
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    /// A single operand is not of the kind the operation requires.
    #[error("{op}: expected {expected}, got {found}")]
    WrongType {
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// Integer division by zero.
    #[error("division by zero")]
    DivisionByZero,
}
