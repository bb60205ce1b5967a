//! Runtime errors for the IPPcode24 VM.
//!
//! Every error includes the index of the failing instruction (`at`).
//! Each variant belongs to exactly one [`ErrorKind`], and the kind alone
//! decides the process exit code.

use ippcode_common::OpError;
use thiserror::Error;

/// Error classes, one per exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Semantic,
    OperandType,
    VariableAccess,
    FrameAccess,
    Value,
    OperandValue,
    StringOperation,
    Input,
    Output,
    Internal,
}

impl ErrorKind {
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorKind::Semantic => 52,
            ErrorKind::OperandType => 53,
            ErrorKind::VariableAccess => 54,
            ErrorKind::FrameAccess => 55,
            ErrorKind::Value => 56,
            ErrorKind::OperandValue => 57,
            ErrorKind::StringOperation => 58,
            ErrorKind::Input => 11,
            ErrorKind::Output => 12,
            ErrorKind::Internal => 99,
        }
    }
}

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Jump or call to a label that was never defined.
    #[error("undefined label '{label}' at instruction {at}")]
    UndefinedLabel { at: usize, label: String },

    /// DEFVAR on a name already present in the selected frame.
    #[error("variable {var} redeclared at instruction {at}")]
    Redeclaration { at: usize, var: String },

    /// Operand kinds outside the operation's domain.
    #[error("{source} at instruction {at}")]
    TypeMismatch { at: usize, source: OpError },

    /// Read or write of a name absent from an existing frame.
    #[error("undefined variable {var} at instruction {at}")]
    UndefinedVariable { at: usize, var: String },

    /// `LF` selected while the local-frame stack is empty.
    #[error("local frame not available at instruction {at}")]
    MissingLocalFrame { at: usize },

    /// `TF` selected while no temporary frame exists.
    #[error("temporary frame not available at instruction {at}")]
    MissingTemporaryFrame { at: usize },

    /// An operand was declared but never assigned.
    #[error("read of uninitialized value at instruction {at}")]
    UninitializedRead { at: usize },

    /// POPS with an empty data stack.
    #[error("data stack underflow at instruction {at}")]
    DataStackEmpty { at: usize },

    /// RETURN with an empty call stack.
    #[error("call stack underflow at instruction {at}")]
    CallStackEmpty { at: usize },

    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// EXIT with a code outside 0..=9.
    #[error("exit code {code} out of range 0..=9 at instruction {at}")]
    InvalidExitCode { at: usize, code: i64 },

    /// String index outside `0..length`.
    #[error("string index {index} out of range (length {length}) at instruction {at}")]
    IndexOutOfRange { at: usize, index: i64, length: usize },

    /// INT2CHAR on a value that is not a Unicode scalar value.
    #[error("invalid code point {code} at instruction {at}")]
    InvalidCodePoint { at: usize, code: i64 },

    /// SETCHAR with an empty replacement string.
    #[error("empty replacement string at instruction {at}")]
    EmptyReplacement { at: usize },

    /// An uninitialized value reached a variable write.
    #[error("attempt to store uninitialized value into {var} at instruction {at}")]
    UninitializedWrite { at: usize, var: String },

    /// Reading the input stream failed.
    #[error("input error at instruction {at}: {message}")]
    Input { at: usize, message: String },

    /// Writing to an output channel failed.
    #[error("output error at instruction {at}: {message}")]
    Output { at: usize, message: String },
}

impl RuntimeError {
    /// Attach an instruction index to a value-level error.
    pub fn from_op(at: usize, err: OpError) -> Self {
        match err {
            OpError::Uninitialized => RuntimeError::UninitializedRead { at },
            OpError::DivisionByZero => RuntimeError::DivisionByZero { at },
            source @ (OpError::TypeMismatch { .. } | OpError::WrongType { .. }) => {
                RuntimeError::TypeMismatch { at, source }
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::UndefinedLabel { .. } | RuntimeError::Redeclaration { .. } => {
                ErrorKind::Semantic
            }
            RuntimeError::TypeMismatch { .. } => ErrorKind::OperandType,
            RuntimeError::UndefinedVariable { .. } => ErrorKind::VariableAccess,
            RuntimeError::MissingLocalFrame { .. } | RuntimeError::MissingTemporaryFrame { .. } => {
                ErrorKind::FrameAccess
            }
            RuntimeError::UninitializedRead { .. }
            | RuntimeError::DataStackEmpty { .. }
            | RuntimeError::CallStackEmpty { .. } => ErrorKind::Value,
            RuntimeError::DivisionByZero { .. } | RuntimeError::InvalidExitCode { .. } => {
                ErrorKind::OperandValue
            }
            RuntimeError::IndexOutOfRange { .. }
            | RuntimeError::InvalidCodePoint { .. }
            | RuntimeError::EmptyReplacement { .. } => ErrorKind::StringOperation,
            RuntimeError::Input { .. } => ErrorKind::Input,
            RuntimeError::Output { .. } => ErrorKind::Output,
            RuntimeError::UninitializedWrite { .. } => ErrorKind::Internal,
        }
    }

    /// The process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }

    /// Index of the instruction that failed.
    pub fn at(&self) -> usize {
        match self {
            RuntimeError::UndefinedLabel { at, .. }
            | RuntimeError::Redeclaration { at, .. }
            | RuntimeError::TypeMismatch { at, .. }
            | RuntimeError::UndefinedVariable { at, .. }
            | RuntimeError::MissingLocalFrame { at }
            | RuntimeError::MissingTemporaryFrame { at }
            | RuntimeError::UninitializedRead { at }
            | RuntimeError::DataStackEmpty { at }
            | RuntimeError::CallStackEmpty { at }
            | RuntimeError::DivisionByZero { at }
            | RuntimeError::InvalidExitCode { at, .. }
            | RuntimeError::IndexOutOfRange { at, .. }
            | RuntimeError::InvalidCodePoint { at, .. }
            | RuntimeError::EmptyReplacement { at }
            | RuntimeError::UninitializedWrite { at, .. }
            | RuntimeError::Input { at, .. }
            | RuntimeError::Output { at, .. } => *at,
        }
    }
}
