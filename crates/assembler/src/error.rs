//! Error types for the IPPcode24 front end.

use ippcode_common::OperandError;
use thiserror::Error;

/// Errors produced while loading an IPPcode24 program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// The first non-blank line is not `.IPPcode24`.
    #[error("line {line}: expected header '.IPPcode24', found '{found}'")]
    MissingHeader { line: usize, found: String },

    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An operand is malformed or does not fit the opcode's signature.
    #[error("line {line}: {source}")]
    Operand { line: usize, source: OperandError },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    /// The same label is defined twice.
    #[error("line {line}: label '{label}' already defined")]
    DuplicateLabel { line: usize, label: String },

    /// The XML source is not well formed.
    #[error("line {line}: malformed XML: {message}")]
    MalformedXml { line: usize, message: String },

    /// Well-formed XML that does not describe a valid program.
    #[error("line {line}: {message}")]
    Structure { line: usize, message: String },
}

impl AsmError {
    /// The process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AsmError::MissingHeader { .. } => 21,
            AsmError::UnknownOpcode { .. } => 22,
            AsmError::Operand { .. } | AsmError::UnexpectedToken { .. } => 23,
            AsmError::DuplicateLabel { .. } => 52,
            AsmError::MalformedXml { .. } => 31,
            AsmError::Structure { .. } => 32,
        }
    }

    /// 1-based source line of the error.
    pub fn line(&self) -> usize {
        match self {
            AsmError::MissingHeader { line, .. }
            | AsmError::UnknownOpcode { line, .. }
            | AsmError::Operand { line, .. }
            | AsmError::UnexpectedToken { line, .. }
            | AsmError::DuplicateLabel { line, .. }
            | AsmError::MalformedXml { line, .. }
            | AsmError::Structure { line, .. } => *line,
        }
    }
}
