//! IPPcode24 common types.
//!
//! This crate provides the data structures shared by the front end and
//! the VM:
//!
//! - [`Opcode`]: the 35 mnemonics and their operand signatures
//! - [`Operand`], [`Symbol`], [`VarRef`]: parsed operands
//! - [`Instruction`]: typed instructions, validated on construction
//! - [`Value`]: runtime values and the operations on them
//! - [`Program`]: an instruction list with its label table
//!
//! # Dependencies
//!
//! This crate uses `thiserror` and has no other dependencies.

pub mod data_type;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod operand;
pub mod program;
pub mod value;

// Re-export commonly used types at the crate root.
pub use data_type::DataType;
pub use error::{OpError, OperandError, ProgramError};
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use operand::{FrameKind, Operand, OperandKind, Symbol, VarRef};
pub use program::Program;
pub use value::Value;
