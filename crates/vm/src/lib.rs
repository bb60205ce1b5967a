//! IPPcode24 virtual machine: executes loaded programs.
//!
//! The VM is a frame-based machine with:
//! - A global frame, a stack of local frames and an optional temporary frame
//! - A data stack for PUSHS/POPS
//! - A call stack of return addresses
//!
//! Operand shapes were checked when the [`Program`] was built; every
//! remaining check (initialization, types, ranges, frame availability)
//! happens here, at run time.
//!
//! # Usage
//!
//! ```
//! use ippcode_common::{Instruction, Program, Symbol, Value};
//! use ippcode_vm::{run, Io, LineReader};
//!
//! let program = Program::new(vec![Instruction::Write {
//!     symb: Symbol::Const(Value::Int(42)),
//! }])
//! .unwrap();
//!
//! let mut input = LineReader::new(&b""[..]);
//! let (mut out, mut err) = (Vec::new(), Vec::new());
//! let code = run(&program, &mut Io::new(&mut input, &mut out, &mut err)).unwrap();
//! assert_eq!(code, 0);
//! assert_eq!(out, b"42");
//! ```

pub mod context;
pub mod error;
pub mod execute;
pub mod frame;
pub mod io;
pub mod machine;

pub use context::Context;
pub use error::{ErrorKind, RuntimeError};
pub use frame::{Frame, FrameError};
pub use io::{InputReader, Io, LineReader, OutputWriter};
pub use machine::VM;

use ippcode_common::Program;

/// Execute a program and return its exit code.
///
/// The exit code is 0 when execution runs off the end of the program,
/// or the operand of the EXIT instruction that stopped it.
///
/// # Errors
///
/// Returns [`RuntimeError`] on the first failed run-time check; the
/// error's [`exit_code`](RuntimeError::exit_code) is the process status.
pub fn run(program: &Program, io: &mut Io<'_>) -> Result<u8, RuntimeError> {
    let mut vm = VM::new(program);
    vm.execute(io)
}
