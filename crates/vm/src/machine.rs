//! The driver loop.

use ippcode_common::Program;
use tracing::{debug, trace};

use crate::context::Context;
use crate::error::RuntimeError;
use crate::io::Io;

/// The IPPcode24 virtual machine: a program plus the context it runs in.
pub struct VM<'a> {
    program: &'a Program,
    context: Context<'a>,
    steps: u64,
}

impl<'a> VM<'a> {
    /// Create a new VM for the given program.
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            context: Context::new(program.labels()),
            steps: 0,
        }
    }

    /// Run state, for inspection after [`VM::execute`] returns.
    pub fn context(&self) -> &Context<'a> {
        &self.context
    }

    /// Number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Execute until EXIT or until the program counter leaves the
    /// program. Returns the exit code.
    #[tracing::instrument(skip_all, fields(instructions = self.program.len()))]
    pub fn execute(&mut self, io: &mut Io<'_>) -> Result<u8, RuntimeError> {
        while self.context.is_running() {
            let pc = self.context.pc();
            let Some(instr) = self.program.instructions.get(pc) else {
                break;
            };
            trace!(pc, %instr, "step");

            self.context.execute(instr, io)?;
            self.steps += 1;
            self.context.advance_pc();
        }

        let exit_code = self.context.exit_code();
        debug!(exit_code, steps = self.steps, "halted");
        Ok(exit_code)
    }
}
