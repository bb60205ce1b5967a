//! Execution context: the single owner of all mutable run state.
//!
//! Errors raised here carry the current program counter, which during
//! execution is the index of the instruction being executed.

use std::collections::HashMap;
use std::fmt::Write as _;

use ippcode_common::{FrameKind, Symbol, Value, VarRef};

use crate::error::RuntimeError;
use crate::frame::{Frame, FrameError};

pub struct Context<'a> {
    labels: &'a HashMap<String, usize>,
    global: Frame,
    /// Local-frame stack; the last element is `LF`.
    locals: Vec<Frame>,
    temporary: Option<Frame>,
    /// Return addresses pushed by CALL.
    calls: Vec<usize>,
    /// Operand stack for PUSHS/POPS.
    data: Vec<Value>,
    pc: usize,
    running: bool,
    exit_code: u8,
}

impl<'a> Context<'a> {
    /// Create a fresh context over a load-time label table.
    pub fn new(labels: &'a HashMap<String, usize>) -> Self {
        Self {
            labels,
            global: Frame::new(),
            locals: Vec::new(),
            temporary: None,
            calls: Vec::new(),
            data: Vec::new(),
            pc: 0,
            running: true,
            exit_code: 0,
        }
    }

    // ---- Frames ----

    pub fn select_frame(&self, kind: FrameKind) -> Result<&Frame, RuntimeError> {
        match kind {
            FrameKind::Global => Ok(&self.global),
            FrameKind::Local => self
                .locals
                .last()
                .ok_or(RuntimeError::MissingLocalFrame { at: self.pc }),
            FrameKind::Temporary => self
                .temporary
                .as_ref()
                .ok_or(RuntimeError::MissingTemporaryFrame { at: self.pc }),
        }
    }

    pub fn select_frame_mut(&mut self, kind: FrameKind) -> Result<&mut Frame, RuntimeError> {
        let at = self.pc;
        match kind {
            FrameKind::Global => Ok(&mut self.global),
            FrameKind::Local => self
                .locals
                .last_mut()
                .ok_or(RuntimeError::MissingLocalFrame { at }),
            FrameKind::Temporary => self
                .temporary
                .as_mut()
                .ok_or(RuntimeError::MissingTemporaryFrame { at }),
        }
    }

    /// Declare `var` in its frame (DEFVAR).
    pub fn declare(&mut self, var: &VarRef) -> Result<(), RuntimeError> {
        let at = self.pc;
        self.select_frame_mut(var.frame)?
            .declare(&var.name)
            .map_err(|e| frame_error(at, var, e))
    }

    /// Current value of a variable. May be [`Value::Uninitialized`].
    pub fn read_symbol(&self, var: &VarRef) -> Result<&Value, RuntimeError> {
        self.select_frame(var.frame)?
            .get(&var.name)
            .map_err(|e| frame_error(self.pc, var, e))
    }

    /// Resolve a `symb` operand to a value.
    pub fn value_of(&self, symb: &Symbol) -> Result<Value, RuntimeError> {
        match symb {
            Symbol::Var(var) => self.read_symbol(var).cloned(),
            Symbol::Const(value) => Ok(value.clone()),
        }
    }

    /// Assign to a declared variable.
    pub fn write_symbol(&mut self, var: &VarRef, value: Value) -> Result<(), RuntimeError> {
        let at = self.pc;
        if !value.is_initialized() {
            return Err(RuntimeError::UninitializedWrite {
                at,
                var: var.to_string(),
            });
        }
        self.select_frame_mut(var.frame)?
            .set(&var.name, value)
            .map_err(|e| frame_error(at, var, e))
    }

    /// CREATEFRAME: a fresh temporary frame, discarding any previous one.
    pub fn create_frame(&mut self) {
        self.temporary = Some(Frame::new());
    }

    /// PUSHFRAME: move the temporary frame onto the local-frame stack.
    pub fn push_frame(&mut self) -> Result<(), RuntimeError> {
        let frame = self
            .temporary
            .take()
            .ok_or(RuntimeError::MissingTemporaryFrame { at: self.pc })?;
        self.locals.push(frame);
        Ok(())
    }

    /// POPFRAME: move the top local frame into the temporary slot.
    pub fn pop_frame(&mut self) -> Result<(), RuntimeError> {
        let frame = self
            .locals
            .pop()
            .ok_or(RuntimeError::MissingLocalFrame { at: self.pc })?;
        self.temporary = Some(frame);
        Ok(())
    }

    // ---- Stacks ----

    pub fn push_call(&mut self, return_index: usize) {
        self.calls.push(return_index);
    }

    pub fn pop_call(&mut self) -> Result<usize, RuntimeError> {
        self.calls
            .pop()
            .ok_or(RuntimeError::CallStackEmpty { at: self.pc })
    }

    pub fn push_value(&mut self, value: Value) {
        self.data.push(value);
    }

    pub fn pop_value(&mut self) -> Result<Value, RuntimeError> {
        self.data
            .pop()
            .ok_or(RuntimeError::DataStackEmpty { at: self.pc })
    }

    pub fn call_depth(&self) -> usize {
        self.calls.len()
    }

    pub fn data_depth(&self) -> usize {
        self.data.len()
    }

    pub fn local_depth(&self) -> usize {
        self.locals.len()
    }

    // ---- Control flow ----

    /// Index of the `LABEL` instruction named `label`.
    pub fn find_label(&self, label: &str) -> Result<usize, RuntimeError> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| RuntimeError::UndefinedLabel {
                at: self.pc,
                label: label.to_string(),
            })
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn set_pc(&mut self, pc: usize) {
        self.pc = pc;
    }

    pub fn advance_pc(&mut self) {
        self.pc += 1;
    }

    /// Halt with the given exit code.
    pub fn stop(&mut self, code: u8) {
        self.running = false;
        self.exit_code = code;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    /// Multi-line state dump written by BREAK.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "pc: {}", self.pc);
        let _ = writeln!(out, "GF: {}", render_frame(&self.global));
        for (i, frame) in self.locals.iter().enumerate() {
            let _ = writeln!(out, "LF[{i}]: {}", render_frame(frame));
        }
        match &self.temporary {
            Some(frame) => {
                let _ = writeln!(out, "TF: {}", render_frame(frame));
            }
            None => out.push_str("TF: (undefined)\n"),
        }
        let _ = writeln!(out, "data stack: {}", self.data.len());
        let _ = writeln!(out, "call stack: {}", self.calls.len());
        out
    }
}

fn frame_error(at: usize, var: &VarRef, err: FrameError) -> RuntimeError {
    match err {
        FrameError::Redeclared(_) => RuntimeError::Redeclaration {
            at,
            var: var.to_string(),
        },
        FrameError::Undeclared(_) => RuntimeError::UndefinedVariable {
            at,
            var: var.to_string(),
        },
    }
}

fn render_frame(frame: &Frame) -> String {
    if frame.is_empty() {
        return "(empty)".to_string();
    }
    frame
        .iter()
        .map(|(name, value)| format!("{name}={}", value.literal()))
        .collect::<Vec<_>>()
        .join(", ")
}
