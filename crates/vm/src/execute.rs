//! Opcode dispatch and per-instruction semantics.
//!
//! Operands are fetched left to right. Frame and variable access errors
//! therefore surface in operand order, before any value is inspected.

use ippcode_common::{DataType, Instruction, OpError, Symbol, Value, VarRef};

use crate::context::Context;
use crate::error::RuntimeError;
use crate::io::Io;

type BinaryOp = fn(&Value, &Value) -> Result<Value, OpError>;

impl<'a> Context<'a> {
    /// Execute one instruction. The caller advances the program counter
    /// afterwards, including after jumps.
    pub fn execute(&mut self, instr: &Instruction, io: &mut Io<'_>) -> Result<(), RuntimeError> {
        match instr {
            // Frames and calls
            Instruction::Move { var, symb } => self.exec_move(var, symb),
            Instruction::CreateFrame => {
                self.create_frame();
                Ok(())
            }
            Instruction::PushFrame => self.push_frame(),
            Instruction::PopFrame => self.pop_frame(),
            Instruction::Defvar { var } => self.declare(var),
            Instruction::Call { label } => self.exec_call(label),
            Instruction::Return => self.exec_return(),

            // Data stack
            Instruction::Pushs { symb } => self.exec_pushs(symb),
            Instruction::Pops { var } => self.exec_pops(var),

            // Arithmetic, relational, logical
            Instruction::Add { var, lhs, rhs } => self.exec_binary(var, lhs, rhs, Value::add),
            Instruction::Sub { var, lhs, rhs } => self.exec_binary(var, lhs, rhs, Value::sub),
            Instruction::Mul { var, lhs, rhs } => self.exec_binary(var, lhs, rhs, Value::mul),
            Instruction::Idiv { var, lhs, rhs } => self.exec_binary(var, lhs, rhs, Value::idiv),
            Instruction::Lt { var, lhs, rhs } => self.exec_binary(var, lhs, rhs, Value::lt),
            Instruction::Gt { var, lhs, rhs } => self.exec_binary(var, lhs, rhs, Value::gt),
            Instruction::Eq { var, lhs, rhs } => self.exec_binary(var, lhs, rhs, Value::equals),
            Instruction::And { var, lhs, rhs } => self.exec_binary(var, lhs, rhs, Value::and),
            Instruction::Or { var, lhs, rhs } => self.exec_binary(var, lhs, rhs, Value::or),
            Instruction::Not { var, symb } => self.exec_not(var, symb),

            // Conversions
            Instruction::Int2Char { var, symb } => self.exec_int2char(var, symb),
            Instruction::Stri2Int { var, lhs, rhs } => self.exec_stri2int(var, lhs, rhs),

            // Input/output
            Instruction::Read { var, ty } => self.exec_read(var, *ty, io),
            Instruction::Write { symb } => self.exec_write(symb, io),

            // Strings
            Instruction::Concat { var, lhs, rhs } => {
                self.exec_binary(var, lhs, rhs, Value::concat)
            }
            Instruction::Strlen { var, symb } => self.exec_strlen(var, symb),
            Instruction::GetChar { var, lhs, rhs } => self.exec_getchar(var, lhs, rhs),
            Instruction::SetChar { var, lhs, rhs } => self.exec_setchar(var, lhs, rhs),

            // Types
            Instruction::Type { var, symb } => self.exec_type(var, symb),

            // Control flow
            Instruction::Label { .. } => Ok(()),
            Instruction::Jump { label } => {
                let target = self.find_label(label)?;
                self.set_pc(target);
                Ok(())
            }
            Instruction::JumpIfEq { label, lhs, rhs } => {
                self.exec_conditional_jump("JUMPIFEQ", label, lhs, rhs, true)
            }
            Instruction::JumpIfNeq { label, lhs, rhs } => {
                self.exec_conditional_jump("JUMPIFNEQ", label, lhs, rhs, false)
            }
            Instruction::Exit { symb } => self.exec_exit(symb),

            // Debugging
            Instruction::Dprint { symb } => self.exec_dprint(symb, io),
            Instruction::Break => {
                let dump = self.dump();
                io.stderr
                    .write_string(&dump)
                    .map_err(|e| self.output_error(e))
            }
        }
    }

    fn op_error(&self, err: OpError) -> RuntimeError {
        RuntimeError::from_op(self.pc(), err)
    }

    fn output_error(&self, err: std::io::Error) -> RuntimeError {
        RuntimeError::Output {
            at: self.pc(),
            message: err.to_string(),
        }
    }

    /// Resolve a symbol and require it to hold a value.
    fn initialized(&self, symb: &Symbol) -> Result<Value, RuntimeError> {
        let value = self.value_of(symb)?;
        if !value.is_initialized() {
            return Err(RuntimeError::UninitializedRead { at: self.pc() });
        }
        Ok(value)
    }

    /// Resolve two symbols, then check both are initialized.
    fn operands(&self, lhs: &Symbol, rhs: &Symbol) -> Result<(Value, Value), RuntimeError> {
        let a = self.value_of(lhs)?;
        let b = self.value_of(rhs)?;
        if !a.is_initialized() || !b.is_initialized() {
            return Err(RuntimeError::UninitializedRead { at: self.pc() });
        }
        Ok((a, b))
    }

    // ---- Frames and calls ----

    fn exec_move(&mut self, var: &VarRef, symb: &Symbol) -> Result<(), RuntimeError> {
        let value = self.initialized(symb)?;
        self.write_symbol(var, value)
    }

    fn exec_call(&mut self, label: &str) -> Result<(), RuntimeError> {
        let target = self.find_label(label)?;
        self.push_call(self.pc());
        self.set_pc(target);
        Ok(())
    }

    fn exec_return(&mut self) -> Result<(), RuntimeError> {
        let return_index = self.pop_call()?;
        self.set_pc(return_index);
        Ok(())
    }

    // ---- Data stack ----

    fn exec_pushs(&mut self, symb: &Symbol) -> Result<(), RuntimeError> {
        let value = self.initialized(symb)?;
        self.push_value(value);
        Ok(())
    }

    fn exec_pops(&mut self, var: &VarRef) -> Result<(), RuntimeError> {
        let value = self.pop_value()?;
        self.write_symbol(var, value)
    }

    // ---- Arithmetic, relational, logical ----

    fn exec_binary(
        &mut self,
        var: &VarRef,
        lhs: &Symbol,
        rhs: &Symbol,
        op: BinaryOp,
    ) -> Result<(), RuntimeError> {
        let a = self.value_of(lhs)?;
        let b = self.value_of(rhs)?;
        let result = op(&a, &b).map_err(|e| self.op_error(e))?;
        self.write_symbol(var, result)
    }

    fn exec_not(&mut self, var: &VarRef, symb: &Symbol) -> Result<(), RuntimeError> {
        let value = self.value_of(symb)?;
        let result = value.not().map_err(|e| self.op_error(e))?;
        self.write_symbol(var, result)
    }

    // ---- Conversions ----

    fn exec_int2char(&mut self, var: &VarRef, symb: &Symbol) -> Result<(), RuntimeError> {
        let value = self.value_of(symb)?;
        let code = value.as_int("INT2CHAR").map_err(|e| self.op_error(e))?;
        let c = u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or(RuntimeError::InvalidCodePoint { at: self.pc(), code })?;
        self.write_symbol(var, Value::Str(c.to_string()))
    }

    fn exec_stri2int(&mut self, var: &VarRef, lhs: &Symbol, rhs: &Symbol) -> Result<(), RuntimeError> {
        let c = self.char_at("STRI2INT", lhs, rhs)?;
        self.write_symbol(var, Value::Int(i64::from(u32::from(c))))
    }

    /// Shared by STRI2INT and GETCHAR: the code point of `string` at
    /// `index`.
    fn char_at(&self, op: &'static str, string: &Symbol, index: &Symbol) -> Result<char, RuntimeError> {
        let (s, i) = self.operands(string, index)?;
        let s = s.as_str(op).map_err(|e| self.op_error(e))?;
        let i = i.as_int(op).map_err(|e| self.op_error(e))?;
        usize::try_from(i)
            .ok()
            .and_then(|n| s.chars().nth(n))
            .ok_or_else(|| RuntimeError::IndexOutOfRange {
                at: self.pc(),
                index: i,
                length: s.chars().count(),
            })
    }

    // ---- Input/output ----

    fn exec_read(&mut self, var: &VarRef, ty: DataType, io: &mut Io<'_>) -> Result<(), RuntimeError> {
        let value = match ty {
            DataType::Int => io.input.read_int().map(|v| v.map(Value::Int)),
            DataType::Bool => io.input.read_bool().map(|v| v.map(Value::Bool)),
            DataType::String => io.input.read_string().map(|v| v.map(Value::Str)),
        }
        .map_err(|e| RuntimeError::Input {
            at: self.pc(),
            message: e.to_string(),
        })?;
        self.write_symbol(var, value.unwrap_or(Value::Nil))
    }

    fn exec_write(&mut self, symb: &Symbol, io: &mut Io<'_>) -> Result<(), RuntimeError> {
        let value = self.initialized(symb)?;
        let written = match &value {
            Value::Int(n) => io.stdout.write_int(*n),
            Value::Bool(b) => io.stdout.write_bool(*b),
            Value::Str(s) => io.stdout.write_string(s),
            Value::Nil | Value::Uninitialized => io.stdout.write_string(""),
        };
        written.map_err(|e| self.output_error(e))
    }

    // ---- Strings ----

    fn exec_strlen(&mut self, var: &VarRef, symb: &Symbol) -> Result<(), RuntimeError> {
        let value = self.value_of(symb)?;
        let s = value.as_str("STRLEN").map_err(|e| self.op_error(e))?;
        let length = s.chars().count() as i64;
        self.write_symbol(var, Value::Int(length))
    }

    fn exec_getchar(&mut self, var: &VarRef, lhs: &Symbol, rhs: &Symbol) -> Result<(), RuntimeError> {
        let c = self.char_at("GETCHAR", lhs, rhs)?;
        self.write_symbol(var, Value::Str(c.to_string()))
    }

    /// Replace the code point at `index` in the string held by `var` with
    /// the first code point of `replacement`.
    fn exec_setchar(
        &mut self,
        var: &VarRef,
        index: &Symbol,
        replacement: &Symbol,
    ) -> Result<(), RuntimeError> {
        let target = self.read_symbol(var)?.clone();
        let (i, r) = self.operands(index, replacement)?;
        if !target.is_initialized() {
            return Err(RuntimeError::UninitializedRead { at: self.pc() });
        }

        let s = target.as_str("SETCHAR").map_err(|e| self.op_error(e))?;
        let i = i.as_int("SETCHAR").map_err(|e| self.op_error(e))?;
        let r = r.as_str("SETCHAR").map_err(|e| self.op_error(e))?;

        let length = s.chars().count();
        let position = usize::try_from(i)
            .ok()
            .filter(|n| *n < length)
            .ok_or(RuntimeError::IndexOutOfRange {
                at: self.pc(),
                index: i,
                length,
            })?;
        let c = r
            .chars()
            .next()
            .ok_or(RuntimeError::EmptyReplacement { at: self.pc() })?;

        let updated: String = s
            .chars()
            .enumerate()
            .map(|(n, old)| if n == position { c } else { old })
            .collect();
        self.write_symbol(var, Value::Str(updated))
    }

    // ---- Types ----

    fn exec_type(&mut self, var: &VarRef, symb: &Symbol) -> Result<(), RuntimeError> {
        let value = self.value_of(symb)?;
        self.write_symbol(var, Value::Str(value.type_name().to_string()))
    }

    // ---- Control flow ----

    /// The label is resolved first, so an undefined label is reported
    /// whether or not the branch would be taken.
    fn exec_conditional_jump(
        &mut self,
        op: &'static str,
        label: &str,
        lhs: &Symbol,
        rhs: &Symbol,
        jump_if_equal: bool,
    ) -> Result<(), RuntimeError> {
        let target = self.find_label(label)?;
        let a = self.value_of(lhs)?;
        let b = self.value_of(rhs)?;
        let equal = a.is_equal(op, &b).map_err(|e| self.op_error(e))?;
        if equal == jump_if_equal {
            self.set_pc(target);
        }
        Ok(())
    }

    fn exec_exit(&mut self, symb: &Symbol) -> Result<(), RuntimeError> {
        let value = self.value_of(symb)?;
        let code = value.as_int("EXIT").map_err(|e| self.op_error(e))?;
        let code = u8::try_from(code)
            .ok()
            .filter(|c| *c <= 9)
            .ok_or(RuntimeError::InvalidExitCode { at: self.pc(), code })?;
        self.stop(code);
        Ok(())
    }

    // ---- Debugging ----

    fn exec_dprint(&mut self, symb: &Symbol, io: &mut Io<'_>) -> Result<(), RuntimeError> {
        let value = self.value_of(symb)?;
        io.stderr
            .write_string(&value.to_string())
            .map_err(|e| self.output_error(e))
    }
}
