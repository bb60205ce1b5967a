//! The typed instruction representation.
//!
//! Every instruction is a variant carrying its operands in typed fields.
//! Shape (arity and operand kind) is validated once, in
//! [`Instruction::new`]; the VM matches exhaustively on the variant and
//! never re-checks shape.

use std::fmt;
use std::vec;

use crate::data_type::DataType;
use crate::error::OperandError;
use crate::opcode::Opcode;
use crate::operand::{Operand, OperandKind, Symbol, VarRef};

/// A single IPPcode24 instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    // Frames and calls
    Move { var: VarRef, symb: Symbol },
    CreateFrame,
    PushFrame,
    PopFrame,
    Defvar { var: VarRef },
    Call { label: String },
    Return,

    // Data stack
    Pushs { symb: Symbol },
    Pops { var: VarRef },

    // Arithmetic, relational, logical
    Add { var: VarRef, lhs: Symbol, rhs: Symbol },
    Sub { var: VarRef, lhs: Symbol, rhs: Symbol },
    Mul { var: VarRef, lhs: Symbol, rhs: Symbol },
    Idiv { var: VarRef, lhs: Symbol, rhs: Symbol },
    Lt { var: VarRef, lhs: Symbol, rhs: Symbol },
    Gt { var: VarRef, lhs: Symbol, rhs: Symbol },
    Eq { var: VarRef, lhs: Symbol, rhs: Symbol },
    And { var: VarRef, lhs: Symbol, rhs: Symbol },
    Or { var: VarRef, lhs: Symbol, rhs: Symbol },
    Not { var: VarRef, symb: Symbol },

    // Conversions
    Int2Char { var: VarRef, symb: Symbol },
    Stri2Int { var: VarRef, lhs: Symbol, rhs: Symbol },

    // Input/output
    Read { var: VarRef, ty: DataType },
    Write { symb: Symbol },

    // Strings
    Concat { var: VarRef, lhs: Symbol, rhs: Symbol },
    Strlen { var: VarRef, symb: Symbol },
    GetChar { var: VarRef, lhs: Symbol, rhs: Symbol },
    SetChar { var: VarRef, lhs: Symbol, rhs: Symbol },

    // Types
    Type { var: VarRef, symb: Symbol },

    // Control flow
    Label { label: String },
    Jump { label: String },
    JumpIfEq { label: String, lhs: Symbol, rhs: Symbol },
    JumpIfNeq { label: String, lhs: Symbol, rhs: Symbol },
    Exit { symb: Symbol },

    // Debugging
    Dprint { symb: Symbol },
    Break,
}

impl Instruction {
    /// Build an instruction, checking operands against the opcode's
    /// signature.
    pub fn new(opcode: Opcode, operands: Vec<Operand>) -> Result<Self, OperandError> {
        let expected = opcode.signature().len();
        if operands.len() != expected {
            return Err(OperandError::Arity {
                opcode: opcode.mnemonic(),
                expected,
                found: operands.len(),
            });
        }

        let mut a = Args {
            opcode,
            operands: operands.into_iter(),
            position: 0,
        };

        let instr = match opcode {
            Opcode::Move => Instruction::Move {
                var: a.var()?,
                symb: a.symb()?,
            },
            Opcode::CreateFrame => Instruction::CreateFrame,
            Opcode::PushFrame => Instruction::PushFrame,
            Opcode::PopFrame => Instruction::PopFrame,
            Opcode::Defvar => Instruction::Defvar { var: a.var()? },
            Opcode::Call => Instruction::Call { label: a.label()? },
            Opcode::Return => Instruction::Return,
            Opcode::Pushs => Instruction::Pushs { symb: a.symb()? },
            Opcode::Pops => Instruction::Pops { var: a.var()? },
            Opcode::Add => Instruction::Add {
                var: a.var()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::Sub => Instruction::Sub {
                var: a.var()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::Mul => Instruction::Mul {
                var: a.var()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::Idiv => Instruction::Idiv {
                var: a.var()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::Lt => Instruction::Lt {
                var: a.var()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::Gt => Instruction::Gt {
                var: a.var()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::Eq => Instruction::Eq {
                var: a.var()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::And => Instruction::And {
                var: a.var()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::Or => Instruction::Or {
                var: a.var()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::Not => Instruction::Not {
                var: a.var()?,
                symb: a.symb()?,
            },
            Opcode::Int2Char => Instruction::Int2Char {
                var: a.var()?,
                symb: a.symb()?,
            },
            Opcode::Stri2Int => Instruction::Stri2Int {
                var: a.var()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::Read => Instruction::Read {
                var: a.var()?,
                ty: a.ty()?,
            },
            Opcode::Write => Instruction::Write { symb: a.symb()? },
            Opcode::Concat => Instruction::Concat {
                var: a.var()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::Strlen => Instruction::Strlen {
                var: a.var()?,
                symb: a.symb()?,
            },
            Opcode::GetChar => Instruction::GetChar {
                var: a.var()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::SetChar => Instruction::SetChar {
                var: a.var()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::Type => Instruction::Type {
                var: a.var()?,
                symb: a.symb()?,
            },
            Opcode::Label => Instruction::Label { label: a.label()? },
            Opcode::Jump => Instruction::Jump { label: a.label()? },
            Opcode::JumpIfEq => Instruction::JumpIfEq {
                label: a.label()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::JumpIfNeq => Instruction::JumpIfNeq {
                label: a.label()?,
                lhs: a.symb()?,
                rhs: a.symb()?,
            },
            Opcode::Exit => Instruction::Exit { symb: a.symb()? },
            Opcode::Dprint => Instruction::Dprint { symb: a.symb()? },
            Opcode::Break => Instruction::Break,
        };

        Ok(instr)
    }

    /// The opcode of this instruction.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Move { .. } => Opcode::Move,
            Instruction::CreateFrame => Opcode::CreateFrame,
            Instruction::PushFrame => Opcode::PushFrame,
            Instruction::PopFrame => Opcode::PopFrame,
            Instruction::Defvar { .. } => Opcode::Defvar,
            Instruction::Call { .. } => Opcode::Call,
            Instruction::Return => Opcode::Return,
            Instruction::Pushs { .. } => Opcode::Pushs,
            Instruction::Pops { .. } => Opcode::Pops,
            Instruction::Add { .. } => Opcode::Add,
            Instruction::Sub { .. } => Opcode::Sub,
            Instruction::Mul { .. } => Opcode::Mul,
            Instruction::Idiv { .. } => Opcode::Idiv,
            Instruction::Lt { .. } => Opcode::Lt,
            Instruction::Gt { .. } => Opcode::Gt,
            Instruction::Eq { .. } => Opcode::Eq,
            Instruction::And { .. } => Opcode::And,
            Instruction::Or { .. } => Opcode::Or,
            Instruction::Not { .. } => Opcode::Not,
            Instruction::Int2Char { .. } => Opcode::Int2Char,
            Instruction::Stri2Int { .. } => Opcode::Stri2Int,
            Instruction::Read { .. } => Opcode::Read,
            Instruction::Write { .. } => Opcode::Write,
            Instruction::Concat { .. } => Opcode::Concat,
            Instruction::Strlen { .. } => Opcode::Strlen,
            Instruction::GetChar { .. } => Opcode::GetChar,
            Instruction::SetChar { .. } => Opcode::SetChar,
            Instruction::Type { .. } => Opcode::Type,
            Instruction::Label { .. } => Opcode::Label,
            Instruction::Jump { .. } => Opcode::Jump,
            Instruction::JumpIfEq { .. } => Opcode::JumpIfEq,
            Instruction::JumpIfNeq { .. } => Opcode::JumpIfNeq,
            Instruction::Exit { .. } => Opcode::Exit,
            Instruction::Dprint { .. } => Opcode::Dprint,
            Instruction::Break => Opcode::Break,
        }
    }

    /// The operands in source order, rendered canonically.
    fn operand_texts(&self) -> Vec<String> {
        match self {
            Instruction::CreateFrame
            | Instruction::PushFrame
            | Instruction::PopFrame
            | Instruction::Return
            | Instruction::Break => vec![],

            Instruction::Defvar { var } | Instruction::Pops { var } => vec![var.to_string()],

            Instruction::Call { label }
            | Instruction::Label { label }
            | Instruction::Jump { label } => vec![label.clone()],

            Instruction::Pushs { symb }
            | Instruction::Write { symb }
            | Instruction::Exit { symb }
            | Instruction::Dprint { symb } => vec![symb.to_string()],

            Instruction::Move { var, symb }
            | Instruction::Not { var, symb }
            | Instruction::Int2Char { var, symb }
            | Instruction::Strlen { var, symb }
            | Instruction::Type { var, symb } => vec![var.to_string(), symb.to_string()],

            Instruction::Read { var, ty } => vec![var.to_string(), ty.to_string()],

            Instruction::Add { var, lhs, rhs }
            | Instruction::Sub { var, lhs, rhs }
            | Instruction::Mul { var, lhs, rhs }
            | Instruction::Idiv { var, lhs, rhs }
            | Instruction::Lt { var, lhs, rhs }
            | Instruction::Gt { var, lhs, rhs }
            | Instruction::Eq { var, lhs, rhs }
            | Instruction::And { var, lhs, rhs }
            | Instruction::Or { var, lhs, rhs }
            | Instruction::Stri2Int { var, lhs, rhs }
            | Instruction::Concat { var, lhs, rhs }
            | Instruction::GetChar { var, lhs, rhs }
            | Instruction::SetChar { var, lhs, rhs } => {
                vec![var.to_string(), lhs.to_string(), rhs.to_string()]
            }

            Instruction::JumpIfEq { label, lhs, rhs }
            | Instruction::JumpIfNeq { label, lhs, rhs } => {
                vec![label.clone(), lhs.to_string(), rhs.to_string()]
            }
        }
    }
}

/// Canonical source form: mnemonic followed by space-separated operands.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode().mnemonic())?;
        for text in self.operand_texts() {
            write!(f, " {text}")?;
        }
        Ok(())
    }
}

/// Cursor over the operands of one instruction under construction.
struct Args {
    opcode: Opcode,
    operands: vec::IntoIter<Operand>,
    position: usize,
}

impl Args {
    fn next(&mut self) -> Result<Operand, OperandError> {
        self.position += 1;
        self.operands.next().ok_or(OperandError::Arity {
            opcode: self.opcode.mnemonic(),
            expected: self.opcode.signature().len(),
            found: self.position - 1,
        })
    }

    fn kind_error(&self, expected: OperandKind, found: &Operand) -> OperandError {
        OperandError::Kind {
            opcode: self.opcode.mnemonic(),
            position: self.position,
            expected: expected.name(),
            found: found.kind_name(),
        }
    }

    fn var(&mut self) -> Result<VarRef, OperandError> {
        match self.next()? {
            Operand::Var(var) => Ok(var),
            other => Err(self.kind_error(OperandKind::Var, &other)),
        }
    }

    fn symb(&mut self) -> Result<Symbol, OperandError> {
        match self.next()? {
            Operand::Var(var) => Ok(Symbol::Var(var)),
            Operand::Const(value) => Ok(Symbol::Const(value)),
            other => Err(self.kind_error(OperandKind::Symb, &other)),
        }
    }

    fn label(&mut self) -> Result<String, OperandError> {
        match self.next()? {
            Operand::Label(label) => Ok(label),
            other => Err(self.kind_error(OperandKind::Label, &other)),
        }
    }

    fn ty(&mut self) -> Result<DataType, OperandError> {
        match self.next()? {
            Operand::Type(ty) => Ok(ty),
            other => Err(self.kind_error(OperandKind::Type, &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::FrameKind;
    use crate::opcode::ALL_OPCODES;
    use crate::value::Value;

    fn gf(name: &str) -> Operand {
        Operand::Var(VarRef::new(FrameKind::Global, name).unwrap())
    }

    fn int(n: i64) -> Operand {
        Operand::Const(Value::Int(n))
    }

    #[test]
    fn build_add() {
        let instr = Instruction::new(Opcode::Add, vec![gf("x"), gf("x"), int(1)]).unwrap();
        assert_eq!(instr.opcode(), Opcode::Add);
        assert_eq!(instr.to_string(), "ADD GF@x GF@x int@1");
    }

    #[test]
    fn build_nullary() {
        let instr = Instruction::new(Opcode::Break, vec![]).unwrap();
        assert_eq!(instr, Instruction::Break);
        assert_eq!(instr.to_string(), "BREAK");
    }

    #[test]
    fn arity_checked() {
        let err = Instruction::new(Opcode::Add, vec![gf("x"), int(1)]).unwrap_err();
        assert_eq!(
            err,
            OperandError::Arity {
                opcode: "ADD",
                expected: 3,
                found: 2
            }
        );
        assert!(Instruction::new(Opcode::Return, vec![int(1)]).is_err());
    }

    #[test]
    fn destination_must_be_var() {
        let err = Instruction::new(Opcode::Move, vec![int(1), int(2)]).unwrap_err();
        assert_eq!(
            err,
            OperandError::Kind {
                opcode: "MOVE",
                position: 1,
                expected: "var",
                found: "int"
            }
        );
    }

    #[test]
    fn label_position_rejects_symbols() {
        let err = Instruction::new(Opcode::Jump, vec![gf("x")]).unwrap_err();
        assert!(matches!(err, OperandError::Kind { expected: "label", .. }));
    }

    #[test]
    fn symbol_position_rejects_labels() {
        let err = Instruction::new(
            Opcode::Write,
            vec![Operand::Label("end".to_string())],
        )
        .unwrap_err();
        assert!(matches!(err, OperandError::Kind { position: 1, expected: "symb", .. }));
    }

    #[test]
    fn read_takes_type() {
        let instr =
            Instruction::new(Opcode::Read, vec![gf("x"), Operand::Type(DataType::Int)]).unwrap();
        assert_eq!(instr.to_string(), "READ GF@x int");
        assert!(Instruction::new(Opcode::Read, vec![gf("x"), int(1)]).is_err());
    }

    #[test]
    fn jumpifeq_display() {
        let instr = Instruction::new(
            Opcode::JumpIfEq,
            vec![
                Operand::Label("end".to_string()),
                gf("a"),
                Operand::Const(Value::Nil),
            ],
        )
        .unwrap();
        assert_eq!(instr.to_string(), "JUMPIFEQ end GF@a nil@nil");
    }

    #[test]
    fn opcode_roundtrip_for_every_shape() {
        for op in ALL_OPCODES {
            let operands: Vec<Operand> = op
                .signature()
                .iter()
                .map(|kind| match kind {
                    OperandKind::Var | OperandKind::Symb => gf("v"),
                    OperandKind::Label => Operand::Label("l".to_string()),
                    OperandKind::Type => Operand::Type(DataType::String),
                })
                .collect();
            let instr = Instruction::new(op, operands).unwrap();
            assert_eq!(instr.opcode(), op, "opcode mismatch for {op:?}");
        }
    }
}
