//! Program representation: an instruction list plus its label table.
//!
//! Labels are resolved when the program is built, so a jump at run time
//! is a single map lookup and duplicate labels are caught before the
//! first instruction executes.

use std::collections::HashMap;

use crate::error::ProgramError;
use crate::instruction::Instruction;

/// An IPPcode24 program ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// The instruction stream, in execution order.
    pub instructions: Vec<Instruction>,
    labels: HashMap<String, usize>,
}

impl Program {
    /// Create a program, indexing every `LABEL` instruction.
    pub fn new(instructions: Vec<Instruction>) -> Result<Self, ProgramError> {
        let mut labels = HashMap::new();
        for (index, instr) in instructions.iter().enumerate() {
            if let Instruction::Label { label } = instr {
                if let Some(&first) = labels.get(label) {
                    return Err(ProgramError::DuplicateLabel {
                        label: label.clone(),
                        first,
                        second: index,
                    });
                }
                labels.insert(label.clone(), index);
            }
        }
        Ok(Self {
            instructions,
            labels,
        })
    }

    /// The label table: name to index of its `LABEL` instruction.
    pub fn labels(&self) -> &HashMap<String, usize> {
        &self.labels
    }

    /// Index of the `LABEL` instruction defining `name`.
    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(name: &str) -> Instruction {
        Instruction::Label {
            label: name.to_string(),
        }
    }

    #[test]
    fn empty_program() {
        let program = Program::new(vec![]).unwrap();
        assert!(program.is_empty());
        assert_eq!(program.len(), 0);
        assert_eq!(program.label_count(), 0);
    }

    #[test]
    fn labels_are_indexed() {
        let program = Program::new(vec![
            Instruction::CreateFrame,
            label("start"),
            Instruction::Break,
            label("end"),
        ])
        .unwrap();
        assert_eq!(program.len(), 4);
        assert_eq!(program.label("start"), Some(1));
        assert_eq!(program.label("end"), Some(3));
        assert_eq!(program.label("missing"), None);
        assert_eq!(program.label_count(), 2);
    }

    #[test]
    fn duplicate_label_rejected() {
        let err = Program::new(vec![label("a"), Instruction::Break, label("a")]).unwrap_err();
        assert_eq!(
            err,
            ProgramError::DuplicateLabel {
                label: "a".to_string(),
                first: 0,
                second: 2,
            }
        );
    }

    #[test]
    fn jump_targets_need_not_exist() {
        // Undefined jump targets are a run-time error, not a load-time one.
        let program = Program::new(vec![Instruction::Jump {
            label: "nowhere".to_string(),
        }])
        .unwrap();
        assert_eq!(program.label_count(), 0);
    }
}
