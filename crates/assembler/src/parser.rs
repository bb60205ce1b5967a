//! Parser for IPPcode24 tokens into instructions.
//!
//! Operand text is parsed according to the opcode's signature; the
//! resulting operands are then checked by [`Instruction::new`].

use ippcode_common::{Instruction, Opcode, Operand, OperandError, OperandKind};

use crate::error::AsmError;

const HEADER: &str = ".IPPcode24";

/// Check the header line. Matching is case-insensitive.
pub(crate) fn parse_header(tokens: &[&str], line_num: usize) -> Result<(), AsmError> {
    match tokens {
        [header] if header.eq_ignore_ascii_case(HEADER) => Ok(()),
        [header, extra, ..] if header.eq_ignore_ascii_case(HEADER) => {
            Err(AsmError::UnexpectedToken {
                line: line_num,
                token: extra.to_string(),
            })
        }
        _ => Err(AsmError::MissingHeader {
            line: line_num,
            found: tokens.join(" "),
        }),
    }
}

/// Parse the tokens of one non-blank line into an instruction.
pub(crate) fn parse_line(tokens: &[&str], line_num: usize) -> Result<Instruction, AsmError> {
    let (mnemonic, args) = match tokens.split_first() {
        Some(split) => split,
        None => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: String::new(),
            })
        }
    };

    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| AsmError::UnknownOpcode {
        line: line_num,
        token: mnemonic.to_string(),
    })?;

    let operand_error = |source| AsmError::Operand {
        line: line_num,
        source,
    };

    let signature = opcode.signature();
    if args.len() != signature.len() {
        return Err(operand_error(OperandError::Arity {
            opcode: opcode.mnemonic(),
            expected: signature.len(),
            found: args.len(),
        }));
    }

    let operands = signature
        .iter()
        .zip(args)
        .map(|(kind, text)| parse_operand(*kind, text))
        .collect::<Result<Vec<_>, _>>()
        .map_err(operand_error)?;

    Instruction::new(opcode, operands).map_err(operand_error)
}

/// Parse operand text for a signature position.
///
/// `var` positions accept any symbol syntactically; a constant there is
/// rejected by [`Instruction::new`] with a kind error.
fn parse_operand(kind: OperandKind, text: &str) -> Result<Operand, OperandError> {
    match kind {
        OperandKind::Var | OperandKind::Symb => Operand::parse_symbol(text),
        OperandKind::Label => Operand::parse_label(text),
        OperandKind::Type => Operand::parse_type(text),
    }
}
