//! Disassembler: program → canonical IPPcode24 source.
//!
//! Output is the header followed by one instruction per line. No
//! indentation, no comments, no blank lines. Mnemonics are uppercase and
//! string constants are re-escaped.

use ippcode_common::Program;

/// Disassemble a program into canonical source text.
///
/// The output reassembles to an identical program.
pub fn disassemble(program: &Program) -> String {
    let mut out = String::from(".IPPcode24\n");
    for instr in &program.instructions {
        out.push_str(&instr.to_string());
        out.push('\n');
    }
    out
}
