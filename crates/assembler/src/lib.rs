//! IPPcode24 front end: XML documents and source text ↔ [`Program`].
//!
//! Loading is a mechanical translation. Every shape check (header or
//! document structure, opcode, operand syntax, arity, operand kinds,
//! duplicate labels) happens here, so a loaded program can only fail at
//! run time on value checks.
//!
//! # Usage
//!
//! ```
//! use ippcode_assembler::{assemble, disassemble, load};
//!
//! let text = ".IPPcode24\nDEFVAR GF@x\nMOVE GF@x string@a\\032b\nWRITE GF@x\n";
//! let program = assemble(text).unwrap();
//! assert_eq!(program.len(), 3);
//! assert_eq!(disassemble(&program), text);
//!
//! let xml = r#"<program language="IPPcode24">
//!   <instruction order="1" opcode="WRITE"><arg1 type="int">7</arg1></instruction>
//! </program>"#;
//! assert_eq!(load(xml).unwrap().len(), 1);
//! ```

pub mod error;

mod disassembler;
mod lexer;
mod parser;
mod xml;

pub use error::AsmError;

use ippcode_common::{Instruction, Program, ProgramError};
use lexer::tokenize_line;
use parser::{parse_header, parse_line};
use tracing::debug;

/// Assemble source text into a program.
///
/// Returns the first error encountered.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    let mut header_seen = false;
    let mut instructions = Vec::new();
    // Source line of each instruction, for load-time error reporting.
    let mut lines = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line);
        if tokens.is_empty() {
            continue;
        }
        if !header_seen {
            parse_header(&tokens, line_num)?;
            header_seen = true;
            continue;
        }
        instructions.push(parse_line(&tokens, line_num)?);
        lines.push(line_num);
    }

    if !header_seen {
        return Err(AsmError::MissingHeader {
            line: text.lines().count().max(1),
            found: String::new(),
        });
    }

    let program = build(instructions, &lines)?;
    debug!(
        instructions = program.len(),
        labels = program.label_count(),
        "assembled program"
    );
    Ok(program)
}

/// Load a program from its XML representation.
///
/// Malformed XML is exit 31; a document that does not describe a valid
/// program is exit 32. Duplicate labels are exit 52, as for source text.
pub fn load_xml(text: &str) -> Result<Program, AsmError> {
    let (instructions, lines): (Vec<_>, Vec<_>) = xml::parse_document(text)?.into_iter().unzip();
    let program = build(instructions, &lines)?;
    debug!(
        instructions = program.len(),
        labels = program.label_count(),
        "loaded XML program"
    );
    Ok(program)
}

/// Load either representation: text whose first non-blank character is
/// `<` is read as XML, anything else as source text.
pub fn load(text: &str) -> Result<Program, AsmError> {
    if is_xml(text) {
        load_xml(text)
    } else {
        assemble(text)
    }
}

fn is_xml(text: &str) -> bool {
    text.trim_start_matches('\u{feff}')
        .trim_start()
        .starts_with('<')
}

/// `lines[i]` is the source line of `instructions[i]`.
fn build(instructions: Vec<Instruction>, lines: &[usize]) -> Result<Program, AsmError> {
    Program::new(instructions).map_err(|e| match e {
        ProgramError::DuplicateLabel { label, second, .. } => AsmError::DuplicateLabel {
            line: lines.get(second).copied().unwrap_or_default(),
            label,
        },
    })
}

/// Disassemble a program into canonical source text.
///
/// The output starts with the header and has one instruction per line.
pub fn disassemble(program: &Program) -> String {
    disassembler::disassemble(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ippcode_common::{FrameKind, Instruction, VarRef};

    #[test]
    fn assemble_minimal() {
        let program = assemble(".IPPcode24\nCREATEFRAME\n").unwrap();
        assert_eq!(program.instructions, vec![Instruction::CreateFrame]);
    }

    #[test]
    fn header_only_is_empty_program() {
        let program = assemble(".IPPcode24\n").unwrap();
        assert!(program.is_empty());
    }

    #[test]
    fn empty_source_has_no_header() {
        assert!(matches!(
            assemble(""),
            Err(AsmError::MissingHeader { line: 1, .. })
        ));
        assert_eq!(assemble("# only a comment\n").unwrap_err().exit_code(), 21);
    }

    #[test]
    fn assemble_with_comments_and_blanks() {
        let text = "\
# leading comment

.IPPcode24 # header
DEFVAR GF@x   # declare

   WRITE GF@x
";
        let program = assemble(text).unwrap();
        assert_eq!(program.len(), 2);
        assert_eq!(
            program.instructions[0],
            Instruction::Defvar {
                var: VarRef::new(FrameKind::Global, "x").unwrap()
            }
        );
    }

    #[test]
    fn duplicate_label_reports_second_line() {
        let text = ".IPPcode24\nLABEL a\nBREAK\nLABEL a\n";
        assert_eq!(
            assemble(text),
            Err(AsmError::DuplicateLabel {
                line: 4,
                label: "a".to_string()
            })
        );
    }

    #[test]
    fn load_detects_the_representation() {
        let xml = "\u{feff}\n  <program language=\"IPPcode24\"><instruction order=\"1\" opcode=\"BREAK\"/></program>";
        assert!(is_xml(xml));
        assert_eq!(load(xml).unwrap().instructions, vec![Instruction::Break]);

        let text = ".IPPcode24\nBREAK\n";
        assert!(!is_xml(text));
        assert_eq!(load(text).unwrap().instructions, vec![Instruction::Break]);

        // Neither an XML document nor a source header.
        assert_eq!(load("BREAK\n").unwrap_err().exit_code(), 21);
    }

    #[test]
    fn xml_duplicate_label_reports_element_line() {
        let xml = "<program language=\"IPPcode24\">\n\
<instruction order=\"1\" opcode=\"LABEL\"><arg1 type=\"label\">a</arg1></instruction>\n\
<instruction order=\"2\" opcode=\"LABEL\"><arg1 type=\"label\">a</arg1></instruction>\n\
</program>\n";
        assert_eq!(
            load_xml(xml),
            Err(AsmError::DuplicateLabel {
                line: 3,
                label: "a".to_string()
            })
        );
    }

    #[test]
    fn roundtrip_disassemble_then_assemble() {
        let text = "\
.ippcode24
defvar GF@s
move GF@s string@x#comment
read GF@s string
jumpifeq end GF@s nil@nil
str2int GF@s GF@s int@0x10
label end
";
        let first = assemble(text).unwrap();
        let canonical = disassemble(&first);
        let second = assemble(&canonical).unwrap();
        assert_eq!(first, second);
        assert!(canonical.contains("STRI2INT GF@s GF@s int@16\n"));
    }
}
