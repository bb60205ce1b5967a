//! Integration tests for the IPPcode24 assembler.
//!
//! Tests cover:
//! - The sample programs under tests/programs (assemble, execute)
//! - Roundtrip properties (assemble → disassemble → assemble)
//! - Load error classification (header, opcode, syntax, labels)

use ippcode_assembler::{assemble, disassemble, AsmError};
use ippcode_common::{Instruction, Opcode, Program, Symbol, Value};
use ippcode_vm::{run, Io, LineReader};

// ---- Test helpers ----

const HELLO: &str = include_str!("../../../tests/programs/hello.ippc");
const FACTORIAL: &str = include_str!("../../../tests/programs/factorial.ippc");
const FACTORIAL_IN: &str = include_str!("../../../tests/programs/factorial.in");
const REVERSE: &str = include_str!("../../../tests/programs/reverse.ippc");
const REVERSE_IN: &str = include_str!("../../../tests/programs/reverse.in");
const STACK: &str = include_str!("../../../tests/programs/stack.ippc");
const EXIT_CODE: &str = include_str!("../../../tests/programs/exit_code.ippc");
const DIV_ZERO: &str = include_str!("../../../tests/programs/div_zero.ippc");
const BAD_HEADER: &str = include_str!("../../../tests/programs/bad_header.ippc");

const LOADABLE: [&str; 6] = [HELLO, FACTORIAL, REVERSE, STACK, EXIT_CODE, DIV_ZERO];

/// Assemble and execute, returning (exit status, stdout).
fn execute(text: &str, input: &str) -> (u8, String) {
    let program = assemble(text).unwrap();
    let mut reader = LineReader::new(input.as_bytes());
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let status = match run(&program, &mut Io::new(&mut reader, &mut stdout, &mut stderr)) {
        Ok(code) => code,
        Err(e) => e.exit_code(),
    };
    (status, String::from_utf8(stdout).unwrap())
}

fn load_error(text: &str) -> AsmError {
    assemble(text).unwrap_err()
}

// ---- Sample programs ----

#[test]
fn hello() {
    assert_eq!(execute(HELLO, ""), (0, "Hello, World!\n".to_string()));
}

#[test]
fn factorial() {
    assert_eq!(execute(FACTORIAL, FACTORIAL_IN), (0, "120\n".to_string()));
    assert_eq!(execute(FACTORIAL, "0\n"), (0, "1\n".to_string()));
    assert_eq!(execute(FACTORIAL, "10\n"), (0, "3628800\n".to_string()));
}

#[test]
fn reverse() {
    assert_eq!(execute(REVERSE, REVERSE_IN), (0, "desserts\n".to_string()));
    assert_eq!(execute(REVERSE, "řeka"), (0, "akeř\n".to_string()));
}

#[test]
fn stack_order() {
    assert_eq!(execute(STACK, ""), (0, "12".to_string()));
}

#[test]
fn exit_stops_execution() {
    assert_eq!(execute(EXIT_CODE, ""), (7, "before".to_string()));
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    assert_eq!(execute(DIV_ZERO, ""), (57, String::new()));
}

#[test]
fn factorial_shape() {
    let program = assemble(FACTORIAL).unwrap();
    assert_eq!(program.len(), 28);
    assert_eq!(program.label_count(), 2);
    assert_eq!(program.label("fact"), Some(9));
    assert_eq!(program.label("recurse"), Some(18));
    assert_eq!(program.instructions[4].opcode(), Opcode::Call);
}

// ---- Roundtrip properties ----

#[test]
fn samples_roundtrip_through_disassembly() {
    for text in LOADABLE {
        let first = assemble(text).unwrap();
        let canonical = disassemble(&first);
        let second = assemble(&canonical).unwrap();
        assert_eq!(first, second);
        // Canonical text is a fixed point.
        assert_eq!(disassemble(&second), canonical);
    }
}

#[test]
fn disassembly_drops_comments_and_blank_lines() {
    let canonical = disassemble(&assemble(HELLO).unwrap());
    assert_eq!(canonical, ".IPPcode24\nWRITE string@Hello,\\032World!\\010\n");
}

#[test]
fn wide_whitespace_in_strings_roundtrips() {
    let first = Program::new(vec![Instruction::Write {
        symb: Symbol::Const(Value::Str("a\u{3000}b\u{2028}c d".to_string())),
    }])
    .unwrap();
    let canonical = disassemble(&first);
    assert_eq!(canonical, ".IPPcode24\nWRITE string@a\u{3000}b\u{2028}c\\032d\n");
    assert_eq!(assemble(&canonical).unwrap(), first);
}

#[test]
fn literals_are_normalized() {
    let program = assemble(
        ".IPPcode24\nPUSHS int@0x1F\nPUSHS int@-0o17\nPUSHS bool@true\nPUSHS string@\\065b\n",
    )
    .unwrap();
    assert_eq!(
        disassemble(&program),
        ".IPPcode24\nPUSHS int@31\nPUSHS int@-15\nPUSHS bool@true\nPUSHS string@Ab\n"
    );
}

#[test]
fn every_opcode_roundtrips() {
    let text = "\
.IPPcode24
MOVE GF@a int@1
CREATEFRAME
PUSHFRAME
POPFRAME
DEFVAR GF@a
CALL l
RETURN
PUSHS nil@nil
POPS GF@a
ADD GF@a GF@a int@1
SUB GF@a GF@a int@1
MUL GF@a GF@a int@1
IDIV GF@a GF@a int@1
LT GF@a GF@a int@1
GT GF@a GF@a int@1
EQ GF@a GF@a int@1
AND GF@a bool@true bool@false
OR GF@a bool@true bool@false
NOT GF@a bool@true
INT2CHAR GF@a int@65
STRI2INT GF@a string@A int@0
READ GF@a bool
WRITE GF@a
CONCAT GF@a string@a string@b
STRLEN GF@a string@abc
GETCHAR GF@a string@abc int@1
SETCHAR GF@a int@1 string@x
TYPE GF@a TF@b
LABEL l
JUMP l
JUMPIFEQ l GF@a int@1
JUMPIFNEQ l GF@a int@1
EXIT int@0
DPRINT GF@a
BREAK
";
    let program = assemble(text).unwrap();
    assert_eq!(program.len(), 35);
    assert_eq!(disassemble(&program), text);
}

// ---- Load errors ----

#[test]
fn bad_header_sample() {
    let err = load_error(BAD_HEADER);
    assert_eq!(err.exit_code(), 21);
    assert_eq!(
        err,
        AsmError::MissingHeader {
            line: 1,
            found: ".IPPcode23".to_string()
        }
    );
}

#[test]
fn instruction_before_header() {
    let err = load_error("# comment\nWRITE int@1\n.IPPcode24\n");
    assert_eq!(err.exit_code(), 21);
    assert_eq!(err.line(), 2);
}

#[test]
fn unknown_opcode() {
    let err = load_error(".IPPcode24\nDEFVAR GF@x\nPRINT GF@x\n");
    assert_eq!(
        err,
        AsmError::UnknownOpcode {
            line: 3,
            token: "PRINT".to_string()
        }
    );
    assert_eq!(err.exit_code(), 22);
}

#[test]
fn syntax_errors_exit_23() {
    let cases = [
        ".IPPcode24\nWRITE\n",
        ".IPPcode24\nCREATEFRAME GF@x\n",
        ".IPPcode24\nDEFVAR int@1\n",
        ".IPPcode24\nDEFVAR XF@x\n",
        ".IPPcode24\nDEFVAR GF@1x\n",
        ".IPPcode24\nWRITE int@abc\n",
        ".IPPcode24\nWRITE bool@yes\n",
        ".IPPcode24\nWRITE nil@null\n",
        ".IPPcode24\nWRITE string@a\\1\n",
        ".IPPcode24\nREAD GF@x nil\n",
        ".IPPcode24\nJUMP GF@x\n",
        ".IPPcode24 extra\n",
    ];
    for text in cases {
        let err = load_error(text);
        assert_eq!(err.exit_code(), 23, "{text:?} gave {err}");
    }
}

#[test]
fn duplicate_label() {
    let err = load_error(FACTORIAL.replace("LABEL recurse", "LABEL fact").as_str());
    assert_eq!(err.exit_code(), 52);
    assert!(matches!(err, AsmError::DuplicateLabel { ref label, .. } if label == "fact"));
}

#[test]
fn undefined_label_is_not_a_load_error() {
    let program = assemble(".IPPcode24\nJUMP nowhere\n").unwrap();
    assert_eq!(
        program.instructions,
        vec![Instruction::Jump {
            label: "nowhere".to_string()
        }]
    );
    assert_eq!(execute(".IPPcode24\nJUMP nowhere\n", "").0, 52);
}

#[test]
fn empty_program_runs() {
    let program: Program = assemble(".IPPcode24\n").unwrap();
    assert!(program.is_empty());
    assert_eq!(execute(".IPPcode24\n", ""), (0, String::new()));
}
