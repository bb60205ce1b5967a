//! CLI command implementations.
//!
//! Every command returns `Err(status)` when the process should exit
//! with a nonzero status; the error has already been reported on stderr.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use ippcode_assembler::disassemble as disassemble_program;
use ippcode_common::Program;
use ippcode_vm::{InputReader, Io, LineReader};
use tracing::debug;

use crate::{EXIT_INPUT, EXIT_OUTPUT, EXIT_PARAMETER};

/// Load and execute a program.
///
/// Whichever of `source` and `input` is missing is read from stdin.
pub fn run(source: Option<&Path>, input: Option<&Path>) -> Result<(), i32> {
    if source.is_none() && input.is_none() {
        eprintln!("error: at least one of --source or --input is required");
        return Err(EXIT_PARAMETER);
    }
    debug!(?source, ?input, "resolved paths");

    let text = match source {
        Some(path) => read_source(path)?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).map_err(|e| {
                eprintln!("error: cannot read source from stdin: {e}");
                EXIT_INPUT
            })?;
            text
        }
    };
    let program = load(&text)?;

    let mut reader: Box<dyn InputReader> = match input {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                eprintln!("error: cannot read '{}': {e}", path.display());
                EXIT_INPUT
            })?;
            Box::new(LineReader::new(BufReader::new(file)))
        }
        None => Box::new(LineReader::new(io::stdin().lock())),
    };

    let mut stdout = BufWriter::new(io::stdout().lock());
    let mut stderr = io::stderr();
    let result = ippcode_vm::run(
        &program,
        &mut Io::new(reader.as_mut(), &mut stdout, &mut stderr),
    );
    let flushed = stdout.flush();

    match result {
        Ok(code) => {
            flushed.map_err(|e| {
                eprintln!("error: cannot write output: {e}");
                EXIT_OUTPUT
            })?;
            if code == 0 {
                Ok(())
            } else {
                Err(i32::from(code))
            }
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(i32::from(e.exit_code()))
        }
    }
}

/// Load a program without running it.
pub fn check(source: &Path) -> Result<(), i32> {
    let text = read_source(source)?;
    let program = load(&text)?;
    println!(
        "OK: {} ({} instructions, {} labels)",
        source.display(),
        program.len(),
        program.label_count()
    );
    Ok(())
}

/// Print a program in canonical form.
pub fn disassemble(source: &Path) -> Result<(), i32> {
    let text = read_source(source)?;
    let program = load(&text)?;
    print!("{}", disassemble_program(&program));
    Ok(())
}

// ---- Helpers ----

fn read_source(path: &Path) -> Result<String, i32> {
    fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{}': {e}", path.display());
        EXIT_INPUT
    })
}

/// Load XML or source text, reporting failures on stderr.
fn load(text: &str) -> Result<Program, i32> {
    ippcode_assembler::load(text).map_err(|e| {
        eprintln!("error: {e}");
        i32::from(e.exit_code())
    })
}
