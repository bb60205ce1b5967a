//! IPPcode24 interpreter CLI library.
//!
//! Exit codes:
//! - 0: Success, or the operand of EXIT
//! - 10: Invalid command-line parameters
//! - 11: Source or input file cannot be read, or READ hits an I/O error
//! - 12: Program output cannot be written
//! - 21, 22, 23: Source text load errors (header, opcode, syntax)
//! - 31, 32: XML load errors (malformed document, invalid structure)
//! - 52: Duplicate label, in either representation
//! - 52..=58, 99: Run-time errors

pub mod commands;

use std::sync::Once;

/// Invalid or missing command-line parameters.
pub const EXIT_PARAMETER: i32 = 10;
/// A source or input file cannot be opened or read.
pub const EXIT_INPUT: i32 = 11;
/// Program output cannot be written.
pub const EXIT_OUTPUT: i32 = 12;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=ippcode_vm=trace`
/// or similar; logs go to stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
