//! ippint: load, check and execute IPPcode24 programs.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use ippcode_cli::{commands, init_tracing, EXIT_PARAMETER};

#[derive(Parser)]
#[command(name = "ippint", version, about = "IPPcode24 interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and execute a program
    Run {
        /// Program as XML or source text (stdin if omitted)
        #[arg(long)]
        source: Option<PathBuf>,
        /// Input for READ (stdin if omitted)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Load a program and report its size
    Check {
        /// Program source
        source: PathBuf,
    },
    /// Print a program as canonical source text
    Disassemble {
        /// Program source
        source: PathBuf,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are reported as "errors" on stdout.
            process::exit(if e.use_stderr() { EXIT_PARAMETER } else { 0 });
        }
    };

    init_tracing();

    let result = match &cli.command {
        Commands::Run { source, input } => {
            commands::run(source.as_deref(), input.as_deref())
        }
        Commands::Check { source } => commands::check(source),
        Commands::Disassemble { source } => commands::disassemble(source),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}
