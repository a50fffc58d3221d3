use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli_util::{print_engine_error, print_failure};
use crate::config::{self, Overrides};
use crate::{Engine, load_program};

/// Exit status for a program stopped by Ctrl+C.
const SIGINT_EXIT: i32 = 130;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Number of tape cells (fallback BF_CELLS, then bf.toml; default 65536)
    #[arg(long = "cells", value_name = "N")]
    pub cells: Option<u32>,

    /// Cell width in bytes: 1, 2, 4 or 8 (fallback BF_CELL_WIDTH, then bf.toml; default 1)
    #[arg(long = "cell-width", value_name = "BYTES")]
    pub cell_width: Option<u32>,

    /// Program file to execute
    #[arg(value_name = "PROGRAM_FILE")]
    pub file: Option<PathBuf>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        cells,
        cell_width,
        file,
        ..
    } = args;

    let Some(path) = file else {
        eprintln!("{program}: program file not specified");
        usage_and_exit(program, 1);
    };

    let code = match load_program(&path) {
        Ok(code) => code,
        Err(e) => {
            print_failure(program, &e.to_string());
            return 1;
        }
    };

    let cfg = config::load(Overrides { cells, cell_width });
    let mut bf = match Engine::new(&code, cfg.cells, cfg.cell_width) {
        Ok(bf) => bf,
        Err(e) => {
            print_failure(program, &format!("failed to initialize engine: {e}"));
            return 1;
        }
    };

    // Flush whatever the program printed so far, then leave.
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(SIGINT_EXIT);
    }) {
        tracing::warn!(error = %e, "failed to set ctrl+c handler");
    }

    match bf.run() {
        Ok(()) => 0,
        Err(err) => {
            print_engine_error(Some(program), &code, &err);
            1
        }
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} [--cells N] [--cell-width BYTES] PROGRAM_FILE

Options:
  --cells N             Number of tape cells (default 65536)
  --cell-width BYTES    Cell width in bytes: 1, 2, 4 or 8 (default 1)
  --help, -h            Show this help

Environment:
  BF_CELLS, BF_CELL_WIDTH   Used when the matching flag is absent
  BF_LOG                    Log filter for stderr diagnostics (default "warn")

Config file:
  $XDG_CONFIG_HOME/bf.toml, section [engine] with keys cells and cell_width

Notes:
- Input (`,`) reads a single byte from stdin; on EOF the current cell is set to -1 (all ones).
- Output (`.`) writes the low 8 bits of the current cell.
- Bytes other than ><+-.,[] are ignored.
- Moving off either end of the tape, or taking a jump from an unmatched bracket, stops the program with exit status 1.

Examples:
- Run a program:
    {0} ./hello.bf
- Feed a file to `,`:
    {0} ./cat.bf < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
