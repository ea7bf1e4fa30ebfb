use std::process::ExitCode;

use clap::Parser;
use clinica_lib::cli::{run, Cli};

fn main() -> ExitCode {
    clinica_lib::init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
