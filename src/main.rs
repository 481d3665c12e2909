//! dupfold - Fold duplicate files into a flat destination
//!
//! Entry point for the dupfold CLI application.

use clap::Parser;
use dupfold::{cli::Cli, error::ExitCode};

fn main() {
    let cli = Cli::parse();

    match dupfold::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;
            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
