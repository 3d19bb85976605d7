//! kanbn - command-line kanban board

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = kanbn::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
