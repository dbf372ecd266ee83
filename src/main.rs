//! Cadence - Local-first event logging with habit tracking

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = cadence::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
