use std::process::ExitCode;
use vcfetch_core::logging;

mod cli;

use crate::cli::CliCommand;

// Returning ExitCode (rather than calling process::exit) lets every owned
// value, including reporter buffers, drop before the process ends.
fn main() -> ExitCode {
    // Initialize logging as early as possible.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch.
    match CliCommand::run_from_args() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("vcfetch error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
