//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use civic_priority_cli::CliError;

fn main() {
    match civic_priority_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("civic-priority: {err}");
            std::process::exit(1);
        }
    }
}
