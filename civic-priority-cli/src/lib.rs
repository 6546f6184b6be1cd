//! Command-line interface for scoring civic complaint locations.
//!
//! `civic-priority score` resolves a [`PriorityRequest`] from a JSON file,
//! flags, configuration files and `CIVIC_PRIORITY_*` environment variables,
//! runs the priority engine against the configured places directory and
//! prints the result as JSON. `civic-priority catalog` prints the facility
//! catalog in effect.
//!
//! [`PriorityRequest`]: civic_priority_core::PriorityRequest
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod catalog;
mod error;
mod fs;
mod score;

pub use error::CliError;

use catalog::{CatalogArgs, run_catalog_with};
use score::{DefaultScoreClientBuilder, ScoreArgs, ScoreClientBuilder, run_score_with};

pub(crate) const ARG_REQUEST: &str = "request";
pub(crate) const ARG_LATITUDE: &str = "latitude";
pub(crate) const ARG_LONGITUDE: &str = "longitude";
pub(crate) const ARG_COMPLAINT_TYPE: &str = "complaint-type";
pub(crate) const ARG_PRIVACY_LEVEL: &str = "privacy-level";
pub(crate) const ARG_ACCURACY_M: &str = "accuracy-m";
pub(crate) const ARG_API_KEY: &str = "api-key";
pub(crate) const ARG_PLACES_BASE_URL: &str = "places-base-url";
pub(crate) const ARG_CATALOG: &str = "catalog";
pub(crate) const ENV_LATITUDE: &str = "CIVIC_PRIORITY_CMDS_SCORE_LATITUDE";
pub(crate) const ENV_LONGITUDE: &str = "CIVIC_PRIORITY_CMDS_SCORE_LONGITUDE";
pub(crate) const ENV_API_KEY: &str = "CIVIC_PRIORITY_CMDS_SCORE_API_KEY";

/// Run the civic priority CLI with the current process arguments and
/// environment, writing command output to standard output.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, an
/// input file cannot be read, or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &DefaultScoreClientBuilder, &mut stdout)
}

fn dispatch(
    command: Command,
    builder: &dyn ScoreClientBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Score(args) => run_score_with(args, builder, writer),
        Command::Catalog(args) => run_catalog_with(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "civic-priority",
    about = "Score civic complaints by the critical infrastructure around them",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score one complaint location.
    Score(ScoreArgs),
    /// Print the facility catalog as JSON.
    Catalog(CatalogArgs),
}

/// Pretty-print `value` as JSON followed by a newline.
fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
