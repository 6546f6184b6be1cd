//! Catalog command and catalog loading.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use civic_priority_core::FacilityCatalog;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::{read_json, require_existing};
use crate::{ARG_CATALOG, CliError, write_json};

/// CLI arguments for the `catalog` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "catalog",
    long_about = "Print the facility catalog the score command would use. \
                 Without --catalog this is the eight standard facility \
                 types; with it, the validated contents of that file.",
    about = "Print the facility catalog as JSON"
)]
#[ortho_config(prefix = "CIVIC_PRIORITY")]
pub(crate) struct CatalogArgs {
    /// Path to a JSON facility catalog replacing the standard types.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
}

pub(crate) fn run_catalog_with(args: CatalogArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    if let Some(path) = &merged.catalog {
        require_existing(path, ARG_CATALOG)?;
    }
    let catalog = load_catalog_or_default(merged.catalog.as_deref())?;
    write_json(writer, &catalog)
}

/// Load and validate a catalog file.
///
/// Validation failures surface as [`CliError::ParseInput`].
pub(crate) fn load_catalog(path: &Utf8Path) -> Result<FacilityCatalog, CliError> {
    read_json(path, ARG_CATALOG)
}

/// Load `path` when given, otherwise the standard catalog.
pub(crate) fn load_catalog_or_default(
    path: Option<&Utf8Path>,
) -> Result<FacilityCatalog, CliError> {
    path.map_or_else(|| Ok(FacilityCatalog::default()), load_catalog)
}
