//! Command-line interface for refcheck's reference cache and diff tooling.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use refcheck_core::{Collator, Tailoring};
use serde::Serialize;

mod error;
mod missing;
mod warm_cache;

pub use error::CliError;

use missing::{MissingHouseNumbersArgs, MissingStreetsArgs};
use warm_cache::WarmCacheArgs;

pub(crate) const ARG_STREETS: &str = "streets";
pub(crate) const ARG_HOUSE_NUMBERS: &str = "house-numbers";
pub(crate) const ARG_REFERENCE: &str = "reference";
pub(crate) const ARG_REGION: &str = "region";
pub(crate) const ARG_SETTLEMENT: &str = "settlement";
pub(crate) const ARG_STREET: &str = "street";
pub(crate) const ARG_IMPORTED: &str = "imported";
pub(crate) const ARG_COLLATION: &str = "collation";
pub(crate) const ARG_CACHE_SUFFIX: &str = "cache-suffix";

pub(crate) const ENV_WARM_CACHE_STREETS: &str = "REFCHECK_CMDS_WARM_CACHE_STREETS";
pub(crate) const ENV_HOUSE_NUMBERS_REFERENCE: &str =
    "REFCHECK_CMDS_MISSING_HOUSE_NUMBERS_REFERENCE";
pub(crate) const ENV_HOUSE_NUMBERS_REGION: &str = "REFCHECK_CMDS_MISSING_HOUSE_NUMBERS_REGION";
pub(crate) const ENV_HOUSE_NUMBERS_SETTLEMENT: &str =
    "REFCHECK_CMDS_MISSING_HOUSE_NUMBERS_SETTLEMENT";
pub(crate) const ENV_HOUSE_NUMBERS_STREET: &str = "REFCHECK_CMDS_MISSING_HOUSE_NUMBERS_STREET";
pub(crate) const ENV_HOUSE_NUMBERS_IMPORTED: &str =
    "REFCHECK_CMDS_MISSING_HOUSE_NUMBERS_IMPORTED";
pub(crate) const ENV_STREETS_REFERENCE: &str = "REFCHECK_CMDS_MISSING_STREETS_REFERENCE";
pub(crate) const ENV_STREETS_REGION: &str = "REFCHECK_CMDS_MISSING_STREETS_REGION";
pub(crate) const ENV_STREETS_SETTLEMENT: &str = "REFCHECK_CMDS_MISSING_STREETS_SETTLEMENT";
pub(crate) const ENV_STREETS_IMPORTED: &str = "REFCHECK_CMDS_MISSING_STREETS_IMPORTED";

/// Run the refcheck CLI with the current process arguments and environment.
///
/// Command output is written to stdout as JSON.
///
/// # Errors
/// Returns a [`CliError`] when argument parsing, configuration, reference
/// loading or output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_command(cli.command, &mut stdout)
}

fn run_command(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::WarmCache(args) => warm_cache::run_warm_cache_with(args, writer),
        Command::MissingHouseNumbers(args) => missing::run_missing_house_numbers_with(args, writer),
        Command::MissingStreets(args) => missing::run_missing_streets_with(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "refcheck",
    about = "Reconcile imported street and house-number data against a reference registry",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build cache artifacts for reference extracts.
    WarmCache(WarmCacheArgs),
    /// List house numbers missing from, or surplus to, an imported street.
    MissingHouseNumbers(MissingHouseNumbersArgs),
    /// List streets missing from, or surplus to, an imported settlement.
    MissingStreets(MissingStreetsArgs),
}

/// Resolve the collator named by `--collation`, defaulting to Hungarian.
pub(crate) fn resolve_collator(name: Option<&str>) -> Result<Collator, CliError> {
    let tailoring = match name {
        Some(value) => value.parse::<Tailoring>()?,
        None => Tailoring::default(),
    };
    Ok(Collator::new(tailoring))
}

/// Require that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match refcheck_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `report` as pretty-printed JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, report: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerialiseReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
