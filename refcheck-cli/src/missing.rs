//! `missing-house-numbers` and `missing-streets` commands.
//!
//! Both load a reference table through the cache, read a newline-separated
//! imported list and print the two-way difference as JSON.

use std::io::{BufRead, BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use refcheck_core::{Collator, Diff, Differ, HouseNumberDiff, diff_streets};
use refcheck_data::{CacheStore, DEFAULT_CACHE_SUFFIX};
use refcheck_fs::open_utf8_file;
use serde::{Deserialize, Serialize};

use crate::warm_cache::load_error;
use crate::{
    ARG_CACHE_SUFFIX, ARG_COLLATION, ARG_IMPORTED, ARG_REFERENCE, ARG_REGION, ARG_SETTLEMENT,
    ARG_STREET, CliError, ENV_HOUSE_NUMBERS_IMPORTED, ENV_HOUSE_NUMBERS_REFERENCE,
    ENV_HOUSE_NUMBERS_REGION, ENV_HOUSE_NUMBERS_SETTLEMENT, ENV_HOUSE_NUMBERS_STREET,
    ENV_STREETS_IMPORTED, ENV_STREETS_REFERENCE, ENV_STREETS_REGION, ENV_STREETS_SETTLEMENT,
    require_existing, resolve_collator, write_json,
};

/// CLI arguments for the `missing-house-numbers` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Compare the house numbers imported for one street with the \
                 reference registry. Results are grouped into odd and even \
                 numbers and ordered by number, then suffix.",
    about = "Diff imported house numbers against the reference"
)]
#[ortho_config(prefix = "REFCHECK")]
pub(crate) struct MissingHouseNumbersArgs {
    /// House-number reference extract.
    #[arg(long = ARG_REFERENCE, value_name = "path")]
    #[serde(default)]
    pub(crate) reference: Option<Utf8PathBuf>,
    /// Region code.
    #[arg(long = ARG_REGION, value_name = "code")]
    #[serde(default)]
    pub(crate) region: Option<String>,
    /// Settlement code.
    #[arg(long = ARG_SETTLEMENT, value_name = "code")]
    #[serde(default)]
    pub(crate) settlement: Option<String>,
    /// Street name as spelled in the reference.
    #[arg(long = ARG_STREET, value_name = "name")]
    #[serde(default)]
    pub(crate) street: Option<String>,
    /// Newline-separated list of imported house numbers.
    #[arg(long = ARG_IMPORTED, value_name = "path")]
    #[serde(default)]
    pub(crate) imported: Option<Utf8PathBuf>,
    /// Collation tailoring: `hu` (default) or `root`.
    #[arg(long = ARG_COLLATION, value_name = "name")]
    #[serde(default)]
    pub(crate) collation: Option<String>,
    /// Suffix appended to the extract path to name its artifact.
    #[arg(long = ARG_CACHE_SUFFIX, value_name = "suffix")]
    #[serde(default)]
    pub(crate) cache_suffix: Option<String>,
}

impl MissingHouseNumbersArgs {
    pub(crate) fn into_config(self) -> Result<MissingHouseNumbersConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        MissingHouseNumbersConfig::try_from(merged)
    }
}

/// Resolved `missing-house-numbers` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MissingHouseNumbersConfig {
    pub(crate) reference: Utf8PathBuf,
    pub(crate) region: String,
    pub(crate) settlement: String,
    pub(crate) street: String,
    pub(crate) imported: Utf8PathBuf,
    pub(crate) collator: Collator,
    pub(crate) cache_suffix: String,
}

impl MissingHouseNumbersConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_reference(&self.reference, &self.cache_suffix)?;
        require_existing(&self.imported, ARG_IMPORTED)?;
        Ok(())
    }
}

impl TryFrom<MissingHouseNumbersArgs> for MissingHouseNumbersConfig {
    type Error = CliError;

    fn try_from(args: MissingHouseNumbersArgs) -> Result<Self, Self::Error> {
        let reference = args.reference.ok_or(CliError::MissingArgument {
            field: ARG_REFERENCE,
            env: ENV_HOUSE_NUMBERS_REFERENCE,
        })?;
        let region = args.region.ok_or(CliError::MissingArgument {
            field: ARG_REGION,
            env: ENV_HOUSE_NUMBERS_REGION,
        })?;
        let settlement = args.settlement.ok_or(CliError::MissingArgument {
            field: ARG_SETTLEMENT,
            env: ENV_HOUSE_NUMBERS_SETTLEMENT,
        })?;
        let street = args.street.ok_or(CliError::MissingArgument {
            field: ARG_STREET,
            env: ENV_HOUSE_NUMBERS_STREET,
        })?;
        let imported = args.imported.ok_or(CliError::MissingArgument {
            field: ARG_IMPORTED,
            env: ENV_HOUSE_NUMBERS_IMPORTED,
        })?;
        let collator = resolve_collator(args.collation.as_deref())?;
        Ok(Self {
            reference,
            region,
            settlement,
            street,
            imported,
            collator,
            cache_suffix: args
                .cache_suffix
                .unwrap_or_else(|| DEFAULT_CACHE_SUFFIX.to_owned()),
        })
    }
}

/// CLI arguments for the `missing-streets` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Compare the street names imported for one settlement with \
                 the reference registry. Both sides are ordered with the \
                 selected collation.",
    about = "Diff imported street names against the reference"
)]
#[ortho_config(prefix = "REFCHECK")]
pub(crate) struct MissingStreetsArgs {
    /// Street reference extract.
    #[arg(long = ARG_REFERENCE, value_name = "path")]
    #[serde(default)]
    pub(crate) reference: Option<Utf8PathBuf>,
    /// Region code.
    #[arg(long = ARG_REGION, value_name = "code")]
    #[serde(default)]
    pub(crate) region: Option<String>,
    /// Settlement code.
    #[arg(long = ARG_SETTLEMENT, value_name = "code")]
    #[serde(default)]
    pub(crate) settlement: Option<String>,
    /// Newline-separated list of imported street names.
    #[arg(long = ARG_IMPORTED, value_name = "path")]
    #[serde(default)]
    pub(crate) imported: Option<Utf8PathBuf>,
    /// Collation tailoring: `hu` (default) or `root`.
    #[arg(long = ARG_COLLATION, value_name = "name")]
    #[serde(default)]
    pub(crate) collation: Option<String>,
    /// Suffix appended to the extract path to name its artifact.
    #[arg(long = ARG_CACHE_SUFFIX, value_name = "suffix")]
    #[serde(default)]
    pub(crate) cache_suffix: Option<String>,
}

impl MissingStreetsArgs {
    pub(crate) fn into_config(self) -> Result<MissingStreetsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        MissingStreetsConfig::try_from(merged)
    }
}

/// Resolved `missing-streets` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MissingStreetsConfig {
    pub(crate) reference: Utf8PathBuf,
    pub(crate) region: String,
    pub(crate) settlement: String,
    pub(crate) imported: Utf8PathBuf,
    pub(crate) collator: Collator,
    pub(crate) cache_suffix: String,
}

impl MissingStreetsConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_reference(&self.reference, &self.cache_suffix)?;
        require_existing(&self.imported, ARG_IMPORTED)?;
        Ok(())
    }
}

impl TryFrom<MissingStreetsArgs> for MissingStreetsConfig {
    type Error = CliError;

    fn try_from(args: MissingStreetsArgs) -> Result<Self, Self::Error> {
        let reference = args.reference.ok_or(CliError::MissingArgument {
            field: ARG_REFERENCE,
            env: ENV_STREETS_REFERENCE,
        })?;
        let region = args.region.ok_or(CliError::MissingArgument {
            field: ARG_REGION,
            env: ENV_STREETS_REGION,
        })?;
        let settlement = args.settlement.ok_or(CliError::MissingArgument {
            field: ARG_SETTLEMENT,
            env: ENV_STREETS_SETTLEMENT,
        })?;
        let imported = args.imported.ok_or(CliError::MissingArgument {
            field: ARG_IMPORTED,
            env: ENV_STREETS_IMPORTED,
        })?;
        let collator = resolve_collator(args.collation.as_deref())?;
        Ok(Self {
            reference,
            region,
            settlement,
            imported,
            collator,
            cache_suffix: args
                .cache_suffix
                .unwrap_or_else(|| DEFAULT_CACHE_SUFFIX.to_owned()),
        })
    }
}

/// JSON report printed by `missing-house-numbers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct HouseNumberReport {
    pub(crate) region: String,
    pub(crate) settlement: String,
    pub(crate) street: String,
    #[serde(flatten)]
    pub(crate) diff: HouseNumberDiff,
}

/// JSON report printed by `missing-streets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct StreetReport {
    pub(crate) region: String,
    pub(crate) settlement: String,
    #[serde(flatten)]
    pub(crate) diff: Diff,
}

pub(crate) fn run_missing_house_numbers_with(
    args: MissingHouseNumbersArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let report = house_number_report(&config)?;
    write_json(writer, &report)
}

pub(crate) fn run_missing_streets_with(
    args: MissingStreetsArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let report = street_report(&config)?;
    write_json(writer, &report)
}

pub(crate) fn house_number_report(
    config: &MissingHouseNumbersConfig,
) -> Result<HouseNumberReport, CliError> {
    let store = CacheStore::with_suffix(config.cache_suffix.clone());
    let table = store
        .load_house_number_table(&config.reference)
        .map_err(|source| load_error(&config.reference, source))?;
    let imported = read_imported_list(&config.imported)?;
    let reference = table.house_numbers(&config.region, &config.settlement, &config.street);
    let diff = Differ::new(config.collator).diff_house_numbers(imported, reference);
    Ok(HouseNumberReport {
        region: config.region.clone(),
        settlement: config.settlement.clone(),
        street: config.street.clone(),
        diff,
    })
}

pub(crate) fn street_report(config: &MissingStreetsConfig) -> Result<StreetReport, CliError> {
    let store = CacheStore::with_suffix(config.cache_suffix.clone());
    let table = store
        .load_street_table(&config.reference)
        .map_err(|source| load_error(&config.reference, source))?;
    let imported = read_imported_list(&config.imported)?;
    let reference = table.streets(&config.region, &config.settlement);
    Ok(StreetReport {
        region: config.region.clone(),
        settlement: config.settlement.clone(),
        diff: diff_streets(imported, reference, config.collator),
    })
}

/// Require the reference extract unless its cache artifact already exists.
fn require_reference(reference: &Utf8Path, cache_suffix: &str) -> Result<(), CliError> {
    let artifact = CacheStore::with_suffix(cache_suffix).artifact_path(reference);
    if matches!(refcheck_fs::file_is_file(&artifact), Ok(true)) {
        return Ok(());
    }
    require_existing(reference, ARG_REFERENCE)
}

/// Read a newline-separated list, trimming entries and skipping blank lines.
pub(crate) fn read_imported_list(path: &Utf8Path) -> Result<Vec<String>, CliError> {
    let to_error = |source| CliError::ReadImported {
        path: path.to_path_buf(),
        source,
    };
    let file = open_utf8_file(path).map_err(to_error)?;
    let mut entries = Vec::new();
    for read in BufReader::new(file).lines() {
        let text = read.map_err(to_error)?;
        let entry = text.trim();
        if !entry.is_empty() {
            entries.push(entry.to_owned());
        }
    }
    Ok(entries)
}

#[cfg(test)]
pub(crate) fn house_numbers_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<MissingHouseNumbersConfig, CliError> {
    let merged = MissingHouseNumbersArgs::merge_from_layers(layers).map_err(CliError::from)?;
    MissingHouseNumbersConfig::try_from(merged)
}
