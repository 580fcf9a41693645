//! `warm-cache` command: build reference cache artifacts ahead of time.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use refcheck_data::{CacheStore, DEFAULT_CACHE_SUFFIX, TableKind};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CACHE_SUFFIX, ARG_HOUSE_NUMBERS, ARG_STREETS, CliError, ENV_WARM_CACHE_STREETS,
    require_existing, write_json,
};

/// CLI arguments for the `warm-cache` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Parse reference extracts and write their cache artifacts so \
                 later commands skip parsing. Existing artifacts are reused \
                 unless --refresh is given.",
    about = "Build cache artifacts for reference extracts"
)]
#[ortho_config(prefix = "REFCHECK")]
pub(crate) struct WarmCacheArgs {
    /// Street extract (region, settlement, street).
    #[arg(long = ARG_STREETS, value_name = "path")]
    #[serde(default)]
    pub(crate) streets: Option<Utf8PathBuf>,
    /// House-number extract (region, settlement, street, house number).
    /// Repeat the flag for several extracts.
    #[arg(long = ARG_HOUSE_NUMBERS, value_name = "path")]
    #[serde(default)]
    pub(crate) house_numbers: Option<Vec<Utf8PathBuf>>,
    /// Remove existing artifacts and rebuild them from the extracts.
    #[arg(long)]
    #[serde(default)]
    pub(crate) refresh: bool,
    /// Suffix appended to extract paths to name artifacts.
    #[arg(long = ARG_CACHE_SUFFIX, value_name = "suffix")]
    #[serde(default)]
    pub(crate) cache_suffix: Option<String>,
}

impl WarmCacheArgs {
    pub(crate) fn into_config(self) -> Result<WarmCacheConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        WarmCacheConfig::try_from(merged)
    }
}

/// Resolved `warm-cache` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WarmCacheConfig {
    pub(crate) streets: Option<Utf8PathBuf>,
    pub(crate) house_numbers: Vec<Utf8PathBuf>,
    pub(crate) refresh: bool,
    pub(crate) cache_suffix: String,
}

impl WarmCacheConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        if let Some(streets) = &self.streets {
            require_existing(streets, ARG_STREETS)?;
        }
        for path in &self.house_numbers {
            require_existing(path, ARG_HOUSE_NUMBERS)?;
        }
        Ok(())
    }
}

impl TryFrom<WarmCacheArgs> for WarmCacheConfig {
    type Error = CliError;

    fn try_from(args: WarmCacheArgs) -> Result<Self, Self::Error> {
        let house_numbers = args.house_numbers.unwrap_or_default();
        if args.streets.is_none() && house_numbers.is_empty() {
            return Err(CliError::MissingArgument {
                field: ARG_STREETS,
                env: ENV_WARM_CACHE_STREETS,
            });
        }
        Ok(Self {
            streets: args.streets,
            house_numbers,
            refresh: args.refresh,
            cache_suffix: args
                .cache_suffix
                .unwrap_or_else(|| DEFAULT_CACHE_SUFFIX.to_owned()),
        })
    }
}

/// One line of the `warm-cache` summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct WarmedArtifact {
    pub(crate) kind: &'static str,
    pub(crate) source: Utf8PathBuf,
    pub(crate) artifact: Utf8PathBuf,
    pub(crate) entries: usize,
    pub(crate) invalidated: bool,
}

/// Summary printed by `warm-cache`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct WarmCacheSummary {
    pub(crate) artifacts: Vec<WarmedArtifact>,
}

pub(crate) fn run_warm_cache_with(
    args: WarmCacheArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let summary = warm(&config)?;
    write_json(writer, &summary)
}

pub(crate) fn warm(config: &WarmCacheConfig) -> Result<WarmCacheSummary, CliError> {
    let store = CacheStore::with_suffix(config.cache_suffix.clone());
    let mut summary = WarmCacheSummary::default();
    if let Some(streets) = &config.streets {
        let invalidated = refresh_if_requested(&store, streets, config.refresh)?;
        let table = store
            .load_street_table(streets)
            .map_err(|source| load_error(streets, source))?;
        summary.artifacts.push(WarmedArtifact {
            kind: TableKind::Streets.label(),
            source: streets.clone(),
            artifact: store.artifact_path(streets),
            entries: table.street_count(),
            invalidated,
        });
    }
    let invalidated = config
        .house_numbers
        .iter()
        .map(|path| refresh_if_requested(&store, path, config.refresh))
        .collect::<Result<Vec<_>, _>>()?;
    let tables = store
        .load_house_number_tables(&config.house_numbers)
        .map_err(|source| CliError::LoadHouseNumberReferences {
            source: Box::new(source),
        })?;
    for ((path, table), invalidated) in config.house_numbers.iter().zip(tables).zip(invalidated) {
        summary.artifacts.push(WarmedArtifact {
            kind: TableKind::HouseNumbers.label(),
            source: path.clone(),
            artifact: store.artifact_path(path),
            entries: table.entry_count(),
            invalidated,
        });
    }
    info!("warmed {} cache artifact(s)", summary.artifacts.len());
    Ok(summary)
}

fn refresh_if_requested(
    store: &CacheStore,
    path: &Utf8Path,
    refresh: bool,
) -> Result<bool, CliError> {
    if !refresh {
        return Ok(false);
    }
    store
        .invalidate(path)
        .map_err(|source| CliError::RefreshCache {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
}

pub(crate) fn load_error(path: &Utf8Path, source: refcheck_data::LoadError) -> CliError {
    CliError::LoadReference {
        path: path.to_path_buf(),
        source: Box::new(source),
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<WarmCacheConfig, CliError> {
    let merged = WarmCacheArgs::merge_from_layers(layers).map_err(CliError::from)?;
    WarmCacheConfig::try_from(merged)
}
