//! Error types emitted by the refcheck CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use refcheck_core::UnknownTailoringError;
use refcheck_data::{CacheError, LoadError};
use thiserror::Error;

/// Errors emitted by the refcheck CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that also supplies the value.
        env: &'static str,
    },
    /// The requested collation tailoring is unknown.
    #[error(transparent)]
    Collation(#[from] UnknownTailoringError),
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Loading a reference table (parse or cache) failed.
    #[error("failed to load reference {path:?}: {source}")]
    LoadReference {
        /// Reference extract path.
        path: Utf8PathBuf,
        /// Underlying parse or cache failure.
        #[source]
        source: Box<LoadError>,
    },
    /// Loading a batch of house-number references failed.
    #[error("failed to load house-number references: {source}")]
    LoadHouseNumberReferences {
        /// Underlying parse or cache failure naming the offending file.
        #[source]
        source: Box<LoadError>,
    },
    /// Removing a cache artifact for `--refresh` failed.
    #[error("failed to refresh cache for {path:?}: {source}")]
    RefreshCache {
        /// Reference extract path.
        path: Utf8PathBuf,
        /// Underlying cache failure.
        #[source]
        source: Box<CacheError>,
    },
    /// Reading an imported list failed.
    #[error("failed to read imported list {path:?}: {source}")]
    ReadImported {
        /// Imported list path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Serialising a report failed.
    #[error("failed to serialise report: {0}")]
    SerialiseReport(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
