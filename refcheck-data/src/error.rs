//! Error types raised while parsing reference extracts and managing caches.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while parsing a tab-separated reference extract.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// The reference extract does not exist.
    #[error("reference extract {path} not found")]
    NotFound {
        /// Requested extract path.
        path: Utf8PathBuf,
    },
    /// Opening or reading the extract failed.
    #[error("failed to read reference extract {path}")]
    Read {
        /// Extract path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// A data line carried the wrong number of tab-separated fields.
    #[error("malformed reference data at {path}:{line}: expected {expected} fields, found {found}")]
    Malformed {
        /// Extract path.
        path: Utf8PathBuf,
        /// One-based line number of the offending line.
        line: usize,
        /// Field count required for the table kind.
        expected: usize,
        /// Field count present on the line.
        found: usize,
    },
}

/// Errors raised while reading, writing or removing cache artifacts.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Opening or reading an existing artifact failed.
    #[error("failed to read cache artifact {path}")]
    Read {
        /// Artifact path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The artifact ended before its header or payload was complete.
    #[error("cache artifact {path} is truncated")]
    Truncated {
        /// Artifact path.
        path: Utf8PathBuf,
    },
    /// The artifact does not start with the expected magic bytes.
    #[error("cache artifact {path} has invalid magic: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Artifact path.
        path: Utf8PathBuf,
        /// Magic written by this version.
        expected: [u8; 4],
        /// Magic read from the file.
        found: [u8; 4],
    },
    /// The artifact was written by an unknown format version.
    #[error("cache artifact {path} has unsupported version {found}; supported version is {supported}")]
    UnsupportedVersion {
        /// Artifact path.
        path: Utf8PathBuf,
        /// Version present in the header.
        found: u16,
        /// Version written by this binary.
        supported: u16,
    },
    /// The artifact holds a different table kind from the one requested.
    #[error("cache artifact {path} holds table kind {found}, expected {expected}")]
    KindMismatch {
        /// Artifact path.
        path: Utf8PathBuf,
        /// Kind tag requested by the caller.
        expected: u8,
        /// Kind tag present in the header.
        found: u8,
    },
    /// The payload could not be decoded.
    #[error("failed to decode cache artifact {path}")]
    Decode {
        /// Artifact path.
        path: Utf8PathBuf,
        /// Decoder error from `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// Creating the artifact's parent directory failed.
    #[error("failed to create cache directory {path}")]
    CreateParent {
        /// Directory path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Writing or persisting the artifact failed.
    #[error("failed to write cache artifact {path}")]
    Write {
        /// Artifact path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The table could not be encoded.
    #[error("failed to encode cache artifact {path}")]
    Encode {
        /// Artifact path.
        path: Utf8PathBuf,
        /// Encoder error from `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// Removing an artifact failed.
    #[error("failed to remove cache artifact {path}")]
    Remove {
        /// Artifact path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    /// Report whether the error means an existing artifact is corrupt.
    ///
    /// Corrupt artifacts are never rebuilt silently; callers decide whether
    /// to invalidate and retry.
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. }
                | Self::InvalidMagic { .. }
                | Self::UnsupportedVersion { .. }
                | Self::KindMismatch { .. }
                | Self::Decode { .. }
        )
    }
}

/// Errors raised by [`CacheStore::load_or_build`](crate::CacheStore::load_or_build).
#[derive(Debug, Error)]
pub enum LoadError {
    /// Parsing the reference extract failed.
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    /// Reading or writing the cache artifact failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
}
