//! Build-once cache artifacts for parsed reference tables.
//!
//! An artifact lives next to its source extract, at the extract path with a
//! fixed suffix appended. Once it exists it is trusted: the source is not
//! read again until the artifact is removed with [`CacheStore::invalidate`].
//!
//! The on-disk layout is a `bincode` header followed by the `bincode` table
//! payload:
//!
//! | Field   | Encoding                                   |
//! |---------|--------------------------------------------|
//! | magic   | 4 bytes, `RCRC`                            |
//! | version | `u16`, little endian                       |
//! | kind    | `u8`, see [`TableKind`]                    |
//! | payload | the table, as produced by `bincode` 1.x    |
//!
//! Writers stage the artifact in a temporary file in the same directory and
//! rename it into place, so concurrent first builds race harmlessly: both
//! parse, both write, and the last rename wins.

use std::io::{self, BufReader, BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info, warn};
use refcheck_core::{ReferenceHouseNumberTable, ReferenceStreetTable};
use refcheck_fs::{
    ensure_parent_dir, open_utf8_file, remove_file_if_exists, with_appended_suffix,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;

use crate::error::{CacheError, LoadError, ReferenceError};
use crate::parser::{parse_house_numbers, parse_streets};

/// Suffix appended to a source extract path to locate its artifact.
pub const DEFAULT_CACHE_SUFFIX: &str = ".cache";

/// Magic bytes opening every artifact.
pub const CACHE_MAGIC: [u8; 4] = *b"RCRC";

/// Artifact format version written by this crate.
pub const CACHE_FORMAT_VERSION: u16 = 1;

/// Which reference table an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// A [`ReferenceStreetTable`].
    Streets,
    /// A [`ReferenceHouseNumberTable`].
    HouseNumbers,
}

impl TableKind {
    /// Header tag stored in the artifact.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Streets => 1,
            Self::HouseNumbers => 2,
        }
    }

    /// Human-readable label used in log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Streets => "street",
            Self::HouseNumbers => "house-number",
        }
    }
}

/// A table that can be memoised by a [`CacheStore`].
pub trait CachedTable: Serialize + DeserializeOwned {
    /// Kind tag written to and checked against the artifact header.
    const KIND: TableKind;
}

impl CachedTable for ReferenceStreetTable {
    const KIND: TableKind = TableKind::Streets;
}

impl CachedTable for ReferenceHouseNumberTable {
    const KIND: TableKind = TableKind::HouseNumbers;
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheHeader {
    magic: [u8; 4],
    version: u16,
    kind: u8,
}

impl CacheHeader {
    const fn for_kind(kind: TableKind) -> Self {
        Self {
            magic: CACHE_MAGIC,
            version: CACHE_FORMAT_VERSION,
            kind: kind.tag(),
        }
    }

    fn validate(&self, path: &Utf8Path, kind: TableKind) -> Result<(), CacheError> {
        if self.magic != CACHE_MAGIC {
            return Err(CacheError::InvalidMagic {
                path: path.to_path_buf(),
                expected: CACHE_MAGIC,
                found: self.magic,
            });
        }
        if self.version != CACHE_FORMAT_VERSION {
            return Err(CacheError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: self.version,
                supported: CACHE_FORMAT_VERSION,
            });
        }
        if self.kind != kind.tag() {
            return Err(CacheError::KindMismatch {
                path: path.to_path_buf(),
                expected: kind.tag(),
                found: self.kind,
            });
        }
        Ok(())
    }
}

/// Memoises parsed reference tables as artifacts beside their extracts.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use refcheck_data::CacheStore;
///
/// let store = CacheStore::default();
/// let streets = store
///     .load_street_table(Utf8Path::new("refdata/streets.tsv"))
///     .expect("load streets");
/// assert_eq!(
///     store.artifact_path(Utf8Path::new("refdata/streets.tsv")),
///     "refdata/streets.tsv.cache"
/// );
/// # let _ = streets;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStore {
    suffix: String,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::with_suffix(DEFAULT_CACHE_SUFFIX)
    }
}

impl CacheStore {
    /// Construct a store using [`DEFAULT_CACHE_SUFFIX`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a store that appends `suffix` to source paths.
    #[must_use]
    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// The suffix appended to source paths.
    #[must_use]
    pub const fn suffix(&self) -> &str {
        self.suffix.as_str()
    }

    /// Location of the artifact for `source`.
    #[must_use]
    pub fn artifact_path(&self, source: &Utf8Path) -> Utf8PathBuf {
        with_appended_suffix(source, &self.suffix)
    }

    /// Return the cached table for `source`, building it on first use.
    ///
    /// When an artifact exists it is decoded and returned; `builder` is not
    /// called and `source` is not read. Otherwise `builder(source)` runs and
    /// its table is written to the artifact before being returned.
    ///
    /// # Errors
    /// Returns [`LoadError::Reference`] when the builder fails and
    /// [`LoadError::Cache`] when the artifact cannot be read, decoded or
    /// written. A corrupt artifact is reported, never rebuilt silently.
    pub fn load_or_build<T, F>(&self, source: &Utf8Path, builder: F) -> Result<T, LoadError>
    where
        T: CachedTable,
        F: FnOnce(&Utf8Path) -> Result<T, ReferenceError>,
    {
        if let Some(table) = self.load::<T>(source)? {
            return Ok(table);
        }
        let table = builder(source)?;
        let artifact = self.store(source, &table)?;
        info!(
            "built {} table from {source} and cached it at {artifact}",
            T::KIND.label()
        );
        Ok(table)
    }

    /// Decode the artifact for `source`, if one exists.
    ///
    /// # Errors
    /// Returns a [`CacheError`] when the artifact exists but cannot be read
    /// or fails validation.
    pub fn load<T: CachedTable>(&self, source: &Utf8Path) -> Result<Option<T>, CacheError> {
        let artifact = self.artifact_path(source);
        let file = match open_utf8_file(&artifact) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source_err) => {
                return Err(CacheError::Read {
                    path: artifact,
                    source: source_err,
                });
            }
        };
        let mut reader = BufReader::new(file);
        let header: CacheHeader = bincode::deserialize_from(&mut reader)
            .map_err(|err| decode_error(&artifact, err))?;
        header.validate(&artifact, T::KIND)?;
        let table = bincode::deserialize_from(&mut reader)
            .map_err(|err| decode_error(&artifact, err))?;
        debug!("reusing {} cache artifact {artifact}", T::KIND.label());
        Ok(Some(table))
    }

    /// Write `table` as the artifact for `source`, replacing any existing one.
    ///
    /// Returns the artifact path.
    ///
    /// # Errors
    /// Returns a [`CacheError`] when the directory, temporary file or final
    /// artifact cannot be written.
    pub fn store<T: CachedTable>(
        &self,
        source: &Utf8Path,
        table: &T,
    ) -> Result<Utf8PathBuf, CacheError> {
        let artifact = self.artifact_path(source);
        ensure_parent_dir(&artifact).map_err(|err| CacheError::CreateParent {
            path: artifact
                .parent()
                .map_or_else(|| artifact.clone(), Utf8Path::to_path_buf),
            source: err,
        })?;
        let staging_dir = match artifact.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(staging_dir).map_err(|err| CacheError::Write {
            path: artifact.clone(),
            source: err,
        })?;
        write_artifact(staged.as_file_mut(), &artifact, table)?;
        staged.as_file().sync_all().map_err(|err| CacheError::Write {
            path: artifact.clone(),
            source: err,
        })?;
        if let Err(err) = staged.persist(&artifact) {
            let staged_path = err.file.path().display().to_string();
            if let Err(cleanup) = err.file.close() {
                warn!("failed to remove staged cache file {staged_path}: {cleanup}");
            }
            return Err(CacheError::Write {
                path: artifact,
                source: err.error,
            });
        }
        Ok(artifact)
    }

    /// Delete the artifact for `source`, forcing the next load to rebuild.
    ///
    /// Returns `true` when an artifact was removed.
    ///
    /// # Errors
    /// Returns [`CacheError::Remove`] when an existing artifact cannot be
    /// deleted.
    pub fn invalidate(&self, source: &Utf8Path) -> Result<bool, CacheError> {
        let artifact = self.artifact_path(source);
        let removed = remove_file_if_exists(&artifact).map_err(|err| CacheError::Remove {
            path: artifact.clone(),
            source: err,
        })?;
        if removed {
            info!("removed cache artifact {artifact}");
        }
        Ok(removed)
    }

    /// Load the street table for the extract at `path`.
    ///
    /// # Errors
    /// See [`CacheStore::load_or_build`].
    pub fn load_street_table(&self, path: &Utf8Path) -> Result<ReferenceStreetTable, LoadError> {
        self.load_or_build(path, parse_streets)
    }

    /// Load the house-number table for the extract at `path`.
    ///
    /// # Errors
    /// See [`CacheStore::load_or_build`].
    pub fn load_house_number_table(
        &self,
        path: &Utf8Path,
    ) -> Result<ReferenceHouseNumberTable, LoadError> {
        self.load_or_build(path, parse_house_numbers)
    }

    /// Load one house-number table per extract, in the order given.
    ///
    /// # Errors
    /// Stops at the first extract that fails; see
    /// [`CacheStore::load_or_build`].
    pub fn load_house_number_tables<P: AsRef<Utf8Path>>(
        &self,
        paths: &[P],
    ) -> Result<Vec<ReferenceHouseNumberTable>, LoadError> {
        paths
            .iter()
            .map(|path| self.load_house_number_table(path.as_ref()))
            .collect()
    }
}

/// [`CacheStore::load_or_build`] with the default store.
///
/// # Errors
/// See [`CacheStore::load_or_build`].
pub fn load_or_build<T, F>(source: &Utf8Path, builder: F) -> Result<T, LoadError>
where
    T: CachedTable,
    F: FnOnce(&Utf8Path) -> Result<T, ReferenceError>,
{
    CacheStore::default().load_or_build(source, builder)
}

fn write_artifact<T: CachedTable>(
    file: &mut std::fs::File,
    artifact: &Utf8Path,
    table: &T,
) -> Result<(), CacheError> {
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, &CacheHeader::for_kind(T::KIND))
        .and_then(|()| bincode::serialize_into(&mut writer, table))
        .map_err(|err| CacheError::Encode {
            path: artifact.to_path_buf(),
            source: err,
        })?;
    writer.flush().map_err(|err| CacheError::Write {
        path: artifact.to_path_buf(),
        source: err,
    })
}

fn decode_error(artifact: &Utf8Path, err: bincode::Error) -> CacheError {
    let path = artifact.to_path_buf();
    match *err {
        bincode::ErrorKind::Io(source) if source.kind() == io::ErrorKind::UnexpectedEof => {
            CacheError::Truncated { path }
        }
        bincode::ErrorKind::Io(source) => CacheError::Read { path, source },
        other => CacheError::Decode {
            path,
            source: Box::new(other),
        },
    }
}
