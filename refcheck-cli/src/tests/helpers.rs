//! Test helpers that lay out reference extracts and imported lists on disk.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

pub(super) const STREETS_TSV: &str = "megye\ttelepules\tutcanev\n\
    01\t011\tKossuth utca\n\
    01\t011\tCsokonai utca\n\
    01\t011\tCukor utca\n\
    01\t011\tÁrpád utca null\n\
    01\t012\tFő tér\n";

pub(super) const HOUSE_NUMBERS_TSV: &str = "megye\ttelepules\tutcanev\thazszam\n\
    01\t011\tKossuth utca\t2\n\
    01\t011\tKossuth utca\t4\n\
    01\t011\tKossuth utca\t6\n\
    01\t011\tKossuth utca\t8\n\
    01\t011\tKossuth utca\t1\n\
    01\t011\tAdy utca\t3\n";

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path, contents).unwrap_or_else(|err| panic!("write {path}: {err}"));
}

/// Temporary workspace holding a street extract, a house-number extract and
/// any imported lists a test writes.
#[derive(Debug)]
pub(super) struct ReferenceWorkspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl ReferenceWorkspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        write_utf8(&root.join("streets.tsv"), STREETS_TSV.as_bytes());
        write_utf8(&root.join("housenumbers.tsv"), HOUSE_NUMBERS_TSV.as_bytes());
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn streets(&self) -> Utf8PathBuf {
        self.root.join("streets.tsv")
    }

    pub(super) fn house_numbers(&self) -> Utf8PathBuf {
        self.root.join("housenumbers.tsv")
    }

    /// Write an imported list, one entry per line, and return its path.
    pub(super) fn imported(&self, name: &str, entries: &[&str]) -> Utf8PathBuf {
        let path = self.root.join(name);
        let mut contents = entries.join("\n");
        contents.push('\n');
        write_utf8(&path, contents.as_bytes());
        path
    }
}
