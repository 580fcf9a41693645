//! Behavioural coverage for reference parsing and cache reuse.

use std::cell::RefCell;

use camino::{Utf8Path, Utf8PathBuf};
use refcheck_core::ReferenceStreetTable;
use refcheck_data::{CacheStore, LoadError, ReferenceError};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

const HEADER: &str = "megye\ttelepules\tutcanev\n";

type LoadOutcome = Result<ReferenceStreetTable, LoadError>;

#[derive(Debug)]
struct CacheWorld {
    dir: TempDir,
    store: CacheStore,
    outcomes: RefCell<Vec<LoadOutcome>>,
}

impl CacheWorld {
    fn root(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().to_path_buf())
            .unwrap_or_else(|path| panic!("temp dir {path:?} is not UTF-8"))
    }

    fn extract(&self) -> Utf8PathBuf {
        self.root().join("streets.tsv")
    }

    fn write_extract(&self, body: &str) {
        write(&self.extract(), &format!("{HEADER}{body}"));
    }

    fn last_outcome<T>(&self, inspect: impl FnOnce(&LoadOutcome) -> T) -> T {
        let outcomes = self.outcomes.borrow();
        let outcome = outcomes
            .last()
            .unwrap_or_else(|| panic!("the street table must be loaded first"));
        inspect(outcome)
    }
}

#[fixture]
fn world() -> CacheWorld {
    CacheWorld {
        dir: TempDir::new().unwrap_or_else(|err| panic!("create temp dir: {err}")),
        store: CacheStore::default(),
        outcomes: RefCell::new(Vec::new()),
    }
}

fn write(path: &Utf8Path, contents: &str) {
    std::fs::write(path, contents).unwrap_or_else(|err| panic!("write {path}: {err}"));
}

fn load(world: &CacheWorld) {
    let outcome = world.store.load_street_table(&world.extract());
    world.outcomes.borrow_mut().push(outcome);
}

#[given("a street extract with the row 01, 001, Main St")]
fn given_main_street(world: &CacheWorld) {
    world.write_extract("01\t001\tMain St\n");
}

#[given("a street extract with the row 01, 011, Kossuth null")]
fn given_null_street(world: &CacheWorld) {
    world.write_extract("01\t011\tKossuth null\n");
}

#[given("a street extract with a two-field row on line 3")]
fn given_malformed_extract(world: &CacheWorld) {
    world.write_extract("01\t011\tAdy utca\n01\t011\n");
}

#[given("a corrupt cache artifact beside the street extract")]
fn given_corrupt_artifact(world: &CacheWorld) {
    write(&world.store.artifact_path(&world.extract()), "not a cache artifact");
}

#[when("I load the street table through the cache")]
fn when_load(world: &CacheWorld) {
    load(world);
}

#[when("I load the street table through the cache again")]
fn when_load_again(world: &CacheWorld) {
    load(world);
}

#[when("I delete the street extract")]
fn when_delete_extract(world: &CacheWorld) {
    let extract = world.extract();
    std::fs::remove_file(&extract).unwrap_or_else(|err| panic!("remove {extract}: {err}"));
}

#[then("the table holds exactly the street Main St in region 01 settlement 001")]
fn then_main_street(world: &CacheWorld) {
    world.last_outcome(|outcome| {
        let table = outcome
            .as_ref()
            .unwrap_or_else(|err| panic!("load should succeed: {err}"));
        assert_eq!(table.regions().collect::<Vec<_>>(), ["01"]);
        assert_eq!(table.settlements("01").collect::<Vec<_>>(), ["001"]);
        assert_eq!(table.streets("01", "001"), ["Main St"]);
    });
}

#[then("the table holds exactly the street Kossuth in region 01 settlement 011")]
fn then_kossuth(world: &CacheWorld) {
    world.last_outcome(|outcome| {
        let table = outcome
            .as_ref()
            .unwrap_or_else(|err| panic!("load should succeed: {err}"));
        assert_eq!(table.streets("01", "011"), ["Kossuth"]);
        assert_eq!(table.street_count(), 1);
    });
}

#[then("both loads return the same table")]
fn then_same_table(world: &CacheWorld) {
    let outcomes = world.outcomes.borrow();
    let tables: Vec<&ReferenceStreetTable> = outcomes
        .iter()
        .map(|outcome| {
            outcome
                .as_ref()
                .unwrap_or_else(|err| panic!("load should succeed: {err}"))
        })
        .collect();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables.first(), tables.last());
}

#[then("a corrupt cache error is returned")]
fn then_corrupt(world: &CacheWorld) {
    world.last_outcome(|outcome| match outcome {
        Err(LoadError::Cache(err)) => assert!(err.is_corrupt(), "unexpected error {err:?}"),
        other => panic!("expected a corrupt cache error, got {other:?}"),
    });
}

#[then("a malformed data error for line 3 is returned")]
fn then_malformed(world: &CacheWorld) {
    world.last_outcome(|outcome| match outcome {
        Err(LoadError::Reference(ReferenceError::Malformed {
            line,
            expected,
            found,
            ..
        })) => {
            assert_eq!(*line, 3);
            assert_eq!(*expected, 3);
            assert_eq!(*found, 2);
        }
        other => panic!("expected a malformed data error, got {other:?}"),
    });
}

#[then("no cache artifact is written")]
fn then_no_artifact(world: &CacheWorld) {
    assert!(!world.store.artifact_path(&world.extract()).exists());
}

#[scenario(path = "tests/features/reference_cache.feature", index = 0)]
fn single_row_extract(world: CacheWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/reference_cache.feature", index = 1)]
fn null_placeholder_stripped(world: CacheWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/reference_cache.feature", index = 2)]
fn cached_table_reused(world: CacheWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/reference_cache.feature", index = 3)]
fn corrupt_artifact_fails(world: CacheWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/reference_cache.feature", index = 4)]
fn malformed_row_reported(world: CacheWorld) {
    let _ = world;
}
