//! Facade crate for the refcheck reference reconciliation engine.
//!
//! This crate re-exports the core domain types and, behind the `cache`
//! feature, the reference parser and cache store.
//!
//! ```
//! use refcheck::Differ;
//!
//! let result = Differ::default().diff_house_numbers(["2", "4"], ["2", "4", "6", "8"]);
//! assert_eq!(result.only_in_reference.even, vec!["6", "8"]);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use refcheck_core::{
    COMPOSITE_SEPARATOR, Collator, Diff, Differ, EXCEPTION_MARKER, HouseNumber, HouseNumberDiff,
    HouseNumberRange, HouseNumberRangeError, Parity, ParityGroups, RangeAnnotation, RangeParity,
    ReferenceHouseNumberTable, ReferenceStreetTable, SortKey, StreetReconciliation, Tailoring,
    UnknownTailoringError, diff, diff_streets, ranges_for, settlement_key, sort_key,
    split_house_number,
};

#[cfg(feature = "cache")]
pub use refcheck_data::{
    CacheError, CacheStore, CachedTable, LoadError, ReferenceError, TableKind, load_or_build,
    parse_house_numbers, parse_streets,
};
