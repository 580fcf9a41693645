//! Core domain types for the refcheck reconciliation engine.
//!
//! The crate holds everything that is pure computation:
//! - [`split_house_number`] and [`HouseNumber`] tokenize house numbers into a
//!   numeric magnitude and a suffix.
//! - [`Collator`] and [`settlement_key`] derive ordering and join keys.
//! - [`HouseNumberRange`] and [`ranges_for`] reconcile numbers against
//!   reference-declared ranges.
//! - [`Differ`] composes the above into ordered, parity-grouped differences.
//! - [`ReferenceStreetTable`] and [`ReferenceHouseNumberTable`] are the nested
//!   reference tables produced by the data crate.
//!
//! No function here performs I/O.

#![forbid(unsafe_code)]

pub mod collation;
pub mod diff;
pub mod house_number;
pub mod range;
pub mod settlement;
pub mod table;

pub use collation::{Collator, SortKey, Tailoring, UnknownTailoringError, sort_key};
pub use diff::{
    Diff, Differ, HouseNumberDiff, ParityGroups, RangeAnnotation, StreetReconciliation, diff,
    diff_streets,
};
pub use house_number::{EXCEPTION_MARKER, HouseNumber, Parity, split_house_number};
pub use range::{HouseNumberRange, HouseNumberRangeError, RangeParity, ranges_for};
pub use settlement::{COMPOSITE_SEPARATOR, settlement_key};
pub use table::{ReferenceHouseNumberTable, ReferenceStreetTable};
