//! Nested reference tables keyed by region and settlement codes.
//!
//! Both tables are pure values. Keys are unique per level and kept in sorted
//! order so serialised artefacts are deterministic; the innermost sequences
//! keep source-file order.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

type Settlements<T> = BTreeMap<String, T>;

/// Streets grouped by region code, then settlement code.
///
/// # Examples
/// ```
/// use refcheck_core::ReferenceStreetTable;
///
/// let mut table = ReferenceStreetTable::new();
/// table.insert("01", "001", "Main St".to_owned());
/// assert_eq!(table.streets("01", "001"), ["Main St"]);
/// assert!(table.streets("01", "002").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferenceStreetTable {
    regions: BTreeMap<String, Settlements<Vec<String>>>,
}

impl ReferenceStreetTable {
    /// Construct an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }

    /// Append `street` to the settlement's list, creating levels as needed.
    pub fn insert(&mut self, region: &str, settlement: &str, street: String) {
        self.regions
            .entry(region.to_owned())
            .or_default()
            .entry(settlement.to_owned())
            .or_default()
            .push(street);
    }

    /// Streets of a settlement in source order; empty when unknown.
    #[must_use]
    pub fn streets(&self, region: &str, settlement: &str) -> &[String] {
        self.regions
            .get(region)
            .and_then(|settlements| settlements.get(settlement))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Region codes in sorted order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    /// Settlement codes of `region` in sorted order.
    pub fn settlements(&self, region: &str) -> impl Iterator<Item = &str> {
        self.regions
            .get(region)
            .into_iter()
            .flat_map(|settlements| settlements.keys().map(String::as_str))
    }

    /// Total number of stored street entries.
    #[must_use]
    pub fn street_count(&self) -> usize {
        self.regions
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Report whether the table holds no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Raw house numbers grouped by region, settlement and street.
///
/// House numbers are stored unsplit; tokenizing happens at comparison time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferenceHouseNumberTable {
    regions: BTreeMap<String, Settlements<BTreeMap<String, Vec<String>>>>,
}

impl ReferenceHouseNumberTable {
    /// Construct an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }

    /// Append `house_number` to the street's list, creating levels as needed.
    pub fn insert(&mut self, region: &str, settlement: &str, street: &str, house_number: String) {
        self.regions
            .entry(region.to_owned())
            .or_default()
            .entry(settlement.to_owned())
            .or_default()
            .entry(street.to_owned())
            .or_default()
            .push(house_number);
    }

    /// House numbers of a street in source order; empty when unknown.
    #[must_use]
    pub fn house_numbers(&self, region: &str, settlement: &str, street: &str) -> &[String] {
        self.regions
            .get(region)
            .and_then(|settlements| settlements.get(settlement))
            .and_then(|streets| streets.get(street))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Streets of a settlement that have house numbers, in sorted order.
    pub fn streets(&self, region: &str, settlement: &str) -> impl Iterator<Item = &str> {
        self.regions
            .get(region)
            .and_then(|settlements| settlements.get(settlement))
            .into_iter()
            .flat_map(|streets| streets.keys().map(String::as_str))
    }

    /// Region codes in sorted order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    /// Total number of stored house-number entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.regions
            .values()
            .flat_map(BTreeMap::values)
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Report whether the table holds no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
