//! Set differences between imported and reference data.
//!
//! The [`Differ`] owns no state beyond its [`Collator`]: it takes two
//! collections, computes the difference in both directions and orders the
//! results for presentation. House-number differences are additionally split
//! into odd and even groups, because the two sides of a street are usually
//! surveyed separately.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    collation::Collator,
    house_number::{HouseNumber, Parity},
    range::{HouseNumberRange, ranges_for},
};

/// Locale-ordered two-way difference of two string sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Diff {
    /// Present in the reference but absent from the import.
    pub only_in_reference: Vec<String>,
    /// Present in the import but absent from the reference.
    pub only_in_imported: Vec<String>,
}

/// House numbers partitioned by the parity of their magnitude.
///
/// Each group is ordered by magnitude, then by suffix in collation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParityGroups {
    /// Odd magnitudes.
    pub odd: Vec<String>,
    /// Even magnitudes, including non-numeric tokens (magnitude `0`).
    pub even: Vec<String>,
}

impl ParityGroups {
    /// Partition and order `house_numbers`.
    #[must_use]
    pub fn partition(house_numbers: Vec<HouseNumber>, collator: &Collator) -> Self {
        let (mut even, mut odd): (Vec<HouseNumber>, Vec<HouseNumber>) = house_numbers
            .into_iter()
            .partition(|number| number.parity() == Parity::Even);
        even.sort_by_cached_key(|number| number.sort_key(collator));
        odd.sort_by_cached_key(|number| number.sort_key(collator));
        Self {
            odd: odd.iter().map(ToString::to_string).collect(),
            even: even.iter().map(ToString::to_string).collect(),
        }
    }

    /// Report whether both groups are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.odd.is_empty() && self.even.is_empty()
    }

    /// Total number of house numbers across both groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.odd.len() + self.even.len()
    }

    /// One `", "`-joined line per non-empty group, odd side first.
    ///
    /// # Examples
    /// ```
    /// use refcheck_core::ParityGroups;
    ///
    /// let groups = ParityGroups {
    ///     odd: vec!["1".into(), "3".into()],
    ///     even: vec!["2".into()],
    /// };
    /// assert_eq!(groups.to_lines(), vec!["1, 3", "2"]);
    /// ```
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        [&self.odd, &self.even]
            .into_iter()
            .filter(|group| !group.is_empty())
            .map(|group| group.join(", "))
            .collect()
    }

    /// Iterate over every house number, odd side first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.odd.iter().chain(&self.even).map(String::as_str)
    }
}

/// Two-way house-number difference with parity grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HouseNumberDiff {
    /// Listed by the reference but missing from the import.
    pub only_in_reference: ParityGroups,
    /// Present in the import but not listed by the reference.
    pub only_in_imported: ParityGroups,
}

/// An imported-only house number with the reference range covering it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RangeAnnotation {
    /// The imported house number as written.
    pub house_number: String,
    /// First declared range containing it, if any.
    pub range: Option<HouseNumberRange>,
}

/// Result of reconciling one street.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StreetReconciliation {
    /// Listed-number difference.
    pub house_numbers: HouseNumberDiff,
    /// Range annotations for each imported-only number, in presentation
    /// order.
    pub imported_ranges: Vec<RangeAnnotation>,
}

/// Computes ordered differences with a fixed collator.
///
/// # Examples
/// ```
/// use refcheck_core::Differ;
///
/// let differ = Differ::default();
/// let result = differ.diff_house_numbers(["2", "4"], ["2", "4", "6", "8"]);
/// assert_eq!(result.only_in_reference.even, vec!["6", "8"]);
/// assert!(result.only_in_imported.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Differ {
    collator: Collator,
}

impl Differ {
    /// Construct a differ that orders results with `collator`.
    #[must_use]
    pub const fn new(collator: Collator) -> Self {
        Self { collator }
    }

    /// The collator used for ordering.
    #[must_use]
    pub const fn collator(&self) -> &Collator {
        &self.collator
    }

    /// Two-way difference, each side in collation order.
    #[must_use]
    pub fn diff<I, R>(&self, imported: I, reference: R) -> Diff
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        let (only_in_reference, only_in_imported) = set_difference(imported, reference);
        Diff {
            only_in_reference: self.sorted(only_in_reference),
            only_in_imported: self.sorted(only_in_imported),
        }
    }

    /// Two-way house-number difference, grouped by parity.
    #[must_use]
    pub fn diff_house_numbers<I, R>(&self, imported: I, reference: R) -> HouseNumberDiff
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        let (only_in_reference, only_in_imported) = set_difference(imported, reference);
        HouseNumberDiff {
            only_in_reference: self.group(only_in_reference),
            only_in_imported: self.group(only_in_imported),
        }
    }

    /// Reconcile one street: the listed-number difference plus, for every
    /// imported-only number, the declared range that covers it.
    ///
    /// # Examples
    /// ```
    /// use refcheck_core::{Differ, HouseNumberRange, RangeParity};
    ///
    /// # fn main() -> Result<(), refcheck_core::HouseNumberRangeError> {
    /// let even = HouseNumberRange::new(2, 20, RangeParity::Even)?;
    /// let result = Differ::default().reconcile_street(&["2", "4"], &[even], &["2", "12", "13"]);
    /// assert_eq!(result.house_numbers.only_in_imported.even, vec!["12"]);
    /// assert_eq!(result.imported_ranges[0].house_number, "13");
    /// assert_eq!(result.imported_ranges[0].range, None);
    /// assert_eq!(result.imported_ranges[1].range, Some(even));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn reconcile_street<S: AsRef<str>, T: AsRef<str>>(
        &self,
        reference_numbers: &[S],
        reference_ranges: &[HouseNumberRange],
        imported_numbers: &[T],
    ) -> StreetReconciliation {
        let house_numbers = self.diff_house_numbers(imported_numbers, reference_numbers);
        let extra: Vec<HouseNumber> = house_numbers
            .only_in_imported
            .iter()
            .map(HouseNumber::new)
            .collect();
        let imported_ranges = extra
            .iter()
            .zip(ranges_for(&extra, reference_ranges))
            .map(|(number, range)| RangeAnnotation {
                house_number: number.raw().to_owned(),
                range,
            })
            .collect();
        StreetReconciliation {
            house_numbers,
            imported_ranges,
        }
    }

    fn sorted(&self, items: BTreeSet<String>) -> Vec<String> {
        let mut ordered: Vec<String> = items.into_iter().collect();
        self.collator.sort(&mut ordered);
        ordered
    }

    fn group(&self, items: BTreeSet<String>) -> ParityGroups {
        let numbers = items.into_iter().map(HouseNumber::new).collect();
        ParityGroups::partition(numbers, &self.collator)
    }
}

/// Two-way difference with the default (Hungarian) collator.
///
/// # Examples
/// ```
/// use refcheck_core::diff;
///
/// let result = diff(["Fő utca", "Új utca"], ["Fő utca", "Ady utca"]);
/// assert_eq!(result.only_in_reference, vec!["Ady utca"]);
/// assert_eq!(result.only_in_imported, vec!["Új utca"]);
/// ```
#[must_use]
pub fn diff<I, R>(imported: I, reference: R) -> Diff
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    R: IntoIterator,
    R::Item: AsRef<str>,
{
    Differ::default().diff(imported, reference)
}

/// Street-name difference ordered by an explicit `collator`.
///
/// # Examples
/// ```
/// use refcheck_core::{Collator, diff_streets};
///
/// let result = diff_streets(["Zöld utca"], ["Zöld utca", "Csokonai utca", "Cukor utca"], Collator::hungarian());
/// assert_eq!(result.only_in_reference, vec!["Cukor utca", "Csokonai utca"]);
/// ```
#[must_use]
pub fn diff_streets<I, R>(imported: I, reference: R, collator: Collator) -> Diff
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    R: IntoIterator,
    R::Item: AsRef<str>,
{
    Differ::new(collator).diff(imported, reference)
}

fn set_difference<I, R>(imported: I, reference: R) -> (BTreeSet<String>, BTreeSet<String>)
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    R: IntoIterator,
    R::Item: AsRef<str>,
{
    let imported_set = to_set(imported);
    let reference_set = to_set(reference);
    let only_in_reference = reference_set.difference(&imported_set).cloned().collect();
    let only_in_imported = imported_set.difference(&reference_set).cloned().collect();
    (only_in_reference, only_in_imported)
}

fn to_set<I>(items: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().to_owned())
        .collect()
}
