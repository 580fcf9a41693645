//! Reference-declared house-number ranges and the range reconciler.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::house_number::{HouseNumber, Parity};

/// Which numbers inside a range's bounds the range covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RangeParity {
    /// Only even magnitudes.
    Even,
    /// Only odd magnitudes.
    Odd,
    /// Every magnitude.
    #[default]
    All,
}

impl RangeParity {
    /// Report whether numbers of `parity` satisfy this constraint.
    #[must_use]
    pub const fn admits(self, parity: Parity) -> bool {
        matches!(
            (self, parity),
            (Self::All, _) | (Self::Even, Parity::Even) | (Self::Odd, Parity::Odd)
        )
    }
}

impl From<Parity> for RangeParity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::Even => Self::Even,
            Parity::Odd => Self::Odd,
        }
    }
}

/// Errors returned by [`HouseNumberRange::new`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum HouseNumberRangeError {
    /// The lower bound exceeds the upper bound.
    #[error("house number range start {start} is greater than its end {end}")]
    Inverted {
        /// Declared lower bound.
        start: u64,
        /// Declared upper bound.
        end: u64,
    },
}

/// An inclusive interval of house numbers with a parity constraint.
///
/// # Examples
/// ```
/// use refcheck_core::{HouseNumber, HouseNumberRange, RangeParity};
///
/// # fn main() -> Result<(), refcheck_core::HouseNumberRangeError> {
/// let range = HouseNumberRange::new(2, 10, RangeParity::Even)?;
/// assert!(range.contains(&HouseNumber::new("4")));
/// assert!(!range.contains(&HouseNumber::new("5")));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RangeBounds"))]
pub struct HouseNumberRange {
    start: u64,
    end: u64,
    parity: RangeParity,
}

/// Unvalidated wire form of [`HouseNumberRange`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RangeBounds {
    start: u64,
    end: u64,
    parity: RangeParity,
}

#[cfg(feature = "serde")]
impl TryFrom<RangeBounds> for HouseNumberRange {
    type Error = HouseNumberRangeError;

    fn try_from(bounds: RangeBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.start, bounds.end, bounds.parity)
    }
}

impl HouseNumberRange {
    /// Validate and construct a range.
    pub const fn new(
        start: u64,
        end: u64,
        parity: RangeParity,
    ) -> Result<Self, HouseNumberRangeError> {
        if start > end {
            return Err(HouseNumberRangeError::Inverted { start, end });
        }
        Ok(Self { start, end, parity })
    }

    /// Construct a range the way street segments are usually declared: only
    /// the start's side of the street, unless `interpolate_all` is set.
    ///
    /// # Examples
    /// ```
    /// use refcheck_core::{HouseNumberRange, RangeParity};
    ///
    /// # fn main() -> Result<(), refcheck_core::HouseNumberRangeError> {
    /// let odd_side = HouseNumberRange::from_bounds(1, 23, false)?;
    /// assert_eq!(odd_side.parity(), RangeParity::Odd);
    /// let both_sides = HouseNumberRange::from_bounds(1, 23, true)?;
    /// assert_eq!(both_sides.parity(), RangeParity::All);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_bounds(
        start: u64,
        end: u64,
        interpolate_all: bool,
    ) -> Result<Self, HouseNumberRangeError> {
        let parity = if interpolate_all {
            RangeParity::All
        } else {
            RangeParity::from(Parity::of(start))
        };
        Self::new(start, end, parity)
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// Inclusive upper bound.
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.end
    }

    /// Parity constraint.
    #[must_use]
    pub const fn parity(&self) -> RangeParity {
        self.parity
    }

    /// Report whether `magnitude` lies inside the bounds with an admitted
    /// parity.
    #[must_use]
    pub const fn contains_magnitude(&self, magnitude: u64) -> bool {
        self.start <= magnitude
            && magnitude <= self.end
            && self.parity.admits(Parity::of(magnitude))
    }

    /// Report whether `house_number` falls inside this range.
    #[must_use]
    pub const fn contains(&self, house_number: &HouseNumber) -> bool {
        self.contains_magnitude(house_number.magnitude())
    }
}

impl fmt::Display for HouseNumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parity {
            RangeParity::All => write!(f, "{}-{}", self.start, self.end),
            RangeParity::Even => write!(f, "{}-{} (even)", self.start, self.end),
            RangeParity::Odd => write!(f, "{}-{} (odd)", self.start, self.end),
        }
    }
}

/// Find the covering reference range for each house number.
///
/// The output is parallel to `house_numbers`. The first range in declaration
/// order that contains a number wins, even when a narrower range declared
/// later also contains it. `None` means the number lies outside every
/// declared range.
///
/// # Examples
/// ```
/// use refcheck_core::{HouseNumber, HouseNumberRange, RangeParity, ranges_for};
///
/// # fn main() -> Result<(), refcheck_core::HouseNumberRangeError> {
/// let even = HouseNumberRange::new(2, 10, RangeParity::Even)?;
/// let numbers = [HouseNumber::new("4"), HouseNumber::new("5")];
/// assert_eq!(ranges_for(&numbers, &[even]), vec![Some(even), None]);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn ranges_for(
    house_numbers: &[HouseNumber],
    reference_ranges: &[HouseNumberRange],
) -> Vec<Option<HouseNumberRange>> {
    house_numbers
        .iter()
        .map(|house_number| {
            reference_ranges
                .iter()
                .find(|range| range.contains(house_number))
                .copied()
        })
        .collect()
}
