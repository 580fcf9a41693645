//! House-number tokens and their numeric/suffix split.
//!
//! Reference extracts and imported map data both spell house numbers as free
//! text: `12`, `12a`, `12/B`, `7*`, `2-6`. Comparison and presentation only
//! need two facts about such a token, the leading numeric magnitude and
//! whatever follows it, so [`split_house_number`] extracts exactly those.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collation::{Collator, SortKey};

/// Marker appended to a house number whose parity differs from its side of
/// the street.
pub const EXCEPTION_MARKER: char = '*';

/// Split `raw` into its leading decimal magnitude and the remaining suffix.
///
/// The magnitude is the longest leading run of ASCII digits. An empty run, or
/// one too long to fit a `u64`, yields a magnitude of `0`. The suffix is
/// returned verbatim, including whitespace and punctuation.
///
/// # Examples
/// ```
/// use refcheck_core::split_house_number;
///
/// assert_eq!(split_house_number("12a"), (12, "a"));
/// assert_eq!(split_house_number("abc"), (0, "abc"));
/// assert_eq!(split_house_number(""), (0, ""));
/// ```
#[must_use]
pub fn split_house_number(raw: &str) -> (u64, &str) {
    let digits_end = raw
        .find(|character: char| !character.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, suffix) = raw.split_at_checked(digits_end).unwrap_or((raw, ""));
    let magnitude = digits.parse::<u64>().unwrap_or(0);
    (magnitude, suffix)
}

/// Parity of a house number's numeric magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Parity {
    /// Magnitude divisible by two (including zero).
    Even,
    /// Magnitude not divisible by two.
    Odd,
}

impl Parity {
    /// Return the parity of `magnitude`.
    ///
    /// # Examples
    /// ```
    /// use refcheck_core::Parity;
    ///
    /// assert_eq!(Parity::of(4), Parity::Even);
    /// assert_eq!(Parity::of(7), Parity::Odd);
    /// ```
    #[must_use]
    pub const fn of(magnitude: u64) -> Self {
        if magnitude.is_multiple_of(2) {
            Self::Even
        } else {
            Self::Odd
        }
    }
}

/// A raw house-number token with its split parts.
///
/// Instances are immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HouseNumber {
    raw: String,
    magnitude: u64,
    suffix: String,
}

impl HouseNumber {
    /// Tokenize `token` into a [`HouseNumber`].
    ///
    /// # Examples
    /// ```
    /// use refcheck_core::HouseNumber;
    ///
    /// let number = HouseNumber::new("42/B");
    /// assert_eq!(number.magnitude(), 42);
    /// assert_eq!(number.suffix(), "/B");
    /// ```
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        let raw: String = token.into();
        let (magnitude, suffix) = split_house_number(&raw);
        let owned_suffix = suffix.to_owned();
        Self {
            raw,
            magnitude,
            suffix: owned_suffix,
        }
    }

    /// The token exactly as supplied.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Leading numeric magnitude, `0` when the token has no leading digits.
    #[must_use]
    pub const fn magnitude(&self) -> u64 {
        self.magnitude
    }

    /// Everything after the leading digit run.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Parity of the numeric magnitude.
    #[must_use]
    pub const fn parity(&self) -> Parity {
        Parity::of(self.magnitude)
    }

    /// Report whether the token carries the odd/even exception marker.
    #[must_use]
    pub fn is_exception(&self) -> bool {
        self.raw.ends_with(EXCEPTION_MARKER)
    }

    /// The token without a trailing exception marker, for display.
    ///
    /// # Examples
    /// ```
    /// use refcheck_core::HouseNumber;
    ///
    /// assert_eq!(HouseNumber::new("7*").display_text(), "7");
    /// assert_eq!(HouseNumber::new("7a").display_text(), "7a");
    /// ```
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.raw
            .strip_suffix(EXCEPTION_MARKER)
            .unwrap_or(&self.raw)
    }

    /// Ordering key: magnitude first, then the suffix in collation order.
    #[must_use]
    pub fn sort_key(&self, collator: &Collator) -> (u64, SortKey) {
        (self.magnitude, collator.sort_key(&self.suffix))
    }
}

impl fmt::Display for HouseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for HouseNumber {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for HouseNumber {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}
