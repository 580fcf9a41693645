//! Canonical settlement keys.
//!
//! Imported addresses name their settlement inconsistently: sometimes with
//! the registry's canonical name, sometimes with an abbreviation or a
//! district name that only makes sense next to a postcode. The settlement key
//! is the join key between the two worlds.

use std::collections::BTreeSet;

/// Separator between the postcode and city parts of a composite key.
pub const COMPOSITE_SEPARATOR: char = '_';

const ESCAPE: char = '\\';

/// Derive the settlement key for a `postcode`/`city` pair.
///
/// A city the registry knows is its own key. Anything else becomes a
/// composite of the postcode and the city. The postcode part is escaped so
/// that the first unescaped separator always marks the boundary, which keeps
/// composites of distinct pairs distinct.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use refcheck_core::settlement_key;
///
/// let known = BTreeSet::from(["Budapest".to_owned()]);
/// assert_eq!(settlement_key("1011", "Budapest", &known), "Budapest");
/// assert_eq!(settlement_key("1011", "Bp", &known), "1011_Bp");
/// ```
#[must_use]
pub fn settlement_key(postcode: &str, city: &str, known_settlements: &BTreeSet<String>) -> String {
    if known_settlements.contains(city) {
        return city.to_owned();
    }
    let mut key = String::with_capacity(postcode.len() + city.len() + 1);
    for character in postcode.chars() {
        if character == ESCAPE || character == COMPOSITE_SEPARATOR {
            key.push(ESCAPE);
        }
        key.push(character);
    }
    key.push(COMPOSITE_SEPARATOR);
    key.push_str(city);
    key
}
