//! Locale-aware collation keys for street and settlement names.
//!
//! Names must be listed in the order a local reader expects, which is not
//! code-point order: `Ábel utca` files next to `Abonyi utca`, and in Hungarian
//! `Csaba utca` follows every other `C...` name. [`Collator`] builds a
//! multi-level [`SortKey`]:
//!
//! 1. primary: letters of the tailored alphabet, digits, punctuation, spaces;
//! 2. secondary: accents (`a` before `á`, `ö` before `ő`);
//! 3. tertiary: case (lowercase first);
//! 4. identical: the code points themselves, so distinct strings never share
//!    a key.

use std::{cmp::Ordering, fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

const LEVEL_SEPARATOR: u32 = 0;
const SPACE_WEIGHT: u32 = 0x0000_0001;
const PUNCTUATION_BASE: u32 = 0x0100_0000;
const DIGIT_BASE: u32 = 0x0200_0000;
const LETTER_BASE: u32 = 0x0300_0000;
const OTHER_BASE: u32 = 0x0400_0000;
const ALPHABET_STRIDE: u32 = 0x10;

const ACUTE: u32 = 1;
const GRAVE: u32 = 2;
const CIRCUMFLEX: u32 = 3;
const DIAERESIS: u32 = 4;
const DOUBLE_ACUTE: u32 = 5;
const TILDE: u32 = 6;
const RING: u32 = 7;
const CEDILLA: u32 = 8;
const CARON: u32 = 9;
const DOT_ABOVE: u32 = 10;
const STROKE: u32 = 11;
const OGONEK: u32 = 12;
const BREVE: u32 = 13;
const MACRON: u32 = 14;

const HUNGARIAN_ALPHABET: [&str; 37] = [
    "a", "b", "c", "cs", "d", "dz", "dzs", "e", "f", "g", "gy", "h", "i", "j", "k", "l", "ly", "m",
    "n", "ny", "o", "ö", "p", "q", "r", "s", "sz", "t", "ty", "u", "ü", "v", "w", "x", "y", "z",
    "zs",
];

/// Multi-letter spellings of Hungarian letters: `(spelling, letter, repeat)`.
///
/// Longest spellings come first. Doubled digraphs (`ssz`) stand for the
/// digraph written twice.
const HUNGARIAN_CONTRACTIONS: [(&str, &str, usize); 18] = [
    ("ddzs", "dzs", 2),
    ("ccs", "cs", 2),
    ("ddz", "dz", 2),
    ("ggy", "gy", 2),
    ("lly", "ly", 2),
    ("nny", "ny", 2),
    ("ssz", "sz", 2),
    ("tty", "ty", 2),
    ("zzs", "zs", 2),
    ("dzs", "dzs", 1),
    ("cs", "cs", 1),
    ("dz", "dz", 1),
    ("gy", "gy", 1),
    ("ly", "ly", 1),
    ("ny", "ny", 1),
    ("sz", "sz", 1),
    ("ty", "ty", 1),
    ("zs", "zs", 1),
];

const LONGEST_CONTRACTION: usize = 4;

/// Alphabet tailoring applied on top of the accent and case levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Tailoring {
    /// Plain Latin `a`..`z`; accented letters sort with their base letter.
    Root,
    /// Hungarian alphabet with digraph letters and `ö`/`ü` as distinct letters.
    #[default]
    Hungarian,
}

impl Tailoring {
    /// Short identifier used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Hungarian => "hu",
        }
    }
}

impl fmt::Display for Tailoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`Tailoring`] identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown collation tailoring {name:?} (expected \"hu\" or \"root\")")]
pub struct UnknownTailoringError {
    /// The rejected identifier.
    pub name: String,
}

impl FromStr for Tailoring {
    type Err = UnknownTailoringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "root" => Ok(Self::Root),
            "hu" | "hu_hu" | "hu-hu" | "hungarian" => Ok(Self::Hungarian),
            _ => Err(UnknownTailoringError {
                name: value.to_owned(),
            }),
        }
    }
}

/// Opaque comparable key; ordering keys orders the source strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
    weights: Vec<u32>,
}

impl SortKey {
    fn from_elements(elements: &[Element], text: &str) -> Self {
        let mut weights = Vec::with_capacity(elements.len() * 3 + text.len() + 3);
        weights.extend(elements.iter().map(|element| element.primary));
        weights.push(LEVEL_SEPARATOR);
        weights.extend(elements.iter().map(|element| element.secondary));
        weights.push(LEVEL_SEPARATOR);
        weights.extend(elements.iter().map(|element| element.tertiary));
        weights.push(LEVEL_SEPARATOR);
        weights.extend(text.chars().map(u32::from));
        Self { weights }
    }
}

/// Builds [`SortKey`]s for a given tailoring.
///
/// # Examples
/// ```
/// use refcheck_core::Collator;
///
/// let collator = Collator::hungarian();
/// let mut streets = vec!["Csaba utca".to_owned(), "Cukor utca".to_owned()];
/// collator.sort(&mut streets);
/// assert_eq!(streets, vec!["Cukor utca", "Csaba utca"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Collator {
    tailoring: Tailoring,
}

impl Collator {
    /// Construct a collator for `tailoring`.
    #[must_use]
    pub const fn new(tailoring: Tailoring) -> Self {
        Self { tailoring }
    }

    /// Collator for the Hungarian reference registry.
    #[must_use]
    pub const fn hungarian() -> Self {
        Self::new(Tailoring::Hungarian)
    }

    /// Collator without alphabet tailoring.
    #[must_use]
    pub const fn root() -> Self {
        Self::new(Tailoring::Root)
    }

    /// The tailoring in effect.
    #[must_use]
    pub const fn tailoring(&self) -> Tailoring {
        self.tailoring
    }

    /// Derive the sort key for `text`. Total for any Unicode input.
    #[must_use]
    pub fn sort_key(&self, text: &str) -> SortKey {
        let folded: Vec<FoldedChar> = text.chars().map(FoldedChar::new).collect();
        let mut elements = Vec::with_capacity(folded.len());
        let mut position = 0;
        while let Some(current) = folded.get(position) {
            position += self.push_elements(&folded, position, *current, &mut elements);
        }
        SortKey::from_elements(&elements, text)
    }

    /// Compare two strings in collation order.
    #[must_use]
    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        self.sort_key(left).cmp(&self.sort_key(right))
    }

    /// Sort `items` in collation order.
    pub fn sort<S: AsRef<str>>(&self, items: &mut [S]) {
        items.sort_by_cached_key(|item| self.sort_key(item.as_ref()));
    }

    /// Push the collation elements starting at `position`, returning how many
    /// characters they consumed.
    fn push_elements(
        &self,
        folded: &[FoldedChar],
        position: usize,
        current: FoldedChar,
        out: &mut Vec<Element>,
    ) -> usize {
        let tertiary = u32::from(current.uppercase);
        if current.original.is_whitespace() {
            out.push(Element::new(SPACE_WEIGHT, 0, 0));
            return 1;
        }
        if let Some(digit) = current.original.to_digit(10) {
            out.push(Element::new(DIGIT_BASE + digit, 0, 0));
            return 1;
        }
        if !current.base.is_ascii_lowercase() {
            let primary = if current.original.is_alphanumeric() {
                OTHER_BASE + u32::from(current.lower)
            } else {
                PUNCTUATION_BASE + u32::from(current.original)
            };
            out.push(Element::new(primary, 0, tertiary));
            return 1;
        }

        match self.tailoring {
            Tailoring::Root => {
                out.push(Element::new(
                    latin_weight(current.base),
                    current.accent,
                    tertiary,
                ));
                1
            }
            Tailoring::Hungarian => {
                if let Some((letter, repeat, consumed)) = hungarian_contraction(folded, position) {
                    let primary = hungarian_weight(letter);
                    out.extend((0..repeat).map(|_| Element::new(primary, 0, tertiary)));
                    return consumed;
                }
                let (primary, secondary) = hungarian_letter(current);
                out.push(Element::new(primary, secondary, tertiary));
                1
            }
        }
    }
}

/// Derive a sort key with the default (Hungarian) collator.
///
/// # Examples
/// ```
/// use refcheck_core::sort_key;
///
/// assert!(sort_key("Ábel utca") < sort_key("Abonyi utca"));
/// ```
#[must_use]
pub fn sort_key(text: &str) -> SortKey {
    Collator::default().sort_key(text)
}

#[derive(Debug, Clone, Copy)]
struct Element {
    primary: u32,
    secondary: u32,
    tertiary: u32,
}

impl Element {
    const fn new(primary: u32, secondary: u32, tertiary: u32) -> Self {
        Self {
            primary,
            secondary,
            tertiary,
        }
    }
}

/// A character with its case removed and its accent split off.
#[derive(Debug, Clone, Copy)]
struct FoldedChar {
    original: char,
    lower: char,
    base: char,
    accent: u32,
    uppercase: bool,
}

impl FoldedChar {
    fn new(original: char) -> Self {
        let lower = original.to_lowercase().next().unwrap_or(original);
        let (base, accent) = fold_accent(lower);
        Self {
            original,
            lower,
            base,
            accent,
            uppercase: original.is_uppercase(),
        }
    }

    const fn is_plain_latin(self) -> bool {
        self.accent == 0 && self.base.is_ascii_lowercase()
    }
}

fn latin_weight(base: char) -> u32 {
    (1_u32..)
        .zip('a'..='z')
        .find(|(_, letter)| *letter == base)
        .map_or(OTHER_BASE + u32::from(base), |(rank, _)| {
            LETTER_BASE + rank * ALPHABET_STRIDE
        })
}

fn hungarian_weight(letter: &str) -> u32 {
    (1_u32..)
        .zip(HUNGARIAN_ALPHABET)
        .find(|(_, candidate)| *candidate == letter)
        .map_or(OTHER_BASE, |(rank, _)| LETTER_BASE + rank * ALPHABET_STRIDE)
}

/// Primary and secondary weights of a single Hungarian letter.
fn hungarian_letter(current: FoldedChar) -> (u32, u32) {
    match (current.base, current.accent) {
        ('o', DIAERESIS) => (hungarian_weight("ö"), 0),
        ('o', DOUBLE_ACUTE) => (hungarian_weight("ö"), DOUBLE_ACUTE),
        ('u', DIAERESIS) => (hungarian_weight("ü"), 0),
        ('u', DOUBLE_ACUTE) => (hungarian_weight("ü"), DOUBLE_ACUTE),
        (base, accent) => {
            let mut buffer = [0_u8; 4];
            (hungarian_weight(base.encode_utf8(&mut buffer)), accent)
        }
    }
}

/// Match a multi-letter Hungarian spelling at `position`.
///
/// Returns the letter, how many times it repeats and how many characters it
/// consumed.
fn hungarian_contraction(
    folded: &[FoldedChar],
    position: usize,
) -> Option<(&'static str, usize, usize)> {
    let plain: String = folded
        .iter()
        .skip(position)
        .take(LONGEST_CONTRACTION)
        .take_while(|candidate| candidate.is_plain_latin())
        .map(|candidate| candidate.base)
        .collect();
    HUNGARIAN_CONTRACTIONS
        .iter()
        .find(|(spelling, _, _)| plain.starts_with(spelling))
        .map(|&(spelling, letter, repeat)| (letter, repeat, spelling.len()))
}

/// Split a lowercase letter into its base letter and accent.
const fn fold_accent(lower: char) -> (char, u32) {
    match lower {
        'á' => ('a', ACUTE),
        'à' => ('a', GRAVE),
        'â' => ('a', CIRCUMFLEX),
        'ä' => ('a', DIAERESIS),
        'ã' => ('a', TILDE),
        'å' => ('a', RING),
        'ă' => ('a', BREVE),
        'ā' => ('a', MACRON),
        'ą' => ('a', OGONEK),
        'ç' => ('c', CEDILLA),
        'č' => ('c', CARON),
        'ć' => ('c', ACUTE),
        'ċ' => ('c', DOT_ABOVE),
        'ď' => ('d', CARON),
        'đ' => ('d', STROKE),
        'é' => ('e', ACUTE),
        'è' => ('e', GRAVE),
        'ê' => ('e', CIRCUMFLEX),
        'ë' => ('e', DIAERESIS),
        'ě' => ('e', CARON),
        'ė' => ('e', DOT_ABOVE),
        'ę' => ('e', OGONEK),
        'ē' => ('e', MACRON),
        'ğ' => ('g', BREVE),
        'ģ' => ('g', CEDILLA),
        'í' => ('i', ACUTE),
        'ì' => ('i', GRAVE),
        'î' => ('i', CIRCUMFLEX),
        'ï' => ('i', DIAERESIS),
        'ī' => ('i', MACRON),
        'į' => ('i', OGONEK),
        'ķ' => ('k', CEDILLA),
        'ĺ' => ('l', ACUTE),
        'ľ' => ('l', CARON),
        'ļ' => ('l', CEDILLA),
        'ł' => ('l', STROKE),
        'ñ' => ('n', TILDE),
        'ń' => ('n', ACUTE),
        'ň' => ('n', CARON),
        'ņ' => ('n', CEDILLA),
        'ó' => ('o', ACUTE),
        'ò' => ('o', GRAVE),
        'ô' => ('o', CIRCUMFLEX),
        'ö' => ('o', DIAERESIS),
        'ő' => ('o', DOUBLE_ACUTE),
        'õ' => ('o', TILDE),
        'ø' => ('o', STROKE),
        'ō' => ('o', MACRON),
        'ŕ' => ('r', ACUTE),
        'ř' => ('r', CARON),
        'ś' => ('s', ACUTE),
        'š' => ('s', CARON),
        'ş' | 'ș' => ('s', CEDILLA),
        'ť' => ('t', CARON),
        'ţ' | 'ț' => ('t', CEDILLA),
        'ú' => ('u', ACUTE),
        'ù' => ('u', GRAVE),
        'û' => ('u', CIRCUMFLEX),
        'ü' => ('u', DIAERESIS),
        'ű' => ('u', DOUBLE_ACUTE),
        'ů' => ('u', RING),
        'ū' => ('u', MACRON),
        'ų' => ('u', OGONEK),
        'ý' => ('y', ACUTE),
        'ÿ' => ('y', DIAERESIS),
        'ź' => ('z', ACUTE),
        'ž' => ('z', CARON),
        'ż' => ('z', DOT_ABOVE),
        other => (other, 0),
    }
}
