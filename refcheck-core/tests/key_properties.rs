//! Property tests for the tokenizer and the settlement key deriver.

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use refcheck_core::{Collator, settlement_key, split_house_number};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Without leading zeros the magnitude and suffix reassemble the input.
    #[test]
    fn split_reassembles_input(raw in "[1-9][0-9]{0,17}([^0-9].*)?") {
        let (magnitude, suffix) = split_house_number(&raw);
        prop_assert_eq!(format!("{magnitude}{suffix}"), raw);
    }

    /// Inputs without a leading digit are all suffix.
    #[test]
    fn non_numeric_prefix_is_all_suffix(raw in "([^0-9].*)?") {
        prop_assert_eq!(split_house_number(&raw), (0, raw.as_str()));
    }

    /// Splitting never panics, whatever the input.
    #[test]
    fn split_is_total(raw in any::<String>()) {
        let (_, suffix) = split_house_number(&raw);
        prop_assert!(raw.ends_with(suffix));
    }

    /// Sort keys are deterministic and only equal for equal strings.
    #[test]
    fn sort_keys_identify_strings(left in any::<String>(), right in any::<String>()) {
        let collator = Collator::hungarian();
        prop_assert_eq!(collator.sort_key(&left), collator.sort_key(&left));
        prop_assert_eq!(
            collator.sort_key(&left) == collator.sort_key(&right),
            left == right
        );
    }

    /// Composite keys of distinct pairs never collide.
    #[test]
    fn composite_keys_are_injective(
        left in ("[0-9_\\\\]{0,5}", "[a-z_\\\\]{0,5}"),
        right in ("[0-9_\\\\]{0,5}", "[a-z_\\\\]{0,5}"),
    ) {
        let known = BTreeSet::new();
        let left_key = settlement_key(&left.0, &left.1, &known);
        let right_key = settlement_key(&right.0, &right.1, &known);
        prop_assert_eq!(left_key == right_key, left == right);
    }
}

#[test]
fn synthetic_postcode_city_pairs_do_not_collide() {
    let known = BTreeSet::from(["Budapest".to_owned(), "Szeged".to_owned()]);
    let cities = ["Bp", "Pest", "Buda", "Bp_1", "1_Bp", "Újpest", "Bp.", "Kőbánya"];
    let mut keys = HashSet::new();
    for code in 1000..1125_u32 {
        let postcode = code.to_string();
        for city in cities {
            let key = settlement_key(&postcode, city, &known);
            assert!(keys.insert(key.clone()), "collision on {key}");
        }
    }
    assert_eq!(keys.len(), 1000);
}
