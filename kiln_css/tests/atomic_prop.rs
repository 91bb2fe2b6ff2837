use kiln_css::atomize;
use kiln_css::props::with_px;
use proptest::prelude::*;

proptest! {
    // The class name assigned to a declaration depends only on the
    // (selector, property, value) triple, not on surrounding whitespace or
    // registry history.
    #[test]
    fn class_names_are_stable(
        prop in "[a-z]{2,12}",
        value in "[a-z0-9]{1,10}",
    ) {
        let spaced = atomize(&format!("{} : {} ;", prop, value));
        let tight = atomize(&format!("{}:{}", prop, value));
        prop_assert_eq!(spaced.class_names, tight.class_names);
        prop_assert_eq!(spaced.sheets, tight.sheets);
    }

    #[test]
    fn distinct_values_distinct_classes(
        prop in "[a-z]{2,12}",
        a in "[a-z]{1,8}",
        b in "[a-z]{1,8}",
    ) {
        prop_assume!(a != b);
        let left = atomize(&format!("{}:{}", prop, a));
        let right = atomize(&format!("{}:{}", prop, b));
        prop_assert_ne!(left.class_names, right.class_names);
    }

    // Suffixing is idempotent: once a value carries a unit it is left alone.
    #[test]
    fn px_suffix_is_idempotent(n in 0u32..100_000) {
        let once = with_px("width", &n.to_string());
        prop_assert!(once.ends_with("px"));
        prop_assert_eq!(with_px("width", &once), once);
    }

    #[test]
    fn unitless_properties_never_suffixed(n in 0u32..1000) {
        prop_assert_eq!(with_px("z-index", &n.to_string()), n.to_string());
        prop_assert_eq!(with_px("line-height", &n.to_string()), n.to_string());
    }
}
