//! Which prop names are safe to forward to a DOM element.
//!
//! Props a styled component reads for dynamic CSS are destructured out of
//! the forwarded rest unless they are real HTML attributes. The canonical
//! set here is the global attributes plus `data-*`, `aria-*` and event
//! handlers; element-specific attributes are treated as style props.

const GLOBAL_ATTRIBUTES: &[&str] = &[
    "accesskey",
    "autocapitalize",
    "autofocus",
    "class",
    "classname",
    "contenteditable",
    "dir",
    "draggable",
    "enterkeyhint",
    "hidden",
    "id",
    "inert",
    "inputmode",
    "is",
    "itemid",
    "itemprop",
    "itemref",
    "itemscope",
    "itemtype",
    "lang",
    "nonce",
    "part",
    "popover",
    "role",
    "slot",
    "spellcheck",
    "style",
    "tabindex",
    "title",
    "translate",
];

pub fn is_valid_attribute(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    if lower.starts_with("data-") || lower.starts_with("aria-") {
        return true;
    }
    if lower.starts_with("on") && lower.len() > 2 {
        return true;
    }
    GLOBAL_ATTRIBUTES.binary_search(&lower.as_str()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        let mut sorted = GLOBAL_ATTRIBUTES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, GLOBAL_ATTRIBUTES);
    }

    #[test]
    fn test_global_and_prefixed_names() {
        assert!(is_valid_attribute("id"));
        assert!(is_valid_attribute("tabIndex"));
        assert!(is_valid_attribute("data-testid"));
        assert!(is_valid_attribute("aria-label"));
        assert!(is_valid_attribute("onClick"));
    }

    #[test]
    fn test_style_props_are_not_attributes() {
        assert!(!is_valid_attribute("size"));
        assert!(!is_valid_attribute("primary"));
        assert!(!is_valid_attribute("variant"));
    }
}
