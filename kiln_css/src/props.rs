//! Property-name normalisation and the unit auto-suffix policy.

/// Properties whose numeric values are conventionally unitless. Numbers on
/// any other property are suffixed with `px`.
pub const UNITLESS: &[&str] = &[
    "-webkit-line-clamp",
    "animation-iteration-count",
    "border-image-outset",
    "border-image-slice",
    "border-image-width",
    "column-count",
    "columns",
    "fill-opacity",
    "flex",
    "flex-grow",
    "flex-negative",
    "flex-order",
    "flex-positive",
    "flex-shrink",
    "flood-opacity",
    "font-weight",
    "grid-area",
    "grid-column",
    "grid-column-end",
    "grid-column-span",
    "grid-column-start",
    "grid-row",
    "grid-row-end",
    "grid-row-span",
    "grid-row-start",
    "line-clamp",
    "line-height",
    "opacity",
    "order",
    "orphans",
    "stop-opacity",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "tab-size",
    "widows",
    "z-index",
    "zoom",
];

pub fn is_unitless(property: &str) -> bool {
    UNITLESS.binary_search(&property).is_ok()
}

/// Converts a camelCase style key to its kebab-case CSS property name.
/// Vendor-prefixed keys follow the DOM convention: a leading upper-case
/// letter (`WebkitLineClamp`) or `ms` prefix maps to a leading hyphen.
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    if key.starts_with("ms") && key[2..].starts_with(|c: char| c.is_ascii_uppercase()) {
        out.push_str("-ms");
        push_kebab(&mut out, &key[2..]);
        return out;
    }
    push_kebab(&mut out, key);
    out
}

fn push_kebab(out: &mut String, key: &str) {
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
}

/// Appends `px` to a bare numeric value unless the property is unitless or
/// a custom property. Values that already carry a unit parse as non-numeric
/// and come back untouched, so suffixing is idempotent.
pub fn with_px(property: &str, value: &str) -> String {
    if property.starts_with("--") || is_unitless(property) {
        return value.to_string();
    }
    if value.parse::<f64>().is_ok() {
        return format!("{}px", value);
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unitless_table_is_sorted() {
        let mut sorted = UNITLESS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, UNITLESS);
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("fontSize"), "font-size");
        assert_eq!(kebab_case("color"), "color");
        assert_eq!(kebab_case("WebkitLineClamp"), "-webkit-line-clamp");
        assert_eq!(kebab_case("msGridRow"), "-ms-grid-row");
        assert_eq!(kebab_case("borderTopLeftRadius"), "border-top-left-radius");
    }

    #[test]
    fn test_px_policy() {
        assert_eq!(with_px("font-size", "20"), "20px");
        assert_eq!(with_px("line-height", "1.5"), "1.5");
        assert_eq!(with_px("z-index", "10"), "10");
        assert_eq!(with_px("width", "50%"), "50%");
        assert_eq!(with_px("--depth", "3"), "3");
    }

    #[test]
    fn test_px_is_idempotent() {
        let once = with_px("margin-top", "8");
        assert_eq!(with_px("margin-top", &once), once);
    }
}
