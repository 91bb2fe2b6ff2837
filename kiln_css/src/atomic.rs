//! Splits a raw CSS text block into atomic rules.
//!
//! The splitter is deliberately tolerant: it understands declarations,
//! nested selector blocks and at-rule blocks by tracking quotes, parens
//! and braces, and passes anything else through unchanged. Validating
//! property names or values is not its job.

use itertools::Itertools;
use kiln_hash::{hash_parts, hash_str};
use smallvec::{SmallVec, smallvec};

use crate::naming::ClassNames;

/// Output of atomizing one CSS block: distinct class names in source
/// order, and the rule strings to inject for them.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomizeResult {
    pub class_names: Vec<String>,
    pub sheets: Vec<String>,
}

/// Atomizes with a fresh class-name registry. Convenient for tests and
/// single-block callers.
pub fn atomize(css: &str) -> AtomizeResult {
    atomize_with(css, &mut ClassNames::new())
}

/// Atomizes against a shared registry so repeated declarations across one
/// module resolve to the same class name.
pub fn atomize_with(css: &str, names: &mut ClassNames) -> AtomizeResult {
    if css.trim().is_empty() {
        // An empty block still owns a stable class name, but injects nothing.
        let class = names.class_for(hash_parts(&["", "", ""]), hash_str(""));
        return AtomizeResult {
            class_names: vec![class],
            sheets: vec![],
        };
    }

    let mut rules = Vec::new();
    let root: SmallVec<[String; 2]> = smallvec![String::new()];
    process_block(css, &[], &root, names, &mut rules);

    let class_names = rules
        .iter()
        .filter_map(|rule| rule.class.clone())
        .unique()
        .collect();
    let sheets = rules.into_iter().map(|rule| rule.sheet).unique().collect();
    AtomizeResult {
        class_names,
        sheets,
    }
}

struct EmittedRule {
    class: Option<String>,
    sheet: String,
}

enum Segment<'a> {
    Declaration(&'a str),
    Block { prelude: &'a str, body: &'a str },
}

fn process_block(
    block: &str,
    at: &[String],
    suffixes: &SmallVec<[String; 2]>,
    names: &mut ClassNames,
    out: &mut Vec<EmittedRule>,
) {
    for segment in split_segments(block) {
        match segment {
            Segment::Declaration(text) => emit_declaration(text, at, suffixes, names, out),
            Segment::Block { prelude, body } => {
                let prelude = normalize_ws(prelude);
                if prelude.starts_with('@') {
                    let mut nested_at = at.to_vec();
                    nested_at.push(prelude);
                    process_block(body, &nested_at, suffixes, names, out);
                } else {
                    let mut nested: SmallVec<[String; 2]> = SmallVec::new();
                    for parent in suffixes {
                        for selector in prelude.split(',') {
                            nested.push(combine_selector(parent, selector.trim()));
                        }
                    }
                    process_block(body, at, &nested, names, out);
                }
            }
        }
    }
}

fn emit_declaration(
    text: &str,
    at: &[String],
    suffixes: &SmallVec<[String; 2]>,
    names: &mut ClassNames,
    out: &mut Vec<EmittedRule>,
) {
    let parsed = text.split_once(':').map(|(property, value)| {
        (normalize_ws(property), normalize_ws(value))
    });
    let (property, value) = match parsed {
        Some((property, value)) if !property.is_empty() && !value.is_empty() => (property, value),
        // Unparseable fragment: pass it through as its own rule, untouched.
        _ => {
            out.push(EmittedRule {
                class: None,
                sheet: wrap_at(at, text.trim()),
            });
            return;
        }
    };

    let at_key = at.join(" ");
    for suffix in suffixes {
        let group = hash_parts(&[&at_key, suffix, &property]);
        let class = names.class_for(group, hash_str(&value));
        let sheet = wrap_at(at, &format!(".{}{}{{{}:{}}}", class, suffix, property, value));
        out.push(EmittedRule {
            class: Some(class),
            sheet,
        });
    }
}

/// `&` in a nested selector stands for the parent slot; a bare pseudo or
/// attribute selector appends directly; anything else nests as a
/// descendant.
fn combine_selector(parent: &str, selector: &str) -> String {
    if selector.contains('&') {
        selector.replace('&', parent)
    } else if selector.starts_with(':') || selector.starts_with('[') {
        format!("{}{}", parent, selector)
    } else {
        format!("{} {}", parent, selector)
    }
}

fn wrap_at(at: &[String], inner: &str) -> String {
    let mut wrapped = inner.to_string();
    for prelude in at.iter().rev() {
        wrapped = format!("{}{{{}}}", prelude, wrapped);
    }
    wrapped
}

fn split_segments(input: &str) -> Vec<Segment<'_>> {
    let bytes = input.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;
    let mut paren_depth = 0i32;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = skip_quoted(bytes, i),
            b'(' => {
                paren_depth += 1;
                i += 1;
            }
            b')' => {
                paren_depth -= 1;
                i += 1;
            }
            b';' if paren_depth == 0 => {
                push_declaration(&input[start..i], &mut segments);
                i += 1;
                start = i;
            }
            b'{' if paren_depth == 0 => {
                let prelude = input[start..i].trim();
                let (body, end) = read_block(input, i);
                segments.push(Segment::Block { prelude, body });
                i = end;
                start = i;
            }
            _ => i += 1,
        }
    }
    push_declaration(&input[start..], &mut segments);
    segments
}

fn push_declaration<'a>(text: &'a str, segments: &mut Vec<Segment<'a>>) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        segments.push(Segment::Declaration(trimmed));
    }
}

/// Returns the block body starting at `open` (which must point at `{`)
/// and the index just past the matching `}`. An unbalanced block runs to
/// the end of the input.
fn read_block(input: &str, open: usize) -> (&str, usize) {
    let bytes = input.as_bytes();
    let mut depth = 0i32;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_quoted(bytes, i);
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return (&input[open + 1..i], i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    (&input[open + 1..], input.len())
}

fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Collapses whitespace runs outside quoted strings and trims the ends.
fn normalize_ws(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_quote: Option<char> = None;
    let mut pending_space = false;
    for c in text.chars() {
        if let Some(quote) = in_quote {
            out.push(c);
            if c == quote {
                in_quote = None;
            }
            continue;
        }
        if c == '"' || c == '\'' {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            in_quote = Some(c);
            out.push(c);
        } else if c.is_whitespace() {
            pending_space = true;
        } else {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_declaration() {
        let result = atomize("color: blue");
        assert_eq!(result.class_names.len(), 1);
        let class = &result.class_names[0];
        assert_eq!(result.sheets, vec![format!(".{}{{color:blue}}", class)]);
    }

    #[test]
    fn test_whitespace_is_normalised() {
        let spaced = atomize("color :  blue ;");
        let tight = atomize("color:blue");
        assert_eq!(spaced.class_names, tight.class_names);
        assert_eq!(spaced.sheets, tight.sheets);
    }

    #[test]
    fn test_two_declarations_two_rules() {
        let result = atomize("font-size: 20px; color: blue");
        assert_eq!(result.class_names.len(), 2);
        assert_eq!(result.sheets.len(), 2);
        assert!(result.sheets[0].contains("{font-size:20px}"));
        assert!(result.sheets[1].contains("{color:blue}"));
    }

    #[test]
    fn test_nested_pseudo_selector() {
        let result = atomize("color: blue; :hover { color: red; }");
        assert_eq!(result.class_names.len(), 2);
        let hover = &result.class_names[1];
        assert_eq!(result.sheets[1], format!(".{}:hover{{color:red}}", hover));
    }

    #[test]
    fn test_ampersand_refers_to_parent() {
        let result = atomize("&:focus { outline: none; }");
        let class = &result.class_names[0];
        assert_eq!(result.sheets[0], format!(".{}:focus{{outline:none}}", class));
    }

    #[test]
    fn test_descendant_selector_nests_with_space() {
        let result = atomize("h1 { color: red; }");
        let class = &result.class_names[0];
        assert_eq!(result.sheets[0], format!(".{} h1{{color:red}}", class));
    }

    #[test]
    fn test_selector_list_fans_out() {
        let result = atomize(":hover, :focus { color: red; }");
        assert_eq!(result.class_names.len(), 2);
        assert!(result.sheets[0].contains(":hover{color:red}"));
        assert!(result.sheets[1].contains(":focus{color:red}"));
    }

    #[test]
    fn test_at_rule_wraps_inner_rules() {
        let result = atomize("@media (max-width: 600px) { color: red; }");
        let class = &result.class_names[0];
        assert_eq!(
            result.sheets[0],
            format!("@media (max-width: 600px){{.{}{{color:red}}}}", class)
        );
    }

    #[test]
    fn test_same_declaration_same_class_and_group() {
        let same_value = atomize("color: blue");
        let again = atomize("color: blue");
        assert_eq!(same_value.class_names, again.class_names);

        let other_value = atomize("color: red");
        assert_eq!(
            ClassNames::group_prefix(&same_value.class_names[0]),
            ClassNames::group_prefix(&other_value.class_names[0]),
        );
        assert_ne!(same_value.class_names[0], other_value.class_names[0]);
    }

    #[test]
    fn test_duplicate_property_keeps_both_rules() {
        let result = atomize("color: red; color: blue");
        assert_eq!(result.class_names.len(), 2);
        assert_eq!(result.sheets.len(), 2);
        assert_eq!(
            ClassNames::group_prefix(&result.class_names[0]),
            ClassNames::group_prefix(&result.class_names[1]),
        );
    }

    #[test]
    fn test_repeated_declaration_dedupes() {
        let result = atomize("color: blue; color: blue");
        assert_eq!(result.class_names.len(), 1);
        assert_eq!(result.sheets.len(), 1);
    }

    #[test]
    fn test_unparseable_fragment_passes_through() {
        let result = atomize("color: blue; florp");
        assert_eq!(result.class_names.len(), 1);
        assert_eq!(result.sheets.len(), 2);
        assert_eq!(result.sheets[1], "florp");
    }

    #[test]
    fn test_empty_block_has_stable_class_and_no_sheets() {
        let first = atomize("");
        let second = atomize("   \n ");
        assert_eq!(first.class_names.len(), 1);
        assert!(first.sheets.is_empty());
        assert_eq!(first.class_names, second.class_names);
    }

    #[test]
    fn test_quoted_content_keeps_spacing_and_semicolons() {
        let result = atomize(r#"content: "a; b""#);
        assert_eq!(result.class_names.len(), 1);
        assert!(result.sheets[0].contains(r#"content:"a; b""#));
    }

    #[test]
    fn test_url_parens_protect_separators() {
        let result = atomize("background: url(data:image/png;base64,xyz)");
        assert_eq!(result.class_names.len(), 1);
        assert!(
            result.sheets[0].contains("background:url(data:image/png;base64,xyz)")
        );
    }

    #[test]
    fn test_shared_registry_reuses_classes() {
        let mut names = ClassNames::new();
        let first = atomize_with("color: blue", &mut names);
        let second = atomize_with("color: blue", &mut names);
        assert_eq!(first.class_names, second.class_names);
    }
}
