//! Content-addressed class names.
//!
//! A class name is `_` followed by two encoded hash segments: the group
//! hash (at-rule context, selector suffix and property) and the value
//! hash. Rules for the same property under the same selector share a group
//! prefix, which is what lets the runtime `ax` helper resolve "last one
//! wins" conflicts from class names alone.

use data_encoding::{Encoding, Specification};
use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref ENCODER: Encoding = {
        let mut spec = Specification::new();
        spec.symbols
            .push_str("abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890_-");
        spec.encoding().unwrap()
    };
}

const SEGMENT_LEN: usize = 4;

fn encode(hash: u64, len: usize) -> String {
    let encoded = ENCODER.encode(&hash.to_le_bytes());
    encoded[..len.min(encoded.len())].to_string()
}

/// Registry assigning class names to `(group, value)` hash pairs.
///
/// Segments start at four characters and extend only when two distinct
/// hash pairs would otherwise shorten to the same name. One registry lives
/// for the duration of one module compilation.
#[derive(Default)]
pub struct ClassNames {
    by_hash: HashMap<(u64, u64), String>,
    taken: HashMap<String, (u64, u64)>,
}

impl ClassNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class_for(&mut self, group: u64, value: u64) -> String {
        if let Some(existing) = self.by_hash.get(&(group, value)) {
            return existing.clone();
        }
        let mut len = SEGMENT_LEN;
        loop {
            let candidate = format!("_{}{}", encode(group, len), encode(value, len));
            match self.taken.get(&candidate) {
                None => {
                    self.taken.insert(candidate.clone(), (group, value));
                    self.by_hash.insert((group, value), candidate.clone());
                    return candidate;
                }
                Some(_) => len += 1,
            }
        }
    }

    /// The group prefix `ax` compares to detect conflicting declarations.
    pub fn group_prefix(class_name: &str) -> &str {
        let end = 1 + SEGMENT_LEN.min(class_name.len().saturating_sub(1));
        &class_name[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_pair_same_name() {
        let mut names = ClassNames::new();
        let a = names.class_for(1, 2);
        let b = names.class_for(1, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_name_shape() {
        let mut names = ClassNames::new();
        let name = names.class_for(0xdead_beef, 0xcafe);
        assert!(name.starts_with('_'));
        assert_eq!(name.len(), 1 + SEGMENT_LEN * 2);
    }

    #[test]
    fn test_group_prefix_shared_across_values() {
        let mut names = ClassNames::new();
        let a = names.class_for(7, 100);
        let b = names.class_for(7, 200);
        assert_eq!(ClassNames::group_prefix(&a), ClassNames::group_prefix(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_fresh_registries_agree() {
        let a = ClassNames::new().class_for(42, 43);
        let b = ClassNames::new().class_for(42, 43);
        assert_eq!(a, b);
    }
}
