//! Stable content hashing for generated CSS identifiers.
//!
//! Class names, CSS custom-property names and sheet identities all embed
//! these hashes, so the output of a build must not change across runs,
//! platforms or Rust releases. `std::hash::DefaultHasher` makes no such
//! guarantee, so the FNV-1a function is written out here.

#![no_std]

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Incremental 64-bit FNV-1a hasher.
#[derive(Clone, Copy, Debug)]
pub struct Fnv1a(u64);

impl Fnv1a {
    pub const fn new() -> Self {
        Fnv1a(FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        let mut state = self.0;
        for &b in bytes {
            state ^= b as u64;
            state = state.wrapping_mul(FNV_PRIME);
        }
        self.0 = state;
    }

    pub const fn finish(&self) -> u64 {
        self.0
    }
}

impl Default for Fnv1a {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot hash of a byte slice.
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = Fnv1a::new();
    hasher.write(bytes);
    hasher.finish()
}

/// One-shot hash of a string.
pub fn hash_str(s: &str) -> u64 {
    hash_bytes(s.as_bytes())
}

/// Hash of several parts with a separator byte between them, so that
/// `["ab", "c"]` and `["a", "bc"]` produce different hashes.
pub fn hash_parts(parts: &[&str]) -> u64 {
    let mut hasher = Fnv1a::new();
    for part in parts {
        hasher.write(part.as_bytes());
        hasher.write(&[0xff]);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference vectors from the published FNV-1a test suite.
    #[test]
    fn test_known_vectors() {
        assert_eq!(hash_str(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(hash_str("a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(hash_str("foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut hasher = Fnv1a::new();
        hasher.write(b"font-");
        hasher.write(b"size");
        assert_eq!(hasher.finish(), hash_str("font-size"));
    }

    #[test]
    fn test_parts_are_separated() {
        assert_ne!(hash_parts(&["ab", "c"]), hash_parts(&["a", "bc"]));
        assert_ne!(hash_parts(&["a", ""]), hash_parts(&["a"]));
    }
}
