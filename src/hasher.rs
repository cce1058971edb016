//! Registry of named, deterministic string hashers.

use crate::error::ConfigError;
use core::fmt;
use core::str::FromStr;

/// Signature every registered hasher is resolved to.
pub type HashFn = fn(&[u8]) -> u64;

const FNV_OFFSET_BASIS: u64 = 0xCBF2_9CE4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;
const DJB2_SEED: u32 = 5381;

/// Sum of the byte values, wrapped to 32 bits. Anagrams collide.
pub fn naive_hash(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u32, |h, &b| h.wrapping_add(u32::from(b)))
        .into()
}

/// DJB2, 32-bit: `h = h * 33 + b`.
pub fn djb2_hash(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(DJB2_SEED, |h, &b| h.wrapping_mul(33).wrapping_add(u32::from(b)))
        .into()
}

/// FNV-1, 64-bit: multiply then add.
pub fn fnv1_hash(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |h, &b| {
        h.wrapping_mul(FNV_PRIME).wrapping_add(u64::from(b))
    })
}

/// FNV-1a, 64-bit: add then multiply.
///
/// Note this is the additive variant (`(h + b) * p`), not the xor form
/// found in most FNV-1a implementations.
pub fn fnv1a_hash(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |h, &b| {
        h.wrapping_add(u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Closed set of hashers a table can be bound to.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum HasherKind {
    Naive,
    Djb2,
    Fnv1,
    #[default]
    Fnv1a,
}

impl HasherKind {
    pub const ALL: [HasherKind; 4] = [
        HasherKind::Naive,
        HasherKind::Djb2,
        HasherKind::Fnv1,
        HasherKind::Fnv1a,
    ];

    /// Registry name, as accepted by [`HasherKind::from_name`].
    pub const fn name(self) -> &'static str {
        match self {
            HasherKind::Naive => "naive",
            HasherKind::Djb2 => "djb2",
            HasherKind::Fnv1 => "fnv1",
            HasherKind::Fnv1a => "fnv1a",
        }
    }

    /// Resolve a registry name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ConfigError::UnknownHasher {
                name: name.to_owned(),
            })
    }

    pub fn hash_fn(self) -> HashFn {
        match self {
            HasherKind::Naive => naive_hash,
            HasherKind::Djb2 => djb2_hash,
            HasherKind::Fnv1 => fnv1_hash,
            HasherKind::Fnv1a => fnv1a_hash,
        }
    }

    /// Hash the UTF-8 bytes of `key`.
    #[inline]
    pub fn hash(self, key: &str) -> u64 {
        (self.hash_fn())(key.as_bytes())
    }
}

impl fmt::Display for HasherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HasherKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: byte-sum hashing is order-insensitive, so anagrams collide.
    #[test]
    fn naive_anagrams_collide() {
        assert_eq!(naive_hash(b"ab"), naive_hash(b"ba"));
        assert_eq!(naive_hash(b"ab"), 97 + 98);
        assert_eq!(naive_hash(b""), 0);
    }

    /// Invariant: naive and djb2 results never exceed 32 bits.
    #[test]
    fn thirty_two_bit_hashers_wrap() {
        let long = "z".repeat(100_000);
        assert!(naive_hash(long.as_bytes()) <= u64::from(u32::MAX));
        assert!(djb2_hash(long.as_bytes()) <= u64::from(u32::MAX));
        assert_eq!(naive_hash(long.as_bytes()), 122 * 100_000);
    }

    /// Known values computed by hand from the recurrences.
    #[test]
    fn djb2_known_values() {
        assert_eq!(djb2_hash(b""), 5381);
        assert_eq!(djb2_hash(b"a"), 5381 * 33 + 97);
        assert_eq!(djb2_hash(b"ab"), (5381 * 33 + 97) * 33 + 98);
    }

    #[test]
    fn fnv_known_values() {
        assert_eq!(fnv1_hash(b""), FNV_OFFSET_BASIS);
        assert_eq!(fnv1a_hash(b""), FNV_OFFSET_BASIS);
        assert_eq!(
            fnv1_hash(b"a"),
            FNV_OFFSET_BASIS.wrapping_mul(FNV_PRIME).wrapping_add(97)
        );
        assert_eq!(
            fnv1a_hash(b"a"),
            FNV_OFFSET_BASIS.wrapping_add(97).wrapping_mul(FNV_PRIME)
        );
        assert_ne!(fnv1_hash(b"a"), fnv1a_hash(b"a"));
    }

    /// Invariant: hashing is reproducible; no per-process seed.
    #[test]
    fn hashing_is_deterministic() {
        for kind in HasherKind::ALL {
            assert_eq!(kind.hash("line_1"), kind.hash("line_1"));
            assert_eq!(kind.hash("line_1"), (kind.hash_fn())(b"line_1"));
        }
    }

    /// Invariant: keys are hashed through their UTF-8 encoding.
    #[test]
    fn non_ascii_keys_hash_their_utf8_bytes() {
        let key = "héllo";
        assert_eq!(HasherKind::Djb2.hash(key), djb2_hash(key.as_bytes()));
        assert_eq!(HasherKind::Naive.hash("é"), 0xC3 + 0xA9);
    }

    #[test]
    fn registry_names_round_trip() {
        for kind in HasherKind::ALL {
            assert_eq!(HasherKind::from_name(kind.name()).unwrap(), kind);
            assert_eq!(kind.to_string().parse::<HasherKind>().unwrap(), kind);
        }
        assert_eq!(HasherKind::default(), HasherKind::Fnv1a);
    }

    /// Invariant: unknown or differently-cased names are rejected.
    #[test]
    fn unknown_names_are_rejected() {
        for bad in ["sha256", "FNV1A", "", " fnv1a"] {
            match HasherKind::from_name(bad) {
                Err(ConfigError::UnknownHasher { name }) => assert_eq!(name, bad),
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }
}
