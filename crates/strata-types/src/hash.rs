use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Content address of a chunk.
///
/// A `ContentHash` is the BLAKE3 digest of a chunk's payload. Identical
/// payloads always produce the same hash. The all-zero value is reserved as
/// the empty hash: a store whose root has never been set reports it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash raw bytes.
    pub fn of(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Wrap a pre-computed digest.
    pub const fn from_digest(digest: [u8; 32]) -> Self {
        Self(digest)
    }

    /// The empty hash (all zeros).
    pub const fn empty() -> Self {
        Self([0u8; 32])
    }

    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex characters, for logs.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl Default for ContentHash {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for ContentHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for ContentHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<ContentHash> for [u8; 32] {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn of_is_deterministic() {
        assert_eq!(ContentHash::of(b"abc"), ContentHash::of(b"abc"));
    }

    #[test]
    fn different_data_produces_different_hashes() {
        assert_ne!(ContentHash::of(b"abc"), ContentHash::of(b"def"));
    }

    #[test]
    fn empty_is_all_zeros_and_default() {
        let empty = ContentHash::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.as_bytes(), &[0u8; 32]);
        assert_eq!(ContentHash::default(), empty);
        assert!(!ContentHash::of(b"").is_empty());
    }

    #[test]
    fn hex_roundtrip() {
        let hash = ContentHash::of(b"test");
        let parsed: ContentHash = hash.to_hex().parse().unwrap();
        assert_eq!(hash, parsed);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(matches!(
            ContentHash::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
        assert_eq!(
            ContentHash::from_hex("abcd"),
            Err(TypeError::InvalidLength {
                expected: 32,
                actual: 2
            })
        );
    }

    #[test]
    fn display_is_full_hex() {
        let hash = ContentHash::of(b"test");
        assert_eq!(format!("{hash}").len(), 64);
        assert_eq!(hash.short_hex().len(), 8);
    }

    proptest! {
        #[test]
        fn equal_payloads_hash_equal(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            let copy = data.clone();
            prop_assert_eq!(ContentHash::of(&data), ContentHash::of(&copy));
        }
    }
}
