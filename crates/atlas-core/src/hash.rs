//! Hashing primitives.
//!
//! Two unrelated kinds of hashing live here:
//!
//! - [`FxHashMap`] / [`FxHashSet`]: fast non-cryptographic hash tables used for
//!   the in-memory grouping indexes (hash groups, identifier keys, ignore sets).
//! - [`ContentDigest`]: a SHA-256 fingerprint of file bytes or normalized code
//!   text. Two inputs with equal digests are treated as byte-identical.
//!
//! # Examples
//!
//! ```
//! use atlas_core::{ContentDigest, FxHashMap, fx_hash_map};
//!
//! let mut groups: FxHashMap<ContentDigest, Vec<&str>> = fx_hash_map();
//! groups.entry(ContentDigest::of(b"same")).or_default().push("alpha/a.js");
//! groups.entry(ContentDigest::of(b"same")).or_default().push("beta/a.js");
//! assert_eq!(groups.len(), 1);
//! ```

use std::fmt;
use std::io;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new empty [`FxHashMap`].
#[inline]
#[must_use]
pub fn fx_hash_map<K, V>() -> FxHashMap<K, V> {
    FxHashMap::default()
}

/// Creates a new empty [`FxHashSet`].
#[inline]
#[must_use]
pub fn fx_hash_set<V>() -> FxHashSet<V> {
    FxHashSet::default()
}

/// Creates a new [`FxHashMap`] with the specified capacity.
#[inline]
#[must_use]
pub fn fx_hash_map_with_capacity<K, V>(capacity: usize) -> FxHashMap<K, V> {
    FxHashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}

/// A SHA-256 digest of some content.
///
/// Serialized as a lowercase hex string.
///
/// # Examples
///
/// ```
/// use atlas_core::ContentDigest;
///
/// let a = ContentDigest::of(b"function add(a,b){return a+b;}");
/// let b = ContentDigest::of(b"function add(a,b){return a+b;}");
/// assert_eq!(a, b);
/// assert_eq!(a.to_hex().len(), 64);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Computes the digest of an in-memory byte slice.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    /// Computes the digest of a file's raw bytes, streaming from disk.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be opened or read.
    pub fn of_file(path: &Path) -> io::Result<Self> {
        let mut file = std::fs::File::open(path)?;
        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher)?;
        Ok(Self(hasher.finalize().into()))
    }

    /// Returns the digest as a lowercase hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a digest from a 64-character hex string.
    #[must_use]
    pub fn from_hex(value: &str) -> Option<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(value, &mut bytes).ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", &self.to_hex()[..12])
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::from_hex(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid digest '{value}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_digest_distinguishes_content() {
        assert_ne!(ContentDigest::of(b"content 1"), ContentDigest::of(b"content 2"));
    }

    #[test]
    fn test_digest_known_value() {
        // SHA-256 of the empty input
        assert_eq!(
            ContentDigest::of(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_of_file_matches_in_memory() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"const x = 1;\n").unwrap();
        let on_disk = ContentDigest::of_file(file.path()).unwrap();
        assert_eq!(on_disk, ContentDigest::of(b"const x = 1;\n"));
    }

    #[test]
    fn test_digest_serializes_as_hex() {
        let digest = ContentDigest::of(b"abc");
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", digest.to_hex()));
        let parsed: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, digest);
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(ContentDigest::from_hex("not-hex").is_none());
        assert!(ContentDigest::from_hex("abcd").is_none());
    }

    #[test]
    fn test_fx_hash_map_with_capacity() {
        let map: FxHashMap<String, i32> = fx_hash_map_with_capacity(100);
        assert!(map.capacity() >= 100);
    }
}
