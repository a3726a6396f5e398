//! # Hashing Utilities
//!
//! - **BLAKE3** for everything the protocol derives itself: identities
//!   (public-key hashes), transaction body digests, and the validator hash.
//! - **SHA-256** for batch content hashes, since those are computed by
//!   whatever manufacturing system describes the physical batch and SHA-256
//!   is what those systems speak.

use sha2::{Digest, Sha256};

use crate::config::HASH_OUTPUT_LENGTH;

/// BLAKE3 digest of `data`.
///
/// ```
/// use provenance_protocol::crypto::blake3_hash;
///
/// assert_eq!(blake3_hash(b"pallet").len(), 32);
/// ```
pub fn blake3_hash(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    *blake3::hash(data).as_bytes()
}

/// SHA-256 digest of `data` as a fixed-size array.
pub fn sha256(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let mut output = [0u8; HASH_OUTPUT_LENGTH];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// BLAKE3 over several byte slices, each prefixed with its length so that
/// `["ab", "c"]` and `["a", "bc"]` never collide.
pub fn blake3_hash_parts(parts: &[&[u8]]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        // SHA-256("abc"), FIPS 180-2 appendix B.1.
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_blake3_deterministic() {
        assert_eq!(blake3_hash(b"batch"), blake3_hash(b"batch"));
        assert_ne!(blake3_hash(b"batch"), blake3_hash(b"batch!"));
    }

    #[test]
    fn test_parts_are_length_prefixed() {
        let a = blake3_hash_parts(&[b"ab", b"c"]);
        let b = blake3_hash_parts(&[b"a", b"bc"]);
        assert_ne!(a, b);
    }
}
