//! # Cryptographic Primitives
//!
//! Thin, type-safe wrappers around audited implementations:
//!
//! - **Ed25519** (`ed25519-dalek`) for role keys and transaction witnesses.
//! - **BLAKE3** for identities, body digests, and the validator hash.
//! - **SHA-256** for batch content hashes.

pub mod hash;
pub mod keys;

pub use hash::{blake3_hash, blake3_hash_parts, sha256};
pub use keys::{KeyError, Keypair, PublicKey, Signature};
