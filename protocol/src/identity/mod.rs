//! # Identity Module
//!
//! Every actor in the supply chain is an Ed25519 keypair; the ledger only
//! ever sees the BLAKE3 hash of its public key.

pub mod key_hash;

pub use key_hash::{Identity, IdentityError};
