//! # Identities
//!
//! An [`Identity`] is the BLAKE3 hash of an Ed25519 public key. It is what a
//! batch record stores for each role and what the validator compares
//! against a transaction's signatory set.
//!
//! ```text
//! public_key (32 bytes) -> BLAKE3(public_key) -> Identity (32 bytes)
//! ```
//!
//! Identities are compared by plain byte equality. There is no delegation:
//! a key that hashes to a different identity is a different actor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::crypto::hash::blake3_hash;
use crate::crypto::keys::{Keypair, PublicKey};
use crate::encoding::{hex32, parse_hex32};

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid identity: expected 64 hex characters, got {0:?}")]
    InvalidHex(String),
}

/// Public-key hash identifying one actor.
///
/// # Examples
///
/// ```
/// use provenance_protocol::crypto::Keypair;
/// use provenance_protocol::identity::Identity;
///
/// let kp = Keypair::generate();
/// let id = Identity::from_public_key(&kp.public_key());
/// let parsed: Identity = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(#[serde(with = "hex32")] [u8; 32]);

impl Identity {
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self(blake3_hash(public_key.as_bytes()))
    }

    pub fn of(keypair: &Keypair) -> Self {
        Self::from_public_key(&keypair.public_key())
    }

    /// Wraps raw hash bytes. No check is made that some key hashes to them.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex32(s)
            .map(Self)
            .ok_or_else(|| IdentityError::InvalidHex(s.to_string()))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", &self.to_hex()[..16])
    }
}
