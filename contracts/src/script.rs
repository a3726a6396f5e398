//! # Encoded Entry Point & Script Descriptor
//!
//! The ledger hands a validator three opaque byte strings (the datum
//! locked with the output, the spender's redeemer, and the execution
//! context) and only wants success or abort back. [`run_encoded`] is that
//! boundary: it decodes each input with `bincode` and defers to
//! [`supply_chain::validate`](crate::supply_chain::validate).
//!
//! [`ScriptDescriptor`] names the deployed validator. Its hash commits to
//! the script name, format version, and the full transition and role
//! tables, so any change to the rules yields a different script address.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use provenance_protocol::config::{network_name, SCRIPT_NAME, SCRIPT_VERSION};
use provenance_protocol::crypto::hash::blake3_hash_parts;
use provenance_protocol::ledger::{Address, ScriptContext, ScriptHash};

use crate::supply_chain::{
    authorized_role, valid_transition, validate, BatchRecord, BatchState, SupplyAction,
    ValidationError,
};

/// Errors from the encoded entry point.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("malformed datum: {0}")]
    MalformedDatum(String),

    #[error("malformed redeemer: {0}")]
    MalformedRedeemer(String),

    #[error("malformed context: {0}")]
    MalformedContext(String),

    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("rejected: {0}")]
    Rejected(#[from] ValidationError),
}

/// Encodes a datum the way the entry point expects to read it.
pub fn encode_datum(record: &BatchRecord) -> Result<Vec<u8>, ScriptError> {
    bincode::serialize(record).map_err(|e| ScriptError::Encoding(e.to_string()))
}

pub fn decode_datum(bytes: &[u8]) -> Result<BatchRecord, ScriptError> {
    bincode::deserialize(bytes).map_err(|e| ScriptError::MalformedDatum(e.to_string()))
}

pub fn encode_redeemer(action: &SupplyAction) -> Result<Vec<u8>, ScriptError> {
    bincode::serialize(action).map_err(|e| ScriptError::Encoding(e.to_string()))
}

pub fn encode_context(ctx: &ScriptContext) -> Result<Vec<u8>, ScriptError> {
    bincode::serialize(ctx).map_err(|e| ScriptError::Encoding(e.to_string()))
}

/// Decodes all three inputs, then validates.
///
/// `Ok(())` means the spend may proceed; any `Err` aborts it.
pub fn run_encoded(datum: &[u8], redeemer: &[u8], context: &[u8]) -> Result<(), ScriptError> {
    let record = decode_datum(datum)?;
    let action: SupplyAction = bincode::deserialize(redeemer)
        .map_err(|e| ScriptError::MalformedRedeemer(e.to_string()))?;
    let ctx: ScriptContext = bincode::deserialize(context)
        .map_err(|e| ScriptError::MalformedContext(e.to_string()))?;
    validate(&record, &action, &ctx)?;
    Ok(())
}

/// Published description of the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDescriptor {
    pub name: String,
    pub version: u16,
    pub network: String,
    pub network_magic: u32,
    pub validator_hash: ScriptHash,
}

impl ScriptDescriptor {
    /// Descriptor of the supply-chain validator on `network_magic`.
    pub fn supply_chain(network_magic: u32) -> Self {
        let validator_hash = supply_chain_hash();
        debug!(hash = %validator_hash, network_magic, "script descriptor built");
        Self {
            name: SCRIPT_NAME.to_string(),
            version: SCRIPT_VERSION,
            network: network_name(network_magic),
            network_magic,
            validator_hash,
        }
    }

    pub fn address(&self) -> Address {
        Address::Script(self.validator_hash)
    }

    /// Binary form, as written next to the JSON descriptor.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ScriptError> {
        bincode::serialize(self).map_err(|e| ScriptError::Encoding(e.to_string()))
    }
}

/// Hash committing to the validator's name, version, and rule tables.
pub fn supply_chain_hash() -> ScriptHash {
    let mut table = Vec::new();
    for from in BatchState::ALL {
        for to in BatchState::ALL {
            if valid_transition(from, to) {
                table.push(from.index() as u8);
                table.push(to.index() as u8);
                table.push(authorized_role(to).map(|r| r as u8).unwrap_or(u8::MAX));
            }
        }
    }
    ScriptHash::from_bytes(blake3_hash_parts(&[
        SCRIPT_NAME.as_bytes(),
        &SCRIPT_VERSION.to_le_bytes(),
        &table,
    ]))
}
