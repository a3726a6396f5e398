//! Transaction outputs and the references that point at them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::Value;
use crate::encoding::hex32;
use crate::identity::Identity;

/// Hash identifying a validator script.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptHash(#[serde(with = "hex32")] [u8; 32]);

impl ScriptHash {
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

impl fmt::Display for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptHash({})", &self.to_hex()[..16])
    }
}

/// Where an output's value goes: to a key holder or to a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Address {
    PubKey(Identity),
    Script(ScriptHash),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::PubKey(id) => write!(f, "key:{}", id),
            Address::Script(hash) => write!(f, "script:{}", hash),
        }
    }
}

/// Points at output `index` of transaction `tx_id`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputRef {
    #[serde(with = "hex32")]
    pub tx_id: [u8; 32],
    pub index: u32,
}

impl OutputRef {
    pub fn new(tx_id: [u8; 32], index: u32) -> Self {
        Self { tx_id, index }
    }
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", hex::encode(self.tx_id), self.index)
    }
}

impl fmt::Debug for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputRef({}#{})", &hex::encode(self.tx_id)[..16], self.index)
    }
}

/// A transaction output. Script outputs usually carry an inline datum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    pub address: Address,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum: Option<Vec<u8>>,
}

impl TxOut {
    /// Plain payment to a key holder.
    pub fn to_key(identity: Identity, value: Value) -> Self {
        Self {
            address: Address::PubKey(identity),
            value,
            datum: None,
        }
    }

    /// Output locked at a script, with an inline datum.
    pub fn to_script(script: ScriptHash, value: Value, datum: Vec<u8>) -> Self {
        Self {
            address: Address::Script(script),
            value,
            datum: Some(datum),
        }
    }
}

/// A spent input: the reference plus the output it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInInfo {
    pub out_ref: OutputRef,
    pub resolved: TxOut,
}
