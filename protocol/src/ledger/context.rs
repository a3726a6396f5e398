//! # Script Execution Context
//!
//! What a validator gets to see about the transaction that is trying to
//! spend a script output: every input, every output, and the set of
//! identities that signed it.
//!
//! ## Signatories
//!
//! A [`TxInfo`] built through [`TxInfo::from_witnessed`] only lists an
//! identity as a signatory after its Ed25519 witness over the body digest
//! has verified. A single bad witness fails the whole transaction; it is
//! never dropped.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::output::{Address, OutputRef, TxInInfo, TxOut};
use super::value::Value;
use super::LedgerError;
use crate::crypto::hash::blake3_hash;
use crate::crypto::keys::{Keypair, PublicKey, Signature};
use crate::identity::Identity;

/// The signed part of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxBody {
    pub inputs: Vec<TxInInfo>,
    pub outputs: Vec<TxOut>,
}

impl TxBody {
    /// BLAKE3 over the bincode encoding of the body. Witnesses sign this.
    pub fn digest(&self) -> Result<[u8; 32], LedgerError> {
        let bytes = bincode::serialize(self).map_err(|e| LedgerError::Encoding(e.to_string()))?;
        Ok(blake3_hash(&bytes))
    }
}

/// A public key and its signature over a body digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    pub public_key: PublicKey,
    pub signature: Signature,
}

impl Witness {
    /// Sign `body` with `keypair`.
    pub fn create(keypair: &Keypair, body: &TxBody) -> Result<Self, LedgerError> {
        let digest = body.digest()?;
        Ok(Self {
            public_key: keypair.public_key(),
            signature: keypair.sign(&digest),
        })
    }
}

/// Transaction as seen by a validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInfo {
    pub inputs: Vec<TxInInfo>,
    pub outputs: Vec<TxOut>,
    pub signatories: Vec<Identity>,
}

impl TxInfo {
    /// Builds the validator view from a body and its witnesses, verifying
    /// every witness against the body digest.
    pub fn from_witnessed(body: TxBody, witnesses: &[Witness]) -> Result<Self, LedgerError> {
        let digest = body.digest()?;
        let mut signatories = Vec::with_capacity(witnesses.len());
        for witness in witnesses {
            if !witness.public_key.verify(&digest, &witness.signature) {
                return Err(LedgerError::InvalidWitness {
                    public_key: witness.public_key.to_hex(),
                });
            }
            let identity = Identity::from_public_key(&witness.public_key);
            if !signatories.contains(&identity) {
                signatories.push(identity);
            }
        }
        debug!(signers = signatories.len(), "witnesses verified");
        Ok(Self {
            inputs: body.inputs,
            outputs: body.outputs,
            signatories,
        })
    }

    pub fn signed_by(&self, identity: &Identity) -> bool {
        self.signatories.contains(identity)
    }

    /// Total value of the outputs paying `identity` directly.
    ///
    /// Says nothing about where the value came from: any input may fund it.
    /// Each amount saturates independently, so overflow in one asset never
    /// changes the base amount.
    pub fn value_paid_to(&self, identity: &Identity) -> Value {
        self.outputs
            .iter()
            .filter(|out| out.address == Address::PubKey(*identity))
            .fold(Value::default(), |acc, out| acc.saturating_add(&out.value))
    }

    pub fn find_input(&self, out_ref: &OutputRef) -> Option<&TxInInfo> {
        self.inputs.iter().find(|input| &input.out_ref == out_ref)
    }
}

/// Why the validator is being run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptPurpose {
    /// Spending the script output at this reference.
    Spending(OutputRef),
}

/// Full context handed to a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptContext {
    pub tx_info: TxInfo,
    pub purpose: ScriptPurpose,
}

impl ScriptContext {
    pub fn spending(tx_info: TxInfo, out_ref: OutputRef) -> Self {
        Self {
            tx_info,
            purpose: ScriptPurpose::Spending(out_ref),
        }
    }

    /// The input this validator run is guarding, if the transaction
    /// actually spends it.
    pub fn find_own_input(&self) -> Option<&TxInInfo> {
        match &self.purpose {
            ScriptPurpose::Spending(out_ref) => self.tx_info.find_input(out_ref),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::output::ScriptHash;

    fn script_input(amount: u64) -> TxInInfo {
        TxInInfo {
            out_ref: OutputRef::new([9u8; 32], 0),
            resolved: TxOut::to_script(ScriptHash::from_bytes([1u8; 32]), Value::base(amount), vec![]),
        }
    }

    #[test]
    fn test_witnessed_signatories() {
        let alice = Keypair::generate();
        let bob = Keypair::generate();
        let body = TxBody {
            inputs: vec![script_input(10)],
            outputs: vec![],
        };
        let witnesses = vec![
            Witness::create(&alice, &body).unwrap(),
            Witness::create(&bob, &body).unwrap(),
            Witness::create(&alice, &body).unwrap(),
        ];
        let info = TxInfo::from_witnessed(body, &witnesses).unwrap();
        assert_eq!(info.signatories.len(), 2);
        assert!(info.signed_by(&Identity::of(&alice)));
        assert!(info.signed_by(&Identity::of(&bob)));
    }

    #[test]
    fn test_witness_over_other_body_rejected() {
        let alice = Keypair::generate();
        let signed_body = TxBody::default();
        let other_body = TxBody {
            inputs: vec![script_input(1)],
            outputs: vec![],
        };
        let witness = Witness::create(&alice, &signed_body).unwrap();
        let err = TxInfo::from_witnessed(other_body, &[witness]).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidWitness { .. }));
    }

    #[test]
    fn test_value_paid_to_sums_only_matching_outputs() {
        let carol = Identity::from_bytes([3u8; 32]);
        let dave = Identity::from_bytes([4u8; 32]);
        let info = TxInfo {
            inputs: vec![],
            outputs: vec![
                TxOut::to_key(carol, Value::base(2)),
                TxOut::to_key(dave, Value::base(100)),
                TxOut::to_key(carol, Value::base(3).with_asset("X", 1)),
            ],
            signatories: vec![],
        };
        let paid = info.value_paid_to(&carol);
        assert_eq!(paid.base_amount(), 5);
        assert_eq!(paid.asset_amount("X"), 1);
        assert!(info.value_paid_to(&Identity::from_bytes([5u8; 32])).is_zero());
    }

    #[test]
    fn test_value_paid_to_saturates() {
        let carol = Identity::from_bytes([3u8; 32]);
        let info = TxInfo {
            inputs: vec![],
            outputs: vec![
                TxOut::to_key(carol, Value::base(u64::MAX)),
                TxOut::to_key(carol, Value::base(1)),
            ],
            signatories: vec![],
        };
        assert_eq!(info.value_paid_to(&carol).base_amount(), u64::MAX);
    }

    #[test]
    fn test_asset_overflow_leaves_base_alone() {
        let carol = Identity::from_bytes([3u8; 32]);
        let info = TxInfo {
            inputs: vec![],
            outputs: vec![
                TxOut::to_key(carol, Value::base(7).with_asset("JUNK", u64::MAX)),
                TxOut::to_key(carol, Value::base(0).with_asset("JUNK", 1)),
            ],
            signatories: vec![],
        };
        let paid = info.value_paid_to(&carol);
        assert_eq!(paid.base_amount(), 7);
        assert_eq!(paid.asset_amount("JUNK"), u64::MAX);
    }

    #[test]
    fn test_find_own_input() {
        let input = script_input(10);
        let own = input.out_ref;
        let info = TxInfo {
            inputs: vec![input],
            outputs: vec![],
            signatories: vec![],
        };
        let ctx = ScriptContext::spending(info.clone(), own);
        assert_eq!(ctx.find_own_input().unwrap().resolved.value.base_amount(), 10);

        let ctx = ScriptContext::spending(info, OutputRef::new([0u8; 32], 7));
        assert!(ctx.find_own_input().is_none());
    }
}
