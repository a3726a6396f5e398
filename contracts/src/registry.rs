//! # Batch Registry
//!
//! An in-memory stand-in for the ledger outputs that hold batch records.
//! Each batch is a chain of entries: registration locks the first record at
//! the script address, and every accepted transition spends the current
//! entry and appends its successor. Entries are never edited, so the full
//! custody trail of a batch can be read back with [`BatchRegistry::history`].
//!
//! A transition is submitted the way a real spend would be: the registry
//! assembles the transaction body (the escrowed input, the successor output
//! for non-terminal moves, and the caller's payments), collects witnesses
//! from the signing keys, and runs the validator against the resulting
//! [`ScriptContext`]. Terminal moves close the batch and release the
//! escrow; nothing further may be applied to it.
//!
//! The registry does not check value conservation between inputs and
//! outputs. That belongs to the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};

use provenance_protocol::crypto::keys::Keypair;
use provenance_protocol::ledger::{
    LedgerError, OutputRef, ScriptContext, ScriptHash, TxBody, TxInInfo, TxInfo, TxOut, Value,
    Witness,
};

use crate::script::{encode_datum, ScriptError};
use crate::supply_chain::{validate, BatchRecord, BatchState, SupplyAction, ValidationError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown batch {0}")]
    UnknownBatch(String),

    #[error("batch {0} is already registered")]
    AlreadyRegistered(String),

    #[error("invalid registration: {0}")]
    InvalidRegistration(String),

    #[error("batch {batch} is closed in state {state}")]
    BatchClosed { batch: String, state: BatchState },

    #[error("transition rejected: {0}")]
    Rejected(#[from] ValidationError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Script(#[from] ScriptError),
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One record in a batch's custody trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub record: BatchRecord,
    /// The script output holding this record. `None` once the batch is
    /// closed: a terminal record is not locked anywhere.
    pub out_ref: Option<OutputRef>,
    /// Value escrowed alongside the record.
    pub escrow: Value,
    pub recorded_at: DateTime<Utc>,
}

/// Ledger-style store of batch records locked at one validator.
#[derive(Debug)]
pub struct BatchRegistry {
    script: ScriptHash,
    batches: HashMap<[u8; 32], Vec<RegistryEntry>>,
}

impl BatchRegistry {
    pub fn new(script: ScriptHash) -> Self {
        Self {
            script,
            batches: HashMap::new(),
        }
    }

    pub fn script(&self) -> ScriptHash {
        self.script
    }

    /// Locks a new record at the script with `escrow` alongside it.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::AlreadyRegistered`] if the batch hash is taken.
    /// - [`RegistryError::InvalidRegistration`] if the record is not in
    ///   `Created`, has a zero bond, or `escrow` does not cover the bond.
    pub fn register(
        &mut self,
        record: BatchRecord,
        escrow: Value,
    ) -> Result<OutputRef, RegistryError> {
        let batch = record.batch_hash_hex();
        if self.batches.contains_key(&record.batch_hash) {
            return Err(RegistryError::AlreadyRegistered(batch));
        }
        if record.state != BatchState::Created {
            return Err(RegistryError::InvalidRegistration(format!(
                "record must start in Created, not {}",
                record.state
            )));
        }
        if record.bond_amount == 0 {
            return Err(RegistryError::InvalidRegistration(
                "bond amount must be positive".into(),
            ));
        }
        if escrow.base_amount() < record.bond_amount {
            return Err(RegistryError::InvalidRegistration(format!(
                "escrow of {} does not cover bond of {}",
                escrow.base_amount(),
                record.bond_amount
            )));
        }

        let body = TxBody {
            inputs: vec![],
            outputs: vec![TxOut::to_script(self.script, escrow.clone(), encode_datum(&record)?)],
        };
        // The datum embeds the batch hash, so the digest is unique per batch.
        let out_ref = OutputRef::new(body.digest()?, 0);

        info!(
            batch = %batch,
            bond = record.bond_amount,
            out_ref = %out_ref,
            "batch registered"
        );
        self.batches.insert(
            record.batch_hash,
            vec![RegistryEntry {
                record,
                out_ref: Some(out_ref),
                escrow,
                recorded_at: Utc::now(),
            }],
        );
        Ok(out_ref)
    }

    /// Spends the batch's current record and, if the validator accepts,
    /// appends the successor.
    ///
    /// `payments` are extra outputs of the spending transaction (the bond
    /// payout for terminal moves). Every key in `signers` witnesses the
    /// transaction body.
    pub fn advance(
        &mut self,
        batch_hash: &[u8; 32],
        action: SupplyAction,
        payments: Vec<TxOut>,
        signers: &[&Keypair],
    ) -> Result<&RegistryEntry, RegistryError> {
        let script = self.script;
        let batch = hex::encode(batch_hash);
        let current = self
            .current(batch_hash)
            .ok_or_else(|| RegistryError::UnknownBatch(batch.clone()))?
            .clone();
        let Some(own_ref) = current.out_ref else {
            return Err(RegistryError::BatchClosed {
                batch,
                state: current.record.state,
            });
        };

        let target = action.target();
        let successor = current.record.advanced_to(target);
        let own_input = TxInInfo {
            out_ref: own_ref,
            resolved: TxOut::to_script(script, current.escrow.clone(), encode_datum(&current.record)?),
        };
        let mut outputs = Vec::with_capacity(payments.len() + 1);
        if !target.is_terminal() {
            outputs.push(TxOut::to_script(script, current.escrow.clone(), encode_datum(&successor)?));
        }
        outputs.extend(payments);
        let body = TxBody {
            inputs: vec![own_input],
            outputs,
        };

        let witnesses = signers
            .iter()
            .map(|kp| Witness::create(kp, &body))
            .collect::<Result<Vec<_>, _>>()?;
        let tx_id = body.digest()?;
        let tx_info = TxInfo::from_witnessed(body, &witnesses)?;
        let ctx = ScriptContext::spending(tx_info, own_ref);

        if let Err(err) = validate(&current.record, &action, &ctx) {
            warn!(batch = %batch, to = %target, reason = %err, "spend refused");
            return Err(err.into());
        }

        let entry = RegistryEntry {
            record: successor,
            out_ref: (!target.is_terminal()).then(|| OutputRef::new(tx_id, 0)),
            escrow: if target.is_terminal() {
                Value::default()
            } else {
                current.escrow
            },
            recorded_at: Utc::now(),
        };
        info!(
            batch = %batch,
            from = %current.record.state,
            to = %target,
            closed = target.is_terminal(),
            "batch advanced"
        );

        let trail = self
            .batches
            .get_mut(batch_hash)
            .ok_or_else(|| RegistryError::UnknownBatch(batch))?;
        trail.push(entry);
        trail.last().ok_or_else(|| RegistryError::UnknownBatch(hex::encode(batch_hash)))
    }

    /// The latest entry for a batch.
    pub fn current(&self, batch_hash: &[u8; 32]) -> Option<&RegistryEntry> {
        self.batches.get(batch_hash).and_then(|trail| trail.last())
    }

    /// Every entry for a batch, oldest first.
    pub fn history(&self, batch_hash: &[u8; 32]) -> &[RegistryEntry] {
        self.batches
            .get(batch_hash)
            .map(|trail| trail.as_slice())
            .unwrap_or(&[])
    }

    /// Number of registered batches.
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
