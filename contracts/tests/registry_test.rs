//! Integration tests for the batch registry.
//!
//! Drives whole batches through the registry the way the operator tooling
//! does: register with an escrowed bond, advance by role, then verify or
//! reject with a payout.

use provenance_contracts::registry::{BatchRegistry, RegistryError};
use provenance_contracts::script::{decode_datum, supply_chain_hash};
use provenance_contracts::supply_chain::{
    BatchRecord, BatchState, Participants, SupplyAction, ValidationError,
};
use provenance_protocol::crypto::{sha256, Keypair};
use provenance_protocol::identity::Identity;
use provenance_protocol::ledger::{Address, TxOut, Value};

const BOND: u64 = 3_000_000;

struct Roles {
    manufacturer: Keypair,
    transporter: Keypair,
    warehouse: Keypair,
    retailer: Keypair,
    verifier: Keypair,
}

impl Roles {
    fn generate() -> Self {
        Self {
            manufacturer: Keypair::generate(),
            transporter: Keypair::generate(),
            warehouse: Keypair::generate(),
            retailer: Keypair::generate(),
            verifier: Keypair::generate(),
        }
    }

    fn participants(&self) -> Participants {
        Participants {
            manufacturer: Identity::of(&self.manufacturer),
            transporter: Identity::of(&self.transporter),
            warehouse: Identity::of(&self.warehouse),
            retailer: Identity::of(&self.retailer),
            verifier: Identity::of(&self.verifier),
        }
    }
}

/// Registers a batch and walks it to `Delivered`.
fn delivered_batch(registry: &mut BatchRegistry, roles: &Roles, label: &str) -> [u8; 32] {
    let hash = sha256(label.as_bytes());
    let record = BatchRecord::register(hash, roles.participants(), BOND).unwrap();
    registry.register(record, Value::base(BOND)).unwrap();

    registry
        .advance(&hash, SupplyAction::Advance(BatchState::InTransit), vec![], &[&roles.transporter])
        .unwrap();
    registry
        .advance(&hash, SupplyAction::Advance(BatchState::Warehoused), vec![], &[&roles.warehouse])
        .unwrap();
    registry
        .advance(&hash, SupplyAction::Advance(BatchState::Delivered), vec![], &[&roles.retailer])
        .unwrap();
    hash
}

#[test]
fn full_lifecycle_verified() {
    let roles = Roles::generate();
    let mut registry = BatchRegistry::new(supply_chain_hash());
    let hash = delivered_batch(&mut registry, &roles, "lot-2026-001");

    let payout = TxOut::to_key(Identity::of(&roles.manufacturer), Value::base(BOND));
    let entry = registry
        .advance(&hash, SupplyAction::Advance(BatchState::Verified), vec![payout], &[&roles.verifier])
        .unwrap();
    assert_eq!(entry.record.state, BatchState::Verified);
    assert!(entry.out_ref.is_none());
    assert!(entry.escrow.is_zero());

    let states: Vec<BatchState> = registry
        .history(&hash)
        .iter()
        .map(|e| e.record.state)
        .collect();
    assert_eq!(
        states,
        vec![
            BatchState::Created,
            BatchState::InTransit,
            BatchState::Warehoused,
            BatchState::Delivered,
            BatchState::Verified,
        ]
    );
}

#[test]
fn full_lifecycle_rejected() {
    let roles = Roles::generate();
    let mut registry = BatchRegistry::new(supply_chain_hash());
    let hash = delivered_batch(&mut registry, &roles, "lot-2026-002");

    let payout = TxOut::to_key(Identity::of(&roles.verifier), Value::base(BOND));
    registry
        .advance(&hash, SupplyAction::Advance(BatchState::Rejected), vec![payout], &[&roles.verifier])
        .unwrap();
    assert_eq!(registry.current(&hash).unwrap().record.state, BatchState::Rejected);
}

#[test]
fn history_entries_are_never_rewritten() {
    let roles = Roles::generate();
    let mut registry = BatchRegistry::new(supply_chain_hash());
    let hash = sha256(b"lot-immutable");
    let record = BatchRecord::register(hash, roles.participants(), BOND).unwrap();
    registry.register(record.clone(), Value::base(BOND)).unwrap();

    let genesis = registry.history(&hash)[0].clone();
    registry
        .advance(&hash, SupplyAction::Advance(BatchState::InTransit), vec![], &[&roles.transporter])
        .unwrap();

    let trail = registry.history(&hash);
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[0], genesis);
    assert_eq!(trail[0].record, record);
    assert_ne!(trail[0].out_ref, trail[1].out_ref);
    // Apart from the state, the successor is the same record.
    assert_eq!(trail[1].record, record.advanced_to(BatchState::InTransit));
    assert_eq!(trail[1].escrow, Value::base(BOND));
}

#[test]
fn refused_transition_leaves_the_record_in_place() {
    let roles = Roles::generate();
    let mut registry = BatchRegistry::new(supply_chain_hash());
    let hash = sha256(b"lot-refused");
    let record = BatchRecord::register(hash, roles.participants(), BOND).unwrap();
    registry.register(record, Value::base(BOND)).unwrap();

    // The retailer tries to sign for the transporter.
    let err = registry
        .advance(&hash, SupplyAction::Advance(BatchState::InTransit), vec![], &[&roles.retailer])
        .unwrap_err();
    assert!(matches!(err, RegistryError::Rejected(ValidationError::UnauthorizedSigner)));

    // Skipping straight to the warehouse.
    let err = registry
        .advance(&hash, SupplyAction::Advance(BatchState::Warehoused), vec![], &[&roles.warehouse])
        .unwrap_err();
    assert!(matches!(err, RegistryError::Rejected(ValidationError::InvalidTransition)));

    assert_eq!(registry.history(&hash).len(), 1);
    assert_eq!(registry.current(&hash).unwrap().record.state, BatchState::Created);
}

#[test]
fn verify_without_payout_is_refused() {
    let roles = Roles::generate();
    let mut registry = BatchRegistry::new(supply_chain_hash());
    let hash = delivered_batch(&mut registry, &roles, "lot-unpaid");

    let err = registry
        .advance(&hash, SupplyAction::Advance(BatchState::Verified), vec![], &[&roles.verifier])
        .unwrap_err();
    assert!(matches!(err, RegistryError::Rejected(ValidationError::InvalidBondHandling)));
    assert_eq!(registry.current(&hash).unwrap().record.state, BatchState::Delivered);
}

#[test]
fn closed_batch_refuses_further_actions() {
    let roles = Roles::generate();
    let mut registry = BatchRegistry::new(supply_chain_hash());
    let hash = delivered_batch(&mut registry, &roles, "lot-closed");
    let payout = TxOut::to_key(Identity::of(&roles.verifier), Value::base(BOND));
    registry
        .advance(&hash, SupplyAction::Advance(BatchState::Rejected), vec![payout], &[&roles.verifier])
        .unwrap();

    let err = registry
        .advance(&hash, SupplyAction::Advance(BatchState::Verified), vec![], &[&roles.verifier])
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::BatchClosed {
            state: BatchState::Rejected,
            ..
        }
    ));
}

#[test]
fn double_registration_is_refused() {
    let roles = Roles::generate();
    let mut registry = BatchRegistry::new(supply_chain_hash());
    let hash = sha256(b"lot-dup");
    let record = BatchRecord::register(hash, roles.participants(), BOND).unwrap();
    registry.register(record.clone(), Value::base(BOND)).unwrap();
    assert!(matches!(
        registry.register(record, Value::base(BOND)),
        Err(RegistryError::AlreadyRegistered(_))
    ));
    assert_eq!(registry.len(), 1);
}

#[test]
fn batches_are_independent() {
    let roles = Roles::generate();
    let mut registry = BatchRegistry::new(supply_chain_hash());
    let a = delivered_batch(&mut registry, &roles, "lot-a");
    let b = sha256(b"lot-b");
    registry
        .register(
            BatchRecord::register(b, roles.participants(), BOND).unwrap(),
            Value::base(BOND),
        )
        .unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.current(&a).unwrap().record.state, BatchState::Delivered);
    assert_eq!(registry.current(&b).unwrap().record.state, BatchState::Created);
}

#[test]
fn registered_output_decodes_back_to_the_record() {
    // The registry writes records as inline datums; the encoded entry point
    // must be able to read them back.
    let roles = Roles::generate();
    let record = BatchRecord::register(sha256(b"lot-datum"), roles.participants(), BOND).unwrap();
    let datum = provenance_contracts::script::encode_datum(&record).unwrap();
    let out = TxOut::to_script(supply_chain_hash(), Value::base(BOND), datum);
    assert_eq!(out.address, Address::Script(supply_chain_hash()));
    assert_eq!(decode_datum(out.datum.as_deref().unwrap()).unwrap(), record);
}
