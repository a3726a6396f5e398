//! In-memory lifecycle simulation.
//!
//! Plays every step of the batch workflow in order (create, to transit,
//! to warehouse, to delivered, then verify or reject) against a
//! [`BatchRegistry`], with a freshly generated key per role.

use anyhow::{anyhow, Context, Result};

use provenance_contracts::registry::{BatchRegistry, RegistryEntry};
use provenance_contracts::script::supply_chain_hash;
use provenance_contracts::supply_chain::{BatchRecord, BatchState, Participants, SupplyAction};
use provenance_protocol::config::coins_to_base_units;
use provenance_protocol::crypto::{sha256, Keypair};
use provenance_protocol::identity::Identity;
use provenance_protocol::ledger::{TxOut, Value};

use crate::cli::SimulateArgs;

struct RoleKeys {
    manufacturer: Keypair,
    transporter: Keypair,
    warehouse: Keypair,
    retailer: Keypair,
    verifier: Keypair,
}

impl RoleKeys {
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

/// Runs the lifecycle and returns the batch's full custody trail.
pub fn run(args: &SimulateArgs) -> Result<Vec<RegistryEntry>> {
    let bond = coins_to_base_units(args.bond)
        .ok_or_else(|| anyhow!("bond of {} coins overflows", args.bond))?;
    let keys = RoleKeys::generate();
    let participants = keys.participants();
    let batch_hash = sha256(args.batch.as_bytes());

    tracing::info!(
        batch = %args.batch,
        bond,
        manufacturer = %participants.manufacturer,
        verifier = %participants.verifier,
        "simulating batch lifecycle"
    );

    let mut registry = BatchRegistry::new(supply_chain_hash());
    let record = BatchRecord::register(batch_hash, participants, bond)
        .context("failed to build batch record")?;
    registry
        .register(record, Value::base(bond))
        .context("failed to register batch")?;

    let steps: [(BatchState, &Keypair); 3] = [
        (BatchState::InTransit, &keys.transporter),
        (BatchState::Warehoused, &keys.warehouse),
        (BatchState::Delivered, &keys.retailer),
    ];
    for (target, signer) in steps {
        registry
            .advance(&batch_hash, SupplyAction::Advance(target), vec![], &[signer])
            .with_context(|| format!("failed to advance batch to {}", target))?;
    }

    let (terminal, payee) = if args.reject {
        (BatchState::Rejected, participants.verifier)
    } else {
        (BatchState::Verified, participants.manufacturer)
    };
    registry
        .advance(
            &batch_hash,
            SupplyAction::Advance(terminal),
            vec![TxOut::to_key(payee, Value::base(bond))],
            &[&keys.verifier],
        )
        .with_context(|| format!("failed to finalize batch as {}", terminal))?;

    Ok(registry.history(&batch_hash).to_vec())
}
