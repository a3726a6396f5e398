//! # Supply-Chain Provenance Validator
//!
//! Guards the script output that carries a batch record. A batch moves
//! through a fixed graph of states:
//!
//! ```text
//! Created -> InTransit -> Warehoused -> Delivered -> Verified
//!                                              \--> Rejected
//! ```
//!
//! Each move is a transaction spending the current record. The validator
//! accepts it only when three checks hold:
//!
//! 1. **Transition**: the target is one edge away from the current state.
//! 2. **Authorization**: the role owning the target state signed.
//! 3. **Bond**: the escrowed bond is still intact (non-terminal targets),
//!    or has been paid out to the manufacturer (Verified) or to the
//!    verifier (Rejected).
//!
//! All three are always evaluated so the report names every failure;
//! [`validate`] surfaces the first one in the order above.
//!
//! ## Known limitation
//!
//! The terminal bond check looks only at what was paid *to* the
//! manufacturer or verifier. It does not check that the payment is funded
//! from the escrowed record, nor who paid it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use provenance_protocol::config::{FINALIZE_CODE_OFFSET, STATE_COUNT};
use provenance_protocol::identity::Identity;
use provenance_protocol::ledger::ScriptContext;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a transition request was rejected. All variants are terminal for the
/// request as submitted; a corrected request may be resubmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("invalid state transition")]
    InvalidTransition,

    #[error("unauthorized signer")]
    UnauthorizedSigner,

    #[error("bond handling invalid")]
    InvalidBondHandling,
}

/// Errors constructing a batch record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("bond amount must be positive")]
    ZeroBond,

    #[error("unknown batch state index {0}")]
    UnknownState(u64),

    #[error("unknown action code {0}")]
    UnknownActionCode(u64),
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Lifecycle state of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchState {
    Created,
    InTransit,
    Warehoused,
    Delivered,
    Verified,
    Rejected,
}

impl BatchState {
    pub const ALL: [BatchState; 6] = [
        BatchState::Created,
        BatchState::InTransit,
        BatchState::Warehoused,
        BatchState::Delivered,
        BatchState::Verified,
        BatchState::Rejected,
    ];

    /// Integer index used by off-chain clients: 0 = Created .. 5 = Rejected.
    pub fn index(self) -> u64 {
        match self {
            BatchState::Created => 0,
            BatchState::InTransit => 1,
            BatchState::Warehoused => 2,
            BatchState::Delivered => 3,
            BatchState::Verified => 4,
            BatchState::Rejected => 5,
        }
    }

    pub fn from_index(index: u64) -> Result<Self, RecordError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(RecordError::UnknownState(index))
    }

    /// Verified and Rejected have no outgoing edges.
    pub fn is_terminal(self) -> bool {
        matches!(self, BatchState::Verified | BatchState::Rejected)
    }

    /// Every state reachable in one step.
    pub fn successors(self) -> &'static [BatchState] {
        match self {
            BatchState::Created => &[BatchState::InTransit],
            BatchState::InTransit => &[BatchState::Warehoused],
            BatchState::Warehoused => &[BatchState::Delivered],
            BatchState::Delivered => &[BatchState::Verified, BatchState::Rejected],
            BatchState::Verified | BatchState::Rejected => &[],
        }
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchState::Created => write!(f, "Created"),
            BatchState::InTransit => write!(f, "InTransit"),
            BatchState::Warehoused => write!(f, "Warehoused"),
            BatchState::Delivered => write!(f, "Delivered"),
            BatchState::Verified => write!(f, "Verified"),
            BatchState::Rejected => write!(f, "Rejected"),
        }
    }
}

/// The five actors a batch record names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Manufacturer,
    Transporter,
    Warehouse,
    Retailer,
    Verifier,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Manufacturer => write!(f, "manufacturer"),
            Role::Transporter => write!(f, "transporter"),
            Role::Warehouse => write!(f, "warehouse"),
            Role::Retailer => write!(f, "retailer"),
            Role::Verifier => write!(f, "verifier"),
        }
    }
}

/// The record (datum) locked at the validator for one batch.
///
/// Never edited in place: an accepted transition spends this record and
/// locks a successor produced by [`BatchRecord::advanced_to`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    /// Content hash of the physical batch, hex-encoded in JSON.
    #[serde(with = "provenance_protocol::encoding::hex32")]
    pub batch_hash: [u8; 32],
    pub manufacturer: Identity,
    pub transporter: Identity,
    pub warehouse: Identity,
    pub retailer: Identity,
    pub verifier: Identity,
    /// Bond in smallest base-currency units.
    pub bond_amount: u64,
    pub state: BatchState,
}

/// The five role identities, grouped for construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    pub manufacturer: Identity,
    pub transporter: Identity,
    pub warehouse: Identity,
    pub retailer: Identity,
    pub verifier: Identity,
}

impl BatchRecord {
    /// A freshly registered batch, in `Created`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::ZeroBond`] if `bond_amount` is zero.
    pub fn register(
        batch_hash: [u8; 32],
        participants: Participants,
        bond_amount: u64,
    ) -> Result<Self, RecordError> {
        if bond_amount == 0 {
            return Err(RecordError::ZeroBond);
        }
        Ok(Self {
            batch_hash,
            manufacturer: participants.manufacturer,
            transporter: participants.transporter,
            warehouse: participants.warehouse,
            retailer: participants.retailer,
            verifier: participants.verifier,
            bond_amount,
            state: BatchState::Created,
        })
    }

    pub fn identity_of(&self, role: Role) -> &Identity {
        match role {
            Role::Manufacturer => &self.manufacturer,
            Role::Transporter => &self.transporter,
            Role::Warehouse => &self.warehouse,
            Role::Retailer => &self.retailer,
            Role::Verifier => &self.verifier,
        }
    }

    /// The successor record: identical except for `state`.
    pub fn advanced_to(&self, state: BatchState) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }

    pub fn batch_hash_hex(&self) -> String {
        hex::encode(self.batch_hash)
    }
}

/// The redeemer: what the spender asks the validator to allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplyAction {
    /// Move the batch to this state.
    Advance(BatchState),
}

impl SupplyAction {
    pub fn target(&self) -> BatchState {
        match self {
            SupplyAction::Advance(state) => *state,
        }
    }

    /// Compact integer form: the target's index for advances, and the
    /// index plus [`FINALIZE_CODE_OFFSET`] for terminal targets.
    pub fn to_code(&self) -> u64 {
        let target = self.target();
        if target.is_terminal() {
            target.index() + FINALIZE_CODE_OFFSET
        } else {
            target.index()
        }
    }

    /// Parses either a plain state index or a finalize code. Finalize codes
    /// are only valid for terminal targets.
    pub fn from_code(code: u64) -> Result<Self, RecordError> {
        if code < STATE_COUNT {
            return BatchState::from_index(code).map(SupplyAction::Advance);
        }
        let index = code
            .checked_sub(FINALIZE_CODE_OFFSET)
            .ok_or(RecordError::UnknownActionCode(code))?;
        match BatchState::from_index(index) {
            Ok(state) if state.is_terminal() => Ok(SupplyAction::Advance(state)),
            _ => Err(RecordError::UnknownActionCode(code)),
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// `true` iff `to` is exactly one edge away from `from`.
pub fn valid_transition(from: BatchState, to: BatchState) -> bool {
    matches!(
        (from, to),
        (BatchState::Created, BatchState::InTransit)
            | (BatchState::InTransit, BatchState::Warehoused)
            | (BatchState::Warehoused, BatchState::Delivered)
            | (BatchState::Delivered, BatchState::Verified)
            | (BatchState::Delivered, BatchState::Rejected)
    )
}

/// The role allowed to move a batch into `target`. `Created` is only ever
/// entered by registration, so no role owns it.
pub fn authorized_role(target: BatchState) -> Option<Role> {
    match target {
        BatchState::Created => None,
        BatchState::InTransit => Some(Role::Transporter),
        BatchState::Warehoused => Some(Role::Warehouse),
        BatchState::Delivered => Some(Role::Retailer),
        BatchState::Verified | BatchState::Rejected => Some(Role::Verifier),
    }
}

fn signer_ok(record: &BatchRecord, target: BatchState, ctx: &ScriptContext) -> bool {
    authorized_role(target)
        .map(|role| ctx.tx_info.signed_by(record.identity_of(role)))
        .unwrap_or(false)
}

fn bond_ok(record: &BatchRecord, target: BatchState, ctx: &ScriptContext) -> bool {
    match target {
        BatchState::Verified => {
            ctx.tx_info.value_paid_to(&record.manufacturer).base_amount() >= record.bond_amount
        }
        BatchState::Rejected => {
            ctx.tx_info.value_paid_to(&record.verifier).base_amount() >= record.bond_amount
        }
        _ => match ctx.find_own_input() {
            Some(input) => input.resolved.value.base_amount() >= record.bond_amount,
            None => {
                debug!("transaction does not spend the validated output");
                false
            }
        },
    }
}

/// Outcome of all three checks for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionReport {
    pub transition_ok: bool,
    pub signer_ok: bool,
    pub bond_ok: bool,
}

impl TransitionReport {
    pub fn accepted(&self) -> bool {
        self.transition_ok && self.signer_ok && self.bond_ok
    }

    /// Every failing check, in check order.
    pub fn failures(&self) -> Vec<ValidationError> {
        let mut failures = Vec::new();
        if !self.transition_ok {
            failures.push(ValidationError::InvalidTransition);
        }
        if !self.signer_ok {
            failures.push(ValidationError::UnauthorizedSigner);
        }
        if !self.bond_ok {
            failures.push(ValidationError::InvalidBondHandling);
        }
        failures
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self.failures().first() {
            Some(err) => Err(*err),
            None => Ok(()),
        }
    }
}

/// Runs every check and reports each outcome.
pub fn evaluate(record: &BatchRecord, action: &SupplyAction, ctx: &ScriptContext) -> TransitionReport {
    let target = action.target();
    let report = TransitionReport {
        transition_ok: valid_transition(record.state, target),
        signer_ok: signer_ok(record, target, ctx),
        bond_ok: bond_ok(record, target, ctx),
    };
    debug!(
        batch = %record.batch_hash_hex(),
        from = %record.state,
        to = %target,
        transition_ok = report.transition_ok,
        signer_ok = report.signer_ok,
        bond_ok = report.bond_ok,
        "transition evaluated"
    );
    report
}

/// Accepts or rejects a request to move `record` as `action` asks.
///
/// # Errors
///
/// The first failing check, in order: [`ValidationError::InvalidTransition`],
/// [`ValidationError::UnauthorizedSigner`], [`ValidationError::InvalidBondHandling`].
pub fn validate(
    record: &BatchRecord,
    action: &SupplyAction,
    ctx: &ScriptContext,
) -> Result<(), ValidationError> {
    let report = evaluate(record, action, ctx);
    if !report.accepted() {
        warn!(
            batch = %record.batch_hash_hex(),
            from = %record.state,
            to = %action.target(),
            failures = ?report.failures(),
            "transition rejected"
        );
    }
    report.into_result()
}
