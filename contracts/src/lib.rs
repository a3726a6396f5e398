//! # Provenance Contracts
//!
//! On-chain logic for tracking a physical batch from manufacturer to
//! verified (or rejected) delivery:
//!
//! - **Supply Chain**: the validator guarding each batch record: the
//!   transition graph, the role that may take each edge, and the bond rule.
//! - **Script**: the encoded entry point the ledger calls, and the
//!   descriptor naming the deployed validator.
//! - **Registry**: an in-memory ledger of batch records that applies
//!   accepted transitions by replacing records, never mutating them.
//!
//! ## Design Principles
//!
//! 1. States are enum variants, and the graph is a single `match`.
//! 2. The validator is a pure function of record, action and context.
//! 3. Bond comparisons only ever read the base currency.
//! 4. Every public type is serializable (serde) for wire transport and
//!    request files.

pub mod registry;
pub mod script;
pub mod supply_chain;

pub use registry::{BatchRegistry, RegistryEntry, RegistryError};
pub use script::{run_encoded, ScriptDescriptor, ScriptError};
pub use supply_chain::{
    evaluate, validate, BatchRecord, BatchState, Participants, Role, SupplyAction,
    TransitionReport, ValidationError,
};
