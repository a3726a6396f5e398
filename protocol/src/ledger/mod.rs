//! # Ledger Model
//!
//! The slice of an extended-UTxO ledger that a spending validator can
//! observe. Records live in script outputs; moving a record means spending
//! its output and producing a new one, never editing it in place.
//!
//! - **value**: base-currency amounts plus other assets.
//! - **output**: addresses, outputs, and output references.
//! - **context**: the transaction view and script purpose a validator
//!   receives, including witness-verified signatories.

pub mod context;
pub mod output;
pub mod value;

pub use context::{ScriptContext, ScriptPurpose, TxBody, TxInfo, Witness};
pub use output::{Address, OutputRef, ScriptHash, TxInInfo, TxOut};
pub use value::Value;

use thiserror::Error;

/// Errors raised while building or inspecting ledger data.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("amount overflow")]
    AmountOverflow,

    #[error("witness for public key {public_key} does not verify")]
    InvalidWitness { public_key: String },

    #[error("encoding failed: {0}")]
    Encoding(String),
}
