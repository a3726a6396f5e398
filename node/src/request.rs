//! Transition request files for the `validate` subcommand.
//!
//! ```json
//! {
//!   "record":  { "batch_hash": "…", "manufacturer": "…", …, "state": "Delivered" },
//!   "action":  14,
//!   "context": { "tx_info": { … }, "purpose": { "Spending": { … } } }
//! }
//! ```
//!
//! `action` is either the integer code front-ends send (state index, or
//! index + 10 for verify/reject) or the typed form `{"Advance": "Verified"}`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use provenance_contracts::supply_chain::{evaluate, BatchRecord, SupplyAction, TransitionReport};
use provenance_protocol::ledger::ScriptContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionInput {
    Code(u64),
    Typed(SupplyAction),
}

impl ActionInput {
    pub fn resolve(&self) -> Result<SupplyAction> {
        match self {
            ActionInput::Code(code) => SupplyAction::from_code(*code)
                .with_context(|| format!("cannot interpret action code {}", code)),
            ActionInput::Typed(action) => Ok(*action),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub record: BatchRecord,
    pub action: ActionInput,
    pub context: ScriptContext,
}

impl TransitionRequest {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse request file {}", path.display()))
    }

    pub fn evaluate(&self) -> Result<TransitionReport> {
        let action = self.action.resolve()?;
        Ok(evaluate(&self.record, &action, &self.context))
    }
}
