//! Currency values carried by transaction outputs.
//!
//! A [`Value`] holds an amount of the base currency plus any number of
//! other named assets. Bond rules only ever look at the base amount, so a
//! pile of some unrelated token never stands in for the bond.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::LedgerError;
use crate::config::BASE_CURRENCY;

/// Multi-asset amount. Amounts are in smallest units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    /// Base-currency amount.
    pub base: u64,
    /// Other assets keyed by asset name. Zero entries are never stored.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assets: BTreeMap<String, u64>,
}

impl Value {
    /// A value holding only the base currency.
    pub fn base(amount: u64) -> Self {
        Self {
            base: amount,
            assets: BTreeMap::new(),
        }
    }

    /// Adds `quantity` of a named asset. Zero quantities are ignored.
    pub fn with_asset(mut self, name: impl Into<String>, quantity: u64) -> Self {
        if quantity > 0 {
            let entry = self.assets.entry(name.into()).or_insert(0);
            *entry = entry.saturating_add(quantity);
        }
        self
    }

    /// Base-currency amount. The only amount a bond check reads.
    pub fn base_amount(&self) -> u64 {
        self.base
    }

    pub fn asset_amount(&self, name: &str) -> u64 {
        self.assets.get(name).copied().unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.base == 0 && self.assets.is_empty()
    }

    /// Component-wise sum, failing on overflow.
    pub fn checked_add(&self, other: &Value) -> Result<Value, LedgerError> {
        let base = self
            .base
            .checked_add(other.base)
            .ok_or(LedgerError::AmountOverflow)?;
        let mut assets = self.assets.clone();
        for (name, qty) in &other.assets {
            let entry = assets.entry(name.clone()).or_insert(0);
            *entry = entry.checked_add(*qty).ok_or(LedgerError::AmountOverflow)?;
        }
        Ok(Value { base, assets })
    }

    /// Component-wise sum where each amount saturates on its own. An asset
    /// hitting `u64::MAX` leaves `base` untouched.
    pub fn saturating_add(&self, other: &Value) -> Value {
        let mut assets = self.assets.clone();
        for (name, qty) in &other.assets {
            let entry = assets.entry(name.clone()).or_insert(0);
            *entry = entry.saturating_add(*qty);
        }
        Value {
            base: self.base.saturating_add(other.base),
            assets,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.base, BASE_CURRENCY)?;
        for (name, qty) in &self.assets {
            write!(f, " + {} {}", qty, name)?;
        }
        Ok(())
    }
}
