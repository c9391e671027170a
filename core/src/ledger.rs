//! The player's resource ledger.
//!
//! Amounts are unsigned, so a balance can never go negative: deductions
//! clamp at zero and report how much was actually taken. Credits respect
//! optional per-resource storage capacities.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLedger {
    #[serde(rename = "resources", default)]
    amounts: BTreeMap<String, u64>,
    #[serde(
        rename = "storageCaps",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    caps:    BTreeMap<String, u64>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amount(mut self, resource: &str, amount: u64) -> Self {
        self.amounts.insert(resource.to_string(), amount);
        self
    }

    pub fn with_cap(mut self, resource: &str, cap: u64) -> Self {
        self.caps.insert(resource.to_string(), cap);
        self
    }

    pub fn amount(&self, resource: &str) -> u64 {
        self.amounts.get(resource).copied().unwrap_or(0)
    }

    pub fn cap(&self, resource: &str) -> Option<u64> {
        self.caps.get(resource).copied()
    }

    /// Add `amount`, clamped at the resource's storage cap if it has one.
    /// Returns the amount actually stored.
    pub fn credit(&mut self, resource: &str, amount: u64) -> u64 {
        let current = self.amount(resource);
        let target = match self.cap(resource) {
            Some(cap) => current.saturating_add(amount).min(cap.max(current)),
            None      => current.saturating_add(amount),
        };
        let applied = target - current;
        if applied < amount {
            log::debug!(
                "ledger: {resource} at capacity, discarded {} of {amount}",
                amount - applied
            );
        }
        self.amounts.insert(resource.to_string(), target);
        applied
    }

    /// Add `amount` ignoring storage caps.
    pub fn credit_uncapped(&mut self, resource: &str, amount: u64) -> u64 {
        let entry = self.amounts.entry(resource.to_string()).or_insert(0);
        *entry = entry.saturating_add(amount);
        amount
    }

    /// Subtract up to `amount`, never below zero. Returns what was deducted.
    pub fn debit_clamped(&mut self, resource: &str, amount: u64) -> u64 {
        let current = self.amount(resource);
        let deducted = current.min(amount);
        if deducted > 0 || self.amounts.contains_key(resource) {
            self.amounts.insert(resource.to_string(), current - deducted);
        }
        deducted
    }

    /// Deduct every cost in `bill`, or nothing at all if any balance is short.
    pub fn try_spend(&mut self, bill: &BTreeMap<&str, u64>) -> bool {
        if bill.iter().any(|(resource, amount)| self.amount(resource) < *amount) {
            return false;
        }
        for (resource, amount) in bill {
            let current = self.amount(resource);
            self.amounts.insert(resource.to_string(), current - amount);
        }
        true
    }

    /// Balances in resource-key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.amounts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}
