//! Tick engine configuration.
//!
//! Every tunable the engine consults lives here and is passed in
//! explicitly, so concurrent runs with different settings never share
//! ambient state. In tests, use `TickConfig::default()`.

use crate::{
    error::{SimError, SimResult},
    policy::CompletionPolicyKind,
    types::Seconds,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// In-game seconds represented by one tick.
    pub seconds_per_tick:     Seconds,
    /// Morale assumed for cities that carry none.
    pub default_morale:       f64,
    /// At or above this morale, the factor equals morale.
    pub morale_threshold:     f64,
    /// Below the threshold, the factor never drops under this floor.
    pub morale_floor:         f64,
    pub completion_policy:    CompletionPolicyKind,
    /// Clamp ledger credits at the snapshot's storage capacities.
    pub enforce_storage_caps: bool,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            seconds_per_tick:     60,
            default_morale:       1.0,
            morale_threshold:     0.9,
            morale_floor:         0.35,
            completion_policy:    CompletionPolicyKind::Repeat,
            enforce_storage_caps: true,
        }
    }
}

impl TickConfig {
    /// Load from a JSON file. Keys that are absent keep their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: TickConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_policy(mut self, policy: CompletionPolicyKind) -> Self {
        self.completion_policy = policy;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.seconds_per_tick == 0 {
            return Err(invalid("seconds_per_tick must be greater than zero"));
        }
        for (name, value) in [
            ("default_morale", self.default_morale),
            ("morale_threshold", self.morale_threshold),
            ("morale_floor", self.morale_floor),
        ] {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite, got {value}")));
            }
            if value < 0.0 {
                return Err(invalid(format!("{name} must not be negative, got {value}")));
            }
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> SimError {
    SimError::InvalidConfig { reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_scenario() {
        let config = TickConfig::default();
        assert_eq!(config.seconds_per_tick, 60);
        assert_eq!(config.completion_policy, CompletionPolicyKind::Repeat);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: TickConfig =
            serde_json::from_str(r#"{ "seconds_per_tick": 30, "completion_policy": "deplete_and_stop" }"#)
                .unwrap();
        assert_eq!(config.seconds_per_tick, 30);
        assert_eq!(config.completion_policy, CompletionPolicyKind::DepleteAndStop);
        assert!((config.morale_floor - 0.35).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_tick_duration_is_rejected() {
        let config = TickConfig { seconds_per_tick: 0, ..TickConfig::default() };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig { .. })));
    }

    #[test]
    fn non_finite_morale_setting_is_rejected() {
        let config = TickConfig { morale_floor: f64::NAN, ..TickConfig::default() };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig { .. })));
    }
}
