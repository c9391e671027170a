//! Game-state snapshot: the data model the tick engine mutates, and the
//! loader that builds it from a JSON seed document.
//!
//! Document shape (camelCase):
//!
//! ```json
//! {
//!   "playerId": "p1",
//!   "resources":   { "Food": 100 },
//!   "storageCaps": { "Food": 5000 },
//!   "cities": [{
//!     "displayName": "Riverton",
//!     "morale": 0.95,
//!     "production":     [{ "fields": 10, "outputPerField": 5, "resourceType": "Food" }],
//!     "trainingQueues": [{ "unitType": "Infantry", "quantity": 3, "durationSeconds": 120 }]
//!   }]
//! }
//! ```
//!
//! `cities` is required and display names must be unique. Per-city
//! containers default to empty. A training queue may also carry
//! `upkeepFoodPerTick` and `costs: [{ "resourceType", "amount" }]`.

use crate::{
    error::{SimError, SimResult},
    ledger::ResourceLedger,
    types::{CityId, ResourceKey, Seconds, UnitKey},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    pub cities:    Vec<City>,
    #[serde(flatten)]
    pub ledger:    ResourceLedger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub display_name:    CityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morale:          Option<f64>,
    #[serde(default)]
    pub production:      Vec<ProductionSite>,
    #[serde(default)]
    pub training_queues: Vec<TrainingQueue>,
    /// Units delivered by completed training, by unit type.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub garrison:        BTreeMap<UnitKey, u64>,
}

/// A worked allocation of tiles. Stateless across ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSite {
    pub fields:           u32,
    pub output_per_field: f64,
    pub resource_type:    ResourceKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingQueue {
    pub unit_type:            UnitKey,
    pub quantity:             u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds:     Option<Seconds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds_remaining:    Option<Seconds>,
    #[serde(default)]
    pub upkeep_food_per_tick: u64,
    /// Charged from the ledger once per cycle, before the countdown runs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub costs:                Vec<TrainingCost>,
    /// Whether the current cycle's costs have been paid.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub resources_committed:  bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingCost {
    pub resource_type: ResourceKey,
    pub amount:        u64,
}

impl GameSnapshot {
    pub fn new(cities: Vec<City>, ledger: ResourceLedger) -> Self {
        Self { player_id: None, cities, ledger }
    }

    /// Parse a snapshot document. Any shape mismatch is a `MalformedSnapshot`.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| SimError::malformed(e.to_string()))?;
        snapshot.check_city_names()?;
        Ok(snapshot)
    }

    /// Cities are keyed by display name, so names must be unique.
    pub fn check_city_names(&self) -> SimResult<()> {
        let mut seen = BTreeSet::new();
        for city in &self.cities {
            if !seen.insert(city.display_name.as_str()) {
                return Err(SimError::malformed(format!(
                    "duplicate city displayName '{}'",
                    city.display_name
                )));
            }
        }
        Ok(())
    }

    /// Read and parse a snapshot document from disk.
    pub fn load(path: &str) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let snapshot = Self::from_json(&content)?;
        log::info!(
            "loaded snapshot from {path}: {} cities, {} ledger entries",
            snapshot.cities.len(),
            snapshot.ledger.iter().count()
        );
        Ok(snapshot)
    }

    pub fn to_json_pretty(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn city(&self, name: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.display_name == name)
    }
}

impl City {
    pub fn new(display_name: &str) -> Self {
        Self {
            display_name:    display_name.to_string(),
            morale:          None,
            production:      Vec::new(),
            training_queues: Vec::new(),
            garrison:        BTreeMap::new(),
        }
    }

    pub fn with_morale(mut self, morale: f64) -> Self {
        self.morale = Some(morale);
        self
    }

    pub fn with_site(mut self, fields: u32, output_per_field: f64, resource_type: &str) -> Self {
        self.production.push(ProductionSite {
            fields,
            output_per_field,
            resource_type: resource_type.to_string(),
        });
        self
    }

    pub fn with_queue(mut self, queue: TrainingQueue) -> Self {
        self.training_queues.push(queue);
        self
    }

    pub fn garrison_count(&self, unit_type: &str) -> u64 {
        self.garrison.get(unit_type).copied().unwrap_or(0)
    }
}

impl TrainingQueue {
    /// A queue with a full countdown ahead of it.
    pub fn new(unit_type: &str, quantity: u32, duration_seconds: Seconds) -> Self {
        Self {
            unit_type:            unit_type.to_string(),
            quantity,
            duration_seconds:     Some(duration_seconds),
            seconds_remaining:    None,
            upkeep_food_per_tick: 0,
            costs:                Vec::new(),
            resources_committed:  false,
        }
    }

    pub fn with_remaining(mut self, seconds_remaining: Seconds) -> Self {
        self.seconds_remaining = Some(seconds_remaining);
        self
    }

    pub fn with_upkeep(mut self, food_per_tick: u64) -> Self {
        self.upkeep_food_per_tick = food_per_tick;
        self
    }

    pub fn with_cost(mut self, resource_type: &str, amount: u64) -> Self {
        self.costs.push(TrainingCost { resource_type: resource_type.to_string(), amount });
        self
    }

    /// Whether a new cycle must be paid for before counting down.
    pub fn needs_payment(&self) -> bool {
        !self.costs.is_empty() && !self.resources_committed
    }

    /// A depleted queue trains nothing and is skipped by the engine.
    pub fn is_idle(&self) -> bool {
        self.quantity == 0
    }
}
