//! The tick engine: advances one city by exactly one tick.
//!
//! ORDER within a city (fixed):
//!   1. Validate every active training queue. Nothing is mutated on failure.
//!   2. Morale factor.
//!   3. Production, credited to the player's ledger.
//!   4. Training: pay costs for new cycles, count down, complete.
//!   5. Queue upkeep, debited from the ledger and clamped at zero.
//!
//! The engine performs no I/O. Its only inputs are the city, the ledger,
//! and the `TickConfig` it was built with.

use crate::{
    config::TickConfig,
    error::SimResult,
    ledger::ResourceLedger,
    policy::QueueCompletionPolicy,
    production::{city_morale, morale_factor, produce},
    snapshot::{City, GameSnapshot},
    training::{advance_queues, validate_queues, CompletedTraining, QueueTimer},
    types::{CityId, ResourceKey, UnitKey, UPKEEP_RESOURCE},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What happened to one city during one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub city_id:              CityId,
    pub morale_factor_used:   f64,
    pub produced_by_resource: BTreeMap<ResourceKey, u64>,
    pub completed_trainings:  Vec<CompletedTraining>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub upkeep_by_resource:   BTreeMap<ResourceKey, u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depleted_queues:      Vec<UnitKey>,
    /// Training costs paid when queues started a new cycle.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub spent_by_resource:    BTreeMap<ResourceKey, u64>,
    /// Queues that could not afford their next cycle this tick.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waiting_queues:       Vec<UnitKey>,
}

impl TickReport {
    pub fn produced(&self, resource: &str) -> u64 {
        self.produced_by_resource.get(resource).copied().unwrap_or(0)
    }
}

pub struct TickEngine {
    config: TickConfig,
    policy: Box<dyn QueueCompletionPolicy>,
}

impl std::fmt::Debug for TickEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickEngine")
            .field("config", &self.config)
            .field("policy", &self.policy.name())
            .finish()
    }
}

impl TickEngine {
    /// Build an engine using the policy named in the config.
    pub fn new(config: TickConfig) -> SimResult<Self> {
        let policy = config.completion_policy.build();
        Self::with_policy(config, policy)
    }

    /// Build an engine with a caller-supplied completion policy.
    pub fn with_policy(
        config: TickConfig,
        policy: Box<dyn QueueCompletionPolicy>,
    ) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config, policy })
    }

    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Check city names and every city's queues without mutating the snapshot.
    pub fn validate(&self, snapshot: &GameSnapshot) -> SimResult<()> {
        self.resolve_timers(snapshot).map(|_| ())
    }

    /// Advance `city` by one tick, applying production, training costs and
    /// upkeep to `ledger`.
    pub fn apply_tick(&self, city: &mut City, ledger: &mut ResourceLedger) -> SimResult<TickReport> {
        let timers = validate_queues(city)?;
        Ok(self.tick_city(city, timers, ledger))
    }

    /// Advance every city in list order. The whole snapshot is validated
    /// once up front, so an invalid queue anywhere aborts before any city
    /// changes.
    pub fn tick_all(&self, snapshot: &mut GameSnapshot) -> SimResult<Vec<TickReport>> {
        let timers = self.resolve_timers(snapshot)?;
        let GameSnapshot { cities, ledger, .. } = snapshot;
        let reports = cities
            .iter_mut()
            .zip(timers)
            .map(|(city, city_timers)| self.tick_city(city, city_timers, &mut *ledger))
            .collect();
        Ok(reports)
    }

    fn resolve_timers(&self, snapshot: &GameSnapshot) -> SimResult<Vec<Vec<Option<QueueTimer>>>> {
        snapshot.check_city_names()?;
        snapshot.cities.iter().map(validate_queues).collect()
    }

    /// One tick for a city whose queues are already resolved into `timers`.
    fn tick_city(
        &self,
        city:   &mut City,
        timers: Vec<Option<QueueTimer>>,
        ledger: &mut ResourceLedger,
    ) -> TickReport {
        let morale = city_morale(city, &self.config);
        let factor = morale_factor(morale, &self.config);

        let produced = produce(city, factor);
        for (resource, amount) in &produced {
            if self.config.enforce_storage_caps {
                ledger.credit(resource, *amount);
            } else {
                ledger.credit_uncapped(resource, *amount);
            }
        }

        let progress = advance_queues(
            city,
            timers,
            self.config.seconds_per_tick,
            self.policy.as_ref(),
            ledger,
        );

        let mut upkeep = BTreeMap::new();
        if progress.upkeep_food > 0 {
            let paid = ledger.debit_clamped(UPKEEP_RESOURCE, progress.upkeep_food);
            if paid < progress.upkeep_food {
                log::warn!(
                    "{}: upkeep shortfall, owed {} {UPKEEP_RESOURCE} but only {paid} available",
                    city.display_name,
                    progress.upkeep_food
                );
            }
            upkeep.insert(UPKEEP_RESOURCE.to_string(), paid);
        }

        log::debug!(
            "{}: morale={morale:.2} factor={factor:.2} produced={produced:?} completed={} waiting={}",
            city.display_name,
            progress.completions.len(),
            progress.waiting.len()
        );

        TickReport {
            city_id:              city.display_name.clone(),
            morale_factor_used:   factor,
            produced_by_resource: produced,
            completed_trainings:  progress.completions,
            upkeep_by_resource:   upkeep,
            depleted_queues:      progress.depleted,
            spent_by_resource:    progress.spent,
            waiting_queues:       progress.waiting,
        }
    }
}
