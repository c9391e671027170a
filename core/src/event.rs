//! Per-tick event stream.
//!
//! Events are derived from the tick reports after each tick and carry no
//! state of their own. Reporters consume them; the engine never does.
//! Variants may be appended but are never removed or reordered.

use crate::{
    engine::TickReport,
    types::{CityId, ResourceKey, Seconds, Tick, UnitKey},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Driver events ──────────────────────────────
    TickStarted {
        tick: Tick,
    },
    TickCompleted {
        tick:            Tick,
        elapsed_seconds: Seconds,
    },

    // ── City events ────────────────────────────────
    ResourcesProduced {
        tick:     Tick,
        city:     CityId,
        resource: ResourceKey,
        amount:   u64,
    },
    TrainingCompleted {
        tick:      Tick,
        city:      CityId,
        unit_type: UnitKey,
        quantity:  u32,
    },
    UpkeepCharged {
        tick:     Tick,
        city:     CityId,
        resource: ResourceKey,
        amount:   u64,
    },
    QueueDepleted {
        tick:      Tick,
        city:      CityId,
        unit_type: UnitKey,
    },

    // ── Training cost events ───────────────────────
    ResourcesSpent {
        tick:     Tick,
        city:     CityId,
        resource: ResourceKey,
        amount:   u64,
    },
    TrainingWaiting {
        tick:      Tick,
        city:      CityId,
        unit_type: UnitKey,
    },
}

/// Expand one tick's reports into the ordered event stream:
/// start, then each city's production, training spend, waiting queues,
/// completions, upkeep, depletions, then completion.
pub fn events_for_tick(tick: Tick, elapsed_seconds: Seconds, reports: &[TickReport]) -> Vec<SimEvent> {
    let mut events = vec![SimEvent::TickStarted { tick }];

    for report in reports {
        let city = &report.city_id;
        events.extend(report.produced_by_resource.iter().map(|(resource, amount)| {
            SimEvent::ResourcesProduced {
                tick,
                city:     city.clone(),
                resource: resource.clone(),
                amount:   *amount,
            }
        }));
        events.extend(report.spent_by_resource.iter().map(|(resource, amount)| {
            SimEvent::ResourcesSpent {
                tick,
                city:     city.clone(),
                resource: resource.clone(),
                amount:   *amount,
            }
        }));
        events.extend(report.waiting_queues.iter().map(|unit_type| {
            SimEvent::TrainingWaiting {
                tick,
                city:      city.clone(),
                unit_type: unit_type.clone(),
            }
        }));
        events.extend(report.completed_trainings.iter().map(|done| {
            SimEvent::TrainingCompleted {
                tick,
                city:      city.clone(),
                unit_type: done.unit_type.clone(),
                quantity:  done.quantity,
            }
        }));
        events.extend(report.upkeep_by_resource.iter().map(|(resource, amount)| {
            SimEvent::UpkeepCharged {
                tick,
                city:     city.clone(),
                resource: resource.clone(),
                amount:   *amount,
            }
        }));
        events.extend(report.depleted_queues.iter().map(|unit_type| {
            SimEvent::QueueDepleted {
                tick,
                city:      city.clone(),
                unit_type: unit_type.clone(),
            }
        }));
    }

    events.push(SimEvent::TickCompleted { tick, elapsed_seconds });
    events
}

/// Extract a stable string name from a SimEvent variant.
pub fn event_type_name(event: &SimEvent) -> &'static str {
    match event {
        SimEvent::TickStarted { .. }       => "tick_started",
        SimEvent::TickCompleted { .. }     => "tick_completed",
        SimEvent::ResourcesProduced { .. } => "resources_produced",
        SimEvent::TrainingCompleted { .. } => "training_completed",
        SimEvent::UpkeepCharged { .. }     => "upkeep_charged",
        SimEvent::QueueDepleted { .. }     => "queue_depleted",
        SimEvent::ResourcesSpent { .. }    => "resources_spent",
        SimEvent::TrainingWaiting { .. }   => "training_waiting",
    }
}
