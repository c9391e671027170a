//! Training-queue countdown, completion, and upkeep.
//!
//! Every active queue counts down by the tick's length. A queue with
//! training costs pays them when a cycle starts and only then counts
//! down; after completion the next cycle must be paid for again. A queue
//! that reaches zero reports one completion for its batch, delivers the
//! units to the city garrison, and hands itself to the completion policy.
//! Queues with quantity 0 are idle and skipped entirely.

use crate::{
    error::{SimError, SimResult},
    ledger::ResourceLedger,
    policy::QueueCompletionPolicy,
    snapshot::{City, TrainingQueue},
    types::{ResourceKey, Seconds, UnitKey},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A batch of units that finished training this tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTraining {
    pub quantity:  u32,
    pub unit_type: UnitKey,
}

/// Resolved countdown state of one queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueTimer {
    pub duration:  Seconds,
    pub remaining: Seconds,
}

/// What the training pass did to a city this tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingProgress {
    pub completions: Vec<CompletedTraining>,
    /// Food owed by active queues this tick, before any clamping.
    pub upkeep_food: u64,
    /// Queues the policy left idle this tick.
    pub depleted:    Vec<UnitKey>,
    /// Training costs paid this tick, by resource.
    pub spent:       BTreeMap<ResourceKey, u64>,
    /// Queues that could not pay for their next cycle.
    pub waiting:     Vec<UnitKey>,
}

/// Establish a queue's cycle length and current countdown.
///
/// `secondsRemaining` defaults to `durationSeconds`. A queue with no
/// duration adopts its remaining countdown as the cycle length; a queue
/// with neither is rejected rather than given a guessed duration.
pub fn resolve_queue(city: &str, queue: &TrainingQueue) -> SimResult<QueueTimer> {
    let duration = queue
        .duration_seconds
        .or(queue.seconds_remaining)
        .ok_or_else(|| {
            invalid(city, queue, "neither durationSeconds nor secondsRemaining is set")
        })?;
    if duration == 0 {
        return Err(invalid(city, queue, "durationSeconds must be positive"));
    }
    let remaining = queue.seconds_remaining.unwrap_or(duration);
    if remaining > duration {
        return Err(invalid(
            city,
            queue,
            &format!("secondsRemaining {remaining} exceeds durationSeconds {duration}"),
        ));
    }
    Ok(QueueTimer { duration, remaining })
}

/// Check every active queue in the city without touching anything.
pub fn validate_queues(city: &City) -> SimResult<Vec<Option<QueueTimer>>> {
    city.training_queues
        .iter()
        .map(|queue| {
            if queue.is_idle() {
                Ok(None)
            } else {
                resolve_queue(&city.display_name, queue).map(Some)
            }
        })
        .collect()
}

/// Advance every queue in the city by `seconds`.
///
/// `timers` must come from `validate_queues` on the same city. A queue
/// with unpaid `costs` first tries to pay them from `ledger` in full; if
/// it cannot, it waits this tick without counting down or owing upkeep.
pub fn advance_queues(
    city:    &mut City,
    timers:  Vec<Option<QueueTimer>>,
    seconds: Seconds,
    policy:  &dyn QueueCompletionPolicy,
    ledger:  &mut ResourceLedger,
) -> TrainingProgress {
    let mut progress = TrainingProgress::default();

    let City { display_name, training_queues, garrison, .. } = city;

    for (queue, timer) in training_queues.iter_mut().zip(timers) {
        let Some(timer) = timer else { continue };

        queue.duration_seconds = Some(timer.duration);
        queue.seconds_remaining = Some(timer.remaining);

        if queue.needs_payment() {
            let bill = cost_bill(queue);
            if !ledger.try_spend(&bill) {
                log::debug!("{display_name}: waiting for resources to train {}", queue.unit_type);
                progress.waiting.push(queue.unit_type.clone());
                continue;
            }
            for (resource, amount) in bill {
                let spent = progress.spent.entry(resource.to_string()).or_insert(0);
                *spent = spent.saturating_add(amount);
            }
            queue.resources_committed = true;
            log::debug!("{display_name}: began training {} {}", queue.quantity, queue.unit_type);
        }

        let remaining = timer.remaining.saturating_sub(seconds);
        queue.seconds_remaining = Some(remaining);
        progress.upkeep_food = progress.upkeep_food.saturating_add(queue.upkeep_food_per_tick);

        if remaining > 0 {
            continue;
        }

        progress.completions.push(CompletedTraining {
            quantity:  queue.quantity,
            unit_type: queue.unit_type.clone(),
        });
        let units = garrison.entry(queue.unit_type.clone()).or_insert(0);
        *units = units.saturating_add(u64::from(queue.quantity));
        log::debug!(
            "{display_name}: completed {} {} (garrison now {units}), policy={}",
            queue.quantity,
            queue.unit_type,
            policy.name()
        );

        queue.resources_committed = false;
        policy.on_complete(queue, timer.duration);
        if queue.is_idle() {
            progress.depleted.push(queue.unit_type.clone());
        }
    }

    progress
}

/// A queue's costs summed by resource type.
fn cost_bill(queue: &TrainingQueue) -> BTreeMap<&str, u64> {
    let mut bill: BTreeMap<&str, u64> = BTreeMap::new();
    for cost in &queue.costs {
        let entry = bill.entry(cost.resource_type.as_str()).or_insert(0);
        *entry = entry.saturating_add(cost.amount);
    }
    bill
}

fn invalid(city: &str, queue: &TrainingQueue, reason: &str) -> SimError {
    SimError::InvalidQueueConfig {
        city:      city.to_string(),
        unit_type: queue.unit_type.clone(),
        reason:    reason.to_string(),
    }
}
