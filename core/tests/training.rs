//! Training-queue tests.
//!
//! Tests cover: countdown, completion and auto-reset, the reference
//! Infantry scenario, the deplete-and-stop policy, garrison delivery,
//! upkeep clamping, and queue configuration errors.

use tickecon_core::{
    config::TickConfig,
    engine::TickEngine,
    error::SimError,
    ledger::ResourceLedger,
    policy::{CompletionPolicyKind, QueueCompletionPolicy},
    snapshot::{City, TrainingQueue},
    training::{resolve_queue, CompletedTraining, QueueTimer},
};

fn engine() -> TickEngine {
    TickEngine::new(TickConfig::default()).expect("default config is valid")
}

fn depleting_engine() -> TickEngine {
    TickEngine::new(TickConfig::default().with_policy(CompletionPolicyKind::DepleteAndStop))
        .expect("deplete config is valid")
}

fn infantry_city() -> City {
    City::new("Riverton")
        .with_morale(1.0)
        .with_site(10, 5.0, "Food")
        .with_queue(TrainingQueue::new("Infantry", 3, 120).with_remaining(120))
}

#[test]
fn reference_infantry_scenario() {
    let engine = engine();
    let mut city = infantry_city();
    let mut ledger = ResourceLedger::new();

    let first = engine.apply_tick(&mut city, &mut ledger).unwrap();
    assert_eq!(first.produced("Food"), 50);
    assert!(first.completed_trainings.is_empty(), "no completion on tick 1");
    assert_eq!(city.training_queues[0].seconds_remaining, Some(60));

    let second = engine.apply_tick(&mut city, &mut ledger).unwrap();
    assert_eq!(
        second.completed_trainings,
        vec![CompletedTraining { quantity: 3, unit_type: "Infantry".into() }]
    );
    assert_eq!(city.training_queues[0].seconds_remaining, Some(120));
    assert_eq!(city.garrison_count("Infantry"), 3);
}

#[test]
fn countdown_drops_by_tick_length_without_completion() {
    let engine = engine();
    let mut city = City::new("Ashford")
        .with_queue(TrainingQueue::new("Tank", 1, 600).with_remaining(500));
    let mut ledger = ResourceLedger::new();

    for expected in [440, 380, 320] {
        let report = engine.apply_tick(&mut city, &mut ledger).unwrap();
        assert!(report.completed_trainings.is_empty());
        assert_eq!(city.training_queues[0].seconds_remaining, Some(expected));
    }
}

#[test]
fn short_countdown_completes_once_and_resets() {
    for before in [0, 1, 59, 60] {
        let mut city = City::new("Kestrel Bay")
            .with_queue(TrainingQueue::new("Scout", 2, 300).with_remaining(before));
        let mut ledger = ResourceLedger::new();

        let report = engine().apply_tick(&mut city, &mut ledger).unwrap();

        assert_eq!(
            report.completed_trainings.len(),
            1,
            "remaining {before} should complete exactly once"
        );
        assert_eq!(city.training_queues[0].seconds_remaining, Some(300));
    }
}

#[test]
fn absent_remaining_starts_at_full_duration() {
    let mut city = City::new("Sunmere").with_queue(TrainingQueue::new("Infantry", 1, 180));
    let mut ledger = ResourceLedger::new();

    engine().apply_tick(&mut city, &mut ledger).unwrap();

    assert_eq!(city.training_queues[0].seconds_remaining, Some(120));
}

#[test]
fn queue_shorter_than_a_tick_completes_every_tick() {
    let engine = engine();
    let mut city = City::new("Ironvale").with_queue(TrainingQueue::new("Scout", 1, 30));
    let mut ledger = ResourceLedger::new();

    for _ in 0..4 {
        let report = engine.apply_tick(&mut city, &mut ledger).unwrap();
        assert_eq!(report.completed_trainings.len(), 1);
        assert_eq!(city.training_queues[0].seconds_remaining, Some(30));
    }
    assert_eq!(city.garrison_count("Scout"), 4);
}

#[test]
fn deplete_policy_delivers_once_then_idles() {
    let engine = depleting_engine();
    let mut city = infantry_city();
    let mut ledger = ResourceLedger::new();

    engine.apply_tick(&mut city, &mut ledger).unwrap();
    let second = engine.apply_tick(&mut city, &mut ledger).unwrap();
    assert_eq!(second.completed_trainings.len(), 1);
    assert_eq!(second.depleted_queues, vec!["Infantry".to_string()]);

    let queue = &city.training_queues[0];
    assert_eq!(queue.quantity, 0);
    assert_eq!(queue.seconds_remaining, Some(0));

    for _ in 0..3 {
        let later = engine.apply_tick(&mut city, &mut ledger).unwrap();
        assert!(later.completed_trainings.is_empty());
        assert!(later.depleted_queues.is_empty());
    }
    assert_eq!(city.garrison_count("Infantry"), 3);
}

#[test]
fn idle_queue_needs_no_timer() {
    let mut city = City::new("Greyhollow").with_queue(TrainingQueue {
        unit_type:            "Artillery".into(),
        quantity:             0,
        duration_seconds:     None,
        seconds_remaining:    None,
        upkeep_food_per_tick: 5,
        costs:                Vec::new(),
        resources_committed:  false,
    });
    let mut ledger = ResourceLedger::new().with_amount("Food", 10);

    let report = engine().apply_tick(&mut city, &mut ledger).unwrap();

    assert!(report.completed_trainings.is_empty());
    assert!(report.upkeep_by_resource.is_empty());
    assert_eq!(ledger.amount("Food"), 10);
}

struct Halve;

impl QueueCompletionPolicy for Halve {
    fn name(&self) -> &'static str { "halve" }

    fn on_complete(&self, queue: &mut TrainingQueue, duration: u64) {
        queue.quantity /= 2;
        queue.seconds_remaining = Some(duration);
    }
}

#[test]
fn custom_policy_plugs_into_engine() {
    let engine = TickEngine::with_policy(TickConfig::default(), Box::new(Halve)).unwrap();
    let mut city = City::new("Northwatch").with_queue(TrainingQueue::new("Infantry", 8, 60));
    let mut ledger = ResourceLedger::new();

    let quantities: Vec<u32> = (0..5)
        .flat_map(|_| engine.apply_tick(&mut city, &mut ledger).unwrap().completed_trainings)
        .map(|c| c.quantity)
        .collect();

    assert_eq!(engine.policy_name(), "halve");
    assert_eq!(quantities, vec![8, 4, 2, 1]);
    assert_eq!(city.garrison_count("Infantry"), 15);
}

// ── Upkeep ─────────────────────────────────────────────────────────

#[test]
fn upkeep_is_deducted_after_production() {
    let mut city = City::new("Riverton")
        .with_site(2, 1.0, "Food")
        .with_queue(TrainingQueue::new("Infantry", 1, 600).with_upkeep(5));
    let mut ledger = ResourceLedger::new().with_amount("Food", 10);

    let report = engine().apply_tick(&mut city, &mut ledger).unwrap();

    assert_eq!(report.upkeep_by_resource.get("Food"), Some(&5));
    assert_eq!(ledger.amount("Food"), 7);
}

#[test]
fn upkeep_shortfall_clamps_at_zero() {
    let mut city = City::new("Port Adler")
        .with_queue(TrainingQueue::new("Tank", 1, 600).with_upkeep(8))
        .with_queue(TrainingQueue::new("Tank", 1, 600).with_upkeep(8));
    let mut ledger = ResourceLedger::new().with_amount("Food", 3).with_amount("Steel", 40);

    let report = engine().apply_tick(&mut city, &mut ledger).unwrap();

    assert_eq!(report.upkeep_by_resource.get("Food"), Some(&3));
    assert_eq!(ledger.amount("Food"), 0);
    assert_eq!(ledger.amount("Steel"), 40, "upkeep only touches Food");
}

// ── Configuration errors ───────────────────────────────────────────

#[test]
fn queue_without_duration_or_remaining_is_rejected() {
    let queue = TrainingQueue {
        unit_type:            "Infantry".into(),
        quantity:             3,
        duration_seconds:     None,
        seconds_remaining:    None,
        upkeep_food_per_tick: 0,
        costs:                Vec::new(),
        resources_committed:  false,
    };
    let err = resolve_queue("Riverton", &queue).unwrap_err();
    assert!(
        matches!(&err, SimError::InvalidQueueConfig { city, unit_type, .. }
            if city == "Riverton" && unit_type == "Infantry"),
        "unexpected error: {err}"
    );
}

#[test]
fn queue_without_duration_adopts_its_countdown() {
    let queue = TrainingQueue {
        unit_type:            "Infantry".into(),
        quantity:             3,
        duration_seconds:     None,
        seconds_remaining:    Some(240),
        upkeep_food_per_tick: 0,
        costs:                Vec::new(),
        resources_committed:  false,
    };
    assert_eq!(
        resolve_queue("Riverton", &queue).unwrap(),
        QueueTimer { duration: 240, remaining: 240 }
    );
}

#[test]
fn zero_duration_and_overlong_countdown_are_rejected() {
    let zero = TrainingQueue::new("Scout", 1, 0);
    assert!(matches!(
        resolve_queue("Ashford", &zero),
        Err(SimError::InvalidQueueConfig { .. })
    ));

    let overlong = TrainingQueue::new("Scout", 1, 60).with_remaining(61);
    assert!(matches!(
        resolve_queue("Ashford", &overlong),
        Err(SimError::InvalidQueueConfig { .. })
    ));
}

#[test]
fn invalid_queue_leaves_city_and_ledger_untouched() {
    let mut city = City::new("Ironvale")
        .with_site(10, 5.0, "Food")
        .with_queue(TrainingQueue::new("Tank", 1, 120).with_upkeep(2))
        .with_queue(TrainingQueue::new("Scout", 1, 0));
    let mut ledger = ResourceLedger::new().with_amount("Food", 9);
    let city_before = city.clone();

    let result = engine().apply_tick(&mut city, &mut ledger);

    assert!(matches!(result, Err(SimError::InvalidQueueConfig { .. })));
    assert_eq!(city, city_before);
    assert_eq!(ledger.amount("Food"), 9);
}

// ── Training costs ─────────────────────────────────────────────────

#[test]
fn unaffordable_queue_waits_without_training() {
    let engine = engine();
    let mut city = City::new("Ironvale").with_queue(
        TrainingQueue::new("Tank", 2, 120)
            .with_remaining(60)
            .with_upkeep(1)
            .with_cost("Steel", 100),
    );
    let mut ledger = ResourceLedger::new().with_amount("Steel", 5).with_amount("Food", 10);

    for _ in 0..3 {
        let report = engine.apply_tick(&mut city, &mut ledger).unwrap();
        assert!(report.completed_trainings.is_empty(), "unpaid queue must not complete");
        assert_eq!(report.waiting_queues, vec!["Tank".to_string()]);
        assert!(report.spent_by_resource.is_empty());
        assert!(report.upkeep_by_resource.is_empty(), "waiting queue owes no upkeep");
    }

    let queue = &city.training_queues[0];
    assert_eq!(queue.seconds_remaining, Some(60), "countdown is frozen while waiting");
    assert!(!queue.resources_committed);
    assert_eq!(ledger.amount("Steel"), 5);
    assert_eq!(ledger.amount("Food"), 10);
    assert_eq!(city.garrison_count("Tank"), 0);
}

#[test]
fn costs_are_paid_once_per_cycle() {
    let engine = engine();
    let mut city = City::new("Ironvale").with_queue(
        TrainingQueue::new("Tank", 2, 120)
            .with_cost("Steel", 60)
            .with_cost("Steel", 40)
            .with_cost("Oil", 10),
    );
    let mut ledger = ResourceLedger::new().with_amount("Steel", 250).with_amount("Oil", 100);

    let mut steel_spent = Vec::new();
    let mut completions = Vec::new();
    let mut waiting = Vec::new();
    for _ in 0..5 {
        let report = engine.apply_tick(&mut city, &mut ledger).unwrap();
        steel_spent.push(report.spent_by_resource.get("Steel").copied().unwrap_or(0));
        completions.push(report.completed_trainings.len());
        waiting.push(report.waiting_queues.len());
    }

    assert_eq!(steel_spent, vec![100, 0, 100, 0, 0]);
    assert_eq!(completions, vec![0, 1, 0, 1, 0]);
    assert_eq!(waiting, vec![0, 0, 0, 0, 1], "third cycle cannot be afforded");
    assert_eq!(ledger.amount("Steel"), 50);
    assert_eq!(ledger.amount("Oil"), 80);
    assert_eq!(city.garrison_count("Tank"), 4);
}

#[test]
fn same_tick_production_can_pay_for_training() {
    let mut city = City::new("Ironvale")
        .with_site(10, 10.0, "Steel")
        .with_queue(TrainingQueue::new("Tank", 1, 60).with_cost("Steel", 100));
    let mut ledger = ResourceLedger::new();

    let report = engine().apply_tick(&mut city, &mut ledger).unwrap();

    assert_eq!(report.spent_by_resource.get("Steel"), Some(&100));
    assert_eq!(report.completed_trainings.len(), 1);
    assert_eq!(ledger.amount("Steel"), 0);
}

#[test]
fn committed_cycle_is_not_charged_again() {
    let mut queue = TrainingQueue::new("Tank", 1, 180)
        .with_remaining(120)
        .with_cost("Steel", 100);
    queue.resources_committed = true;
    let mut city = City::new("Ironvale").with_queue(queue);
    let mut ledger = ResourceLedger::new();

    let report = engine().apply_tick(&mut city, &mut ledger).unwrap();

    assert!(report.waiting_queues.is_empty());
    assert!(report.spent_by_resource.is_empty());
    assert_eq!(city.training_queues[0].seconds_remaining, Some(60));
}

#[test]
fn depleted_queue_stops_paying() {
    let engine = depleting_engine();
    let mut city = City::new("Ironvale")
        .with_queue(TrainingQueue::new("Tank", 1, 60).with_cost("Steel", 10));
    let mut ledger = ResourceLedger::new().with_amount("Steel", 100);

    for _ in 0..4 {
        engine.apply_tick(&mut city, &mut ledger).unwrap();
    }

    assert_eq!(ledger.amount("Steel"), 90);
    assert_eq!(city.garrison_count("Tank"), 1);
}
