//! Seeded scenario generator.
//!
//! Builds a valid, reproducible snapshot from a seed: the same seed and
//! city count always yield an identical snapshot. Used when no seed file
//! is supplied and by the invariant tests.

use crate::{
    ledger::ResourceLedger,
    rng::ScenarioRng,
    snapshot::{City, GameSnapshot, TrainingQueue},
};

const CITY_NAMES: &[&str] = &[
    "Northwatch", "Riverton", "Ashford", "Kestrel Bay", "Ironvale",
    "Sunmere", "Greyhollow", "Port Adler",
];

const RESOURCES: &[&str] = &["Food", "Steel", "Oil", "RareMetal"];

const UNITS: &[&str] = &["Infantry", "Artillery", "Tank", "Scout"];

/// Storage cap applied to every generated ledger resource.
pub const GENERATED_STORAGE_CAP: u64 = 50_000;

pub fn generate_snapshot(seed: u64, city_count: usize) -> GameSnapshot {
    let mut rng = ScenarioRng::new(seed);

    let cities = (0..city_count)
        .map(|i| generate_city(&mut rng, &city_name(i)))
        .collect();

    let mut ledger = ResourceLedger::new();
    for resource in RESOURCES {
        ledger = ledger
            .with_amount(resource, rng.range_inclusive(0, 500))
            .with_cap(resource, GENERATED_STORAGE_CAP);
    }

    let mut snapshot = GameSnapshot::new(cities, ledger);
    snapshot.player_id = Some(format!("generated-{seed:x}"));
    snapshot
}

fn city_name(index: usize) -> String {
    let base = CITY_NAMES[index % CITY_NAMES.len()];
    match index / CITY_NAMES.len() {
        0 => base.to_string(),
        n => format!("{base} {}", n + 1),
    }
}

fn generate_city(rng: &mut ScenarioRng, name: &str) -> City {
    // Half the cities sit below the morale threshold.
    let morale = if rng.chance(0.5) {
        rng.range_f64(0.9, 1.2)
    } else {
        rng.range_f64(0.0, 0.9)
    };
    let mut city = City::new(name).with_morale(morale);

    for _ in 0..rng.range_inclusive(1, 3) {
        let fields = rng.range_inclusive(0, 20) as u32;
        let output = rng.range_inclusive(1, 16) as f64 * 0.5;
        city = city.with_site(fields, output, rng.pick(RESOURCES));
    }

    for _ in 0..rng.range_inclusive(0, 2) {
        let duration = rng.range_inclusive(1, 10) * 30;
        let remaining = rng.range_inclusive(0, duration);
        let queue = TrainingQueue::new(
            rng.pick(UNITS),
            rng.range_inclusive(1, 10) as u32,
            duration,
        )
        .with_remaining(remaining)
        .with_upkeep(rng.range_inclusive(0, 3));
        city = city.with_queue(queue);
    }

    city
}
