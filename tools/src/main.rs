//! tick-runner: headless driver for the tick-economy simulator.
//!
//! Usage:
//!   tick-runner --snapshot data/seed_snapshot.json --ticks 10
//!   tick-runner --seed 7 --cities 4 --ticks 5 --pace 0.5
//!   tick-runner --snapshot data/seed_snapshot.json --config data/tick_config.json --policy deplete --json
//!
//! Without `--snapshot`, a scenario is generated from `--seed`.

mod report;

use anyhow::{anyhow, Result};
use report::{JsonReporter, Reporter, TextReporter};
use std::env;
use std::thread;
use std::time::Duration;
use tickecon_core::{
    config::TickConfig, engine::TickEngine, policy::CompletionPolicyKind,
    scenario::generate_snapshot, simulation::run_simulation, snapshot::GameSnapshot,
};

const DEFAULT_TICKS: u64 = 5;
const DEFAULT_CITIES: usize = 3;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ticks = parse_arg(&args, "--ticks", DEFAULT_TICKS);
    let pace = parse_arg(&args, "--pace", 0.0f64);
    let seed = parse_arg(&args, "--seed", 42u64);
    let city_count = parse_arg(&args, "--cities", DEFAULT_CITIES);
    let json_mode = args.iter().any(|a| a == "--json");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => TickConfig::load(path)?,
        None => TickConfig::default(),
    };
    if let Some(name) = flag_value(&args, "--policy") {
        let policy = CompletionPolicyKind::parse(name)
            .ok_or_else(|| anyhow!("Unknown completion policy: {name}"))?;
        config = config.with_policy(policy);
    }
    let engine = TickEngine::new(config)?;

    let mut snapshot = match flag_value(&args, "--snapshot") {
        Some(path) => GameSnapshot::load(path)?,
        None => {
            log::info!("no --snapshot given, generating {city_count} cities from seed {seed}");
            generate_snapshot(seed, city_count)
        }
    };

    let mut reporter: Box<dyn Reporter> = if json_mode {
        Box::new(JsonReporter)
    } else {
        Box::new(TextReporter)
    };

    // Pacing is cosmetic: it only spaces out output between ticks.
    let pace = pace_duration(pace);

    reporter.begin(&snapshot, &engine, ticks)?;
    for outcome in run_simulation(&mut snapshot, ticks, &engine) {
        let outcome = outcome?;
        reporter.tick(&outcome)?;
        if !pace.is_zero() && outcome.tick < ticks {
            thread::sleep(pace);
        }
    }
    reporter.finish(&snapshot)?;

    Ok(())
}

fn pace_duration(seconds: f64) -> Duration {
    if seconds > 0.0 {
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
