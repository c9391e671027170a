//! Reporters: render tick outcomes for a human or a pipe.
//!
//! RULE: reporters only read. Nothing here may change simulation state.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use tickecon_core::{
    engine::TickEngine, simulation::TickOutcome, snapshot::GameSnapshot, types::Seconds,
};

pub trait Reporter {
    fn begin(&mut self, snapshot: &GameSnapshot, engine: &TickEngine, ticks: u64) -> Result<()>;
    fn tick(&mut self, outcome: &TickOutcome) -> Result<()>;
    fn finish(&mut self, snapshot: &GameSnapshot) -> Result<()>;
}

// ── Text ───────────────────────────────────────────────────────────

pub struct TextReporter;

impl Reporter for TextReporter {
    fn begin(&mut self, snapshot: &GameSnapshot, engine: &TickEngine, ticks: u64) -> Result<()> {
        let config = engine.config();
        println!("Tick Economy: tick-runner");
        if let Some(player) = &snapshot.player_id {
            println!("  player:    {player}");
        }
        println!("  cities:    {}", snapshot.cities.len());
        println!("  ticks:     {ticks}");
        println!("  tick len:  {}s", config.seconds_per_tick);
        println!("  policy:    {}", engine.policy_name());
        println!();
        Ok(())
    }

    fn tick(&mut self, outcome: &TickOutcome) -> Result<()> {
        println!(
            "Tick {} (game time {})",
            outcome.tick,
            format_game_time(outcome.elapsed_seconds)
        );
        for report in &outcome.reports {
            let produced = format_amounts(&report.produced_by_resource);
            println!(
                "  {:<14} factor={:.2} produced={produced}",
                report.city_id, report.morale_factor_used
            );
            if !report.spent_by_resource.is_empty() {
                println!(
                    "  {:<14} spent {}",
                    "",
                    format_amounts(&report.spent_by_resource)
                );
            }
            for unit_type in &report.waiting_queues {
                println!("  {:<14} waiting for resources to train {unit_type}", "");
            }
            for done in &report.completed_trainings {
                println!("  {:<14} completed {} {}", "", done.quantity, done.unit_type);
            }
            if !report.upkeep_by_resource.is_empty() {
                println!(
                    "  {:<14} upkeep {}",
                    "",
                    format_amounts(&report.upkeep_by_resource)
                );
            }
        }
        let ledger: BTreeMap<String, u64> = outcome
            .ledger
            .iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        println!("  resources: {}", format_amounts(&ledger));
        Ok(())
    }

    fn finish(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        println!();
        println!("=== RUN SUMMARY ===");
        for (resource, amount) in snapshot.ledger.iter() {
            println!("  {resource:<12} {amount}");
        }
        for city in &snapshot.cities {
            if city.garrison.is_empty() {
                continue;
            }
            println!("  garrison {}: {}", city.display_name, format_amounts(&city.garrison));
        }
        Ok(())
    }
}

// ── JSON lines ─────────────────────────────────────────────────────

/// One serialized `SimEvent` per line, then a closing summary line.
pub struct JsonReporter;

#[derive(Serialize)]
struct RunSummary<'a> {
    #[serde(rename = "type")]
    kind:      &'static str,
    resources: BTreeMap<&'a str, u64>,
    garrisons: BTreeMap<&'a str, &'a BTreeMap<String, u64>>,
}

impl Reporter for JsonReporter {
    fn begin(&mut self, _snapshot: &GameSnapshot, _engine: &TickEngine, _ticks: u64) -> Result<()> {
        Ok(())
    }

    fn tick(&mut self, outcome: &TickOutcome) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for event in &outcome.events {
            writeln!(out, "{}", serde_json::to_string(event)?)?;
        }
        out.flush()?;
        Ok(())
    }

    fn finish(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        let summary = RunSummary {
            kind:      "run_summary",
            resources: snapshot.ledger.iter().collect(),
            garrisons: snapshot
                .cities
                .iter()
                .map(|c| (c.display_name.as_str(), &c.garrison))
                .collect(),
        };
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{}", serde_json::to_string(&summary)?)?;
        out.flush()?;
        Ok(())
    }
}

// ── Formatting helpers ─────────────────────────────────────────────

/// Render elapsed game time as `[Nd ]HH:MM:SS`.
pub fn format_game_time(seconds: Seconds) -> String {
    let secs = i64::try_from(seconds).unwrap_or(i64::MAX);
    let span = chrono::Duration::try_seconds(secs).unwrap_or(chrono::Duration::MAX);
    let days = span.num_days();
    let clock = format!(
        "{:02}:{:02}:{:02}",
        span.num_hours() % 24,
        span.num_minutes() % 60,
        span.num_seconds() % 60
    );
    if days > 0 {
        format!("{days}d {clock}")
    } else {
        clock
    }
}

fn format_amounts(amounts: &BTreeMap<String, u64>) -> String {
    if amounts.is_empty() {
        return "-".to_string();
    }
    amounts
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ")
}
