//! The simulation driver: runs the tick engine over a whole snapshot for
//! a fixed number of ticks.
//!
//! RULES:
//!   - `run_simulation` borrows the snapshot mutably for the whole run.
//!     The driver keeps no state between runs; to restart, load or clone
//!     a fresh snapshot.
//!   - Tick i+1 observes the state left by tick i.
//!   - Cities are processed in list order every tick.
//!   - Each tick validates the snapshot exactly once, inside
//!     `TickEngine::tick_all`. The first error ends the run. It is yielded
//!     once, then the iterator is exhausted.

use crate::{
    clock::SimClock,
    engine::{TickEngine, TickReport},
    error::SimResult,
    event::{events_for_tick, SimEvent},
    ledger::ResourceLedger,
    snapshot::GameSnapshot,
    types::{Seconds, Tick},
};
use std::collections::BTreeMap;
use std::iter::FusedIterator;

/// Everything one tick produced.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub tick:            Tick,
    pub elapsed_seconds: Seconds,
    /// One report per city, in city-list order.
    pub reports:         Vec<TickReport>,
    pub events:          Vec<SimEvent>,
    /// The player's ledger as it stood after this tick.
    pub ledger:          ResourceLedger,
}

impl TickOutcome {
    pub fn report_for(&self, city: &str) -> Option<&TickReport> {
        self.reports.iter().find(|r| r.city_id == city)
    }

    /// Reports keyed by city display name.
    pub fn by_city(&self) -> BTreeMap<&str, &TickReport> {
        self.reports.iter().map(|r| (r.city_id.as_str(), r)).collect()
    }
}

pub struct Simulation<'a> {
    snapshot:  &'a mut GameSnapshot,
    engine:    &'a TickEngine,
    clock:     SimClock,
    remaining: u64,
    started:   bool,
    finished:  bool,
}

/// Start a run of `tick_count` ticks. Nothing happens until the returned
/// iterator is polled; a zero-tick run never touches the snapshot.
pub fn run_simulation<'a>(
    snapshot:   &'a mut GameSnapshot,
    tick_count: u64,
    engine:     &'a TickEngine,
) -> Simulation<'a> {
    Simulation {
        clock: SimClock::new(engine.config().seconds_per_tick),
        snapshot,
        engine,
        remaining: tick_count,
        started: false,
        finished: tick_count == 0,
    }
}

/// Drain a run, returning every outcome or the first error.
pub fn collect_run(simulation: Simulation<'_>) -> SimResult<Vec<TickOutcome>> {
    simulation.collect()
}

impl Simulation<'_> {
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    fn step(&mut self) -> SimResult<TickOutcome> {
        if !self.started {
            self.started = true;
            log::info!(
                "simulation start: {} cities, {} ticks of {}s, policy={}",
                self.snapshot.cities.len(),
                self.remaining,
                self.clock.seconds_per_tick,
                self.engine.policy_name()
            );
        }

        // tick_all validates before touching anything, so a failed tick
        // leaves both the snapshot and the clock unchanged.
        let reports = self.engine.tick_all(self.snapshot)?;
        let tick = self.clock.advance();
        let elapsed_seconds = self.clock.elapsed_seconds();
        let events = events_for_tick(tick, elapsed_seconds, &reports);

        log::debug!("tick={tick} done: {} events", events.len());

        Ok(TickOutcome {
            tick,
            elapsed_seconds,
            reports,
            events,
            ledger: self.snapshot.ledger.clone(),
        })
    }
}

impl Iterator for Simulation<'_> {
    type Item = SimResult<TickOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.step();
        match &result {
            Ok(_) => {
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.finished = true;
                    log::info!("simulation finished at tick {}", self.clock.current_tick);
                }
            }
            Err(e) => {
                self.finished = true;
                log::warn!("simulation aborted at tick {}: {e}", self.clock.current_tick);
            }
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        // An error can end the run early.
        (0, usize::try_from(self.remaining).ok())
    }
}

impl FusedIterator for Simulation<'_> {}
