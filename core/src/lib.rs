//! Offline tick-economy simulator.
//!
//! A `GameSnapshot` (cities, production sites, training queues, and the
//! player's resource ledger) is advanced in fixed-length ticks by the
//! `TickEngine`. The `simulation` driver runs the engine over a whole
//! snapshot for a caller-chosen number of ticks and yields one
//! `TickOutcome` per tick.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod ledger;
pub mod policy;
pub mod production;
pub mod rng;
pub mod scenario;
pub mod simulation;
pub mod snapshot;
pub mod training;
pub mod types;

pub use config::TickConfig;
pub use engine::{TickEngine, TickReport};
pub use error::{SimError, SimResult};
pub use simulation::{collect_run, run_simulation, Simulation, TickOutcome};
pub use snapshot::{City, GameSnapshot, ProductionSite, TrainingQueue};
