//! Simulation clock: owns the tick counter for a single run.

use crate::types::{Seconds, Tick};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimClock {
    pub current_tick:     Tick,
    pub seconds_per_tick: Seconds,
}

impl SimClock {
    pub fn new(seconds_per_tick: Seconds) -> Self {
        Self { current_tick: 0, seconds_per_tick }
    }

    /// Advance one tick. Returns the new tick number.
    pub fn advance(&mut self) -> Tick {
        self.current_tick += 1;
        self.current_tick
    }

    /// In-game seconds elapsed since the run started.
    pub fn elapsed_seconds(&self) -> Seconds {
        self.current_tick.saturating_mul(self.seconds_per_tick)
    }
}
