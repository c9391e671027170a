//! Shared primitive types used across the entire simulation.

/// A simulation tick. Ticks are 1-based: the first advance produces tick 1.
pub type Tick = u64;

/// A span of in-game time in seconds.
pub type Seconds = u64;

/// Open-ended resource key ("Food", "Steel", "Oil", ...).
pub type ResourceKey = String;

/// Open-ended unit type key ("Infantry", "Tank", ...).
pub type UnitKey = String;

/// A city is identified by its display name.
pub type CityId = String;

/// The resource consumed by training-queue upkeep.
pub const UPKEEP_RESOURCE: &str = "Food";
