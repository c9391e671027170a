//! Per-city resource production scaled by morale.

use crate::{config::TickConfig, snapshot::City, types::ResourceKey};
use std::collections::BTreeMap;

/// Multiplier applied to raw production for a given morale.
///
/// At or above `morale_threshold` the factor is morale itself, including
/// values above 1.0. Below it the factor is `max(morale_floor, morale)`.
/// The comparison at the threshold is inclusive and must stay `>=`.
pub fn morale_factor(morale: f64, config: &TickConfig) -> f64 {
    if morale >= config.morale_threshold {
        morale
    } else {
        config.morale_floor.max(morale)
    }
}

/// Effective morale for a city, falling back to the configured default.
pub fn city_morale(city: &City, config: &TickConfig) -> f64 {
    city.morale.unwrap_or(config.default_morale)
}

/// Output of a single site this tick, truncated toward zero.
pub fn site_output(fields: u32, output_per_field: f64, factor: f64) -> u64 {
    if fields == 0 {
        return 0;
    }
    let raw = f64::from(fields) * output_per_field * factor;
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    raw.trunc() as u64
}

/// Sum every site's output by resource type. Sites sharing a resource
/// type add together; resources that yield zero are omitted.
pub fn produce(city: &City, factor: f64) -> BTreeMap<ResourceKey, u64> {
    let mut produced: BTreeMap<ResourceKey, u64> = BTreeMap::new();
    for site in &city.production {
        let amount = site_output(site.fields, site.output_per_field, factor);
        if amount == 0 {
            continue;
        }
        let entry = produced.entry(site.resource_type.clone()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }
    produced
}
