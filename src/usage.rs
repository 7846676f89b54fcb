//! Usage Band Module
//!
//! Banding of a location's usage percentage for the warehouse map and
//! overview screens. Thresholds are fixed and half-open on the upper side:
//! exactly 30% is already `Moderate`, exactly 90% already `Critical`'s
//! neighbor `High`, and so on. An exact 0% is always its own `Empty` band.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Floor applied to the declared capacity when banding, so small segments
/// do not band hot off a handful of documents.
const DEFAULT_CAPACITY: u32 = 100;

/// Usage band of a location, lowest to highest pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UsageBand {
    /// 0% exactly
    Empty,
    /// (0%, 30%)
    Low,
    /// [30%, 70%)
    Moderate,
    /// [70%, 90%)
    High,
    /// [90%, ...] — can pass 100% since occupancy is not capacity-checked
    Critical,
}

impl UsageBand {
    /// Display color used by the map views.
    pub fn color(&self) -> &'static str {
        match self {
            UsageBand::Empty => "gray",
            UsageBand::Low => "green",
            UsageBand::Moderate => "yellow",
            UsageBand::High => "orange",
            UsageBand::Critical => "red",
        }
    }
}

impl fmt::Display for UsageBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UsageBand::Empty => "empty",
            UsageBand::Low => "0-30%",
            UsageBand::Moderate => "30-70%",
            UsageBand::High => "70-90%",
            UsageBand::Critical => "90-100%",
        };
        f.write_str(label)
    }
}

/// Usage percentage of a location: `usage / max(capacity, 100) * 100`.
/// The 100-slot floor on the denominator covers zero/unset capacities and
/// keeps small segments from banding hot.
pub fn usage_percentage(usage: u32, capacity: u32) -> f64 {
    f64::from(usage) / f64::from(capacity.max(DEFAULT_CAPACITY)) * 100.0
}

/// Band a location's usage against its declared capacity.
pub fn usage_band(usage: u32, capacity: u32) -> UsageBand {
    let percentage = usage_percentage(usage, capacity);
    if percentage == 0.0 {
        UsageBand::Empty
    } else if percentage < 30.0 {
        UsageBand::Low
    } else if percentage < 70.0 {
        UsageBand::Moderate
    } else if percentage < 90.0 {
        UsageBand::High
    } else {
        UsageBand::Critical
    }
}
