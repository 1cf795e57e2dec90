//! Simulation configuration, loaded from JSON.
//!
//! Every field has a default, so `{}` is a valid config:
//!
//! ```json
//! {
//!   "start_time": 0.0,
//!   "stats": { "periods": [3600.0], "repeat": true },
//!   "dispatch_policy": "nearest",
//!   "move_up": { "kind": "comp_table", "rows": [[1, 0], [1, 1]] },
//!   "allow_bumping": true,
//!   "enforce_station_capacity": true,
//!   "check_mode": false,
//!   "sleep_duration": 28800.0,
//!   "non_emergency_priority": "low",
//!   "response_targets": [480.0, 600.0, 1200.0]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use ems_core::{Priority, SimTime};
use ems_policy::{MoveUpConfig, DISPATCH_POLICIES};

use crate::{SimError, SimResult};

/// When statistics captures happen during [`Sim::advance`][crate::Sim::advance].
///
/// Captures fall at `start_time + periods[0]`, `+ periods[1]`, … and, with
/// `repeat`, cycle through `periods` forever.  An empty schedule captures
/// only at completion.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSchedule {
    pub periods: Vec<SimTime>,
    pub repeat:  bool,
}

impl StatsSchedule {
    /// Time of the capture numbered `n` (0-based), if the schedule has one.
    pub fn capture_time(&self, start_time: SimTime, n: usize) -> Option<SimTime> {
        let k = self.periods.len();
        if k == 0 || (n >= k && !self.repeat) {
            return None;
        }
        let cycle: SimTime = self.periods.iter().sum();
        let (cycles, rem) = (n / k, n % k);
        let partial: SimTime = self.periods[..=rem].iter().sum();
        Some(start_time + cycles as f64 * cycle + partial)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Simulation start; ambulances are parked at their stations from here.
    pub start_time: SimTime,

    pub stats: StatsSchedule,

    /// Registry name of the dispatch policy.
    pub dispatch_policy: String,

    pub move_up: MoveUpConfig,

    /// Let the dispatch policy redirect an ambulance already driving to a
    /// less urgent call.
    pub allow_bumping: bool,

    /// Reject deployments that put more ambulances at a station than its
    /// capacity.
    pub enforce_station_capacity: bool,

    /// Run the state consistency checks after every event.
    pub check_mode: bool,

    /// How long an ambulance sleeps once put to sleep.
    pub sleep_duration: SimTime,

    /// Travel priority for returning to station and moving up.
    pub non_emergency_priority: Priority,

    /// Response-time target per priority (`[high, med, low]`, seconds).
    pub response_targets: [f64; Priority::COUNT],
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_time:               0.0,
            stats:                    StatsSchedule::default(),
            dispatch_policy:          "nearest".to_owned(),
            move_up:                  MoveUpConfig::None,
            allow_bumping:            true,
            enforce_station_capacity: true,
            check_mode:               false,
            sleep_duration:           8.0 * 3_600.0,
            non_emergency_priority:   Priority::Low,
            response_targets:         [480.0, 600.0, 1_200.0],
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_json(path: &Path) -> SimResult<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> SimResult<()> {
        fn bad(msg: String) -> SimResult<()> {
            Err(SimError::Config(msg))
        }

        if !self.start_time.is_finite() {
            return bad(format!("start_time must be finite, got {}", self.start_time));
        }
        if let Some(p) = self.stats.periods.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
            return bad(format!("stats periods must be finite and > 0, got {p}"));
        }
        if !DISPATCH_POLICIES.contains(&self.dispatch_policy.as_str()) {
            return bad(format!(
                "unknown dispatch policy {:?} (known: {})",
                self.dispatch_policy,
                DISPATCH_POLICIES.join(", ")
            ));
        }
        if !(self.sleep_duration.is_finite() && self.sleep_duration > 0.0) {
            return bad(format!("sleep_duration must be finite and > 0, got {}", self.sleep_duration));
        }
        if let Some(t) = self.response_targets.iter().find(|t| !(t.is_finite() && **t >= 0.0)) {
            return bad(format!("response targets must be finite and >= 0, got {t}"));
        }
        Ok(())
    }
}
