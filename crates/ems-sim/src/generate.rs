//! Random call generation.
//!
//! Arrivals form a Poisson process (exponential gaps), locations are uniform
//! over a rectangle and priorities follow a fixed mix.

use rand::distributions::{Distribution, Uniform, WeightedIndex};
use rand_distr::Exp;
use serde::{Deserialize, Serialize};

use ems_core::{CallId, Location, Priority, SimRng, SimTime};
use ems_entity::Call;

use crate::{SimError, SimResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CallGenConfig {
    pub num_calls:         usize,
    /// Calls are generated from here onwards.
    pub start_time:        SimTime,
    /// Mean time between consecutive arrivals.
    pub mean_interarrival: SimTime,
    /// `[x_min, y_min, x_max, y_max]`.
    pub bounds:            [f64; 4],
    /// Relative weight of each priority, `[high, med, low]`.
    pub priority_weights:  [f64; Priority::COUNT],
    pub dispatch_delay:    SimTime,
    pub on_scene_duration: SimTime,
    pub handover_duration: SimTime,
    /// Probability that a call needs transport to hospital.
    pub transport_prob:    f64,
}

impl Default for CallGenConfig {
    fn default() -> Self {
        Self {
            num_calls:         100,
            start_time:        0.0,
            mean_interarrival: 600.0,
            bounds:            [0.0, 0.0, 10_000.0, 10_000.0],
            priority_weights:  [0.6, 0.3, 0.1],
            dispatch_delay:    60.0,
            on_scene_duration: 900.0,
            handover_duration: 600.0,
            transport_prob:    0.7,
        }
    }
}

impl CallGenConfig {
    pub fn validate(&self) -> SimResult<()> {
        let bad = |msg: String| Err(SimError::Config(format!("call generator: {msg}")));
        if !(self.mean_interarrival.is_finite() && self.mean_interarrival > 0.0) {
            return bad(format!("mean_interarrival must be > 0, got {}", self.mean_interarrival));
        }
        let [x0, y0, x1, y1] = self.bounds;
        if !(x0 < x1 && y0 < y1) {
            return bad(format!("empty bounds {:?}", self.bounds));
        }
        if self.priority_weights.iter().any(|w| !(w.is_finite() && *w >= 0.0))
            || self.priority_weights.iter().sum::<f64>() <= 0.0
        {
            return bad(format!("invalid priority weights {:?}", self.priority_weights));
        }
        for (name, d) in [
            ("dispatch_delay", self.dispatch_delay),
            ("on_scene_duration", self.on_scene_duration),
            ("handover_duration", self.handover_duration),
        ] {
            if !(d.is_finite() && d >= 0.0) {
                return bad(format!("{name} must be >= 0, got {d}"));
            }
        }
        if !(0.0..=1.0).contains(&self.transport_prob) {
            return bad(format!("transport_prob must be in [0, 1], got {}", self.transport_prob));
        }
        Ok(())
    }
}

/// `cfg.num_calls` calls sorted by arrival time and indexed in that order.
pub fn generate_calls(cfg: &CallGenConfig, rng: &mut SimRng) -> SimResult<Vec<Call>> {
    cfg.validate()?;
    let gap = Exp::new(1.0 / cfg.mean_interarrival)
        .map_err(|e| SimError::Config(format!("call generator: {e}")))?;
    let priority = WeightedIndex::new(cfg.priority_weights)
        .map_err(|e| SimError::Config(format!("call generator: {e}")))?;
    let [x0, y0, x1, y1] = cfg.bounds;
    let (xs, ys) = (Uniform::new(x0, x1), Uniform::new(y0, y1));

    let mut time = cfg.start_time;
    let mut calls = Vec::with_capacity(cfg.num_calls);
    for i in 0..cfg.num_calls {
        let r = rng.inner();
        time += gap.sample(r);
        let location = Location::new(xs.sample(r), ys.sample(r));
        let p = Priority::ALL[priority.sample(r)];
        let transport = rng.gen_bool(cfg.transport_prob);
        calls.push(Call::new(
            CallId::from_index(i),
            p,
            location,
            time,
            cfg.dispatch_delay,
            cfg.on_scene_duration,
            transport,
            cfg.handover_duration,
        ));
    }
    Ok(calls)
}
