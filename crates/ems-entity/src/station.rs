//! Ambulance station with time-weighted idle-count accounting.

use ems_core::{Location, SimTime, StationId};

#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    pub index:    StationId,
    pub location: Location,
    /// Maximum number of ambulances a deployment may base here.
    pub capacity: u32,

    pub num_idle_ambs:          u32,
    pub num_idle_ambs_set_time: SimTime,
    /// `[k]` = total time with exactly `k` idle ambulances, closed intervals
    /// only.  Grows on demand.
    pub num_idle_ambs_total_duration: Vec<f64>,
}

impl Station {
    pub fn new(index: StationId, location: Location, capacity: u32) -> Self {
        Self {
            index,
            location,
            capacity,
            num_idle_ambs:                0,
            num_idle_ambs_set_time:       0.0,
            num_idle_ambs_total_duration: Vec::new(),
        }
    }

    /// Start a fresh accounting timeline at `time` with `num_idle` ambulances.
    pub fn reset(&mut self, num_idle: u32, time: SimTime) {
        self.num_idle_ambs = num_idle;
        self.num_idle_ambs_set_time = time;
        self.num_idle_ambs_total_duration.clear();
    }

    /// Close the bucket for the current idle count and switch to `num_idle`.
    pub fn set_num_idle_ambs(&mut self, num_idle: u32, time: SimTime) {
        assert!(
            time >= self.num_idle_ambs_set_time,
            "{} idle count changed at {time} before previous change at {}",
            self.index,
            self.num_idle_ambs_set_time
        );
        let k = self.num_idle_ambs as usize;
        if self.num_idle_ambs_total_duration.len() <= k {
            self.num_idle_ambs_total_duration.resize(k + 1, 0.0);
        }
        self.num_idle_ambs_total_duration[k] += time - self.num_idle_ambs_set_time;
        self.num_idle_ambs = num_idle;
        self.num_idle_ambs_set_time = time;
    }

    pub fn ambulance_arrived(&mut self, time: SimTime) {
        self.set_num_idle_ambs(self.num_idle_ambs + 1, time);
    }

    pub fn ambulance_left(&mut self, time: SimTime) {
        assert!(self.num_idle_ambs > 0, "{} has no idle ambulance to leave", self.index);
        self.set_num_idle_ambs(self.num_idle_ambs - 1, time);
    }

    /// Idle-count buckets up to `time`, open interval included.
    pub fn num_idle_ambs_durations_at(&self, time: SimTime) -> Vec<f64> {
        let k = self.num_idle_ambs as usize;
        let mut out = self.num_idle_ambs_total_duration.clone();
        if out.len() <= k {
            out.resize(k + 1, 0.0);
        }
        out[k] += (time - self.num_idle_ambs_set_time).max(0.0);
        out
    }
}
