//! Whole-simulation records and capture-to-period conversion.

use ems_core::{Priority, SimTime};
use ems_entity::{Ambulance, Call, Hospital, Station};

use crate::{AmbulanceStats, CallStats, FieldOps, HospitalStats, StationStats};

/// Everything captured at one instant, or the change over one period.
///
/// For a capture, `start_time` is the run start and `end_time` the capture
/// instant.  For a period, they bound the period.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimPeriodStats {
    pub start_time: SimTime,
    pub end_time:   SimTime,
    pub ambulances: Vec<AmbulanceStats>,
    pub stations:   Vec<StationStats>,
    pub hospitals:  Vec<HospitalStats>,
    pub calls:      CallStats,
}

impl SimPeriodStats {
    /// Cumulative capture of every entity at `time`.  Call totals are
    /// filled in later by [`fill_call_stats`](Self::fill_call_stats) once
    /// the calls have been processed.
    pub fn capture(
        start_time: SimTime,
        time:       SimTime,
        ambulances: &[Ambulance],
        stations:   &[Station],
        hospitals:  &[Hospital],
    ) -> Self {
        Self {
            start_time,
            end_time:   time,
            ambulances: ambulances.iter().map(|a| AmbulanceStats::capture(a, time)).collect(),
            stations:   stations.iter().map(|s| StationStats::capture(s, time)).collect(),
            hospitals:  hospitals.iter().map(HospitalStats::capture).collect(),
            calls:      CallStats::default(),
        }
    }

    pub fn fill_call_stats(&mut self, calls: &[Call], response_targets: &[f64; Priority::COUNT]) {
        self.calls = CallStats::from_calls(calls, self.start_time, self.end_time, response_targets);
    }

    #[inline]
    pub fn duration(&self) -> SimTime {
        self.end_time - self.start_time
    }

    /// All ambulances summed into one record (its `amb` index is `None`
    /// whenever there is more than one ambulance).
    pub fn ambulance_total(&self) -> AmbulanceStats {
        let mut iter = self.ambulances.iter();
        let Some(first) = iter.next() else { return AmbulanceStats::default() };
        iter.fold(first.clone(), |acc, a| &acc + a)
    }
}

/// Adjacent spans: `start` of the left side, `end` of the right side.
impl std::ops::Add for &SimPeriodStats {
    type Output = SimPeriodStats;
    fn add(self, rhs: Self) -> SimPeriodStats {
        SimPeriodStats {
            start_time: self.start_time,
            end_time:   rhs.end_time,
            ambulances: self.ambulances.field_add(&rhs.ambulances),
            stations:   self.stations.field_add(&rhs.stations),
            hospitals:  self.hospitals.field_add(&rhs.hospitals),
            calls:      self.calls.field_add(&rhs.calls),
        }
    }
}

/// `later - earlier`: the span between the two end times.
impl std::ops::Sub for &SimPeriodStats {
    type Output = SimPeriodStats;
    fn sub(self, rhs: Self) -> SimPeriodStats {
        SimPeriodStats {
            start_time: rhs.end_time,
            end_time:   self.end_time,
            ambulances: self.ambulances.field_sub(&rhs.ambulances),
            stations:   self.stations.field_sub(&rhs.stations),
            hospitals:  self.hospitals.field_sub(&rhs.hospitals),
            calls:      self.calls.field_sub(&rhs.calls),
        }
    }
}

/// Difference consecutive cumulative captures into periods.
///
/// `period[0] == capture[0]`; `period[i].start_time == period[i-1].end_time`.
pub fn periods_from_captures(captures: &[SimPeriodStats]) -> Vec<SimPeriodStats> {
    let mut periods = Vec::with_capacity(captures.len());
    if let Some(first) = captures.first() {
        periods.push(first.clone());
    }
    for pair in captures.windows(2) {
        periods.push(&pair[1] - &pair[0]);
    }
    periods
}
