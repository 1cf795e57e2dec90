//! Per-entity statistics records and how they are captured.

use ems_core::{AmbId, HospitalId, Priority, SimTime, StationId};
use ems_entity::{AmbStatus, AmbStatusSet, Ambulance, Call, Hospital, Station};

// ── AmbulanceStats ────────────────────────────────────────────────────────────

/// Cumulative ambulance counters at one instant (or their delta over a
/// period).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AmbulanceStats {
    pub amb: Option<AmbId>,

    pub num_calls_treated:           u32,
    pub num_calls_transported:       u32,
    pub num_dispatches:              u32,
    pub num_dispatches_from_station: u32,
    pub num_dispatches_on_road:      u32,
    pub num_dispatches_on_free:      u32,
    pub num_redispatches:            u32,
    pub num_move_ups:                u32,
    pub num_move_ups_from_station:   u32,
    pub num_move_ups_on_road:        u32,
    pub num_move_ups_on_free:        u32,

    pub status_durations:         [f64; AmbStatus::COUNT],
    pub status_distances:         [f64; AmbStatus::COUNT],
    pub status_transition_counts: [[u32; AmbStatus::COUNT]; AmbStatus::COUNT],
}

stats_algebra!(AmbulanceStats {
    amb,
    num_calls_treated,
    num_calls_transported,
    num_dispatches,
    num_dispatches_from_station,
    num_dispatches_on_road,
    num_dispatches_on_free,
    num_redispatches,
    num_move_ups,
    num_move_ups_from_station,
    num_move_ups_on_road,
    num_move_ups_on_free,
    status_durations,
    status_distances,
    status_transition_counts,
});

impl AmbulanceStats {
    /// Counters of `amb` at `time`, including the open status interval and
    /// the distance driven so far on an in-flight route.
    pub fn capture(amb: &Ambulance, time: SimTime) -> Self {
        let c = &amb.counters;
        Self {
            amb:                         Some(amb.index),
            num_calls_treated:           c.num_calls_treated,
            num_calls_transported:       c.num_calls_transported,
            num_dispatches:              c.num_dispatches,
            num_dispatches_from_station: c.num_dispatches_from_station,
            num_dispatches_on_road:      c.num_dispatches_on_road,
            num_dispatches_on_free:      c.num_dispatches_on_free,
            num_redispatches:            c.num_redispatches,
            num_move_ups:                c.num_move_ups,
            num_move_ups_from_station:   c.num_move_ups_from_station,
            num_move_ups_on_road:        c.num_move_ups_on_road,
            num_move_ups_on_free:        c.num_move_ups_on_free,
            status_durations:            amb.status_durations_at(time),
            status_distances:            amb.status_distances_at(time),
            status_transition_counts:    amb.status_transition_counts,
        }
    }

    pub fn duration_in(&self, set: AmbStatusSet) -> f64 {
        set.sum(&self.status_durations)
    }

    pub fn distance_in(&self, set: AmbStatusSet) -> f64 {
        set.sum(&self.status_distances)
    }

    pub fn total_duration(&self) -> f64 {
        self.status_durations.iter().sum()
    }

    pub fn total_distance(&self) -> f64 {
        self.status_distances.iter().sum()
    }
}

// ── StationStats ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StationStats {
    pub station: Option<StationId>,
    /// `[k]` = time spent with exactly `k` idle ambulances.
    pub num_idle_ambs_total_duration: Vec<f64>,
}

stats_algebra!(StationStats { station, num_idle_ambs_total_duration });

impl StationStats {
    pub fn capture(station: &Station, time: SimTime) -> Self {
        Self {
            station:                      Some(station.index),
            num_idle_ambs_total_duration: station.num_idle_ambs_durations_at(time),
        }
    }

    pub fn total_duration(&self) -> f64 {
        self.num_idle_ambs_total_duration.iter().sum()
    }

    /// Time-weighted mean number of idle ambulances.
    pub fn mean_idle_ambs(&self) -> f64 {
        let total = self.total_duration();
        if total <= 0.0 {
            return 0.0;
        }
        self.num_idle_ambs_total_duration
            .iter()
            .enumerate()
            .map(|(k, d)| k as f64 * d)
            .sum::<f64>()
            / total
    }
}

// ── HospitalStats ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HospitalStats {
    pub hospital:  Option<HospitalId>,
    pub num_calls: u32,
}

stats_algebra!(HospitalStats { hospital, num_calls });

impl HospitalStats {
    pub fn capture(hospital: &Hospital) -> Self {
        Self { hospital: Some(hospital.index), num_calls: hospital.num_calls }
    }
}

// ── CallStats ─────────────────────────────────────────────────────────────────

/// Totals over a set of processed calls.  Only additive quantities are kept;
/// means are derived on demand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallStats {
    pub num_calls:          u32,
    pub num_queued:         u32,
    pub num_bumped:         u32,
    pub num_bumps:          u32,
    pub num_transports:     u32,

    pub total_dispatch_delay:             f64,
    pub total_queued_duration:            f64,
    pub total_bumped_duration:            f64,
    pub total_amb_going_to_call_duration: f64,
    pub total_waiting_for_amb_duration:   f64,
    pub total_response_duration:          f64,

    pub num_calls_by_priority:               [u32; Priority::COUNT],
    pub total_response_duration_by_priority: [f64; Priority::COUNT],
    /// Calls reached within the response target of their priority.
    pub num_in_target_by_priority:           [u32; Priority::COUNT],
}

stats_algebra!(CallStats {
    num_calls,
    num_queued,
    num_bumped,
    num_bumps,
    num_transports,
    total_dispatch_delay,
    total_queued_duration,
    total_bumped_duration,
    total_amb_going_to_call_duration,
    total_waiting_for_amb_duration,
    total_response_duration,
    num_calls_by_priority,
    total_response_duration_by_priority,
    num_in_target_by_priority,
});

impl CallStats {
    /// Summarise processed calls whose arrival time lies in `[start, end)`.
    ///
    /// `response_targets` is indexed by [`Priority::index`].
    pub fn from_calls(
        calls:            &[Call],
        start:            SimTime,
        end:              SimTime,
        response_targets: &[f64; Priority::COUNT],
    ) -> Self {
        let mut s = Self::default();
        for call in calls {
            if !call.is_processed() || call.arrival_time < start || call.arrival_time >= end {
                continue;
            }
            s.add_call(call, response_targets);
        }
        s
    }

    fn add_call(&mut self, call: &Call, response_targets: &[f64; Priority::COUNT]) {
        let p = call.priority.index();
        let response = call.response_duration().unwrap_or(0.0);

        self.num_calls += 1;
        self.num_queued += call.was_queued as u32;
        self.num_bumped += (call.num_bumps > 0) as u32;
        self.num_bumps += call.num_bumps;
        self.num_transports += call.transport as u32;

        self.total_dispatch_delay += call.dispatch_delay;
        self.total_queued_duration += call.queued_duration().unwrap_or(0.0);
        self.total_bumped_duration += call.bumped_duration().unwrap_or(0.0);
        self.total_amb_going_to_call_duration += call.amb_going_to_call_duration().unwrap_or(0.0);
        self.total_waiting_for_amb_duration += call.waiting_for_amb_duration().unwrap_or(0.0);
        self.total_response_duration += response;

        self.num_calls_by_priority[p] += 1;
        self.total_response_duration_by_priority[p] += response;
        self.num_in_target_by_priority[p] += (response <= response_targets[p]) as u32;
    }

    pub fn mean_response_duration(&self) -> Option<f64> {
        (self.num_calls > 0).then(|| self.total_response_duration / self.num_calls as f64)
    }

    /// Fraction of calls of `priority` reached within target.
    pub fn fraction_in_target(&self, priority: Priority) -> Option<f64> {
        let p = priority.index();
        let n = self.num_calls_by_priority[p];
        (n > 0).then(|| self.num_in_target_by_priority[p] as f64 / n as f64)
    }
}
