//! Ambulance record and its status-interval bookkeeping.
//!
//! Every status change goes through [`Ambulance::set_status`], which closes
//! the interval that started at `status_set_time`:
//!
//! | Array                     | Closed with                                   |
//! |---------------------------|-----------------------------------------------|
//! | `status_durations`        | `time - status_set_time`                      |
//! | `status_distances`        | route distance driven since `status_set_time` |
//! | `status_transition_counts`| `[old][new] += 1`                             |
//!
//! The handler must call `set_status` *before* replacing `route`, so the
//! distance of the closing interval is read from the route that was actually
//! driven.  The `*_at(time)` accessors add the still-open interval, which is
//! what statistics capture needs mid-run.

use ems_core::{AmbId, CallId, EventId, Location, SimTime, StationId};
use ems_spatial::Route;

use crate::status::AmbStatus;

// ── AmbCounters ───────────────────────────────────────────────────────────────

/// Cumulative event counts for one ambulance.
///
/// `num_dispatches == from_station + on_road + on_free`, and likewise for
/// move-ups.  Redispatches (a `GoingToCall` ambulance sent to a different
/// call) are also counted in `num_dispatches_on_road`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AmbCounters {
    pub num_calls_treated:          u32,
    pub num_calls_transported:      u32,
    pub num_dispatches:             u32,
    pub num_dispatches_from_station: u32,
    pub num_dispatches_on_road:     u32,
    pub num_dispatches_on_free:     u32,
    pub num_redispatches:           u32,
    pub num_move_ups:               u32,
    pub num_move_ups_from_station:  u32,
    pub num_move_ups_on_road:       u32,
    pub num_move_ups_on_free:       u32,
}

impl AmbCounters {
    /// Count a dispatch of an ambulance that was in `from` status.
    pub fn record_dispatch(&mut self, from: AmbStatus) {
        self.num_dispatches += 1;
        match from {
            AmbStatus::IdleAtStation => self.num_dispatches_from_station += 1,
            AmbStatus::FreeAfterCall => self.num_dispatches_on_free += 1,
            AmbStatus::GoingToCall => {
                self.num_dispatches_on_road += 1;
                self.num_redispatches += 1;
            }
            AmbStatus::ReturningToStation | AmbStatus::MovingUpToStation => {
                self.num_dispatches_on_road += 1
            }
            other => panic!("dispatch from status {other} is not allowed"),
        }
    }

    /// Count a move-up of an ambulance that was in `from` status.
    pub fn record_move_up(&mut self, from: AmbStatus) {
        self.num_move_ups += 1;
        match from {
            AmbStatus::IdleAtStation => self.num_move_ups_from_station += 1,
            AmbStatus::FreeAfterCall => self.num_move_ups_on_free += 1,
            AmbStatus::ReturningToStation | AmbStatus::MovingUpToStation => {
                self.num_move_ups_on_road += 1
            }
            other => panic!("move-up from status {other} is not allowed"),
        }
    }
}

// ── Ambulance ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ambulance {
    pub index:           AmbId,
    pub status:          AmbStatus,
    pub status_set_time: SimTime,

    /// Station the ambulance is based at or heading to.
    pub station:         StationId,
    /// Station assigned by the current deployment; move-ups change `station`
    /// but not this.
    pub home_station:    StationId,
    /// Station the ambulance left on its most recent move-up.
    pub move_up_from_station: Option<StationId>,

    pub call:            Option<CallId>,
    pub route:           Route,
    /// The single pending event that references this ambulance, if any.
    pub event:           Option<EventId>,

    pub counters:        AmbCounters,

    pub status_durations:         [f64; AmbStatus::COUNT],
    pub status_distances:         [f64; AmbStatus::COUNT],
    pub status_transition_counts: [[u32; AmbStatus::COUNT]; AmbStatus::COUNT],
}

impl Ambulance {
    /// An ambulance idle at `station` (located at `location`) from `time`.
    pub fn new(index: AmbId, station: StationId, location: Location, time: SimTime) -> Self {
        Self {
            index,
            status:                   AmbStatus::IdleAtStation,
            status_set_time:          time,
            station,
            home_station:             station,
            move_up_from_station:     None,
            call:                     None,
            route:                    Route::stationary(location, time),
            event:                    None,
            counters:                 AmbCounters::default(),
            status_durations:         [0.0; AmbStatus::COUNT],
            status_distances:         [0.0; AmbStatus::COUNT],
            status_transition_counts: [[0; AmbStatus::COUNT]; AmbStatus::COUNT],
        }
    }

    /// Wipe all per-run state and park the ambulance at `station`.
    pub fn reset(&mut self, station: StationId, location: Location, time: SimTime) {
        *self = Self::new(self.index, station, location, time);
    }

    /// Close the current status interval at `time` and enter `new`.
    ///
    /// A same-status transition (e.g. a redispatch while `GoingToCall`) still
    /// closes the interval, so a route replaced afterwards starts a fresh
    /// distance reading.
    pub fn set_status(&mut self, new: AmbStatus, time: SimTime) {
        assert!(
            time >= self.status_set_time,
            "{} status set at {time} before previous change at {}",
            self.index,
            self.status_set_time
        );
        let old = self.status;
        self.status_durations[old.index()] += time - self.status_set_time;
        self.status_distances[old.index()] += self.open_interval_distance(time);
        self.status_transition_counts[old.index()][new.index()] += 1;
        self.status = new;
        self.status_set_time = time;
    }

    fn open_interval_distance(&self, time: SimTime) -> f64 {
        self.route.distance_at(time) - self.route.distance_at(self.status_set_time)
    }

    /// Current position.
    #[inline]
    pub fn location_at(&self, time: SimTime) -> Location {
        self.route.location_at(time)
    }

    /// Time spent in each status up to `time`, open interval included.
    pub fn status_durations_at(&self, time: SimTime) -> [f64; AmbStatus::COUNT] {
        let mut out = self.status_durations;
        out[self.status.index()] += (time - self.status_set_time).max(0.0);
        out
    }

    /// Distance driven in each status up to `time`, open interval included.
    pub fn status_distances_at(&self, time: SimTime) -> [f64; AmbStatus::COUNT] {
        let mut out = self.status_distances;
        out[self.status.index()] += self.open_interval_distance(time);
        out
    }

    pub fn total_distance_at(&self, time: SimTime) -> f64 {
        self.status_distances_at(time).iter().sum()
    }
}
