//! Plain data row types written by output backends.

use ems_entity::AmbStatus;
use ems_event::Event;
use ems_stats::{AmbulanceStats, SimPeriodStats};

/// One executed event.  Absent ids are `None` and written as empty cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRow {
    pub replication:  u32,
    pub index:        u64,
    pub parent_index: Option<u64>,
    pub form:         &'static str,
    pub time:         f64,
    pub amb:          Option<u32>,
    pub call:         Option<u32>,
    pub station:      Option<u32>,
}

impl EventRow {
    pub fn new(replication: u32, event: &Event) -> Self {
        Self {
            replication,
            index:        event.index.0,
            parent_index: event.parent_index.map(|p| p.0),
            form:         event.form.as_str(),
            time:         event.time,
            amb:          event.amb.map(|a| a.0),
            call:         event.call.map(|c| c.0),
            station:      event.station.map(|s| s.0),
        }
    }
}

/// Fleet-wide summary of one statistics period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodRow {
    pub replication:           u32,
    pub period:                u32,
    pub start_time:            f64,
    pub end_time:              f64,
    pub num_calls:             u32,
    pub num_queued:            u32,
    pub num_bumps:             u32,
    pub num_transports:        u32,
    /// `None` when no call arriving in the period was processed.
    pub mean_response:         Option<f64>,
    pub num_dispatches:        u32,
    pub num_move_ups:          u32,
    pub total_distance:        f64,
}

impl PeriodRow {
    pub fn new(replication: u32, period: u32, stats: &SimPeriodStats) -> Self {
        let fleet = stats.ambulance_total();
        Self {
            replication,
            period,
            start_time:     stats.start_time,
            end_time:       stats.end_time,
            num_calls:      stats.calls.num_calls,
            num_queued:     stats.calls.num_queued,
            num_bumps:      stats.calls.num_bumps,
            num_transports: stats.calls.num_transports,
            mean_response:  stats.calls.mean_response_duration(),
            num_dispatches: fleet.num_dispatches,
            num_move_ups:   fleet.num_move_ups,
            total_distance: fleet.total_distance(),
        }
    }
}

/// One ambulance's counters and status durations within a period.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbulanceRow {
    pub replication:      u32,
    pub period:           u32,
    pub amb:              u32,
    pub num_dispatches:   u32,
    pub num_redispatches: u32,
    pub num_move_ups:     u32,
    pub total_distance:   f64,
    /// Indexed like [`AmbStatus::ALL`].
    pub status_durations: [f64; AmbStatus::COUNT],
}

impl AmbulanceRow {
    pub fn new(replication: u32, period: u32, stats: &AmbulanceStats) -> Self {
        Self {
            replication,
            period,
            amb:              stats.amb.map_or(u32::MAX, |a| a.0),
            num_dispatches:   stats.num_dispatches,
            num_redispatches: stats.num_redispatches,
            num_move_ups:     stats.num_move_ups,
            total_distance:   stats.total_distance(),
            status_durations: stats.status_durations,
        }
    }
}
