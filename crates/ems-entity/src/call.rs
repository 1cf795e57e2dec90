//! Emergency call record.
//!
//! Timeline of a call and the durations derived from it:
//!
//! ```text
//! arrival ──dispatch_delay──▶ considered ──queued──▶ first dispatch
//!         ──bumped──▶ final dispatch ──going to call──▶ amb arrival
//! ```
//!
//! For a processed call:
//!
//! - `waiting_for_amb == amb_going_to_call + bumped`
//! - `response == dispatch_delay + queued + bumped + amb_going_to_call`

use ems_core::{AmbId, CallId, HospitalId, Location, Priority, SimTime};

use crate::status::{AmbStatus, CallStatus};

#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    // ── Input ─────────────────────────────────────────────────────────────
    pub index:             CallId,
    pub priority:          Priority,
    pub location:          Location,
    pub arrival_time:      SimTime,
    pub dispatch_delay:    SimTime,
    pub on_scene_duration: SimTime,
    pub transport:         bool,
    /// Destination hospital; chosen as the nearest one on transport when
    /// left unset by the input.
    pub hospital:          Option<HospitalId>,
    pub handover_duration: SimTime,

    // ── Per-run state ─────────────────────────────────────────────────────
    pub status:                     CallStatus,
    pub amb:                        Option<AmbId>,
    pub first_dispatch_time:        Option<SimTime>,
    pub dispatch_time:              Option<SimTime>,
    pub amb_arrival_time:           Option<SimTime>,
    pub hospital_arrival_time:      Option<SimTime>,
    pub processed_time:             Option<SimTime>,
    pub num_bumps:                  u32,
    pub was_queued:                 bool,
    pub amb_dispatch_loc:           Option<Location>,
    pub amb_status_before_dispatch: Option<AmbStatus>,
}

impl Call {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index:             CallId,
        priority:          Priority,
        location:          Location,
        arrival_time:      SimTime,
        dispatch_delay:    SimTime,
        on_scene_duration: SimTime,
        transport:         bool,
        handover_duration: SimTime,
    ) -> Self {
        Self {
            index,
            priority,
            location,
            arrival_time,
            dispatch_delay,
            on_scene_duration,
            transport,
            hospital: None,
            handover_duration,
            status: CallStatus::Null,
            amb: None,
            first_dispatch_time: None,
            dispatch_time: None,
            amb_arrival_time: None,
            hospital_arrival_time: None,
            processed_time: None,
            num_bumps: 0,
            was_queued: false,
            amb_dispatch_loc: None,
            amb_status_before_dispatch: None,
        }
    }

    pub fn with_hospital(mut self, hospital: HospitalId) -> Self {
        self.hospital = Some(hospital);
        self
    }

    /// Time the call is first considered for dispatch.
    #[inline]
    pub fn screened_time(&self) -> SimTime {
        self.arrival_time + self.dispatch_delay
    }

    #[inline]
    pub fn is_processed(&self) -> bool {
        self.status == CallStatus::Processed
    }

    // ── Derived durations (None until the relevant timestamps exist) ─────

    pub fn response_duration(&self) -> Option<SimTime> {
        Some(self.amb_arrival_time? - self.arrival_time)
    }

    pub fn queued_duration(&self) -> Option<SimTime> {
        Some(self.first_dispatch_time? - self.screened_time())
    }

    pub fn bumped_duration(&self) -> Option<SimTime> {
        Some(self.dispatch_time? - self.first_dispatch_time?)
    }

    pub fn amb_going_to_call_duration(&self) -> Option<SimTime> {
        Some(self.amb_arrival_time? - self.dispatch_time?)
    }

    pub fn waiting_for_amb_duration(&self) -> Option<SimTime> {
        Some(self.amb_arrival_time? - self.first_dispatch_time?)
    }

    pub fn amb_going_to_hospital_duration(&self) -> Option<SimTime> {
        Some(self.hospital_arrival_time? - (self.amb_arrival_time? + self.on_scene_duration))
    }
}
