//! Simulation time model.
//!
//! # Design
//!
//! Time is continuous: a [`SimTime`] is `f64` seconds on the simulation's own
//! timeline (typically `0.0` at the start of the call log).  Events fire at
//! arbitrary instants, so an integer tick would force rounding of every travel
//! duration.  Comparisons between times that were derived along different
//! arithmetic paths use [`TIME_TOLERANCE`].
//!
//! The clock also carries the run lifecycle (`NotStarted → Running →
//! Complete`).  Completion is recorded exactly once.

use std::fmt;

/// Simulation time in seconds.
pub type SimTime = f64;

/// Absolute tolerance for time and duration identities (seconds).
pub const TIME_TOLERANCE: f64 = 1e-6;

// ── RunState ──────────────────────────────────────────────────────────────────

/// Lifecycle of one simulation run.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunState {
    /// No event has executed since construction or the last restore.
    #[default]
    NotStarted,
    Running,
    /// The event queue emptied after an event executed.
    Complete,
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Current simulation time plus run lifecycle.
///
/// `SimClock` is `Copy`; it is part of the mutable per-run state and is
/// snapshotted along with the entities.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Time at which the run starts.  Elapsed durations are measured from here.
    pub start_time: SimTime,
    /// Time of the most recently executed event (or capture).
    pub time: SimTime,
    /// Time at which the run completed, set exactly once.
    pub end_time: Option<SimTime>,
    pub state: RunState,
}

impl SimClock {
    pub fn new(start_time: SimTime) -> Self {
        Self {
            start_time,
            time: start_time,
            end_time: None,
            state: RunState::NotStarted,
        }
    }

    /// Move the clock forward to `t`.
    ///
    /// # Panics
    /// Panics if `t` is earlier than the current time or the run is complete;
    /// either means events were executed out of order.
    #[inline]
    pub fn advance_to(&mut self, t: SimTime) {
        assert!(
            t >= self.time - TIME_TOLERANCE,
            "clock moved backwards: {} -> {}", self.time, t
        );
        assert!(self.state != RunState::Complete, "clock advanced after completion");
        self.time = t.max(self.time);
        self.state = RunState::Running;
    }

    /// Record completion at the current time.
    ///
    /// # Panics
    /// Panics if completion was already recorded.
    pub fn complete(&mut self) {
        assert!(self.end_time.is_none(), "simulation completed twice");
        self.end_time = Some(self.time);
        self.state = RunState::Complete;
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state == RunState::Complete
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.state != RunState::NotStarted
    }

    /// Seconds since `start_time`.
    #[inline]
    pub fn elapsed(&self) -> SimTime {
        self.time - self.start_time
    }

    /// Break elapsed time into (day, hour, minute) for log lines.
    pub fn elapsed_dhm(&self) -> (u64, u32, u32) {
        let total_secs = self.elapsed().max(0.0) as u64;
        let days = total_secs / 86_400;
        let hours = ((total_secs % 86_400) / 3_600) as u32;
        let minutes = ((total_secs % 3_600) / 60) as u32;
        (days, hours, minutes)
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m) = self.elapsed_dhm();
        write!(f, "t={:.1}s (day {} {:02}:{:02})", self.time, d, h, m)
    }
}
