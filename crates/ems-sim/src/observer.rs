//! Simulation observer trait and the in-crate observers.

use ems_event::Event;
use ems_stats::SimPeriodStats;

use crate::SimState;

/// Callbacks invoked by [`Sim`][crate::Sim] while it runs.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { every: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_event(&mut self, event: &Event, _state: &SimState) {
///         if event.index.0 % self.every == 0 {
///             println!("{event}");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after each event has been executed.  `state` already reflects
    /// the event's changes.
    fn on_event(&mut self, _event: &Event, _state: &SimState) {}

    /// Called after each cumulative statistics capture.
    fn on_capture(&mut self, _capture: &SimPeriodStats) {}

    /// Called once when the run completes, with the per-period statistics.
    fn on_complete(&mut self, _periods: &[SimPeriodStats], _state: &SimState) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Records every executed event in memory.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SimObserver for EventLog {
    fn on_event(&mut self, event: &Event, _state: &SimState) {
        self.events.push(event.clone());
    }
}

// ── Resimulation ──────────────────────────────────────────────────────────────

/// The first point where a fresh run diverged from a recorded log.
#[derive(Clone, Debug, PartialEq)]
pub struct Divergence {
    /// Position in the executed sequence.
    pub position: usize,
    pub expected: Option<Event>,
    pub actual:   Option<Event>,
}

/// Replays a recorded event log against a fresh run.
///
/// Each executed event is compared with the recorded event at the same
/// position; the first mismatch (including a run that executes more or fewer
/// events than recorded) is kept in [`divergence`](Self::divergence).
#[derive(Clone, Debug)]
pub struct ResimulationCheck {
    expected: Vec<Event>,
    seen:     usize,
    divergence: Option<Divergence>,
}

impl ResimulationCheck {
    pub fn new(expected: Vec<Event>) -> Self {
        Self { expected, seen: 0, divergence: None }
    }

    pub fn divergence(&self) -> Option<&Divergence> {
        self.divergence.as_ref()
    }

    /// `true` once the run has completed without any mismatch.
    pub fn is_consistent(&self) -> bool {
        self.divergence.is_none() && self.seen == self.expected.len()
    }

    fn record(&mut self, expected: Option<Event>, actual: Option<Event>) {
        if self.divergence.is_none() {
            self.divergence = Some(Divergence { position: self.seen, expected, actual });
        }
    }
}

impl SimObserver for ResimulationCheck {
    fn on_event(&mut self, event: &Event, _state: &SimState) {
        match self.expected.get(self.seen) {
            Some(e) if e == event => {}
            other => {
                let expected = other.cloned();
                self.record(expected, Some(event.clone()));
            }
        }
        self.seen += 1;
    }

    fn on_complete(&mut self, _periods: &[SimPeriodStats], _state: &SimState) {
        if self.seen < self.expected.len() {
            let expected = self.expected.get(self.seen).cloned();
            self.record(expected, None);
        }
    }
}
