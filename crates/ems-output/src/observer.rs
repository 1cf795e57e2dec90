//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use log::warn;

use ems_event::Event;
use ems_sim::{SimObserver, SimState};
use ems_stats::SimPeriodStats;

use crate::row::{AmbulanceRow, EventRow, PeriodRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes events and per-period statistics to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After the run returns, check for errors with
/// [`take_error`][Self::take_error].  Once an error is stored, further rows
/// are dropped so the files end at the first failure.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:       W,
    write_events: bool,
    replication:  u32,
    last_error:   Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            write_events: true,
            replication:  0,
            last_error:   None,
        }
    }

    /// Skip the per-event rows; period statistics are still written.
    pub fn without_events(mut self) -> Self {
        self.write_events = false;
        self
    }

    /// Number of completed runs seen so far.
    pub fn replications(&self) -> u32 {
        self.replication
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Finish the writer and hand it back, surfacing any stored error first.
    pub fn finish(mut self) -> OutputResult<W> {
        if let Some(e) = self.last_error.take() {
            return Err(e);
        }
        self.writer.finish()?;
        Ok(self.writer)
    }

    /// Unwrap the inner writer without finishing it.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }

    fn write_periods(&mut self, periods: &[SimPeriodStats]) -> OutputResult<()> {
        for (i, stats) in periods.iter().enumerate() {
            let period = i as u32;
            self.writer.write_period(&PeriodRow::new(self.replication, period, stats))?;
            let rows: Vec<AmbulanceRow> =
                stats.ambulances.iter().map(|a| AmbulanceRow::new(self.replication, period, a)).collect();
            self.writer.write_ambulances(&rows)?;
        }
        self.writer.flush()
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_event(&mut self, event: &Event, _state: &SimState) {
        if !self.write_events || self.last_error.is_some() {
            return;
        }
        let result = self.writer.write_event(&EventRow::new(self.replication, event));
        self.store_err(result);
    }

    fn on_complete(&mut self, periods: &[SimPeriodStats], _state: &SimState) {
        if self.last_error.is_none() {
            let result = self.write_periods(periods);
            self.store_err(result);
        }
        self.replication += 1;
    }
}
