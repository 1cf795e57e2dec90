//! The `OutputWriter` trait implemented by all backend writers.

use crate::{AmbulanceRow, EventRow, OutputResult, PeriodRow};

/// Trait implemented by the CSV and in-memory writers.
///
/// Errors never reach the simulation: [`SimOutputObserver`][crate::SimOutputObserver]
/// stores them for retrieval with `take_error`.
pub trait OutputWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()>;

    fn write_period(&mut self, row: &PeriodRow) -> OutputResult<()>;

    fn write_ambulances(&mut self, rows: &[AmbulanceRow]) -> OutputResult<()>;

    /// Push buffered rows to the underlying sink.  Called at the end of each
    /// run; the writer stays usable.
    fn flush(&mut self) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
