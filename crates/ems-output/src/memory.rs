//! In-memory output backend, for tests and for callers that post-process
//! rows themselves.

use crate::writer::OutputWriter;
use crate::{AmbulanceRow, EventRow, OutputError, OutputResult, PeriodRow};

#[derive(Debug, Default)]
pub struct MemoryWriter {
    pub events:     Vec<EventRow>,
    pub periods:    Vec<PeriodRow>,
    pub ambulances: Vec<AmbulanceRow>,
    pub flushes:    usize,
    finished:       bool,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn check_open(&self) -> OutputResult<()> {
        if self.finished { Err(OutputError::Finished) } else { Ok(()) }
    }
}

impl OutputWriter for MemoryWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.check_open()?;
        self.events.push(*row);
        Ok(())
    }

    fn write_period(&mut self, row: &PeriodRow) -> OutputResult<()> {
        self.check_open()?;
        self.periods.push(*row);
        Ok(())
    }

    fn write_ambulances(&mut self, rows: &[AmbulanceRow]) -> OutputResult<()> {
        self.check_open()?;
        self.ambulances.extend_from_slice(rows);
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.check_open()?;
        self.flushes += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}
