//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `events.csv`
//! - `period_stats.csv`
//! - `ambulance_stats.csv` (one `duration_<status>` column per status)

use std::fs::File;
use std::path::Path;

use csv::Writer;
use log::debug;

use ems_entity::AmbStatus;

use crate::writer::OutputWriter;
use crate::{AmbulanceRow, EventRow, OutputError, OutputResult, PeriodRow};

pub const EVENTS_FILE: &str = "events.csv";
pub const PERIODS_FILE: &str = "period_stats.csv";
pub const AMBULANCES_FILE: &str = "ambulance_stats.csv";

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    events:     Writer<File>,
    periods:    Writer<File>,
    ambulances: Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open (or truncate) the CSV files in it and
    /// write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut events = Writer::from_path(dir.join(EVENTS_FILE))?;
        events.write_record(["replication", "index", "parent_index", "form", "time", "amb", "call", "station"])?;

        let mut periods = Writer::from_path(dir.join(PERIODS_FILE))?;
        periods.write_record([
            "replication",
            "period",
            "start_time",
            "end_time",
            "num_calls",
            "num_queued",
            "num_bumps",
            "num_transports",
            "mean_response",
            "num_dispatches",
            "num_move_ups",
            "total_distance",
        ])?;

        let mut ambulances = Writer::from_path(dir.join(AMBULANCES_FILE))?;
        let mut header: Vec<String> =
            ["replication", "period", "amb", "num_dispatches", "num_redispatches", "num_move_ups", "total_distance"]
                .into_iter()
                .map(str::to_owned)
                .collect();
        header.extend(AmbStatus::ALL.iter().map(|s| format!("duration_{s}")));
        ambulances.write_record(&header)?;

        debug!("writing CSV output to {}", dir.display());
        Ok(Self {
            events,
            periods,
            ambulances,
            finished: false,
        })
    }

    fn check_open(&self) -> OutputResult<()> {
        if self.finished { Err(OutputError::Finished) } else { Ok(()) }
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.check_open()?;
        self.events.write_record(&[
            row.replication.to_string(),
            row.index.to_string(),
            opt(row.parent_index),
            row.form.to_owned(),
            row.time.to_string(),
            opt(row.amb),
            opt(row.call),
            opt(row.station),
        ])?;
        Ok(())
    }

    fn write_period(&mut self, row: &PeriodRow) -> OutputResult<()> {
        self.check_open()?;
        self.periods.write_record(&[
            row.replication.to_string(),
            row.period.to_string(),
            row.start_time.to_string(),
            row.end_time.to_string(),
            row.num_calls.to_string(),
            row.num_queued.to_string(),
            row.num_bumps.to_string(),
            row.num_transports.to_string(),
            opt(row.mean_response),
            row.num_dispatches.to_string(),
            row.num_move_ups.to_string(),
            row.total_distance.to_string(),
        ])?;
        Ok(())
    }

    fn write_ambulances(&mut self, rows: &[AmbulanceRow]) -> OutputResult<()> {
        self.check_open()?;
        for row in rows {
            let mut record = vec![
                row.replication.to_string(),
                row.period.to_string(),
                row.amb.to_string(),
                row.num_dispatches.to_string(),
                row.num_redispatches.to_string(),
                row.num_move_ups.to_string(),
                row.total_distance.to_string(),
            ];
            record.extend(row.status_durations.iter().map(f64::to_string));
            self.ambulances.write_record(&record)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.check_open()?;
        self.events.flush()?;
        self.periods.flush()?;
        self.ambulances.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.periods.flush()?;
        self.ambulances.flush()?;
        Ok(())
    }
}
