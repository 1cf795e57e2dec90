//! `ems-output` — simulation output writers for the EMS simulator.
//!
//! | File                  | One row per                          |
//! |-----------------------|--------------------------------------|
//! | `events.csv`          | executed event                       |
//! | `period_stats.csv`    | statistics period                    |
//! | `ambulance_stats.csv` | (statistics period, ambulance) pair  |
//!
//! Every row carries a `replication` column: a single observer can watch
//! a whole `Sim::simulate_deployments` sweep, and the counter advances each
//! time a run completes.
//!
//! Writers implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `ems_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ems_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.advance(None, None, None, &mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use memory::MemoryWriter;
pub use observer::SimOutputObserver;
pub use row::{AmbulanceRow, EventRow, PeriodRow};
pub use writer::OutputWriter;
