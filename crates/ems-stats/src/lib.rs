//! `ems-stats` — cumulative statistics captures and per-period deltas.
//!
//! A *capture* is a point-in-time record of every cumulative counter in the
//! simulation, open intervals included.  At the end of a run consecutive
//! captures are differenced into *periods*:
//!
//! ```text
//! period[0] = capture[0]
//! period[i] = capture[i] - capture[i - 1]
//! ```
//!
//! so that `capture[n] == period[0] + ... + period[n]` field by field.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`algebra`] | `FieldOps` trait and the `stats_algebra!` macro              |
//! | [`record`]  | `AmbulanceStats`, `StationStats`, `HospitalStats`, `CallStats` |
//! | [`period`]  | `SimPeriodStats`, `periods_from_captures`                    |

#[macro_use]
pub mod algebra;
pub mod period;
pub mod record;

#[cfg(test)]
mod tests;

pub use algebra::FieldOps;
pub use period::{periods_from_captures, SimPeriodStats};
pub use record::{AmbulanceStats, CallStats, HospitalStats, StationStats};
