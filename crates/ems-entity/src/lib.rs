//! `ems-entity` — the four simulated entity kinds and their state machines'
//! status enums.
//!
//! Records here are plain data plus the bookkeeping that must happen on
//! every state change (status-duration accounting for ambulances,
//! time-weighted idle counts for stations).  Deciding *which* transition
//! happens is the event handler's job in `ems-sim`.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`status`]    | `AmbStatus`, `CallStatus`, `AmbStatusSet`               |
//! | [`ambulance`] | `Ambulance`, `AmbCounters`                              |
//! | [`call`]      | `Call`                                                  |
//! | [`station`]   | `Station`                                               |
//! | [`hospital`]  | `Hospital`, `nearest_hospital`                          |
//! | [`loader`]    | CSV loaders for all four entity kinds                   |
//! | [`error`]     | `EntityError`, `EntityResult<T>`                        |

pub mod ambulance;
pub mod call;
pub mod error;
pub mod hospital;
pub mod loader;
pub mod station;
pub mod status;

#[cfg(test)]
mod tests;

pub use ambulance::{AmbCounters, Ambulance};
pub use call::Call;
pub use error::{EntityError, EntityResult};
pub use hospital::{nearest_hospital, Hospital};
pub use loader::{
    load_ambulances_csv, load_ambulances_reader, load_calls_csv, load_calls_reader,
    load_hospitals_csv, load_hospitals_reader, load_stations_csv, load_stations_reader,
};
pub use station::Station;
pub use status::{AmbStatus, AmbStatusSet, CallStatus};
