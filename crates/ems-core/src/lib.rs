//! `ems-core` — foundational types for the `ems_sim` EMS fleet simulator.
//!
//! This crate is a dependency of every other `ems-*` crate.  It has no
//! `ems-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`ids`]      | `AmbId`, `CallId`, `StationId`, `HospitalId`, `NodeId`, `EventId` |
//! | [`geo`]      | `Location` (planar metres)                                 |
//! | [`time`]     | `SimTime`, `SimClock`, `RunState`                          |
//! | [`priority`] | `Priority` (ordered call severity)                         |
//! | [`rng`]      | `SimRng`                                                   |
//! | [`error`]    | `EmsError`, `EmsResult`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod priority;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{EmsError, EmsResult};
pub use geo::Location;
pub use ids::{AmbId, CallId, EventId, HospitalId, NodeId, StationId};
pub use priority::Priority;
pub use rng::SimRng;
pub use time::{RunState, SimClock, SimTime, TIME_TOLERANCE};
