//! `ems-sim` — the event-driven EMS simulation engine.
//!
//! # Event loop
//!
//! ```text
//! while queue not empty and earliest event ≤ bound:
//!   ① capture due at or before the earliest event → capture statistics
//!   ② otherwise pop the earliest event and run its handler:
//!        check preconditions → consult policies / plan routes → mutate
//!        entities → schedule successors
//!   ③ observer.on_event
//! queue empty → final capture, per-period stats, observer.on_complete
//! ```
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`sim`]        | `Sim`: driver, captures, snapshot/restore, replications  |
//! | [`handler`]    | per-event state machine                                   |
//! | [`builder`]    | `SimBuilder`                                              |
//! | [`state`]      | `SimState`, the mutable per-run state                     |
//! | [`config`]     | `SimConfig`, `StatsSchedule` (JSON via serde)             |
//! | [`deployment`] | `Deployment`, count conversions, random generators        |
//! | [`observer`]   | `SimObserver`, `EventLog`, `ResimulationCheck`            |
//! | [`generate`]   | `CallGenConfig`, `generate_calls`                         |
//! | [`check`]      | consistency checks for `check_mode`                       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ems_sim::{NoopObserver, SimBuilder, SimConfig};
//! use ems_spatial::StraightLineTravel;
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), StraightLineTravel::uniform(10.0)?)
//!     .stations(stations)
//!     .ambulances(ambulances)
//!     .hospitals(hospitals)
//!     .calls(calls)
//!     .build()?;
//! let snapshot = sim.snapshot();
//! let results = sim.simulate_deployments(&snapshot, &deployments, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod check;
pub mod config;
pub mod deployment;
pub mod error;
pub mod generate;
pub mod handler;
pub mod observer;
pub mod sim;
pub mod state;


pub use builder::SimBuilder;
pub use config::{SimConfig, StatsSchedule};
pub use deployment::{
    deployment_from_station_counts, random_deployment, random_deployments, station_counts_from_deployment,
    Deployment, DeploymentError,
};
pub use error::{SimError, SimResult};
pub use generate::{generate_calls, CallGenConfig};
pub use observer::{Divergence, EventLog, NoopObserver, ResimulationCheck, SimObserver};
pub use sim::Sim;
pub use state::SimState;
