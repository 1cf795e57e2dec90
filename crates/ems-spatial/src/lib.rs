//! `ems-spatial` — road network, routes, and travel-time queries.
//!
//! The simulation engine never computes paths itself.  It asks a
//! [`TravelQuery`] for a [`Route`] whenever an ambulance starts moving, and
//! asks the route where the ambulance is (and how far it has driven) at any
//! later instant.  Everything in this crate is read-only once built and is
//! shared unchanged across replications.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`          |
//! | [`route`]   | `Route`, `Waypoint`                                         |
//! | [`travel`]  | `TravelQuery` trait, `StraightLineTravel`, `NetworkTravel`, `change_route` |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |

pub mod error;
pub mod network;
pub mod route;
pub mod travel;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use route::{Route, Waypoint};
pub use travel::{change_route, NetworkTravel, StraightLineTravel, TravelQuery};
