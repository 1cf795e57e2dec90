//! Read-only simulation state passed to every policy callback.

use ems_core::SimTime;
use ems_entity::{Ambulance, Call, Station};
use ems_spatial::TravelQuery;

/// A read-only view of the simulation state at one decision point.
///
/// Built by the handler immediately before a policy is consulted.  The
/// handler holds no mutable borrow of these slices while the context is live,
/// so a policy sees exactly the state the decision is made against.
pub struct PolicyContext<'a> {
    /// Current simulation time.
    pub time: SimTime,

    /// Every ambulance, indexed by `AmbId`.
    pub ambulances: &'a [Ambulance],

    /// Every call, indexed by `CallId`.
    pub calls: &'a [Call],

    /// Every station, indexed by `StationId`.
    pub stations: &'a [Station],

    /// Shared travel-time oracle.
    pub travel: &'a dyn TravelQuery,

    /// Whether an ambulance already driving to a call may be redirected.
    pub allow_bumping: bool,
}

impl<'a> PolicyContext<'a> {
    #[inline]
    pub fn new(
        time:          SimTime,
        ambulances:    &'a [Ambulance],
        calls:         &'a [Call],
        stations:      &'a [Station],
        travel:        &'a dyn TravelQuery,
        allow_bumping: bool,
    ) -> Self {
        Self { time, ambulances, calls, stations, travel, allow_bumping }
    }
}
