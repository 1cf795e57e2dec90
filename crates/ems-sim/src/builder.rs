//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use log::info;

use ems_core::{CallId, Location, SimTime};
use ems_entity::{Ambulance, Call, Hospital, Station};
use ems_event::{Event, EventForm};
use ems_policy::dispatch_policy_by_name;
use ems_spatial::TravelQuery;

use crate::{Deployment, Sim, SimConfig, SimError, SimResult, SimState};

/// Fluent builder for [`Sim<T>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: start time, policies, capture schedule, …
/// - `T: TravelQuery`: the travel model, e.g. [`ems_spatial::StraightLineTravel`]
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default      |
/// |--------------------|--------------|
/// | `.stations(v)`     | no stations  |
/// | `.ambulances(v)`   | no ambulances|
/// | `.calls(v)`        | no calls     |
/// | `.hospitals(v)`    | no hospitals |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, StraightLineTravel::uniform(10.0)?)
///     .stations(stations)
///     .ambulances(ambulances)
///     .calls(calls)
///     .hospitals(hospitals)
///     .build()?;
/// let snapshot = sim.snapshot();
/// sim.advance(None, None, None, &mut NoopObserver)?;
/// ```
pub struct SimBuilder<T: TravelQuery> {
    config:     SimConfig,
    travel:     Arc<T>,
    ambulances: Vec<Ambulance>,
    calls:      Vec<Call>,
    stations:   Vec<Station>,
    hospitals:  Vec<Hospital>,
}

impl<T: TravelQuery> SimBuilder<T> {
    pub fn new(config: SimConfig, travel: T) -> Self {
        Self::with_shared_travel(config, Arc::new(travel))
    }

    /// Like [`new`](Self::new), for a travel model shared with other sims.
    pub fn with_shared_travel(config: SimConfig, travel: Arc<T>) -> Self {
        Self {
            config,
            travel,
            ambulances: Vec::new(),
            calls:      Vec::new(),
            stations:   Vec::new(),
            hospitals:  Vec::new(),
        }
    }

    /// Ambulances, indexed by position.  Each ambulance's `station` is its
    /// initial deployment.
    pub fn ambulances(mut self, ambulances: Vec<Ambulance>) -> Self {
        self.ambulances = ambulances;
        self
    }

    /// Calls, indexed by position and sorted by arrival time.
    pub fn calls(mut self, calls: Vec<Call>) -> Self {
        self.calls = calls;
        self
    }

    pub fn stations(mut self, stations: Vec<Station>) -> Self {
        self.stations = stations;
        self
    }

    pub fn hospitals(mut self, hospitals: Vec<Hospital>) -> Self {
        self.hospitals = hospitals;
        self
    }

    /// Validate inputs, park ambulances, queue the first call arrival and
    /// return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<T>> {
        self.config.validate()?;
        self.validate_entities()?;

        let start = self.config.start_time;
        let dispatch = dispatch_policy_by_name(&self.config.dispatch_policy)?;
        let move_up = self.config.move_up.build(self.stations.len())?;

        let mut state = SimState::new(start, self.ambulances, self.calls, self.stations, self.hospitals);
        let deployment = Deployment(state.ambulances.iter().map(|a| a.station).collect());
        let capacities: Vec<u32> = state.stations.iter().map(|s| s.capacity).collect();
        deployment.validate(
            state.ambulances.len(),
            state.stations.len(),
            self.config.enforce_station_capacity.then_some(capacities.as_slice()),
        )?;
        state.park_ambulances();
        if let Some(first) = state.calls.first() {
            state.queue.schedule(
                Event::new(EventForm::CallArrives, first.arrival_time).with_call(CallId::from_index(0)),
                None,
            );
        }

        info!(
            "built simulation: {} ambulances, {} stations, {} hospitals, {} calls, dispatch {:?}, move-up {:?}",
            state.ambulances.len(),
            state.stations.len(),
            state.hospitals.len(),
            state.calls.len(),
            dispatch.name(),
            move_up.name()
        );

        let mut sim = Sim {
            config: self.config,
            travel: self.travel,
            dispatch,
            move_up,
            state,
        };
        sim.schedule_next_capture();
        Ok(sim)
    }

    fn validate_entities(&self) -> SimResult<()> {
        fn check_indices(what: &'static str, indices: impl Iterator<Item = usize>) -> SimResult<()> {
            for (position, index) in indices.enumerate() {
                if position != index {
                    return Err(SimError::IndexMismatch { what, position, index });
                }
            }
            Ok(())
        }
        check_indices("ambulance", self.ambulances.iter().map(|a| a.index.index()))?;
        check_indices("call", self.calls.iter().map(|c| c.index.index()))?;
        check_indices("station", self.stations.iter().map(|s| s.index.index()))?;
        check_indices("hospital", self.hospitals.iter().map(|h| h.index.index()))?;

        if !self.ambulances.is_empty() && self.stations.is_empty() {
            return Err(SimError::Config("ambulances given but no stations".into()));
        }
        if let Some(loc) = self.stations.iter().map(|s| s.location).find(|l| !finite(*l)) {
            return Err(SimError::Config(format!("station location {loc:?} is not finite")));
        }

        let start = self.config.start_time;
        let mut prev: SimTime = start;
        for call in &self.calls {
            if !call.arrival_time.is_finite() {
                return Err(SimError::Config(format!("{} arrival time {} is not finite", call.index, call.arrival_time)));
            }
            if !finite(call.location) {
                return Err(SimError::Config(format!("{} location {:?} is not finite", call.index, call.location)));
            }
            for (what, value) in [
                ("dispatch delay", call.dispatch_delay),
                ("on-scene duration", call.on_scene_duration),
                ("handover duration", call.handover_duration),
            ] {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(SimError::Config(format!("{} {what} {value} must be finite and >= 0", call.index)));
                }
            }
            if call.arrival_time < prev {
                return Err(SimError::Config(format!(
                    "{} arrives at {}, before {prev}; calls must be sorted and start no earlier than {start}",
                    call.index, call.arrival_time
                )));
            }
            prev = call.arrival_time;
            if let Some(h) = call.hospital.filter(|h| h.index() >= self.hospitals.len()) {
                return Err(SimError::Config(format!("{} names unknown hospital {h}", call.index)));
            }
        }
        if self.hospitals.is_empty() && self.calls.iter().any(|c| c.transport) {
            return Err(SimError::Config("calls need transport but there are no hospitals".into()));
        }
        Ok(())
    }
}

fn finite(loc: Location) -> bool {
    loc.x.is_finite() && loc.y.is_finite()
}
