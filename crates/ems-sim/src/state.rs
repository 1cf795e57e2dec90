//! The mutable per-run state of a simulation.
//!
//! Everything a run changes lives in [`SimState`]; everything it only reads
//! (travel model, policies, config) lives on [`Sim`][crate::Sim] itself.
//! Snapshot and restore therefore only ever copy a `SimState`.

use ems_core::{AmbId, CallId, EventId, SimClock, SimTime, StationId};
use ems_entity::{AmbStatus, Ambulance, Call, Hospital, Station};
use ems_event::EventQueue;
use ems_stats::SimPeriodStats;

#[derive(Clone, Debug)]
pub struct SimState {
    pub clock:      SimClock,
    pub queue:      EventQueue,
    pub ambulances: Vec<Ambulance>,
    pub calls:      Vec<Call>,
    pub stations:   Vec<Station>,
    pub hospitals:  Vec<Hospital>,

    /// Calls waiting for an ambulance, in the order they were queued.
    pub queued_calls: Vec<CallId>,
    /// Number of calls that have reached `Processed`.
    pub num_processed_calls: usize,

    /// Event currently being executed; parent of anything it schedules.
    pub current_event: Option<EventId>,

    /// Cumulative statistics captures taken so far.
    pub captures: Vec<SimPeriodStats>,
    pub next_capture: Option<SimTime>,
    /// Position in the capture schedule of the checkpoint after `next_capture`.
    pub next_capture_index: usize,
    /// An event ran after the last capture was taken.
    pub capture_stale: bool,
    /// Per-period statistics, filled in at completion.
    pub periods: Vec<SimPeriodStats>,

    /// Set by anything that changes the state; cleared by restore.
    pub dirty: bool,
}

impl SimState {
    pub(crate) fn new(
        start_time: SimTime,
        ambulances: Vec<Ambulance>,
        calls:      Vec<Call>,
        stations:   Vec<Station>,
        hospitals:  Vec<Hospital>,
    ) -> Self {
        Self {
            clock: SimClock::new(start_time),
            queue: EventQueue::new(),
            ambulances,
            calls,
            stations,
            hospitals,
            queued_calls: Vec::new(),
            num_processed_calls: 0,
            current_event: None,
            captures: Vec::new(),
            next_capture: None,
            next_capture_index: 0,
            capture_stale: false,
            periods: Vec::new(),
            dirty: false,
        }
    }

    #[inline]
    pub fn time(&self) -> SimTime {
        self.clock.time
    }

    /// Park every ambulance at its station at the start time and recount
    /// idle ambulances per station.
    pub(crate) fn park_ambulances(&mut self) {
        let start = self.clock.start_time;
        for amb in &mut self.ambulances {
            let station = amb.station;
            amb.reset(station, self.stations[station.index()].location, start);
        }
        let counts = self.idle_counts();
        for (station, n) in self.stations.iter_mut().zip(counts) {
            station.reset(n, start);
        }
    }

    /// Ambulances currently `IdleAtStation`, counted per station.
    pub fn idle_counts(&self) -> Vec<u32> {
        let mut counts = vec![0u32; self.stations.len()];
        for amb in &self.ambulances {
            if amb.status == AmbStatus::IdleAtStation {
                counts[amb.station.index()] += 1;
            }
        }
        counts
    }

    /// The queued call to serve next: most urgent first, then earliest
    /// arrival, then lowest index.
    pub(crate) fn pop_next_queued_call(&mut self) -> Option<CallId> {
        let calls = &self.calls;
        let (pos, _) = self.queued_calls.iter().enumerate().min_by(|(_, a), (_, b)| {
            let (ca, cb) = (&calls[a.index()], &calls[b.index()]);
            ca.priority
                .cmp(&cb.priority)
                .then(ca.arrival_time.total_cmp(&cb.arrival_time))
                .then(a.cmp(b))
        })?;
        Some(self.queued_calls.remove(pos))
    }

    #[inline]
    pub(crate) fn amb(&self, id: AmbId) -> &Ambulance {
        &self.ambulances[id.index()]
    }

    #[inline]
    pub(crate) fn amb_mut(&mut self, id: AmbId) -> &mut Ambulance {
        &mut self.ambulances[id.index()]
    }

    #[inline]
    pub(crate) fn call(&self, id: CallId) -> &Call {
        &self.calls[id.index()]
    }

    #[inline]
    pub(crate) fn call_mut(&mut self, id: CallId) -> &mut Call {
        &mut self.calls[id.index()]
    }

    #[inline]
    pub(crate) fn station_mut(&mut self, id: StationId) -> &mut Station {
        &mut self.stations[id.index()]
    }
}
