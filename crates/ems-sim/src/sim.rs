//! The `Sim` struct: driver loop, statistics capture, snapshot/restore and
//! deployment replication.

use std::sync::Arc;

use log::{debug, info, warn};

use ems_core::{AmbId, EmsError, EventId, SimTime, TIME_TOLERANCE};
use ems_entity::AmbStatus;
use ems_event::{Event, EventForm};
use ems_policy::{DispatchPolicy, MoveUpPolicy};
use ems_spatial::TravelQuery;
use ems_stats::{periods_from_captures, SimPeriodStats};

use crate::{check, Deployment, SimConfig, SimError, SimObserver, SimResult, SimState};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// `Sim<T>` splits into a shared read-only context (travel model, policies,
/// config) and the mutable [`SimState`].  The driver repeatedly takes the
/// earliest queued event and hands it to the event handler, interleaving
/// statistics captures on the configured schedule:
///
/// ```text
/// loop:
///   ① queue empty         → complete (final capture, periods, on_complete)
///   ② earliest > bound    → stop, state stays resumable
///   ③ capture due ≤ next  → capture at the checkpoint time
///   ④ otherwise           → execute the earliest event, notify observer
/// ```
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<T: TravelQuery> {
    pub config: SimConfig,

    /// Travel-time oracle.  Shared (`Arc`) so many `Sim`s built over the same
    /// network do not duplicate it.
    pub travel: Arc<T>,

    pub dispatch: Box<dyn DispatchPolicy>,
    pub move_up:  Box<dyn MoveUpPolicy>,

    pub state: SimState,
}

impl<T: TravelQuery> Sim<T> {
    // ── Driver ────────────────────────────────────────────────────────────

    /// Run until complete or until a bound is reached, capturing statistics
    /// on schedule.
    ///
    /// At most one of `time` and `duration` may be given (`duration` is
    /// relative to now); either must lie strictly after now.  Events at
    /// exactly the bound are executed.  `num_events` caps the number of
    /// events executed by this call.
    ///
    /// Returns whether the run is complete.
    pub fn advance<O: SimObserver>(
        &mut self,
        time:       Option<SimTime>,
        duration:   Option<SimTime>,
        num_events: Option<u64>,
        observer:   &mut O,
    ) -> SimResult<bool> {
        let bound = self.check_bounds(time, duration, num_events)?;
        self.run_loop(bound, num_events, true, observer)
    }

    /// Execute every event up to and including `time`, without captures.
    pub fn advance_to_time<O: SimObserver>(&mut self, time: SimTime, observer: &mut O) -> SimResult<bool> {
        let bound = self.check_bounds(Some(time), None, None)?;
        self.run_loop(bound, None, false, observer)
    }

    /// Run to completion without intermediate captures.  The completion
    /// capture is still taken.
    pub fn advance_to_end<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<bool> {
        self.run_loop(f64::INFINITY, None, false, observer)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state.clock.is_complete()
    }

    /// Per-period statistics; empty until the run completes.
    pub fn periods(&self) -> &[SimPeriodStats] {
        &self.state.periods
    }

    fn check_bounds(
        &self,
        time:       Option<SimTime>,
        duration:   Option<SimTime>,
        num_events: Option<u64>,
    ) -> SimResult<SimTime> {
        let now = self.state.time();
        let bound = match (time, duration) {
            (Some(_), Some(_)) => {
                return Err(SimError::InvalidBound("give a time or a duration, not both".into()));
            }
            (Some(t), None) => t,
            (None, Some(d)) => now + d,
            (None, None) => f64::INFINITY,
        };
        if bound.is_nan() || bound <= now {
            return Err(SimError::InvalidBound(format!("bound {bound} is not after current time {now}")));
        }
        if num_events == Some(0) {
            return Err(SimError::InvalidBound("event count must be > 0".into()));
        }
        Ok(bound)
    }

    fn run_loop<O: SimObserver>(
        &mut self,
        bound:      SimTime,
        num_events: Option<u64>,
        captures:   bool,
        observer:   &mut O,
    ) -> SimResult<bool> {
        let mut executed = 0u64;
        while !self.is_complete() {
            let Some(event) = self.state.queue.peek_earliest().cloned() else {
                self.complete(observer);
                break;
            };
            if event.time > bound || num_events.is_some_and(|n| executed >= n) {
                break;
            }
            if captures && self.state.next_capture.is_some_and(|c| c <= event.time) {
                self.capture(observer);
                continue;
            }

            self.execute(&event)?;
            self.state.capture_stale = true;
            executed += 1;

            if self.config.check_mode {
                check::check_state(&self.state);
            }
            observer.on_event(&event, &self.state);

            if self.state.queue.is_empty() {
                self.complete(observer);
            }
        }
        Ok(self.is_complete())
    }

    // ── Statistics ────────────────────────────────────────────────────────

    /// Take the scheduled capture and move on to the next checkpoint.
    fn capture<O: SimObserver>(&mut self, observer: &mut O) {
        let Some(at) = self.state.next_capture else { return };
        if at >= self.state.time() - TIME_TOLERANCE {
            self.state.clock.advance_to(at);
            let stats = self.snapshot_stats(at);
            observer.on_capture(&stats);
            self.state.captures.push(stats);
            self.state.capture_stale = false;
            self.state.dirty = true;
        }
        self.schedule_next_capture();
    }

    /// Set `next_capture` to the next checkpoint not yet behind the clock.
    /// Checkpoints passed by an uncaptured run are skipped.
    pub(crate) fn schedule_next_capture(&mut self) {
        let start = self.state.clock.start_time;
        loop {
            let t = self.config.stats.capture_time(start, self.state.next_capture_index);
            self.state.next_capture_index += 1;
            match t {
                Some(t) if t < self.state.time() - TIME_TOLERANCE => {
                    debug!("skipping capture at {t}, clock already at {}", self.state.time());
                }
                other => {
                    self.state.next_capture = other;
                    return;
                }
            }
        }
    }

    fn snapshot_stats(&self, time: SimTime) -> SimPeriodStats {
        SimPeriodStats::capture(
            self.state.clock.start_time,
            time,
            &self.state.ambulances,
            &self.state.stations,
            &self.state.hospitals,
        )
    }

    fn complete<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.state.time();
        self.state.clock.complete();
        match self.state.captures.last() {
            Some(c) if c.end_time >= now => {
                // Events at the capture instant ran after it was taken.
                if self.state.capture_stale {
                    let stats = self.snapshot_stats(now);
                    observer.on_capture(&stats);
                    if let Some(last) = self.state.captures.last_mut() {
                        *last = stats;
                    }
                }
            }
            _ => {
                let stats = self.snapshot_stats(now);
                observer.on_capture(&stats);
                self.state.captures.push(stats);
            }
        }
        self.state.capture_stale = false;
        self.state.next_capture = None;

        let targets = self.config.response_targets;
        let calls = &self.state.calls;
        for capture in &mut self.state.captures {
            capture.fill_call_stats(calls, &targets);
        }
        self.state.periods = periods_from_captures(&self.state.captures);
        self.state.dirty = true;

        info!(
            "simulation complete at {now}: {} of {} calls processed, {} periods",
            self.state.num_processed_calls,
            self.state.calls.len(),
            self.state.periods.len()
        );
        if !self.state.queued_calls.is_empty() {
            warn!("{} calls still queued at completion", self.state.queued_calls.len());
        }
        observer.on_complete(&self.state.periods, &self.state);
    }

    // ── Snapshot / restore ────────────────────────────────────────────────

    /// Copy of the mutable state, for [`restore`](Self::restore).
    ///
    /// # Panics
    /// Panics if the run has already started.
    pub fn snapshot(&self) -> SimState {
        assert!(!self.state.clock.is_started(), "snapshot taken after the simulation started");
        let mut snap = self.state.clone();
        snap.dirty = false;
        snap
    }

    /// Reset the mutable state to `snapshot`.  Does nothing if the state has
    /// not changed since the last restore.
    pub fn restore(&mut self, snapshot: &SimState) {
        if !self.state.dirty {
            return;
        }
        let s = &mut self.state;
        s.calls.clone_from(&snapshot.calls);
        s.clock = snapshot.clock;
        s.queue.clone_from(&snapshot.queue);
        s.ambulances.clone_from(&snapshot.ambulances);
        s.stations.clone_from(&snapshot.stations);
        s.hospitals.clone_from(&snapshot.hospitals);
        s.queued_calls.clone_from(&snapshot.queued_calls);
        s.num_processed_calls = snapshot.num_processed_calls;
        s.current_event = snapshot.current_event;
        s.captures.clone_from(&snapshot.captures);
        s.next_capture = snapshot.next_capture;
        s.next_capture_index = snapshot.next_capture_index;
        s.capture_stale = snapshot.capture_stale;
        s.periods.clone_from(&snapshot.periods);
        s.dirty = false;
    }

    // ── Deployments ───────────────────────────────────────────────────────

    /// Base ambulance `i` at `deployment.0[i]`, parked idle from the start
    /// time.  Any pending ambulance events (e.g. sleeps) are dropped.
    pub fn apply_deployment(&mut self, deployment: &Deployment) -> SimResult<()> {
        if self.state.clock.is_started() {
            return Err(SimError::Config("deployment applied after the simulation started".into()));
        }
        let capacities: Vec<u32> = self.state.stations.iter().map(|s| s.capacity).collect();
        deployment.validate(
            self.state.ambulances.len(),
            self.state.stations.len(),
            self.config.enforce_station_capacity.then_some(capacities.as_slice()),
        )?;

        for i in 0..self.state.ambulances.len() {
            if let Some(id) = self.state.ambulances[i].event.take() {
                self.state.queue.cancel(id);
            }
            self.state.ambulances[i].station = deployment.0[i];
        }
        self.state.park_ambulances();
        self.state.dirty = true;
        Ok(())
    }

    /// Run every deployment from `snapshot` to completion, one after the
    /// other, returning the per-period statistics of each.
    pub fn simulate_deployments<O: SimObserver>(
        &mut self,
        snapshot:    &SimState,
        deployments: &[Deployment],
        observer:    &mut O,
    ) -> SimResult<Vec<Vec<SimPeriodStats>>> {
        let mut out = Vec::with_capacity(deployments.len());
        for (i, deployment) in deployments.iter().enumerate() {
            self.restore(snapshot);
            self.apply_deployment(deployment)?;
            self.advance(None, None, None, observer)?;
            info!("deployment {}/{} simulated", i + 1, deployments.len());
            out.push(std::mem::take(&mut self.state.periods));
        }
        self.restore(snapshot);
        Ok(out)
    }

    // ── Sleep ─────────────────────────────────────────────────────────────

    /// Put `amb` to sleep at `at` for `config.sleep_duration`.
    ///
    /// The ambulance must be idle at its station with nothing pending.  A
    /// later dispatch or move-up cancels the sleep.
    pub fn schedule_sleep(&mut self, amb: AmbId, at: SimTime) -> SimResult<EventId> {
        let a = self
            .state
            .ambulances
            .get(amb.index())
            .ok_or(EmsError::AmbulanceNotFound(amb))?;
        if a.status != AmbStatus::IdleAtStation {
            warn!("sleep request for {amb} ignored: status {}", a.status);
            return Err(SimError::Sleep(format!("{amb} is {}, not idle at station", a.status)));
        }
        if let Some(pending) = a.event {
            return Err(SimError::Sleep(format!("{amb} already has pending event {pending}")));
        }
        if !(at.is_finite() && at >= self.state.time()) {
            return Err(SimError::Sleep(format!("time {at} is before current time {}", self.state.time())));
        }

        let id = self.state.queue.schedule(Event::new(EventForm::AmbGoesToSleep, at).with_amb(amb), None);
        self.state.amb_mut(amb).event = Some(id);
        self.state.dirty = true;
        debug!("{amb} scheduled to sleep at {at}");
        Ok(id)
    }
}
