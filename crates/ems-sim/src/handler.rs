//! Event handler: the ambulance and call state machines.
//!
//! | Event                 | Ambulance before          | Ambulance after       | Schedules                                 |
//! |-----------------------|---------------------------|-----------------------|-------------------------------------------|
//! | `AmbGoesToSleep`      | IdleAtStation             | Sleeping              | `AmbWakesUp` after the sleep duration     |
//! | `AmbWakesUp`          | Sleeping                  | IdleAtStation         | `ConsiderDispatch` for a queued call      |
//! | `CallArrives`         | –                         | –                     | `ConsiderDispatch`, next `CallArrives`    |
//! | `ConsiderDispatch`    | –                         | –                     | `AmbDispatched` (+ bumped call's reconsideration) |
//! | `AmbDispatched`       | idle / free / on road     | GoingToCall           | `AmbReachesCall`, `ConsiderMoveUp`        |
//! | `AmbReachesCall`      | GoingToCall               | AtCall                | `AmbGoesToHospital` or `AmbBecomesFree`   |
//! | `AmbGoesToHospital`   | AtCall                    | GoingToHospital       | `AmbReachesHospital`                      |
//! | `AmbReachesHospital`  | GoingToHospital           | AtHospital            | `AmbBecomesFree`                          |
//! | `AmbBecomesFree`      | AtCall / AtHospital       | FreeAfterCall         | `AmbDispatched` or `AmbReturnsToStation`, `ConsiderMoveUp` |
//! | `AmbReturnsToStation` | FreeAfterCall             | ReturningToStation    | `AmbReachesStation`                       |
//! | `AmbReachesStation`   | Returning / MovingUp      | IdleAtStation         | –                                         |
//! | `ConsiderMoveUp`      | –                         | –                     | `AmbMoveUpToStation` per move             |
//! | `AmbMoveUpToStation`  | free                      | MovingUpToStation     | `AmbReachesStation`                       |
//!
//! Every handler checks its preconditions and performs every fallible step
//! (policy calls, route planning) before `begin` pops the event, so
//! an error leaves the state untouched.  A broken precondition is a bug in
//! the engine or a policy and panics.

use log::{debug, trace};

use ems_core::{AmbId, CallId, EventId, SimTime, StationId};
use ems_entity::{nearest_hospital, AmbStatus, CallStatus};
use ems_event::{Event, EventForm};
use ems_policy::PolicyContext;
use ems_spatial::{change_route, TravelQuery};

use crate::{Sim, SimError, SimResult};

impl<T: TravelQuery> Sim<T> {
    /// Execute `event`, which must be the earliest queued event.
    pub(crate) fn execute(&mut self, event: &Event) -> SimResult<()> {
        trace!("{event}");
        match event.form {
            EventForm::AmbGoesToSleep      => self.amb_goes_to_sleep(event),
            EventForm::AmbWakesUp          => self.amb_wakes_up(event),
            EventForm::CallArrives         => self.call_arrives(event),
            EventForm::ConsiderDispatch    => self.consider_dispatch(event),
            EventForm::AmbDispatched       => self.amb_dispatched(event),
            EventForm::AmbReachesCall      => self.amb_reaches_call(event),
            EventForm::AmbGoesToHospital   => self.amb_goes_to_hospital(event),
            EventForm::AmbReachesHospital  => self.amb_reaches_hospital(event),
            EventForm::AmbBecomesFree      => self.amb_becomes_free(event),
            EventForm::AmbReturnsToStation => self.amb_returns_to_station(event),
            EventForm::AmbReachesStation   => self.amb_reaches_station(event),
            EventForm::ConsiderMoveUp      => self.consider_move_up(event),
            EventForm::AmbMoveUpToStation  => self.amb_move_up_to_station(event),
        }
    }

    // ── Sleep ─────────────────────────────────────────────────────────────

    fn amb_goes_to_sleep(&mut self, event: &Event) -> SimResult<()> {
        let amb = event_amb(event);
        self.expect_status(amb, &[AmbStatus::IdleAtStation], event);

        self.begin(event);
        let now = event.time;
        self.take_amb_event(amb, event);
        let station = self.state.amb(amb).station;
        self.state.amb_mut(amb).set_status(AmbStatus::Sleeping, now);
        self.state.station_mut(station).ambulance_left(now);

        let wake = now + self.config.sleep_duration;
        self.schedule_for_amb(amb, Event::new(EventForm::AmbWakesUp, wake));
        Ok(())
    }

    fn amb_wakes_up(&mut self, event: &Event) -> SimResult<()> {
        let amb = event_amb(event);
        self.expect_status(amb, &[AmbStatus::Sleeping], event);

        self.begin(event);
        let now = event.time;
        self.take_amb_event(amb, event);
        let station = self.state.amb(amb).station;
        self.state.amb_mut(amb).set_status(AmbStatus::IdleAtStation, now);
        self.state.station_mut(station).ambulance_arrived(now);

        if let Some(call) = self.state.pop_next_queued_call() {
            debug!("{amb} woke up, reconsidering queued {call}");
            self.schedule(Event::new(EventForm::ConsiderDispatch, now).with_call(call));
        }
        Ok(())
    }

    // ── Calls and dispatch ────────────────────────────────────────────────

    fn call_arrives(&mut self, event: &Event) -> SimResult<()> {
        let call = event_call(event);
        let status = self.state.call(call).status;
        assert_eq!(status, CallStatus::Null, "{event}: {call} has status {status:?}");

        self.begin(event);
        let c = self.state.call_mut(call);
        c.status = CallStatus::Screening;
        let screened = c.screened_time();
        self.schedule(Event::new(EventForm::ConsiderDispatch, screened).with_call(call));

        let next = CallId::from_index(call.index() + 1);
        if let Some(arrival) = self.state.calls.get(next.index()).map(|c| c.arrival_time) {
            self.schedule(Event::new(EventForm::CallArrives, arrival).with_call(next));
        }
        Ok(())
    }

    fn consider_dispatch(&mut self, event: &Event) -> SimResult<()> {
        let call = event_call(event);
        {
            let c = self.state.call(call);
            assert!(
                matches!(c.status, CallStatus::Screening | CallStatus::Queued | CallStatus::WaitingForAmb)
                    && c.amb.is_none(),
                "{event}: {call} is {:?} with ambulance {:?}",
                c.status,
                c.amb
            );
        }

        let choice = self.dispatch.select_ambulance(call, &self.policy_context(event.time))?;
        if let Some(amb) = choice {
            self.check_dispatch_choice(call, amb)?;
        }

        self.begin(event);
        let now = event.time;
        let Some(amb) = choice else {
            debug!("no ambulance for {call}, queueing");
            let c = self.state.call_mut(call);
            c.status = CallStatus::Queued;
            c.was_queued = true;
            self.state.queued_calls.push(call);
            return Ok(());
        };

        let bumped = match self.state.amb(amb) {
            a if a.status == AmbStatus::GoingToCall => a.call,
            _ => None,
        };
        self.cancel_amb_event(amb);
        if let Some(b) = bumped {
            debug!("{call} bumps {b} from {amb}");
            let bc = self.state.call_mut(b);
            bc.amb = None;
            bc.num_bumps += 1;
        }

        debug!("dispatching {amb} to {call}");
        self.link(call, amb);
        self.schedule_for_amb(amb, Event::new(EventForm::AmbDispatched, now).with_call(call));
        if let Some(b) = bumped {
            self.schedule(Event::new(EventForm::ConsiderDispatch, now).with_call(b));
        }
        Ok(())
    }

    fn amb_dispatched(&mut self, event: &Event) -> SimResult<()> {
        let (amb, call) = (event_amb(event), event_call(event));
        self.expect_status(
            amb,
            &[
                AmbStatus::IdleAtStation,
                AmbStatus::FreeAfterCall,
                AmbStatus::GoingToCall,
                AmbStatus::ReturningToStation,
                AmbStatus::MovingUpToStation,
            ],
            event,
        );
        self.expect_linked(amb, call, event);

        let now = event.time;
        let (priority, location) = {
            let c = self.state.call(call);
            (c.priority, c.location)
        };
        let route = change_route(&*self.travel, &self.state.amb(amb).route, priority, now, location)?;

        self.begin(event);
        self.take_amb_event(amb, event);
        let a = self.state.amb_mut(amb);
        let from = a.status;
        let from_loc = a.location_at(now);
        let station = a.station;
        a.counters.record_dispatch(from);
        a.set_status(AmbStatus::GoingToCall, now);
        a.route = route;
        let arrival = a.route.end_time();
        if from == AmbStatus::IdleAtStation {
            self.state.station_mut(station).ambulance_left(now);
        }

        let c = self.state.call_mut(call);
        c.first_dispatch_time.get_or_insert(now);
        c.dispatch_time = Some(now);
        c.amb_dispatch_loc = Some(from_loc);
        c.amb_status_before_dispatch = Some(from);

        self.schedule_for_amb(amb, Event::new(EventForm::AmbReachesCall, arrival).with_call(call));
        if self.move_up.triggers().on_dispatch {
            self.schedule(Event::new(EventForm::ConsiderMoveUp, now).with_amb(amb));
        }
        Ok(())
    }

    fn amb_reaches_call(&mut self, event: &Event) -> SimResult<()> {
        let (amb, call) = (event_amb(event), event_call(event));
        self.expect_status(amb, &[AmbStatus::GoingToCall], event);
        self.expect_linked(amb, call, event);

        self.begin(event);
        let now = event.time;
        self.take_amb_event(amb, event);
        let a = self.state.amb_mut(amb);
        a.set_status(AmbStatus::AtCall, now);
        a.counters.num_calls_treated += 1;

        let c = self.state.call_mut(call);
        c.status = CallStatus::OnSceneTreatment;
        c.amb_arrival_time = Some(now);
        let (form, done) = if c.transport {
            (EventForm::AmbGoesToHospital, now + c.on_scene_duration)
        } else {
            (EventForm::AmbBecomesFree, now + c.on_scene_duration)
        };
        self.schedule_for_amb(amb, Event::new(form, done).with_call(call));
        Ok(())
    }

    // ── Transport ─────────────────────────────────────────────────────────

    fn amb_goes_to_hospital(&mut self, event: &Event) -> SimResult<()> {
        let (amb, call) = (event_amb(event), event_call(event));
        self.expect_status(amb, &[AmbStatus::AtCall], event);
        self.expect_linked(amb, call, event);

        let now = event.time;
        let (priority, location, requested) = {
            let c = self.state.call(call);
            (c.priority, c.location, c.hospital)
        };
        let hospital = match requested {
            Some(h) => h,
            None => nearest_hospital(&*self.travel, &self.state.hospitals, location, priority)?
                .ok_or_else(|| SimError::Config(format!("{call} needs transport but there are no hospitals")))?,
        };
        let to = self.state.hospitals[hospital.index()].location;
        let route = change_route(&*self.travel, &self.state.amb(amb).route, priority, now, to)?;

        self.begin(event);
        self.take_amb_event(amb, event);
        let a = self.state.amb_mut(amb);
        a.set_status(AmbStatus::GoingToHospital, now);
        a.route = route;
        a.counters.num_calls_transported += 1;
        let arrival = a.route.end_time();

        let c = self.state.call_mut(call);
        c.status = CallStatus::GoingToHospital;
        c.hospital = Some(hospital);

        self.schedule_for_amb(amb, Event::new(EventForm::AmbReachesHospital, arrival).with_call(call));
        Ok(())
    }

    fn amb_reaches_hospital(&mut self, event: &Event) -> SimResult<()> {
        let (amb, call) = (event_amb(event), event_call(event));
        self.expect_status(amb, &[AmbStatus::GoingToHospital], event);
        self.expect_linked(amb, call, event);
        let hospital = self
            .state
            .call(call)
            .hospital
            .unwrap_or_else(|| panic!("{event}: {call} has no hospital"));

        self.begin(event);
        let now = event.time;
        self.take_amb_event(amb, event);
        self.state.amb_mut(amb).set_status(AmbStatus::AtHospital, now);
        self.state.hospitals[hospital.index()].num_calls += 1;

        let c = self.state.call_mut(call);
        c.status = CallStatus::AtHospital;
        c.hospital_arrival_time = Some(now);
        let done = now + c.handover_duration;
        self.schedule_for_amb(amb, Event::new(EventForm::AmbBecomesFree, done).with_call(call));
        Ok(())
    }

    // ── Release and return ────────────────────────────────────────────────

    fn amb_becomes_free(&mut self, event: &Event) -> SimResult<()> {
        let (amb, call) = (event_amb(event), event_call(event));
        self.expect_status(amb, &[AmbStatus::AtCall, AmbStatus::AtHospital], event);
        self.expect_linked(amb, call, event);

        self.begin(event);
        let now = event.time;
        self.take_amb_event(amb, event);
        let a = self.state.amb_mut(amb);
        a.set_status(AmbStatus::FreeAfterCall, now);
        a.call = None;

        let c = self.state.call_mut(call);
        c.status = CallStatus::Processed;
        c.processed_time = Some(now);
        self.state.num_processed_calls += 1;

        if let Some(next) = self.state.pop_next_queued_call() {
            debug!("{amb} freed, taking queued {next}");
            self.link(next, amb);
            self.schedule_for_amb(amb, Event::new(EventForm::AmbDispatched, now).with_call(next));
            return Ok(());
        }

        self.schedule_for_amb(amb, Event::new(EventForm::AmbReturnsToStation, now));
        if self.move_up.triggers().on_free {
            self.schedule(Event::new(EventForm::ConsiderMoveUp, now).with_amb(amb));
        }
        Ok(())
    }

    fn amb_returns_to_station(&mut self, event: &Event) -> SimResult<()> {
        let amb = event_amb(event);
        self.expect_status(amb, &[AmbStatus::FreeAfterCall], event);

        let now = event.time;
        let a = self.state.amb(amb);
        let station = a.station;
        let to = self.state.stations[station.index()].location;
        let route = change_route(&*self.travel, &a.route, self.config.non_emergency_priority, now, to)?;

        self.begin(event);
        self.take_amb_event(amb, event);
        let a = self.state.amb_mut(amb);
        a.set_status(AmbStatus::ReturningToStation, now);
        a.route = route;
        let arrival = a.route.end_time();
        self.schedule_for_amb(amb, Event::new(EventForm::AmbReachesStation, arrival).with_station(station));
        Ok(())
    }

    fn amb_reaches_station(&mut self, event: &Event) -> SimResult<()> {
        let amb = event_amb(event);
        self.expect_status(amb, &[AmbStatus::ReturningToStation, AmbStatus::MovingUpToStation], event);
        let station = self.state.amb(amb).station;
        assert_eq!(event.station, Some(station), "{event}: {amb} is based at {station}");

        self.begin(event);
        let now = event.time;
        self.take_amb_event(amb, event);
        self.state.amb_mut(amb).set_status(AmbStatus::IdleAtStation, now);
        self.state.station_mut(station).ambulance_arrived(now);
        Ok(())
    }

    // ── Move-up ───────────────────────────────────────────────────────────

    fn consider_move_up(&mut self, event: &Event) -> SimResult<()> {
        let moves = self.move_up.compute_move_ups(event.amb, &self.policy_context(event.time))?;
        self.check_move_ups(&moves)?;

        self.begin(event);
        let now = event.time;
        for (amb, station) in moves {
            if self.state.amb(amb).station == station {
                continue;
            }
            debug!("moving up {amb} to {station}");
            self.cancel_amb_event(amb);
            self.schedule_for_amb(amb, Event::new(EventForm::AmbMoveUpToStation, now).with_station(station));
        }
        Ok(())
    }

    fn amb_move_up_to_station(&mut self, event: &Event) -> SimResult<()> {
        let amb = event_amb(event);
        let station = event.station.unwrap_or_else(|| panic!("{event} has no station"));
        let a = self.state.amb(amb);
        assert!(
            a.status.is_movable() && a.call.is_none(),
            "{event}: {amb} is {} with call {:?}",
            a.status,
            a.call
        );

        let now = event.time;
        let to = self.state.stations[station.index()].location;
        let route = change_route(&*self.travel, &a.route, self.config.non_emergency_priority, now, to)?;

        self.begin(event);
        self.take_amb_event(amb, event);
        let a = self.state.amb_mut(amb);
        let from = a.status;
        let from_station = a.station;
        a.counters.record_move_up(from);
        a.move_up_from_station = Some(from_station);
        a.station = station;
        a.set_status(AmbStatus::MovingUpToStation, now);
        a.route = route;
        let arrival = a.route.end_time();
        if from == AmbStatus::IdleAtStation {
            self.state.station_mut(from_station).ambulance_left(now);
        }
        self.schedule_for_amb(amb, Event::new(EventForm::AmbReachesStation, arrival).with_station(station));
        Ok(())
    }

    // ── Decision validation ───────────────────────────────────────────────

    fn policy_context(&self, time: SimTime) -> PolicyContext<'_> {
        PolicyContext::new(
            time,
            &self.state.ambulances,
            &self.state.calls,
            &self.state.stations,
            &*self.travel,
            self.config.allow_bumping,
        )
    }

    fn check_dispatch_choice(&self, call: CallId, amb: AmbId) -> SimResult<()> {
        let reject = |reason: String| SimError::InvalidDecision { policy: self.dispatch.name().to_owned(), reason };
        let a = self
            .state
            .ambulances
            .get(amb.index())
            .ok_or_else(|| reject(format!("{amb} does not exist")))?;
        let free = a.status.is_available_for_dispatch() && a.call.is_none();
        let bumpable = self.config.allow_bumping
            && a.status == AmbStatus::GoingToCall
            && a.call.is_some_and(|c| c != call);
        if free || bumpable {
            Ok(())
        } else {
            Err(reject(format!("{amb} is {} with call {:?} and cannot take {call}", a.status, a.call)))
        }
    }

    fn check_move_ups(&self, moves: &[(AmbId, StationId)]) -> SimResult<()> {
        let reject = |reason: String| SimError::InvalidDecision { policy: self.move_up.name().to_owned(), reason };
        let mut seen = vec![false; self.state.ambulances.len()];
        for &(amb, station) in moves {
            let a = self
                .state
                .ambulances
                .get(amb.index())
                .ok_or_else(|| reject(format!("{amb} does not exist")))?;
            if station.index() >= self.state.stations.len() {
                return Err(reject(format!("{station} does not exist")));
            }
            if !(a.status.is_movable() && a.call.is_none()) {
                return Err(reject(format!("{amb} is {} and cannot move up", a.status)));
            }
            if std::mem::replace(&mut seen[amb.index()], true) {
                return Err(reject(format!("{amb} moved twice")));
            }
        }
        Ok(())
    }

    // ── Bookkeeping ───────────────────────────────────────────────────────

    /// Pop `event` and move the clock to it.  Everything after this point
    /// mutates state and must not fail.
    fn begin(&mut self, event: &Event) {
        let popped = self.state.queue.pop_earliest();
        assert_eq!(popped.index, event.index, "executing {event} but {popped} was earliest");
        self.state.clock.advance_to(event.time);
        self.state.current_event = Some(event.index);
        self.state.dirty = true;
    }

    fn schedule(&mut self, event: Event) -> EventId {
        self.state.queue.schedule(event, self.state.current_event)
    }

    /// Schedule an event for `amb` and make it the ambulance's pending event.
    fn schedule_for_amb(&mut self, amb: AmbId, event: Event) -> EventId {
        let pending = self.state.amb(amb).event;
        assert!(pending.is_none(), "{amb} already has pending event {pending:?}");
        let id = self.schedule(event.with_amb(amb));
        self.state.amb_mut(amb).event = Some(id);
        id
    }

    /// Clear `amb`'s pending-event pointer, which must be `event`.
    fn take_amb_event(&mut self, amb: AmbId, event: &Event) {
        let pending = self.state.amb_mut(amb).event.take();
        assert_eq!(pending, Some(event.index), "{event} is not the pending event of {amb}");
    }

    fn cancel_amb_event(&mut self, amb: AmbId) {
        if let Some(id) = self.state.amb_mut(amb).event.take() {
            let cancelled = self.state.queue.cancel(id);
            debug!("cancelled {cancelled}");
        }
    }

    fn link(&mut self, call: CallId, amb: AmbId) {
        let c = self.state.call_mut(call);
        c.amb = Some(amb);
        c.status = CallStatus::WaitingForAmb;
        self.state.amb_mut(amb).call = Some(call);
    }

    fn expect_status(&self, amb: AmbId, allowed: &[AmbStatus], event: &Event) {
        let status = self.state.amb(amb).status;
        assert!(allowed.contains(&status), "{event}: {amb} has status {status}");
    }

    fn expect_linked(&self, amb: AmbId, call: CallId, event: &Event) {
        let a = self.state.amb(amb).call;
        let c = self.state.call(call).amb;
        assert!(
            a == Some(call) && c == Some(amb),
            "{event}: {amb} serves {a:?}, {call} is served by {c:?}"
        );
    }
}

fn event_amb(event: &Event) -> AmbId {
    event.amb.unwrap_or_else(|| panic!("{event} has no ambulance"))
}

fn event_call(event: &Event) -> CallId {
    event.call.unwrap_or_else(|| panic!("{event} has no call"))
}
