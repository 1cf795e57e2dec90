//! Unit tests for ems-event.

#[cfg(test)]
mod event_form {
    use crate::{EventError, EventForm};

    #[test]
    fn names_round_trip() {
        for form in EventForm::ALL {
            assert_eq!(form.as_str().parse::<EventForm>().unwrap(), form);
        }
    }

    #[test]
    fn unknown_name_rejected() {
        assert!(matches!("amb_teleports".parse::<EventForm>(), Err(EventError::UnknownForm(_))));
    }
}

#[cfg(test)]
mod queue {
    use ems_core::{AmbId, CallId, EventId};

    use crate::{Event, EventForm, EventQueue};

    fn ev(form: EventForm, time: f64) -> Event {
        Event::new(form, time)
    }

    #[test]
    fn pops_in_time_order() {
        let mut q = EventQueue::new();
        q.schedule(ev(EventForm::AmbReachesCall, 30.0), None);
        q.schedule(ev(EventForm::CallArrives, 10.0), None);
        q.schedule(ev(EventForm::AmbBecomesFree, 20.0), None);
        let times: Vec<f64> = (0..3).map(|_| q.pop_earliest().time).collect();
        assert_eq!(times, vec![10.0, 20.0, 30.0]);
        assert!(q.is_empty());
    }

    #[test]
    fn ties_pop_in_insertion_order() {
        let mut q = EventQueue::new();
        let a = q.schedule(ev(EventForm::AmbBecomesFree, 5.0), None);
        let b = q.schedule(ev(EventForm::AmbReturnsToStation, 5.0), Some(a));
        let c = q.schedule(ev(EventForm::ConsiderMoveUp, 5.0), Some(a));
        assert_eq!(q.pop_earliest().index, a);
        let second = q.pop_earliest();
        assert_eq!(second.index, b);
        assert_eq!(second.parent_index, Some(a));
        assert_eq!(q.pop_earliest().index, c);
    }

    #[test]
    fn cancel_removes_by_id() {
        let mut q = EventQueue::new();
        let a = q.schedule(ev(EventForm::AmbReachesStation, 50.0).with_amb(AmbId(0)), None);
        let b = q.schedule(ev(EventForm::CallArrives, 60.0).with_call(CallId(1)), None);
        assert!(q.contains(a));
        let removed = q.cancel(a);
        assert_eq!(removed.amb, Some(AmbId(0)));
        assert!(!q.contains(a));
        assert_eq!(q.len(), 1);
        assert_eq!(q.peek_earliest_time(), Some(60.0));
        assert_eq!(q.get(b).unwrap().call, Some(CallId(1)));
    }

    #[test]
    fn ids_are_monotone() {
        let mut q = EventQueue::new();
        assert_eq!(q.next_id(), EventId(0));
        q.schedule(ev(EventForm::CallArrives, 0.0), None);
        q.pop_earliest();
        assert_eq!(q.schedule(ev(EventForm::CallArrives, 0.0), None), EventId(1));
    }

    #[test]
    fn clone_is_independent() {
        let mut q = EventQueue::new();
        q.schedule(ev(EventForm::CallArrives, 1.0), None);
        let snapshot = q.clone();
        q.pop_earliest();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.next_id(), q.next_id());
    }

    #[test]
    #[should_panic(expected = "empty event queue")]
    fn pop_empty_panics() {
        EventQueue::new().pop_earliest();
    }

    #[test]
    #[should_panic(expected = "not queued")]
    fn cancel_absent_panics() {
        let mut q = EventQueue::new();
        let a = q.schedule(ev(EventForm::CallArrives, 1.0), None);
        q.cancel(a);
        q.cancel(a);
    }

    #[test]
    #[should_panic(expected = "non-finite")]
    fn nan_time_panics() {
        EventQueue::new().schedule(ev(EventForm::CallArrives, f64::NAN), None);
    }
}
