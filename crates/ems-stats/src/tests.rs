//! Unit tests for ems-stats.

#[cfg(test)]
mod algebra {
    use ems_core::{HospitalId, StationId};

    use crate::{FieldOps, HospitalStats, StationStats};

    #[test]
    fn index_collapses_on_disagreement() {
        let a = HospitalStats { hospital: Some(HospitalId(0)), num_calls: 2 };
        let b = HospitalStats { hospital: Some(HospitalId(1)), num_calls: 3 };
        let same = &a + &a;
        assert_eq!(same.hospital, Some(HospitalId(0)));
        assert_eq!(same.num_calls, 4);
        let mixed = &a + &b;
        assert_eq!(mixed.hospital, None);
        assert_eq!(mixed.num_calls, 5);
    }

    #[test]
    fn vectors_pad_shorter_side() {
        let a = StationStats { station: Some(StationId(0)), num_idle_ambs_total_duration: vec![1.0, 2.0] };
        let b = StationStats { station: Some(StationId(0)), num_idle_ambs_total_duration: vec![4.0, 4.0, 4.0] };
        assert_eq!((&b - &a).num_idle_ambs_total_duration, vec![3.0, 2.0, 4.0]);
        assert_eq!((a + b).num_idle_ambs_total_duration, vec![5.0, 6.0, 4.0]);
    }

    #[test]
    fn nested_arrays_are_element_wise() {
        let a = [[1u32, 2], [3, 4]];
        let b = [[10u32, 20], [30, 40]];
        assert_eq!(b.field_sub(&a), [[9, 18], [27, 36]]);
    }
}

#[cfg(test)]
mod capture {
    use ems_core::{AmbId, CallId, Location, Priority, StationId};
    use ems_entity::{AmbStatus, AmbStatusSet, Ambulance, Call, CallStatus, Station};
    use ems_spatial::Route;

    use crate::{AmbulanceStats, CallStats, StationStats};

    #[test]
    fn ambulance_capture_includes_open_interval() {
        let mut amb = Ambulance::new(AmbId(0), StationId(0), Location::new(0.0, 0.0), 0.0);
        amb.set_status(AmbStatus::GoingToCall, 10.0);
        let mut r = Route::starting_at(Location::new(0.0, 0.0), 10.0, Priority::High);
        r.push_leg(Location::new(200.0, 0.0), 20.0, 200.0);
        amb.route = r;
        amb.counters.record_dispatch(AmbStatus::IdleAtStation);

        let s = AmbulanceStats::capture(&amb, 20.0);
        assert_eq!(s.total_duration(), 20.0);
        assert_eq!(s.duration_in(AmbStatusSet::Busy), 10.0);
        assert!((s.distance_in(AmbStatusSet::Travelling) - 100.0).abs() < 1e-9);
        assert_eq!(s.num_dispatches, 1);
        assert_eq!(s.num_dispatches_from_station, 1);
    }

    #[test]
    fn station_capture_sums_to_elapsed() {
        let mut st = Station::new(StationId(0), Location::new(0.0, 0.0), 1);
        st.reset(1, 0.0);
        st.ambulance_left(30.0);
        let s = StationStats::capture(&st, 100.0);
        assert_eq!(s.total_duration(), 100.0);
        assert!((s.mean_idle_ambs() - 0.3).abs() < 1e-12);
    }

    fn processed(i: usize, arrival: f64, priority: Priority, response: f64) -> Call {
        let mut c = Call::new(CallId::from_index(i), priority, Location::new(0.0, 0.0), arrival, 0.0, 60.0, false, 0.0);
        c.status = CallStatus::Processed;
        c.first_dispatch_time = Some(arrival);
        c.dispatch_time = Some(arrival);
        c.amb_arrival_time = Some(arrival + response);
        c
    }

    #[test]
    fn call_stats_window_and_targets() {
        let mut unprocessed = processed(3, 5.0, Priority::High, 1.0);
        unprocessed.status = CallStatus::OnSceneTreatment;
        let calls = vec![
            processed(0, 0.0, Priority::High, 300.0),
            processed(1, 50.0, Priority::High, 900.0),
            processed(2, 100.0, Priority::Low, 100.0), // outside [0, 100)
            unprocessed,
        ];
        let targets = [480.0, 600.0, 900.0];
        let s = CallStats::from_calls(&calls, 0.0, 100.0, &targets);
        assert_eq!(s.num_calls, 2);
        assert_eq!(s.total_response_duration, 1_200.0);
        assert_eq!(s.mean_response_duration(), Some(600.0));
        assert_eq!(s.fraction_in_target(Priority::High), Some(0.5));
        assert_eq!(s.fraction_in_target(Priority::Low), None);
    }
}

#[cfg(test)]
mod periods {
    use ems_core::{AmbId, Location, StationId};
    use ems_entity::{AmbStatus, Ambulance, Station};

    use crate::{periods_from_captures, SimPeriodStats};

    fn captures() -> Vec<SimPeriodStats> {
        let mut amb = Ambulance::new(AmbId(0), StationId(0), Location::new(0.0, 0.0), 0.0);
        let mut st = Station::new(StationId(0), Location::new(0.0, 0.0), 1);
        st.reset(1, 0.0);

        let mut out = vec![SimPeriodStats::capture(0.0, 100.0, std::slice::from_ref(&amb), std::slice::from_ref(&st), &[])];
        amb.set_status(AmbStatus::GoingToCall, 150.0);
        amb.counters.record_dispatch(AmbStatus::IdleAtStation);
        st.ambulance_left(150.0);
        out.push(SimPeriodStats::capture(0.0, 200.0, std::slice::from_ref(&amb), std::slice::from_ref(&st), &[]));
        amb.set_status(AmbStatus::AtCall, 250.0);
        out.push(SimPeriodStats::capture(0.0, 400.0, std::slice::from_ref(&amb), std::slice::from_ref(&st), &[]));
        out
    }

    #[test]
    fn periods_are_contiguous() {
        let periods = periods_from_captures(&captures());
        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].start_time, 0.0);
        for w in periods.windows(2) {
            assert_eq!(w[1].start_time, w[0].end_time);
        }
        assert_eq!(periods[1].duration(), 100.0);
        assert_eq!(periods[1].ambulances[0].num_dispatches, 1);
        assert_eq!(periods[2].ambulances[0].num_dispatches, 0);
        assert_eq!(periods[2].ambulances[0].total_duration(), 200.0);
    }

    #[test]
    fn periods_sum_back_to_captures() {
        let caps = captures();
        let periods = periods_from_captures(&caps);
        let mut acc = periods[0].clone();
        assert_eq!(acc, caps[0]);
        for (p, cap) in periods.iter().zip(&caps).skip(1) {
            acc = &acc + p;
            assert_eq!(&acc, cap);
        }
    }

    #[test]
    fn ambulance_total_of_one_keeps_index() {
        let caps = captures();
        assert_eq!(caps[0].ambulance_total().amb, Some(AmbId(0)));
        assert_eq!(SimPeriodStats::default().ambulance_total().amb, None);
    }
}
