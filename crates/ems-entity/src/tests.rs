//! Unit tests for ems-entity.

#[cfg(test)]
mod status {
    use crate::{AmbStatus, AmbStatusSet};

    #[test]
    fn index_matches_all_order() {
        for (i, s) in AmbStatus::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }

    #[test]
    fn busy_and_free_partition_working() {
        for s in AmbStatus::ALL {
            let busy = AmbStatusSet::Busy.contains(s);
            let free = AmbStatusSet::Free.contains(s);
            assert!(!(busy && free), "{s} is both busy and free");
            assert_eq!(busy || free, AmbStatusSet::Working.contains(s));
        }
    }

    #[test]
    fn set_sum_selects_members() {
        let mut values = [0.0; AmbStatus::COUNT];
        values[AmbStatus::ReturningToStation.index()] = 2.0;
        values[AmbStatus::MovingUpToStation.index()] = 3.0;
        values[AmbStatus::GoingToCall.index()] = 5.0;
        assert_eq!(AmbStatusSet::GoingToStation.sum(&values), 5.0);
        assert_eq!(AmbStatusSet::Travelling.sum(&values), 10.0);
    }
}

#[cfg(test)]
mod ambulance {
    use ems_core::{AmbId, Location, Priority, StationId};
    use ems_spatial::Route;

    use crate::{AmbCounters, AmbStatus, Ambulance};

    fn idle_amb() -> Ambulance {
        Ambulance::new(AmbId(0), StationId(0), Location::new(0.0, 0.0), 0.0)
    }

    #[test]
    fn set_status_closes_interval() {
        let mut amb = idle_amb();
        amb.set_status(AmbStatus::GoingToCall, 10.0);
        let mut r = Route::starting_at(Location::new(0.0, 0.0), 10.0, Priority::High);
        r.push_leg(Location::new(100.0, 0.0), 10.0, 100.0);
        amb.route = r;
        amb.set_status(AmbStatus::AtCall, 20.0);

        assert_eq!(amb.status_durations[AmbStatus::IdleAtStation.index()], 10.0);
        assert_eq!(amb.status_durations[AmbStatus::GoingToCall.index()], 10.0);
        assert_eq!(amb.status_distances[AmbStatus::GoingToCall.index()], 100.0);
        assert_eq!(
            amb.status_transition_counts[AmbStatus::IdleAtStation.index()][AmbStatus::GoingToCall.index()],
            1
        );
        assert_eq!(amb.status_set_time, 20.0);
    }

    #[test]
    fn open_interval_is_included_at_query_time() {
        let mut amb = idle_amb();
        amb.set_status(AmbStatus::GoingToCall, 10.0);
        let mut r = Route::starting_at(Location::new(0.0, 0.0), 10.0, Priority::High);
        r.push_leg(Location::new(100.0, 0.0), 10.0, 100.0);
        amb.route = r;

        let durations = amb.status_durations_at(15.0);
        assert_eq!(durations.iter().sum::<f64>(), 15.0);
        assert!((amb.status_distances_at(15.0)[AmbStatus::GoingToCall.index()] - 50.0).abs() < 1e-9);
        assert!((amb.total_distance_at(15.0) - 50.0).abs() < 1e-9);
        // Closed arrays are untouched by the query.
        assert_eq!(amb.status_durations[AmbStatus::GoingToCall.index()], 0.0);
    }

    #[test]
    #[should_panic(expected = "before previous change")]
    fn status_time_cannot_go_backwards() {
        let mut amb = idle_amb();
        amb.set_status(AmbStatus::GoingToCall, 10.0);
        amb.set_status(AmbStatus::AtCall, 5.0);
    }

    #[test]
    fn dispatch_counts_decompose() {
        let mut c = AmbCounters::default();
        c.record_dispatch(AmbStatus::IdleAtStation);
        c.record_dispatch(AmbStatus::ReturningToStation);
        c.record_dispatch(AmbStatus::GoingToCall);
        c.record_dispatch(AmbStatus::FreeAfterCall);
        assert_eq!(c.num_dispatches, 4);
        assert_eq!(
            c.num_dispatches,
            c.num_dispatches_from_station + c.num_dispatches_on_road + c.num_dispatches_on_free
        );
        assert_eq!(c.num_redispatches, 1);

        c.record_move_up(AmbStatus::IdleAtStation);
        c.record_move_up(AmbStatus::MovingUpToStation);
        assert_eq!(
            c.num_move_ups,
            c.num_move_ups_from_station + c.num_move_ups_on_road + c.num_move_ups_on_free
        );
    }

    #[test]
    #[should_panic(expected = "not allowed")]
    fn dispatch_from_hospital_panics() {
        AmbCounters::default().record_dispatch(AmbStatus::AtHospital);
    }

    #[test]
    fn reset_wipes_run_state() {
        let mut amb = idle_amb();
        amb.set_status(AmbStatus::GoingToCall, 10.0);
        amb.counters.record_dispatch(AmbStatus::IdleAtStation);
        amb.reset(StationId(3), Location::new(5.0, 5.0), 100.0);
        assert_eq!(amb.status, AmbStatus::IdleAtStation);
        assert_eq!(amb.station, StationId(3));
        assert_eq!(amb.home_station, StationId(3));
        assert_eq!(amb.counters, AmbCounters::default());
        assert_eq!(amb.location_at(200.0), Location::new(5.0, 5.0));
        assert_eq!(amb.status_durations_at(100.0).iter().sum::<f64>(), 0.0);
    }
}

#[cfg(test)]
mod call {
    use ems_core::{CallId, Location, Priority};

    use crate::Call;

    #[test]
    fn duration_identities() {
        let mut call = Call::new(CallId(0), Priority::High, Location::new(0.0, 0.0), 100.0, 30.0, 600.0, false, 0.0);
        call.first_dispatch_time = Some(150.0); // queued 20 s
        call.dispatch_time = Some(170.0);       // bumped 20 s
        call.amb_arrival_time = Some(400.0);

        let queued = call.queued_duration().unwrap();
        let bumped = call.bumped_duration().unwrap();
        let going = call.amb_going_to_call_duration().unwrap();
        assert_eq!(queued, 20.0);
        assert_eq!(bumped, 20.0);
        assert_eq!(call.waiting_for_amb_duration().unwrap(), going + bumped);
        assert_eq!(call.response_duration().unwrap(), call.dispatch_delay + queued + bumped + going);
    }

    #[test]
    fn durations_absent_before_timestamps() {
        let call = Call::new(CallId(0), Priority::Low, Location::new(0.0, 0.0), 0.0, 0.0, 0.0, false, 0.0);
        assert!(call.response_duration().is_none());
        assert!(call.bumped_duration().is_none());
        assert!(!call.is_processed());
    }
}

#[cfg(test)]
mod station {
    use ems_core::{Location, StationId};

    use crate::Station;

    #[test]
    fn idle_buckets_sum_to_elapsed() {
        let mut s = Station::new(StationId(0), Location::new(0.0, 0.0), 2);
        s.reset(1, 0.0);
        s.ambulance_arrived(10.0); // 1 idle for 10 s
        s.ambulance_left(25.0);    // 2 idle for 15 s
        s.ambulance_left(30.0);    // 1 idle for 5 s

        let buckets = s.num_idle_ambs_durations_at(50.0); // 0 idle for 20 s
        assert_eq!(buckets, vec![20.0, 15.0, 15.0]);
        assert_eq!(buckets.iter().sum::<f64>(), 50.0);
    }

    #[test]
    #[should_panic(expected = "no idle ambulance")]
    fn leaving_empty_station_panics() {
        let mut s = Station::new(StationId(0), Location::new(0.0, 0.0), 1);
        s.ambulance_left(1.0);
    }
}

#[cfg(test)]
mod hospital {
    use ems_core::{HospitalId, Location, Priority};
    use ems_spatial::StraightLineTravel;

    use crate::{nearest_hospital, Hospital};

    #[test]
    fn picks_closest_with_lowest_index_on_ties() {
        let travel = StraightLineTravel::uniform(10.0).unwrap();
        let hospitals = vec![
            Hospital::new(HospitalId(0), Location::new(100.0, 0.0)),
            Hospital::new(HospitalId(1), Location::new(-100.0, 0.0)),
            Hospital::new(HospitalId(2), Location::new(500.0, 0.0)),
        ];
        let got = nearest_hospital(&travel, &hospitals, Location::new(0.0, 0.0), Priority::Med).unwrap();
        assert_eq!(got, Some(HospitalId(0)));
        let got = nearest_hospital(&travel, &hospitals, Location::new(400.0, 0.0), Priority::Med).unwrap();
        assert_eq!(got, Some(HospitalId(2)));
        assert_eq!(nearest_hospital(&travel, &[], Location::new(0.0, 0.0), Priority::Med).unwrap(), None);
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use ems_core::{CallId, HospitalId, Location, Priority, StationId};

    use crate::{
        load_ambulances_reader, load_calls_reader, load_hospitals_reader, load_stations_reader,
        EntityError,
    };

    const CALLS: &str = "\
priority,x,y,arrival_time,dispatch_delay,on_scene_duration,transport,hospital,handover_duration
low,10,0,50,60,300,false,,0
high,0,10,20,60,600,true,1,900
";

    #[test]
    fn calls_sorted_and_reindexed() {
        let calls = load_calls_reader(Cursor::new(CALLS), 2).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].index, CallId(0));
        assert_eq!(calls[0].priority, Priority::High);
        assert_eq!(calls[0].arrival_time, 20.0);
        assert_eq!(calls[0].hospital, Some(HospitalId(1)));
        assert!(calls[0].transport);
        assert_eq!(calls[1].index, CallId(1));
        assert_eq!(calls[1].hospital, None);
    }

    #[test]
    fn call_hospital_out_of_range() {
        let err = load_calls_reader(Cursor::new(CALLS), 1).unwrap_err();
        assert!(matches!(err, EntityError::Invalid(_)));
    }

    #[test]
    fn bad_priority_is_parse_error() {
        let csv = "priority,x,y,arrival_time,dispatch_delay,on_scene_duration,transport,hospital,handover_duration\n\
                   urgent,0,0,0,0,0,false,,0\n";
        assert!(matches!(load_calls_reader(Cursor::new(csv), 0), Err(EntityError::Parse(_))));
    }

    #[test]
    fn negative_duration_rejected() {
        let csv = "priority,x,y,arrival_time,dispatch_delay,on_scene_duration,transport,hospital,handover_duration\n\
                   med,0,0,0,-1,0,false,,0\n";
        assert!(matches!(load_calls_reader(Cursor::new(csv), 0), Err(EntityError::Invalid(_))));
    }

    #[test]
    fn stations_hospitals_and_ambulances() {
        let stations = load_stations_reader(Cursor::new("x,y,capacity\n0,0,2\n100, 50, 1\n")).unwrap();
        assert_eq!(stations[1].location, Location::new(100.0, 50.0));
        assert_eq!(stations[1].capacity, 1);

        let hospitals = load_hospitals_reader(Cursor::new("x,y\n5,5\n")).unwrap();
        assert_eq!(hospitals[0].index, HospitalId(0));

        let ambs = load_ambulances_reader(Cursor::new("station\n1\n0\n"), &stations).unwrap();
        assert_eq!(ambs[0].station, StationId(1));
        assert_eq!(ambs[0].location_at(0.0), Location::new(100.0, 50.0));

        let err = load_ambulances_reader(Cursor::new("station\n7\n"), &stations).unwrap_err();
        assert!(matches!(err, EntityError::Invalid(_)));
    }
}
