//! Unit tests for ems-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AmbId, CallId, EventId, StationId};

    #[test]
    fn index_roundtrip() {
        let id = AmbId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AmbId::try_from(42usize).unwrap(), id);
        assert_eq!(AmbId::from_index(42), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AmbId::INVALID.0, u32::MAX);
        assert_eq!(StationId::INVALID.0, u32::MAX);
        assert_eq!(EventId::INVALID.0, u64::MAX);
        assert_eq!(CallId::default(), CallId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(StationId(7).to_string(), "StationId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Location;

    #[test]
    fn distance_is_euclidean() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(3_000.0, 4_000.0);
        assert!((a.distance_to(b) - 5_000.0).abs() < 1e-9);
    }

    #[test]
    fn lerp_midpoint_and_clamp() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(100.0, -50.0);
        assert_eq!(a.lerp(b, 0.5), Location::new(50.0, -25.0));
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
    }
}

#[cfg(test)]
mod priority {
    use crate::Priority;

    #[test]
    fn high_is_most_urgent() {
        assert!(Priority::High.is_more_urgent_than(Priority::Med));
        assert!(Priority::Med.is_more_urgent_than(Priority::Low));
        assert!(!Priority::Low.is_more_urgent_than(Priority::Low));
    }

    #[test]
    fn parse() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("2".parse::<Priority>().unwrap(), Priority::Med);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn index_matches_all() {
        for (i, p) in Priority::ALL.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
    }
}

#[cfg(test)]
mod time {
    use crate::{RunState, SimClock};

    #[test]
    fn lifecycle() {
        let mut clock = SimClock::new(100.0);
        assert_eq!(clock.state, RunState::NotStarted);
        clock.advance_to(160.0);
        assert_eq!(clock.state, RunState::Running);
        assert_eq!(clock.elapsed(), 60.0);
        clock.complete();
        assert!(clock.is_complete());
        assert_eq!(clock.end_time, Some(160.0));
    }

    #[test]
    #[should_panic(expected = "backwards")]
    fn clock_never_moves_backwards() {
        let mut clock = SimClock::new(0.0);
        clock.advance_to(10.0);
        clock.advance_to(5.0);
    }

    #[test]
    #[should_panic(expected = "completed twice")]
    fn completion_recorded_once() {
        let mut clock = SimClock::new(0.0);
        clock.complete();
        clock.complete();
    }

    #[test]
    fn display_day_hour_minute() {
        let mut clock = SimClock::new(0.0);
        clock.advance_to(90_000.0); // 1 day 1 hour
        assert!(clock.to_string().contains("day 1 01:00"));
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        let xs: Vec<u32> = (0..8).map(|_| a.gen_range(0..1000)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.gen_range(0..1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn children_differ_by_offset() {
        let mut root1 = SimRng::new(1);
        let mut root2 = SimRng::new(1);
        let mut c1 = root1.child(0);
        let mut c2 = root2.child(1);
        let a: u64 = c1.random();
        let b: u64 = c2.random();
        assert_ne!(a, b);
    }
}
