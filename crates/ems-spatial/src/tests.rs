//! Unit tests for ems-spatial.
//!
//! All tests use a hand-crafted network.

#[cfg(test)]
mod helpers {
    use ems_core::{Location, NodeId};
    use crate::{RoadNetwork, RoadNetworkBuilder};

    /// Small grid network.
    ///
    /// Nodes (x, y) in metres:
    ///   0:(0,0)    1:(0,100)   2:(0,200)
    ///   3:(100,0)              4:(100,200)
    ///
    /// Undirected edges: 0-1, 1-2, 0-3, 2-4, 3-4
    ///
    /// Path 0→1→2→4 costs 30 s; path 0→3→4 costs 60 s.
    pub fn grid_network() -> (RoadNetwork, [NodeId; 5]) {
        let mut b = RoadNetworkBuilder::new();

        let n0 = b.add_node(Location::new(0.0, 0.0));
        let n1 = b.add_node(Location::new(0.0, 100.0));
        let n2 = b.add_node(Location::new(0.0, 200.0));
        let n3 = b.add_node(Location::new(100.0, 0.0));
        let n4 = b.add_node(Location::new(100.0, 200.0));

        b.add_road(n0, n1, 100.0, 10_000);
        b.add_road(n1, n2, 100.0, 10_000);
        b.add_road(n2, n4, 100.0, 10_000);
        b.add_road(n0, n3, 500.0, 50_000); // long slow road
        b.add_road(n3, n4, 100.0, 10_000);

        (b.build(), [n0, n1, n2, n3, n4])
    }
}

// ── Builder & network structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use ems_core::Location;
    use crate::RoadNetworkBuilder;

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn csr_out_edges() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        assert_eq!(net.out_degree(n0), 2);
        assert_eq!(net.out_degree(n1), 2);
        assert_eq!(net.out_degree(n2), 2);
        assert_eq!(net.out_degree(n3), 2);
        assert_eq!(net.out_degree(n4), 2);
        for e in net.out_edges(n0) {
            assert_eq!(net.edge_from[e], n0);
        }
    }

    #[test]
    fn directed_only_edge() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(Location::new(0.0, 0.0));
        let c = b.add_node(Location::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0, 10_000);
        let net = b.build();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.out_degree(a), 1);
        assert_eq!(net.out_degree(c), 0);
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use ems_core::Location;
    use crate::RoadNetworkBuilder;

    #[test]
    fn snap_nearest() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        assert_eq!(net.snap_to_node(Location::new(0.0, 40.0)), Some(n0));
        assert_eq!(net.snap_to_node(Location::new(0.0, 60.0)), Some(n1));
    }

    #[test]
    fn empty_network_returns_none() {
        let net = RoadNetworkBuilder::new().build();
        assert!(net.snap_to_node(Location::new(0.0, 0.0)).is_none());
    }
}

// ── Route interpolation ───────────────────────────────────────────────────────

#[cfg(test)]
mod route {
    use ems_core::{Location, Priority};
    use crate::Route;

    fn two_leg_route() -> Route {
        // 0 → (100,0) in 10 s, then → (100,100) in 20 s.
        let mut r = Route::starting_at(Location::new(0.0, 0.0), 50.0, Priority::High);
        r.push_leg(Location::new(100.0, 0.0), 10.0, 100.0);
        r.push_leg(Location::new(100.0, 100.0), 20.0, 100.0);
        r
    }

    #[test]
    fn endpoints() {
        let r = two_leg_route();
        assert_eq!(r.start_time(), 50.0);
        assert_eq!(r.end_time(), 80.0);
        assert_eq!(r.duration(), 30.0);
        assert_eq!(r.total_distance(), 200.0);
        assert_eq!(r.end_location(), Location::new(100.0, 100.0));
    }

    #[test]
    fn interpolates_within_legs() {
        let r = two_leg_route();
        assert_eq!(r.location_at(55.0), Location::new(50.0, 0.0));
        assert!((r.distance_at(55.0) - 50.0).abs() < 1e-9);
        assert_eq!(r.location_at(70.0), Location::new(100.0, 50.0));
        assert!((r.distance_at(70.0) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn clamps_outside_route() {
        let r = two_leg_route();
        assert_eq!(r.location_at(0.0), Location::new(0.0, 0.0));
        assert_eq!(r.distance_at(0.0), 0.0);
        assert_eq!(r.location_at(1_000.0), Location::new(100.0, 100.0));
        assert_eq!(r.distance_at(1_000.0), 200.0);
        assert!(!r.in_transit(80.0));
        assert!(r.in_transit(60.0));
    }

    #[test]
    fn stationary_has_no_distance() {
        let r = Route::stationary(Location::new(5.0, 5.0), 10.0);
        assert_eq!(r.duration(), 0.0);
        assert_eq!(r.distance_at(100.0), 0.0);
        assert_eq!(r.location_at(100.0), Location::new(5.0, 5.0));
    }
}

// ── Travel queries ────────────────────────────────────────────────────────────

#[cfg(test)]
mod travel {
    use ems_core::{Location, Priority};
    use crate::{change_route, NetworkTravel, SpatialError, StraightLineTravel, TravelQuery};

    #[test]
    fn straight_line_uses_priority_speed() {
        let t = StraightLineTravel::new([20.0, 10.0, 5.0]).unwrap();
        let a = Location::new(0.0, 0.0);
        let b = Location::new(1_000.0, 0.0);
        assert_eq!(t.travel_duration(a, b, Priority::High).unwrap(), 50.0);
        assert_eq!(t.travel_duration(a, b, Priority::Low).unwrap(), 200.0);
        let r = t.plan_route(a, b, Priority::Med, 10.0).unwrap();
        assert_eq!(r.end_time(), 110.0);
        assert_eq!(r.total_distance(), 1_000.0);
    }

    #[test]
    fn rejects_non_positive_speed() {
        assert!(matches!(
            StraightLineTravel::new([10.0, 0.0, 5.0]),
            Err(SpatialError::InvalidSpeed(_))
        ));
    }

    #[test]
    fn change_route_starts_from_current_position() {
        let t = StraightLineTravel::uniform(10.0).unwrap();
        let r = t
            .plan_route(Location::new(0.0, 0.0), Location::new(1_000.0, 0.0), Priority::Low, 0.0)
            .unwrap();
        // At t=30 the vehicle is at (300, 0); redirect back to the origin.
        let r2 = change_route(&t, &r, Priority::High, 30.0, Location::new(0.0, 0.0)).unwrap();
        assert_eq!(r2.start_location(), Location::new(300.0, 0.0));
        assert_eq!(r2.start_time(), 30.0);
        assert!((r2.end_time() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn network_takes_shortest_path() {
        let (net, [_, _, _, _, n4]) = super::helpers::grid_network();
        let end = net.node_pos[n4.index()];
        let t = NetworkTravel::new(net, [1.0; 3], 10.0).unwrap();
        let r = t.plan_route(Location::new(0.0, 0.0), end, Priority::Low, 0.0).unwrap();
        // 0→1→2→4 = 30 s, 300 m; no off-road legs (endpoints are nodes).
        assert!((r.duration() - 30.0).abs() < 1e-9);
        assert!((r.total_distance() - 300.0).abs() < 1e-9);
        assert_eq!(r.location_at(10.0), Location::new(0.0, 100.0));
    }

    #[test]
    fn network_speed_factor_shortens_emergency_travel() {
        let (net, [_, _, _, _, n4]) = super::helpers::grid_network();
        let end = net.node_pos[n4.index()];
        let t = NetworkTravel::new(net, [1.5, 1.0, 1.0], 10.0).unwrap();
        let high = t.travel_duration(Location::new(0.0, 0.0), end, Priority::High).unwrap();
        let low = t.travel_duration(Location::new(0.0, 0.0), end, Priority::Low).unwrap();
        assert!(high < low);
    }

    #[test]
    fn network_adds_off_road_legs() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let start = net.node_pos[n0.index()];
        let t = NetworkTravel::new(net, [1.0; 3], 10.0).unwrap();
        // (-50, 0) snaps to n0: a 50 m off-road leg at 10 m/s.
        let r = t.plan_route(Location::new(-50.0, 0.0), start, Priority::Low, 0.0).unwrap();
        assert!((r.duration() - 5.0).abs() < 1e-9);
        assert_eq!(r.start_node, n0);
    }

    #[test]
    fn disconnected_network_has_no_route() {
        use crate::RoadNetworkBuilder;

        let mut b = RoadNetworkBuilder::new();
        b.add_node(Location::new(0.0, 0.0));
        b.add_node(Location::new(1_000.0, 0.0));
        let t = NetworkTravel::new(b.build(), [1.0; 3], 10.0).unwrap();
        let result = t.plan_route(Location::new(0.0, 0.0), Location::new(1_000.0, 0.0), Priority::Low, 0.0);
        assert!(matches!(result, Err(SpatialError::NoRoute { .. })));
    }

    #[test]
    fn empty_network_rejected() {
        use crate::RoadNetwork;
        assert!(matches!(
            NetworkTravel::new(RoadNetwork::empty(), [1.0; 3], 10.0),
            Err(SpatialError::EmptyNetwork)
        ));
    }
}
