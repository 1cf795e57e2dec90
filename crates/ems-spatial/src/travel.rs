//! Travel-time queries: the [`TravelQuery`] trait and two implementations.
//!
//! # Pluggability
//!
//! The simulation calls routing through [`TravelQuery`], so applications can
//! substitute precomputed travel-time tables or an external router without
//! touching the engine.  Two implementations ship here:
//!
//! - [`StraightLineTravel`]: Euclidean legs at a per-priority speed.  Cheap
//!   and exact; used by most tests.
//! - [`NetworkTravel`]: snaps both endpoints onto a [`RoadNetwork`] and runs
//!   Dijkstra over it, with off-road legs at either end.
//!
//! Emergency travel is faster than routine travel.  Both implementations take
//! a per-[`Priority`] speed (or speed factor) so `High` calls are reached
//! sooner than a `Low` return to station over the same path.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ems_core::{Location, NodeId, Priority, SimTime};

use crate::network::RoadNetwork;
use crate::{Route, SpatialError, SpatialResult};

// ── TravelQuery trait ─────────────────────────────────────────────────────────

/// Read-only travel-time oracle shared by the engine and the policies.
///
/// Implementations must be deterministic: the same query always returns the
/// same route.  Replications and resimulation rely on it.
pub trait TravelQuery: Send + Sync {
    /// Plan a route from `from` to `to`, departing at `start_time`.
    fn plan_route(
        &self,
        from:       Location,
        to:         Location,
        priority:   Priority,
        start_time: SimTime,
    ) -> SpatialResult<Route>;

    /// Travel duration from `from` to `to`.  Override when a cheaper answer
    /// than a full route is available.
    fn travel_duration(
        &self,
        from:     Location,
        to:       Location,
        priority: Priority,
    ) -> SpatialResult<SimTime> {
        self.plan_route(from, to, priority, 0.0).map(|r| r.duration())
    }
}

/// Replace `route` with a new one that starts wherever the vehicle is at
/// `time` on the old route and ends at `to`.
pub fn change_route<T: TravelQuery + ?Sized>(
    travel:   &T,
    route:    &Route,
    priority: Priority,
    time:     SimTime,
    to:       Location,
) -> SpatialResult<Route> {
    travel.plan_route(route.location_at(time), to, priority, time)
}

fn check_speeds(speeds: &[f64]) -> SpatialResult<()> {
    match speeds.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
        Some(bad) => Err(SpatialError::InvalidSpeed(format!("{bad} (must be finite and > 0)"))),
        None => Ok(()),
    }
}

// ── StraightLineTravel ────────────────────────────────────────────────────────

/// Straight-line travel at a constant speed per priority class.
#[derive(Clone, Debug)]
pub struct StraightLineTravel {
    /// Metres per second, indexed by [`Priority::index`].
    speeds_mps: [f64; Priority::COUNT],
}

impl StraightLineTravel {
    /// Per-priority speeds in metres per second (`[high, med, low]`).
    pub fn new(speeds_mps: [f64; Priority::COUNT]) -> SpatialResult<Self> {
        check_speeds(&speeds_mps)?;
        Ok(Self { speeds_mps })
    }

    /// Same speed for every priority.
    pub fn uniform(speed_mps: f64) -> SpatialResult<Self> {
        Self::new([speed_mps; Priority::COUNT])
    }

    #[inline]
    pub fn speed(&self, priority: Priority) -> f64 {
        self.speeds_mps[priority.index()]
    }
}

impl TravelQuery for StraightLineTravel {
    fn plan_route(
        &self,
        from:       Location,
        to:         Location,
        priority:   Priority,
        start_time: SimTime,
    ) -> SpatialResult<Route> {
        let dist = from.distance_to(to);
        let mut route = Route::starting_at(from, start_time, priority);
        if dist > 0.0 {
            route.push_leg(to, dist / self.speed(priority), dist);
        }
        Ok(route)
    }

    fn travel_duration(&self, from: Location, to: Location, priority: Priority) -> SpatialResult<SimTime> {
        Ok(from.distance_to(to) / self.speed(priority))
    }
}

// ── NetworkTravel ─────────────────────────────────────────────────────────────

/// Dijkstra over a [`RoadNetwork`].
///
/// Route shape: `from` → (off-road) → nearest node to `from` → shortest path
/// → nearest node to `to` → (off-road) → `to`.
///
/// Edge cost is `edge_travel_ms / speed_factor[priority]`; off-road legs run
/// at `off_road_speed_mps`.
pub struct NetworkTravel {
    network:            RoadNetwork,
    speed_factor:       [f64; Priority::COUNT],
    off_road_speed_mps: f64,
}

impl NetworkTravel {
    pub fn new(
        network:            RoadNetwork,
        speed_factor:       [f64; Priority::COUNT],
        off_road_speed_mps: f64,
    ) -> SpatialResult<Self> {
        check_speeds(&speed_factor)?;
        check_speeds(&[off_road_speed_mps])?;
        if network.is_empty() {
            return Err(SpatialError::EmptyNetwork);
        }
        Ok(Self { network, speed_factor, off_road_speed_mps })
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    fn snap(&self, loc: Location) -> SpatialResult<NodeId> {
        self.network.snap_to_node(loc).ok_or(SpatialError::EmptyNetwork)
    }

    #[inline]
    fn edge_cost_ms(&self, edge: usize, priority: Priority) -> u64 {
        let base = self.network.edge_travel_ms[edge] as f64;
        (base / self.speed_factor[priority.index()]).round() as u64
    }

    /// Shortest path between two nodes as a list of edge positions.
    fn shortest_path(&self, from: NodeId, to: NodeId, priority: Priority) -> SpatialResult<Vec<usize>> {
        if from == to {
            return Ok(vec![]);
        }
        let net = &self.network;
        let n = net.node_count();
        if from.index() >= n {
            return Err(SpatialError::NodeNotFound(from));
        }
        if to.index() >= n {
            return Err(SpatialError::NodeNotFound(to));
        }

        let mut dist = vec![u64::MAX; n];
        let mut prev_edge: Vec<Option<usize>> = vec![None; n];
        dist[from.index()] = 0;

        // Secondary key NodeId keeps tie-breaking deterministic.
        let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
        heap.push(Reverse((0, from)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if node == to {
                let mut edges = Vec::new();
                let mut cur = to;
                while let Some(e) = prev_edge[cur.index()] {
                    edges.push(e);
                    cur = net.edge_from[e];
                }
                edges.reverse();
                return Ok(edges);
            }
            if cost > dist[node.index()] {
                continue;
            }
            for edge in net.out_edges(node) {
                let next = net.edge_to[edge];
                let new_cost = cost.saturating_add(self.edge_cost_ms(edge, priority));
                if new_cost < dist[next.index()] {
                    dist[next.index()] = new_cost;
                    prev_edge[next.index()] = Some(edge);
                    heap.push(Reverse((new_cost, next)));
                }
            }
        }

        Err(SpatialError::NoRoute { from, to })
    }
}

impl TravelQuery for NetworkTravel {
    fn plan_route(
        &self,
        from:       Location,
        to:         Location,
        priority:   Priority,
        start_time: SimTime,
    ) -> SpatialResult<Route> {
        let start_node = self.snap(from)?;
        let end_node = self.snap(to)?;
        let net = &self.network;

        let mut route = Route::starting_at(from, start_time, priority);

        let push_off_road = |route: &mut Route, to: Location| {
            let d = route.end_location().distance_to(to);
            if d > 0.0 {
                route.push_leg(to, d / self.off_road_speed_mps, d);
            }
        };

        push_off_road(&mut route, net.node_pos[start_node.index()]);
        for edge in self.shortest_path(start_node, end_node, priority)? {
            let secs = self.edge_cost_ms(edge, priority) as f64 / 1000.0;
            route.push_leg(net.node_pos[net.edge_to[edge].index()], secs, net.edge_length_m[edge]);
        }
        push_off_road(&mut route, to);

        Ok(route.with_nodes(start_node, end_node))
    }
}
