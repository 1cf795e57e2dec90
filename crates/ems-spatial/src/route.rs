//! A timed path through the service region.
//!
//! A [`Route`] is a polyline of [`Waypoint`]s, each stamped with the time the
//! vehicle passes it and the distance driven so far.  Between waypoints the
//! vehicle moves at constant speed, so position and distance at any instant
//! are a linear interpolation.  Before the start time the vehicle sits at the
//! first waypoint; after the end time it sits at the last one.

use ems_core::{Location, NodeId, Priority, SimTime};

/// One corner of a route polyline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub time:     SimTime,
    /// Distance driven from the route start, metres.
    pub distance: f64,
    pub location: Location,
}

/// A timed route owned by one ambulance.  Replaced wholesale whenever the
/// ambulance is redirected.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub priority:   Priority,
    /// Road node the route joins the network at (`NodeId::INVALID` off-network).
    pub start_node: NodeId,
    /// Road node the route leaves the network at.
    pub end_node:   NodeId,
    waypoints:      Vec<Waypoint>,
}

impl Route {
    /// A zero-length route: the vehicle parked at `location` from `time`.
    pub fn stationary(location: Location, time: SimTime) -> Self {
        Self {
            priority:   Priority::Low,
            start_node: NodeId::INVALID,
            end_node:   NodeId::INVALID,
            waypoints:  vec![Waypoint { time, distance: 0.0, location }],
        }
    }

    /// Start an empty route at `location`/`time`; extend with [`push_leg`](Self::push_leg).
    pub fn starting_at(location: Location, time: SimTime, priority: Priority) -> Self {
        Self {
            priority,
            ..Self::stationary(location, time)
        }
    }

    /// Append a straight leg to `to` taking `duration` seconds over `distance`
    /// metres.
    pub fn push_leg(&mut self, to: Location, duration: SimTime, distance: f64) {
        let last = self.last();
        self.waypoints.push(Waypoint {
            time:     last.time + duration.max(0.0),
            distance: last.distance + distance.max(0.0),
            location: to,
        });
    }

    pub fn with_nodes(mut self, start_node: NodeId, end_node: NodeId) -> Self {
        self.start_node = start_node;
        self.end_node = end_node;
        self
    }

    #[inline]
    fn first(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    #[inline]
    fn last(&self) -> Waypoint {
        self.waypoints[self.waypoints.len() - 1]
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn start_time(&self) -> SimTime {
        self.first().time
    }

    pub fn end_time(&self) -> SimTime {
        self.last().time
    }

    pub fn duration(&self) -> SimTime {
        self.end_time() - self.start_time()
    }

    pub fn start_location(&self) -> Location {
        self.first().location
    }

    pub fn end_location(&self) -> Location {
        self.last().location
    }

    pub fn total_distance(&self) -> f64 {
        self.last().distance
    }

    /// `true` while the vehicle is still moving at `time`.
    pub fn in_transit(&self, time: SimTime) -> bool {
        time >= self.start_time() && time < self.end_time()
    }

    /// Index of the leg containing `time`, or `None` when `time` is outside
    /// `(start, end)`.
    fn leg_at(&self, time: SimTime) -> Option<(Waypoint, Waypoint)> {
        if time <= self.start_time() || time >= self.end_time() {
            return None;
        }
        let i = self.waypoints.partition_point(|w| w.time <= time);
        // start_time < time < end_time guarantees 1 <= i < len.
        Some((self.waypoints[i - 1], self.waypoints[i]))
    }

    /// Position of the vehicle at `time`.
    pub fn location_at(&self, time: SimTime) -> Location {
        if time <= self.start_time() {
            return self.start_location();
        }
        match self.leg_at(time) {
            None => self.end_location(),
            Some((a, b)) => {
                let f = (time - a.time) / (b.time - a.time);
                a.location.lerp(b.location, f)
            }
        }
    }

    /// Distance driven from the route start up to `time`.
    pub fn distance_at(&self, time: SimTime) -> f64 {
        if time <= self.start_time() {
            return 0.0;
        }
        match self.leg_at(time) {
            None => self.total_distance(),
            Some((a, b)) => {
                let f = (time - a.time) / (b.time - a.time);
                a.distance + (b.distance - a.distance) * f
            }
        }
    }
}
