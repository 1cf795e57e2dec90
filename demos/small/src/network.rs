//! Synthetic grid road network for the demo region.

use ems_core::{Location, NodeId};
use ems_spatial::{RoadNetwork, RoadNetworkBuilder};

/// Nodes per side of the square grid.
pub const GRID_SIDE: usize = 11;
/// Distance between neighbouring intersections, metres.
pub const SPACING_M: f64 = 1_000.0;
/// Free-flow road speed, m/s (~54 km/h).
const ROAD_SPEED_MPS: f64 = 15.0;

/// A `GRID_SIDE × GRID_SIDE` grid of two-way roads covering
/// `[0, 10 km] × [0, 10 km]`, plus one diagonal arterial from the south-west
/// corner to the centre that is twice as fast.
pub fn build_network() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::with_capacity(GRID_SIDE * GRID_SIDE, 4 * GRID_SIDE * GRID_SIDE);
    let mut ids = vec![NodeId::INVALID; GRID_SIDE * GRID_SIDE];
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            ids[row * GRID_SIDE + col] = b.add_node(Location::new(col as f64 * SPACING_M, row as f64 * SPACING_M));
        }
    }

    let road_ms = travel_ms(SPACING_M, ROAD_SPEED_MPS);
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            let here = ids[row * GRID_SIDE + col];
            if col + 1 < GRID_SIDE {
                b.add_road(here, ids[row * GRID_SIDE + col + 1], SPACING_M, road_ms);
            }
            if row + 1 < GRID_SIDE {
                b.add_road(here, ids[(row + 1) * GRID_SIDE + col], SPACING_M, road_ms);
            }
        }
    }

    let diag_m = SPACING_M * std::f64::consts::SQRT_2;
    let diag_ms = travel_ms(diag_m, 2.0 * ROAD_SPEED_MPS);
    for k in 0..GRID_SIDE / 2 {
        b.add_road(ids[k * GRID_SIDE + k], ids[(k + 1) * GRID_SIDE + k + 1], diag_m, diag_ms);
    }

    b.build()
}

fn travel_ms(length_m: f64, speed_mps: f64) -> u32 {
    (length_m / speed_mps * 1_000.0).round() as u32
}
