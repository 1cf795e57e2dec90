//! Ambulance-to-station deployments and random deployment generators.
//!
//! A [`Deployment`] lists, for ambulance `i`, the station it is based at.
//! Ambulances are interchangeable, so two deployments with the same
//! per-station counts are treated as the same configuration by
//! [`random_deployments`].

use rustc_hash::FxHashSet;
use thiserror::Error;

use ems_core::{SimRng, StationId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeploymentError {
    #[error("deployment has {got} entries but there are {expected} ambulances")]
    LengthMismatch { expected: usize, got: usize },

    #[error("ambulance {amb} deployed to station {station}, but there are only {num_stations} stations")]
    StationOutOfRange { amb: usize, station: StationId, num_stations: usize },

    #[error("station {station} holds {count} ambulances, capacity {capacity}")]
    CapacityExceeded { station: StationId, count: u32, capacity: u32 },

    #[error("{num_ambs} ambulances do not fit into a total station capacity of {total}")]
    InsufficientCapacity { num_ambs: usize, total: u64 },

    #[error("capacity vector has {got} entries for {expected} stations")]
    CapacityLength { expected: usize, got: usize },

    #[error("only {found} unique deployments found, {requested} requested")]
    TooFewUnique { requested: usize, found: usize },
}

/// `0[i]` is the station of ambulance `i`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Deployment(pub Vec<StationId>);

impl Deployment {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check length, station range and, when `capacities` is given, that no
    /// station is over capacity.
    pub fn validate(
        &self,
        num_ambs:     usize,
        num_stations: usize,
        capacities:   Option<&[u32]>,
    ) -> Result<(), DeploymentError> {
        if self.0.len() != num_ambs {
            return Err(DeploymentError::LengthMismatch { expected: num_ambs, got: self.0.len() });
        }
        if let Some((amb, &station)) = self.0.iter().enumerate().find(|(_, s)| s.index() >= num_stations) {
            return Err(DeploymentError::StationOutOfRange { amb, station, num_stations });
        }
        if let Some(caps) = capacities {
            check_capacity_len(caps, num_stations)?;
            let counts = station_counts_from_deployment(self, num_stations);
            for (s, (&count, &capacity)) in counts.iter().zip(caps).enumerate() {
                if count > capacity {
                    return Err(DeploymentError::CapacityExceeded {
                        station: StationId::from_index(s),
                        count,
                        capacity,
                    });
                }
            }
        }
        Ok(())
    }
}

fn check_capacity_len(caps: &[u32], num_stations: usize) -> Result<(), DeploymentError> {
    if caps.len() != num_stations {
        return Err(DeploymentError::CapacityLength { expected: num_stations, got: caps.len() });
    }
    Ok(())
}

/// Number of ambulances at each station.  Out-of-range stations are ignored.
pub fn station_counts_from_deployment(deployment: &Deployment, num_stations: usize) -> Vec<u32> {
    let mut counts = vec![0u32; num_stations];
    for s in &deployment.0 {
        if let Some(c) = counts.get_mut(s.index()) {
            *c += 1;
        }
    }
    counts
}

/// The canonical deployment for `counts`: ambulances assigned to stations in
/// station order.
pub fn deployment_from_station_counts(counts: &[u32]) -> Deployment {
    Deployment(
        counts
            .iter()
            .enumerate()
            .flat_map(|(s, &n)| std::iter::repeat_n(StationId::from_index(s), n as usize))
            .collect(),
    )
}

/// One uniformly random deployment.  With `capacities`, each ambulance is
/// placed uniformly among stations that still have room.
pub fn random_deployment(
    num_ambs:     usize,
    num_stations: usize,
    capacities:   Option<&[u32]>,
    rng:          &mut SimRng,
) -> Result<Deployment, DeploymentError> {
    if num_ambs > 0 && num_stations == 0 {
        return Err(DeploymentError::InsufficientCapacity { num_ambs, total: 0 });
    }
    let Some(caps) = capacities else {
        return Ok(Deployment(
            (0..num_ambs)
                .map(|_| StationId::from_index(rng.gen_range(0..num_stations)))
                .collect(),
        ));
    };

    check_capacity_len(caps, num_stations)?;
    let total: u64 = caps.iter().map(|&c| c as u64).sum();
    if (num_ambs as u64) > total {
        return Err(DeploymentError::InsufficientCapacity { num_ambs, total });
    }

    let mut remaining = caps.to_vec();
    let mut stations = Vec::with_capacity(num_ambs);
    for _ in 0..num_ambs {
        let open: Vec<usize> = (0..num_stations).filter(|&s| remaining[s] > 0).collect();
        // total capacity >= num_ambs guarantees a non-empty `open`.
        let s = open[rng.gen_range(0..open.len())];
        remaining[s] -= 1;
        stations.push(StationId::from_index(s));
    }
    Ok(Deployment(stations))
}

/// `n` random deployments with pairwise different station counts.
///
/// Gives up with [`DeploymentError::TooFewUnique`] after a bounded number of
/// draws, which happens when fewer than `n` distinct count vectors exist.
pub fn random_deployments(
    num_ambs:     usize,
    num_stations: usize,
    capacities:   Option<&[u32]>,
    n:            usize,
    rng:          &mut SimRng,
) -> Result<Vec<Deployment>, DeploymentError> {
    let max_attempts = 100 * n + 1_000;
    let mut seen: FxHashSet<Vec<u32>> = FxHashSet::default();
    let mut out = Vec::with_capacity(n);
    for _ in 0..max_attempts {
        if out.len() == n {
            break;
        }
        let d = random_deployment(num_ambs, num_stations, capacities, rng)?;
        if seen.insert(station_counts_from_deployment(&d, num_stations)) {
            out.push(d);
        }
    }
    if out.len() < n {
        return Err(DeploymentError::TooFewUnique { requested: n, found: out.len() });
    }
    Ok(out)
}
