//! The `MoveUpPolicy` trait and the reference strategies.
//!
//! | Strategy            | Reacts to            | Moves                                   |
//! |---------------------|----------------------|-----------------------------------------|
//! | [`NoMoveUp`]        | nothing              | nothing                                 |
//! | [`CompTableMoveUp`] | dispatch, free       | movable ambulances toward table targets |
//! | [`ReturnHomeMoveUp`]| free                 | the trigger ambulance to its home       |

use log::debug;

use ems_core::{AmbId, Priority, StationId};

use crate::{PolicyContext, PolicyError, PolicyResult};

/// Event types after which the handler consults a move-up policy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveUpTriggers {
    /// After an ambulance has been dispatched to a call.
    pub on_dispatch: bool,
    /// After an ambulance becomes free with no queued call to take.
    pub on_free:     bool,
}

/// Pluggable proactive relocation.
pub trait MoveUpPolicy: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn triggers(&self) -> MoveUpTriggers;

    /// Ambulance-to-station moves to order now.  `trigger` is the ambulance
    /// whose dispatch or release caused the consultation.
    ///
    /// Pairs whose station equals the ambulance's current station are
    /// ignored by the handler.
    fn compute_move_ups(
        &self,
        trigger: Option<AmbId>,
        ctx:     &PolicyContext<'_>,
    ) -> PolicyResult<Vec<(AmbId, StationId)>>;
}

// ── NoMoveUp ──────────────────────────────────────────────────────────────────

pub struct NoMoveUp;

impl MoveUpPolicy for NoMoveUp {
    fn name(&self) -> &str {
        "none"
    }

    fn triggers(&self) -> MoveUpTriggers {
        MoveUpTriggers::default()
    }

    fn compute_move_ups(&self, _trigger: Option<AmbId>, _ctx: &PolicyContext<'_>) -> PolicyResult<Vec<(AmbId, StationId)>> {
        Ok(vec![])
    }
}

// ── CompTableMoveUp ───────────────────────────────────────────────────────────

/// Compliance-table move-up.
///
/// `rows[n - 1][s]` is the number of ambulances station `s` should hold when
/// `n` ambulances are movable.  When the current allocation differs, surplus
/// ambulances are sent to deficit stations greedily, shortest travel first.
pub struct CompTableMoveUp {
    rows: Vec<Vec<u32>>,
}

impl CompTableMoveUp {
    /// Every row must have one entry per station and row `n - 1` must sum to
    /// `n`.
    pub fn new(rows: Vec<Vec<u32>>, num_stations: usize) -> PolicyResult<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != num_stations {
                return Err(PolicyError::InvalidCompTable(format!(
                    "row {i} has {} entries, expected {num_stations}",
                    row.len()
                )));
            }
            let total: u32 = row.iter().sum();
            if total as usize != i + 1 {
                return Err(PolicyError::InvalidCompTable(format!(
                    "row {i} sums to {total}, expected {}",
                    i + 1
                )));
            }
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.rows
    }
}

impl MoveUpPolicy for CompTableMoveUp {
    fn name(&self) -> &str {
        "comp_table"
    }

    fn triggers(&self) -> MoveUpTriggers {
        MoveUpTriggers { on_dispatch: true, on_free: true }
    }

    fn compute_move_ups(&self, _trigger: Option<AmbId>, ctx: &PolicyContext<'_>) -> PolicyResult<Vec<(AmbId, StationId)>> {
        let movable: Vec<_> = ctx.ambulances.iter().filter(|a| a.status.is_movable() && a.call.is_none()).collect();
        let n = movable.len();
        let Some(target) = n.checked_sub(1).and_then(|i| self.rows.get(i)) else {
            return Ok(vec![]);
        };

        let mut count = vec![0u32; ctx.stations.len()];
        for amb in &movable {
            count[amb.station.index()] += 1;
        }

        let mut unassigned: Vec<bool> = vec![true; movable.len()];
        let mut moves = Vec::new();
        loop {
            let mut best: Option<(f64, usize, StationId)> = None;
            for (i, amb) in movable.iter().enumerate() {
                if !unassigned[i] || count[amb.station.index()] <= target[amb.station.index()] {
                    continue;
                }
                let from = amb.location_at(ctx.time);
                for station in ctx.stations {
                    let s = station.index.index();
                    if count[s] >= target[s] {
                        continue;
                    }
                    let d = ctx.travel.travel_duration(from, station.location, Priority::Low)?;
                    if best.is_none_or(|(bd, _, _)| d < bd) {
                        best = Some((d, i, station.index));
                    }
                }
            }
            let Some((_, i, station)) = best else { break };
            let amb = movable[i];
            count[amb.station.index()] -= 1;
            count[station.index()] += 1;
            unassigned[i] = false;
            debug!("comp table: {} {} -> {}", amb.index, amb.station, station);
            moves.push((amb.index, station));
        }
        Ok(moves)
    }
}

// ── ReturnHomeMoveUp ──────────────────────────────────────────────────────────

/// Send a freed ambulance back to the station its deployment assigned.
pub struct ReturnHomeMoveUp;

impl MoveUpPolicy for ReturnHomeMoveUp {
    fn name(&self) -> &str {
        "return_home"
    }

    fn triggers(&self) -> MoveUpTriggers {
        MoveUpTriggers { on_dispatch: false, on_free: true }
    }

    fn compute_move_ups(&self, trigger: Option<AmbId>, ctx: &PolicyContext<'_>) -> PolicyResult<Vec<(AmbId, StationId)>> {
        let Some(id) = trigger else { return Ok(vec![]) };
        let amb = &ctx.ambulances[id.index()];
        if amb.status.is_movable() && amb.call.is_none() && amb.station != amb.home_station {
            Ok(vec![(id, amb.home_station)])
        } else {
            Ok(vec![])
        }
    }
}
