//! Ambulance and call status enums.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── AmbStatus ─────────────────────────────────────────────────────────────────

/// What an ambulance is doing right now.
///
/// The discriminant doubles as the index into the per-status duration,
/// distance and transition-count arrays on [`Ambulance`][crate::Ambulance].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbStatus {
    Sleeping,
    #[default]
    IdleAtStation,
    GoingToCall,
    AtCall,
    GoingToHospital,
    AtHospital,
    FreeAfterCall,
    ReturningToStation,
    MovingUpToStation,
}

impl AmbStatus {
    pub const COUNT: usize = 9;

    pub const ALL: [AmbStatus; AmbStatus::COUNT] = [
        AmbStatus::Sleeping,
        AmbStatus::IdleAtStation,
        AmbStatus::GoingToCall,
        AmbStatus::AtCall,
        AmbStatus::GoingToHospital,
        AmbStatus::AtHospital,
        AmbStatus::FreeAfterCall,
        AmbStatus::ReturningToStation,
        AmbStatus::MovingUpToStation,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Driving somewhere; distance accrues only in these statuses.
    #[inline]
    pub fn is_travelling(self) -> bool {
        AmbStatusSet::Travelling.contains(self)
    }

    /// `ReturningToStation` or `MovingUpToStation`.
    #[inline]
    pub fn is_going_to_station(self) -> bool {
        AmbStatusSet::GoingToStation.contains(self)
    }

    /// Statuses from which an ambulance may be sent to a new call without
    /// bumping anyone.
    #[inline]
    pub fn is_available_for_dispatch(self) -> bool {
        AmbStatusSet::Free.contains(self)
    }

    /// Statuses from which a move-up may be ordered.  Same set as
    /// dispatch availability: awake and not assigned to a call.
    #[inline]
    pub fn is_movable(self) -> bool {
        AmbStatusSet::Free.contains(self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AmbStatus::Sleeping           => "sleeping",
            AmbStatus::IdleAtStation      => "idle_at_station",
            AmbStatus::GoingToCall        => "going_to_call",
            AmbStatus::AtCall             => "at_call",
            AmbStatus::GoingToHospital    => "going_to_hospital",
            AmbStatus::AtHospital         => "at_hospital",
            AmbStatus::FreeAfterCall      => "free_after_call",
            AmbStatus::ReturningToStation => "returning_to_station",
            AmbStatus::MovingUpToStation  => "moving_up_to_station",
        }
    }
}

impl fmt::Display for AmbStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── AmbStatusSet ──────────────────────────────────────────────────────────────

/// Named groups of [`AmbStatus`] used for aggregate durations.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum AmbStatusSet {
    /// On shift: everything except `Sleeping`.
    Working,
    /// Assigned to a call.
    Busy,
    /// Not assigned to a call and awake.
    Free,
    Travelling,
    GoingToStation,
}

impl AmbStatusSet {
    pub const ALL: [AmbStatusSet; 5] = [
        AmbStatusSet::Working,
        AmbStatusSet::Busy,
        AmbStatusSet::Free,
        AmbStatusSet::Travelling,
        AmbStatusSet::GoingToStation,
    ];

    pub fn contains(self, status: AmbStatus) -> bool {
        use AmbStatus::*;
        match self {
            AmbStatusSet::Working => status != Sleeping,
            AmbStatusSet::Busy => matches!(status, GoingToCall | AtCall | GoingToHospital | AtHospital),
            AmbStatusSet::Free => matches!(
                status,
                IdleAtStation | FreeAfterCall | ReturningToStation | MovingUpToStation
            ),
            AmbStatusSet::Travelling => matches!(
                status,
                GoingToCall | GoingToHospital | ReturningToStation | MovingUpToStation
            ),
            AmbStatusSet::GoingToStation => matches!(status, ReturningToStation | MovingUpToStation),
        }
    }

    /// Sum `values` (indexed by [`AmbStatus::index`]) over the members of
    /// this set.
    pub fn sum(self, values: &[f64; AmbStatus::COUNT]) -> f64 {
        AmbStatus::ALL
            .iter()
            .filter(|s| self.contains(**s))
            .map(|s| values[s.index()])
            .sum()
    }
}

// ── CallStatus ────────────────────────────────────────────────────────────────

/// Progress of a call through the system.  Ordered: a call's status only
/// moves forward, except that bumping returns a `WaitingForAmb` call to
/// reconsideration with no ambulance attached.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    /// Not yet arrived.
    #[default]
    Null,
    /// Arrived; dispatcher is screening it (the dispatch delay).
    Screening,
    /// No ambulance was available.
    Queued,
    /// An ambulance has been dispatched (or is about to be reconsidered after
    /// a bump).
    WaitingForAmb,
    OnSceneTreatment,
    GoingToHospital,
    AtHospital,
    Processed,
}

impl CallStatus {
    pub const COUNT: usize = 8;

    pub fn as_str(self) -> &'static str {
        match self {
            CallStatus::Null             => "null",
            CallStatus::Screening        => "screening",
            CallStatus::Queued           => "queued",
            CallStatus::WaitingForAmb    => "waiting_for_amb",
            CallStatus::OnSceneTreatment => "on_scene_treatment",
            CallStatus::GoingToHospital  => "going_to_hospital",
            CallStatus::AtHospital       => "at_hospital",
            CallStatus::Processed        => "processed",
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
