//! Event kinds and event records.

use std::fmt;
use std::str::FromStr;

use ems_core::{AmbId, CallId, EventId, SimTime, StationId};

use crate::EventError;

// ── EventForm ─────────────────────────────────────────────────────────────────

/// Every kind of event the simulation can schedule.  The handler matches on
/// this exhaustively, so adding a variant forces a handler update.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventForm {
    AmbGoesToSleep,
    AmbWakesUp,
    CallArrives,
    ConsiderDispatch,
    AmbDispatched,
    AmbReachesCall,
    AmbGoesToHospital,
    AmbReachesHospital,
    AmbBecomesFree,
    AmbReturnsToStation,
    AmbReachesStation,
    ConsiderMoveUp,
    AmbMoveUpToStation,
}

impl EventForm {
    pub const ALL: [EventForm; 13] = [
        EventForm::AmbGoesToSleep,
        EventForm::AmbWakesUp,
        EventForm::CallArrives,
        EventForm::ConsiderDispatch,
        EventForm::AmbDispatched,
        EventForm::AmbReachesCall,
        EventForm::AmbGoesToHospital,
        EventForm::AmbReachesHospital,
        EventForm::AmbBecomesFree,
        EventForm::AmbReturnsToStation,
        EventForm::AmbReachesStation,
        EventForm::ConsiderMoveUp,
        EventForm::AmbMoveUpToStation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventForm::AmbGoesToSleep      => "amb_goes_to_sleep",
            EventForm::AmbWakesUp          => "amb_wakes_up",
            EventForm::CallArrives         => "call_arrives",
            EventForm::ConsiderDispatch    => "consider_dispatch",
            EventForm::AmbDispatched       => "amb_dispatched",
            EventForm::AmbReachesCall      => "amb_reaches_call",
            EventForm::AmbGoesToHospital   => "amb_goes_to_hospital",
            EventForm::AmbReachesHospital  => "amb_reaches_hospital",
            EventForm::AmbBecomesFree      => "amb_becomes_free",
            EventForm::AmbReturnsToStation => "amb_returns_to_station",
            EventForm::AmbReachesStation   => "amb_reaches_station",
            EventForm::ConsiderMoveUp      => "consider_move_up",
            EventForm::AmbMoveUpToStation  => "amb_move_up_to_station",
        }
    }
}

impl fmt::Display for EventForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventForm {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventForm::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| EventError::UnknownForm(s.to_owned()))
    }
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// One scheduled occurrence.
///
/// `index` is assigned by [`EventQueue::schedule`][crate::EventQueue::schedule];
/// events built with [`Event::new`] carry `EventId::INVALID` until then.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub index:        EventId,
    /// Event that was executing when this one was scheduled.
    pub parent_index: Option<EventId>,
    pub form:         EventForm,
    pub time:         SimTime,
    pub amb:          Option<AmbId>,
    pub call:         Option<CallId>,
    pub station:      Option<StationId>,
}

impl Event {
    pub fn new(form: EventForm, time: SimTime) -> Self {
        Self {
            index:        EventId::INVALID,
            parent_index: None,
            form,
            time,
            amb:          None,
            call:         None,
            station:      None,
        }
    }

    pub fn with_amb(mut self, amb: AmbId) -> Self {
        self.amb = Some(amb);
        self
    }

    pub fn with_call(mut self, call: CallId) -> Self {
        self.call = Some(call);
        self
    }

    pub fn with_station(mut self, station: StationId) -> Self {
        self.station = Some(station);
        self
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} t={:.3}", self.index.0, self.form, self.time)?;
        if let Some(a) = self.amb {
            write!(f, " {a}")?;
        }
        if let Some(c) = self.call {
            write!(f, " {c}")?;
        }
        if let Some(s) = self.station {
            write!(f, " {s}")?;
        }
        Ok(())
    }
}
