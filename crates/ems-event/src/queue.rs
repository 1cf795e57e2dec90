//! `EventQueue` — pending events ordered by `(time, id)`, cancellable by id.
//!
//! # Performance note
//!
//! `BTreeMap` keyed by `(OrderedFloat(time), EventId)` gives O(log n)
//! insert, pop and cancel.  A side `FxHashMap<EventId, time>` turns a cancel
//! by id into a direct key lookup.  At any instant the queue holds roughly one
//! event per ambulance plus the next call arrival, so n stays small.
//!
//! # Contract
//!
//! Popping an empty queue, cancelling an id that is not queued and scheduling
//! at a non-finite time are engine bugs and panic.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use ems_core::{EventId, SimTime};

use crate::Event;

type Key = (OrderedFloat<SimTime>, EventId);

#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    inner:    BTreeMap<Key, Event>,
    time_of:  FxHashMap<EventId, OrderedFloat<SimTime>>,
    /// Id handed to the next scheduled event.
    next_id:  u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next id to `event`, record `parent` as its lineage, and
    /// insert it.  Returns the new id.
    pub fn schedule(&mut self, mut event: Event, parent: Option<EventId>) -> EventId {
        assert!(event.time.is_finite(), "event scheduled at non-finite time {}", event.time);
        let id = EventId(self.next_id);
        self.next_id += 1;
        event.index = id;
        event.parent_index = parent;
        let t = OrderedFloat(event.time);
        self.time_of.insert(id, t);
        self.inner.insert((t, id), event);
        id
    }

    /// Remove and return the earliest event.
    pub fn pop_earliest(&mut self) -> Event {
        let ((_, id), event) = self
            .inner
            .pop_first()
            .unwrap_or_else(|| panic!("pop from empty event queue"));
        self.time_of.remove(&id);
        event
    }

    /// Remove a not-yet-executed event by id.
    pub fn cancel(&mut self, id: EventId) -> Event {
        let t = self
            .time_of
            .remove(&id)
            .unwrap_or_else(|| panic!("cancel of event {id} which is not queued"));
        self.inner
            .remove(&(t, id))
            .unwrap_or_else(|| panic!("event queue index out of sync for {id}"))
    }

    pub fn peek_earliest(&self) -> Option<&Event> {
        self.inner.values().next()
    }

    pub fn peek_earliest_time(&self) -> Option<SimTime> {
        self.inner.keys().next().map(|(t, _)| t.0)
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        let t = *self.time_of.get(&id)?;
        self.inner.get(&(t, id))
    }

    #[inline]
    pub fn contains(&self, id: EventId) -> bool {
        self.time_of.contains_key(&id)
    }

    /// Pending events in pop order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.inner.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Id the next [`schedule`](Self::schedule) call will assign.
    #[inline]
    pub fn next_id(&self) -> EventId {
        EventId(self.next_id)
    }
}
