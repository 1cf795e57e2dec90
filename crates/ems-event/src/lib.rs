//! `ems-event` — event records and the pending-event queue.
//!
//! # Crate layout
//!
//! | Module    | Contents                                      |
//! |-----------|-----------------------------------------------|
//! | [`event`] | `EventForm` (closed set of kinds), `Event`    |
//! | [`queue`] | `EventQueue` (ordered, cancellable by id)     |
//! | [`error`] | `EventError`, `EventResult<T>`                |
//!
//! # Ordering
//!
//! Events pop in non-decreasing time order.  Events scheduled for the same
//! time pop in the order they were scheduled: ids are handed out by the
//! queue from a monotone counter and used as the tie-breaking key.

pub mod error;
pub mod event;
pub mod queue;

#[cfg(test)]
mod tests;

pub use error::{EventError, EventResult};
pub use event::{Event, EventForm};
pub use queue::EventQueue;
