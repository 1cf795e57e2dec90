//! The `DispatchPolicy` trait and the nearest-ambulance strategy.

use ems_core::{AmbId, CallId};
use ems_entity::{AmbStatus, Ambulance};

use crate::{PolicyContext, PolicyResult};

/// Pluggable dispatch decision.
///
/// Called by the handler whenever a call needs an ambulance: after its
/// screening delay, after it is bumped, and when an ambulance frees up or
/// wakes while calls are queued.
///
/// Implementations must be deterministic: the same context always yields the
/// same answer.  Returning an ambulance that is currently `GoingToCall` for a
/// different call bumps that call.
pub trait DispatchPolicy: Send + Sync + 'static {
    /// Registry name, e.g. `"nearest"`.
    fn name(&self) -> &str;

    /// Choose an ambulance for `call`, or `None` to queue it.
    fn select_ambulance(&self, call: CallId, ctx: &PolicyContext<'_>) -> PolicyResult<Option<AmbId>>;
}

/// Dispatch the ambulance that can reach the call soonest.
///
/// Eligible ambulances are those free for dispatch, plus (with bumping
/// enabled) ambulances driving to a strictly less urgent call.  Ties go to
/// the lowest index.
pub struct NearestDispatch;

impl NearestDispatch {
    fn eligible(amb: &Ambulance, call: CallId, ctx: &PolicyContext<'_>) -> bool {
        if amb.status.is_available_for_dispatch() {
            // A call already linked means a dispatch is pending this instant.
            return amb.call.is_none();
        }
        if !ctx.allow_bumping || amb.status != AmbStatus::GoingToCall {
            return false;
        }
        match amb.call {
            Some(current) if current != call => ctx.calls[call.index()]
                .priority
                .is_more_urgent_than(ctx.calls[current.index()].priority),
            _ => false,
        }
    }
}

impl DispatchPolicy for NearestDispatch {
    fn name(&self) -> &str {
        "nearest"
    }

    fn select_ambulance(&self, call: CallId, ctx: &PolicyContext<'_>) -> PolicyResult<Option<AmbId>> {
        let target = &ctx.calls[call.index()];
        let mut best: Option<(f64, AmbId)> = None;
        for amb in ctx.ambulances.iter().filter(|a| Self::eligible(a, call, ctx)) {
            let from = amb.location_at(ctx.time);
            let d = ctx.travel.travel_duration(from, target.location, target.priority)?;
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, amb.index));
            }
        }
        Ok(best.map(|(_, id)| id))
    }
}
