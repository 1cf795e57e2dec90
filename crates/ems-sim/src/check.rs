//! State consistency checks run after every event in `check_mode`.

use ems_entity::CallStatus;

use crate::SimState;

/// Panic if `state` breaks an invariant the handler is meant to keep.
pub fn check_state(state: &SimState) {
    for amb in &state.ambulances {
        if let Some(id) = amb.event {
            let event = state
                .queue
                .get(id)
                .unwrap_or_else(|| panic!("{} points at {id}, which is not queued", amb.index));
            assert_eq!(event.amb, Some(amb.index), "{} points at {event}, which belongs elsewhere", amb.index);
        }
        if let Some(call) = amb.call {
            assert_eq!(
                state.calls[call.index()].amb,
                Some(amb.index),
                "{} serves {call}, which does not point back",
                amb.index
            );
        }
    }

    let idle = state.idle_counts();
    for (station, &n) in state.stations.iter().zip(&idle) {
        assert_eq!(
            station.num_idle_ambs, n,
            "{} counts {} idle ambulances, {n} are idle there",
            station.index, station.num_idle_ambs
        );
    }

    let processed = state.calls.iter().filter(|c| c.status == CallStatus::Processed).count();
    assert_eq!(
        processed, state.num_processed_calls,
        "{processed} calls are processed but {} were completed",
        state.num_processed_calls
    );
}
