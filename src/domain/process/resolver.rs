//! Phase resolution over a process's state array.
//!
//! Lookups never error: a missing current state resolves to `None` or
//! an empty list, and the caller decides whether that is fatal.

use super::state::StateDefinition;

/// Finds the active phase by id.
pub fn current_state<'a>(
    states: &'a [StateDefinition],
    current_state_id: &str,
) -> Option<&'a StateDefinition> {
    states.iter().find(|state| state.id == current_state_id)
}

/// The phases still ahead of the current one, in array order.
///
/// Only phases with a scheduled start date count as upcoming; the rest
/// are filtered out. This list is shown to members as "what happens
/// next", so array order is load-bearing.
pub fn next_steps<'a>(
    states: &'a [StateDefinition],
    current_state_id: &str,
) -> Vec<&'a StateDefinition> {
    let Some(index) = states.iter().position(|state| state.id == current_state_id) else {
        return Vec::new();
    };

    states[index + 1..]
        .iter()
        .filter(|state| state.is_scheduled())
        .collect()
}
