//! Step gating for the concept workflow.

use super::state::ConceptState;
use crate::domain::foundation::{ConceptStep, StateMachine, ValidationError};

const MIN_IDEA_CHARS: usize = 10;
const MIN_PROBLEM_CHARS: usize = 10;

/// True when the user has done enough in `step` to move past it.
pub fn can_proceed(state: &ConceptState, step: ConceptStep) -> bool {
    match step {
        ConceptStep::Idea => {
            state.idea.trim().chars().count() > MIN_IDEA_CHARS
                && !state.target_group.trim().is_empty()
                && state.problem.trim().chars().count() > MIN_PROBLEM_CHARS
        }
        ConceptStep::Sources => state.selected_concept().is_some(),
        ConceptStep::Consortium => !state.selected_partners.is_empty(),
        ConceptStep::Objectives => state.selected_objectives().next().is_some(),
        ConceptStep::WorkPackages => state.selected_work_packages().next().is_some(),
        ConceptStep::Summary => true,
    }
}

/// Moves the session to `target`.
///
/// Backward moves are always allowed. A forward move must go to the
/// immediately following step, and only once the current step is complete.
pub fn navigate(state: &ConceptState, target: ConceptStep) -> Result<ConceptState, ValidationError> {
    let current = state.current_step;
    if target == current {
        return Ok(state.clone());
    }

    let next = current.transition_to(target)?;
    if current.is_before(&next) && !can_proceed(state, current) {
        return Err(ValidationError::precondition(format!(
            "Complete the {} step before continuing",
            current.display_name()
        )));
    }

    let mut updated = state.clone();
    updated.current_step = next;
    Ok(updated.touched())
}
