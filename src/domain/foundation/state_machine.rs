//! Navigation rules for ordered workflow enums.

use super::ValidationError;

/// A finite set of states with explicit allowed moves between them.
///
/// Implementors only describe the graph; `transition_to` and `is_terminal`
/// come for free.
///
/// # Example
///
/// ```ignore
/// let next = ConceptStep::Idea.transition_to(ConceptStep::Sources)?;
/// assert!(ConceptStep::Idea.transition_to(ConceptStep::Summary).is_err());
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if moving from self to target is allowed.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns every state reachable in one move.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs the move, or explains why it is not allowed.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// True when no move leaves this state.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
