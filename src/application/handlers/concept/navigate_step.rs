//! NavigateConceptStepHandler - Command handler for moving between steps.
//!
//! Moving back is always allowed. Moving forward goes one step at a time and
//! only once the current step is complete.

use std::sync::Arc;

use super::ConceptSessionError;
use crate::domain::concept::{navigate, ConceptState};
use crate::domain::foundation::{ConceptStep, SessionId};
use crate::ports::StateStorage;

/// Command to navigate to a step.
#[derive(Debug, Clone)]
pub struct NavigateConceptStepCommand {
    pub session_id: SessionId,
    pub target: ConceptStep,
}

/// Handler for step navigation.
pub struct NavigateConceptStepHandler {
    storage: Arc<dyn StateStorage>,
}

impl NavigateConceptStepHandler {
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self { storage }
    }

    pub async fn handle(
        &self,
        cmd: NavigateConceptStepCommand,
    ) -> Result<ConceptState, ConceptSessionError> {
        let state = self.storage.load_state(cmd.session_id).await?;
        let from = state.current_step;
        let next = navigate(&state, cmd.target)?;

        if next.current_step != from {
            self.storage.save_state(&next).await?;
            tracing::debug!(
                session_id = %next.session_id,
                from = from.key(),
                to = next.current_step.key(),
                "Concept step changed"
            );
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryStateStorage;

    fn ready_idea_state() -> ConceptState {
        let mut state = ConceptState::new(SessionId::new());
        state.idea = "Community radio for migrant youth".into();
        state.target_group = "Young migrants aged 16-25".into();
        state.problem = "Few channels to practise the host language".into();
        state
    }

    #[tokio::test]
    async fn moves_forward_when_step_is_complete() {
        let storage = Arc::new(InMemoryStateStorage::new());
        let state = ready_idea_state();
        storage.save_state(&state).await.unwrap();

        let handler = NavigateConceptStepHandler::new(storage.clone());
        let next = handler
            .handle(NavigateConceptStepCommand {
                session_id: state.session_id,
                target: ConceptStep::Sources,
            })
            .await
            .unwrap();

        assert_eq!(next.current_step, ConceptStep::Sources);
        let stored = storage.load_state(state.session_id).await.unwrap();
        assert_eq!(stored.current_step, ConceptStep::Sources);
    }

    #[tokio::test]
    async fn refuses_to_skip_ahead() {
        let storage = Arc::new(InMemoryStateStorage::new());
        let state = ready_idea_state();
        storage.save_state(&state).await.unwrap();

        let handler = NavigateConceptStepHandler::new(storage);
        let result = handler
            .handle(NavigateConceptStepCommand {
                session_id: state.session_id,
                target: ConceptStep::Objectives,
            })
            .await;

        assert!(matches!(result, Err(ConceptSessionError::Validation(_))));
    }
}
