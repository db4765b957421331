//! ExportProjectHandler - Turns a finished concept session into a draft project.

use std::sync::Arc;

use super::ConceptSessionError;
use crate::domain::concept::export_project;
use crate::domain::foundation::SessionId;
use crate::domain::proposal::{validate_project_entity, Project};
use crate::domain::validation::{summarize, ValidationSummary};
use crate::ports::StateStorage;

/// Command to export a session.
#[derive(Debug, Clone)]
pub struct ExportProjectCommand {
    pub session_id: SessionId,
}

/// The draft project and how it scores against the project rules.
#[derive(Debug, Clone)]
pub struct ExportProjectResult {
    pub project: Project,
    pub validation: ValidationSummary,
}

/// Handler for exporting sessions.
pub struct ExportProjectHandler {
    storage: Arc<dyn StateStorage>,
}

impl ExportProjectHandler {
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self { storage }
    }

    pub async fn handle(
        &self,
        cmd: ExportProjectCommand,
    ) -> Result<ExportProjectResult, ConceptSessionError> {
        let state = self.storage.load_state(cmd.session_id).await?;
        let project = export_project(&state)?;
        let validation = summarize(validate_project_entity(&project));

        tracing::info!(
            session_id = %cmd.session_id,
            project_id = %project.id,
            score = validation.score,
            "Concept exported as project"
        );
        Ok(ExportProjectResult {
            project,
            validation,
        })
    }
}
