//! TranslateProjectHandler - Translates the prose of a project into English.
//!
//! Only the translatable fields travel to the model. The answer is merged
//! back by identifier onto a copy of the original; if the call or the parse
//! fails, nothing is merged and the caller gets a failure message instead.

use std::sync::Arc;

use super::error::{complete_json, ProposalAssistError};
use crate::domain::proposal::{merge_translated, Project, TranslationPayload, TRANSLATION_FAILED_MESSAGE};
use crate::domain::prompts::translate_project_prompt;
use crate::domain::foundation::ValidationError;
use crate::ports::AIProvider;

/// Command to translate a project.
#[derive(Debug, Clone)]
pub struct TranslateProjectCommand {
    pub project: Project,
    pub api_key: Option<String>,
}

/// Outcome of a project translation.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslateProjectResult {
    Translated(Project),
    Failed { message: String },
}

/// Handler for project translation.
pub struct TranslateProjectHandler<P: ?Sized + AIProvider> {
    ai_provider: Arc<P>,
}

impl<P: ?Sized + AIProvider> TranslateProjectHandler<P> {
    pub fn new(ai_provider: Arc<P>) -> Self {
        Self { ai_provider }
    }

    pub async fn handle(
        &self,
        cmd: TranslateProjectCommand,
    ) -> Result<TranslateProjectResult, ProposalAssistError> {
        let payload = TranslationPayload::from_project(&cmd.project);
        let prompt = translate_project_prompt(&payload).map_err(|e| {
            ValidationError::invalid_format("project", e.to_string())
        })?;

        match complete_json::<P, TranslationPayload>(self.ai_provider.as_ref(), prompt, cmd.api_key).await {
            Ok(translated) => Ok(TranslateProjectResult::Translated(merge_translated(
                &cmd.project,
                &translated,
            ))),
            Err(err) => {
                tracing::warn!(project_id = %cmd.project.id, error = %err, "Project translation failed");
                Ok(TranslateProjectResult::Failed {
                    message: TRANSLATION_FAILED_MESSAGE.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::{ActionType, EntityId};
    use crate::domain::proposal::{Objective, ObjectiveType};
    use serde_json::json;

    fn german_project() -> Project {
        let mut project = Project::new(EntityId::from("p1"), "Digitale Brücken", ActionType::Ka220);
        project.objectives = vec![Objective {
            id: EntityId::from("obj_0"),
            code: "SO1".into(),
            kind: ObjectiveType::Specific,
            description: "Digitale Kompetenzen stärken".into(),
            indicators: vec![],
            sources: vec![],
        }];
        project
    }

    #[tokio::test]
    async fn merges_translation_by_id() {
        let provider = Arc::new(MockAIProvider::new().with_json(json!({
            "title": "Digital Bridges",
            "objectives": [
                {"id": "obj_0", "description": "Strengthen digital skills"},
                {"id": "obj_unknown", "description": "Ignored"}
            ]
        })));
        let handler = TranslateProjectHandler::new(provider);

        let result = handler
            .handle(TranslateProjectCommand {
                project: german_project(),
                api_key: None,
            })
            .await
            .unwrap();

        let TranslateProjectResult::Translated(project) = result else {
            panic!("expected a translated project");
        };
        assert_eq!(project.title, "Digital Bridges");
        assert_eq!(project.objectives.len(), 1);
        assert_eq!(project.objectives[0].description, "Strengthen digital skills");
        assert_eq!(project.objectives[0].code, "SO1");
    }

    #[tokio::test]
    async fn failed_call_returns_failure_message() {
        let provider = Arc::new(MockAIProvider::new().with_error(MockError::RateLimited { attempts: 2 }));
        let handler = TranslateProjectHandler::new(provider);

        let result = handler
            .handle(TranslateProjectCommand {
                project: german_project(),
                api_key: None,
            })
            .await
            .unwrap();

        assert_eq!(
            result,
            TranslateProjectResult::Failed {
                message: TRANSLATION_FAILED_MESSAGE.into()
            }
        );
    }

    #[tokio::test]
    async fn unparsable_answer_is_a_failure() {
        let provider = Arc::new(MockAIProvider::new().with_response("Here is your translation!"));
        let handler = TranslateProjectHandler::new(provider);

        let result = handler
            .handle(TranslateProjectCommand {
                project: german_project(),
                api_key: None,
            })
            .await
            .unwrap();

        assert!(matches!(result, TranslateProjectResult::Failed { .. }));
    }
}
