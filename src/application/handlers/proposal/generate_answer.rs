//! GenerateAnswerHandler - Writes or rewrites one answer of the form.

use std::sync::Arc;

use super::error::{complete_nonempty_text, ProposalAssistError};
use crate::domain::pipeline::{
    ai_answer, clean_generated_answer, question_target, Answer, PipelineState, ProposalStructure,
};
use crate::domain::prompts::answer_question_prompt;
use crate::ports::AIProvider;

/// Command to generate one answer.
#[derive(Debug, Clone)]
pub struct GenerateAnswerCommand {
    pub state: PipelineState,
    pub question_id: String,
    /// Required for questions answered per partner.
    pub partner_id: Option<String>,
    /// Free-text guidance such as "shorter" or "add statistics".
    pub instruction: Option<String>,
    pub language: String,
    pub api_key: Option<String>,
}

/// The session with the new answer stored.
#[derive(Debug, Clone)]
pub struct GenerateAnswerResult {
    pub state: PipelineState,
    /// Key the answer was stored under.
    pub key: String,
    pub answer: Answer,
}

/// Handler for single-answer generation.
///
/// An explicit request overwrites whatever is stored under the key,
/// manual edits included. On failure the session is not touched.
pub struct GenerateAnswerHandler<P: ?Sized + AIProvider> {
    ai_provider: Arc<P>,
}

impl<P: ?Sized + AIProvider> GenerateAnswerHandler<P> {
    pub fn new(ai_provider: Arc<P>) -> Self {
        Self { ai_provider }
    }

    pub async fn handle(
        &self,
        cmd: GenerateAnswerCommand,
    ) -> Result<GenerateAnswerResult, ProposalAssistError> {
        let structure = ProposalStructure::official(cmd.state.action_type(), cmd.state.configuration.wp_count);
        let target = question_target(&structure, &cmd.state, &cmd.question_id, cmd.partner_id.as_deref())?;

        let prompt = answer_question_prompt(&cmd.state, &target, cmd.instruction.as_deref(), &cmd.language);
        let raw = complete_nonempty_text(self.ai_provider.as_ref(), prompt, cmd.api_key).await?;

        let key = target.key.clone();
        let answer = ai_answer(clean_generated_answer(&raw, &target.question.id), Vec::new());
        tracing::debug!(key = %key, "Answer generated");

        let mut state = cmd.state;
        state.set_answer(key.clone(), answer.clone());
        Ok(GenerateAnswerResult { state, key, answer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::ActionType;
    use crate::domain::pipeline::{AnswerMode, ConsortiumPartner, PipelineConfiguration, ProjectIdea};

    fn state() -> PipelineState {
        PipelineState::new(
            vec![ConsortiumPartner {
                id: "p1".into(),
                name: "VHS Nord".into(),
                country: "DE".into(),
                organization_type: "ADULT_EDUCATION".into(),
                expertise: vec![],
                is_lead: true,
                role: None,
            }],
            ProjectIdea {
                title: Some("Digital Bridges".into()),
                ..Default::default()
            },
            Some(PipelineConfiguration {
                action_type: ActionType::Ka220,
                wp_count: 4,
                ..PipelineConfiguration::default()
            }),
        )
    }

    fn command(question_id: &str, partner_id: Option<&str>) -> GenerateAnswerCommand {
        GenerateAnswerCommand {
            state: state(),
            question_id: question_id.into(),
            partner_id: partner_id.map(str::to_string),
            instruction: Some("Mention rural libraries".into()),
            language: "en".into(),
            api_key: Some("user-key".into()),
        }
    }

    #[tokio::test]
    async fn stores_ai_answer_under_question_id() {
        let provider = Arc::new(MockAIProvider::new().with_response("### Needs\nRural adults lack skills."));
        let handler = GenerateAnswerHandler::new(provider.clone());

        let result = handler.handle(command("needs_address", None)).await.unwrap();

        assert_eq!(result.key, "needs_address");
        assert_eq!(
            result.state.answer_text("needs_address").as_deref(),
            Some("### Needs\nRural adults lack skills.")
        );
        assert!(matches!(
            result.answer,
            Answer::Wrapped { mode: AnswerMode::Ai, last_edited_at: Some(_), .. }
        ));
        let call = provider.last_call().unwrap();
        assert!(call.prompt.contains("Mention rural libraries"));
        assert!(call.api_key_override.is_some());
    }

    #[tokio::test]
    async fn partner_question_uses_partner_key() {
        let provider = Arc::new(MockAIProvider::new().with_response("## About the organisation\nVHS Nord..."));
        let handler = GenerateAnswerHandler::new(provider);

        let result = handler.handle(command("org_presentation", Some("p1"))).await.unwrap();

        assert_eq!(result.key, "org_presentation_p1");
        assert!(result.state.answers.contains_key("org_presentation_p1"));
        assert!(!result.state.answers.contains_key("org_presentation"));
    }

    #[tokio::test]
    async fn manual_answer_is_replaced_on_request() {
        let provider = Arc::new(MockAIProvider::new().with_response("New text"));
        let handler = GenerateAnswerHandler::new(provider);
        let mut cmd = command("needs_address", None);
        cmd.state.set_answer("needs_address", Answer::manual("Old text"));

        let result = handler.handle(cmd).await.unwrap();

        assert_eq!(result.state.answer_text("needs_address").as_deref(), Some("New text"));
    }

    #[tokio::test]
    async fn unknown_question_fails_before_model_call() {
        let provider = Arc::new(MockAIProvider::new());
        let handler = GenerateAnswerHandler::new(provider.clone());

        let result = handler.handle(command("no_such_question", None)).await;

        assert!(matches!(result, Err(ProposalAssistError::InvalidInput(_))));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn partner_question_without_partner_is_rejected() {
        let provider = Arc::new(MockAIProvider::new());
        let handler = GenerateAnswerHandler::new(provider.clone());

        let result = handler.handle(command("org_presentation", None)).await;

        assert!(matches!(result, Err(ProposalAssistError::InvalidInput(_))));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn model_failure_surfaces() {
        let provider = Arc::new(MockAIProvider::new().with_error(MockError::RateLimited { attempts: 2 }));
        let handler = GenerateAnswerHandler::new(provider);

        let result = handler.handle(command("needs_address", None)).await;

        assert!(matches!(result, Err(ProposalAssistError::Model(_))));
    }

    #[tokio::test]
    async fn blank_model_answer_is_an_error() {
        let provider = Arc::new(MockAIProvider::new().with_response("   "));
        let handler = GenerateAnswerHandler::new(provider);

        let result = handler.handle(command("needs_address", None)).await;

        assert!(matches!(result, Err(ProposalAssistError::Model(_))));
    }
}
