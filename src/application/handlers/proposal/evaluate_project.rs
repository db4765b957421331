//! EvaluateProjectHandler - Scores a whole proposal against the award criteria.
//!
//! The proposal text is assembled from the session answers in official form
//! order; unanswered questions appear as `[NOT ANSWERED]` so the evaluator can
//! penalise them.

use std::sync::Arc;

use super::error::{complete_json, ProposalAssistError};
use crate::domain::pipeline::{assemble_document, PipelineState, ProposalStructure};
use crate::domain::proposal::ProjectEvaluation;
use crate::domain::prompts::evaluate_project_prompt;
use crate::ports::AIProvider;

/// Command to evaluate a proposal-writing session.
#[derive(Debug, Clone)]
pub struct EvaluateProjectCommand {
    pub state: PipelineState,
    pub language: String,
    pub api_key: Option<String>,
}

/// Handler for full-proposal evaluation.
pub struct EvaluateProjectHandler<P: ?Sized + AIProvider> {
    ai_provider: Arc<P>,
}

impl<P: ?Sized + AIProvider> EvaluateProjectHandler<P> {
    pub fn new(ai_provider: Arc<P>) -> Self {
        Self { ai_provider }
    }

    pub async fn handle(
        &self,
        cmd: EvaluateProjectCommand,
    ) -> Result<ProjectEvaluation, ProposalAssistError> {
        let structure = ProposalStructure::official(
            cmd.state.action_type(),
            cmd.state.configuration.wp_count,
        );
        let document = assemble_document(&cmd.state, &structure);
        let prompt = evaluate_project_prompt(&cmd.state, &document, &cmd.language);

        let mut evaluation: ProjectEvaluation =
            complete_json(self.ai_provider.as_ref(), prompt, cmd.api_key).await?;
        evaluation.score = evaluation.score.min(100);

        tracing::info!(
            score = evaluation.score,
            category_total = evaluation.categories.total(),
            document_chars = document.chars().count(),
            "Proposal evaluated"
        );
        Ok(evaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::domain::pipeline::Answer;
    use serde_json::json;

    fn category(score: u32, max: u32) -> serde_json::Value {
        json!({"score": score, "maxScore": max, "feedback": "ok", "strengths": [], "weaknesses": []})
    }

    fn evaluation_json(score: u32) -> serde_json::Value {
        json!({
            "score": score,
            "categories": {
                "relevance": category(20, 30),
                "design": category(14, 20),
                "partnership": category(12, 20),
                "impact": category(18, 30)
            },
            "overallFeedback": "Solid draft",
            "suggestions": ["Add KPIs"]
        })
    }

    #[tokio::test]
    async fn sends_assembled_document_and_parses_scores() {
        let provider = Arc::new(MockAIProvider::new().with_json(evaluation_json(64)));
        let handler = EvaluateProjectHandler::new(provider.clone());

        let mut state = PipelineState::default();
        state.project_title = Some("Digital Bridges".into());
        state.set_answer("rel_priorities", Answer::manual("Inclusion and digital skills"));

        let eval = handler
            .handle(EvaluateProjectCommand {
                state,
                language: "en".into(),
                api_key: None,
            })
            .await
            .unwrap();

        assert_eq!(eval.score, 64);
        assert_eq!(eval.categories.total(), 64);
        let call = provider.last_call().unwrap();
        assert!(call.prompt.contains("Digital Bridges"));
        assert!(call.prompt.contains("[NOT ANSWERED]"));
    }

    #[tokio::test]
    async fn overall_score_is_capped() {
        let provider = Arc::new(MockAIProvider::new().with_json(evaluation_json(140)));
        let handler = EvaluateProjectHandler::new(provider);

        let eval = handler
            .handle(EvaluateProjectCommand {
                state: PipelineState::default(),
                language: "de".into(),
                api_key: None,
            })
            .await
            .unwrap();

        assert_eq!(eval.score, 100);
    }
}
