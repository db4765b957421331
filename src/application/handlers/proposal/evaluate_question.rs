//! EvaluateQuestionHandler - Reviewer feedback on a single form answer.

use std::sync::Arc;

use super::error::{complete_json, require_text, ProposalAssistError};
use crate::domain::proposal::QuestionEvaluation;
use crate::domain::prompts::{evaluate_question_prompt, QuestionContext};
use crate::ports::AIProvider;

/// Command to evaluate one answer.
#[derive(Debug, Clone)]
pub struct EvaluateQuestionCommand {
    pub question: String,
    pub answer: String,
    pub context: QuestionContext,
    pub language: String,
    pub api_key: Option<String>,
}

/// Handler for answer evaluation.
pub struct EvaluateQuestionHandler<P: ?Sized + AIProvider> {
    ai_provider: Arc<P>,
}

impl<P: ?Sized + AIProvider> EvaluateQuestionHandler<P> {
    pub fn new(ai_provider: Arc<P>) -> Self {
        Self { ai_provider }
    }

    pub async fn handle(
        &self,
        cmd: EvaluateQuestionCommand,
    ) -> Result<QuestionEvaluation, ProposalAssistError> {
        require_text("question", &cmd.question)?;
        require_text("answer", &cmd.answer)?;

        let prompt = evaluate_question_prompt(&cmd.question, &cmd.answer, &cmd.context, &cmd.language);
        let evaluation: QuestionEvaluation =
            complete_json(self.ai_provider.as_ref(), prompt, cmd.api_key).await?;
        let evaluation = evaluation.cleaned();

        tracing::debug!(
            score = evaluation.score,
            improvements = evaluation.improvements.len(),
            "Answer evaluated"
        );
        Ok(evaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use serde_json::json;

    fn command() -> EvaluateQuestionCommand {
        EvaluateQuestionCommand {
            question: "Describe the needs of your target groups.".into(),
            answer: "Young people in rural areas lack digital skills.".into(),
            context: QuestionContext {
                project_title: Some("Digital Bridges".into()),
                sector: Some("Youth".into()),
            },
            language: "en".into(),
            api_key: None,
        }
    }

    #[tokio::test]
    async fn returns_cleaned_evaluation() {
        let provider = Arc::new(MockAIProvider::new().with_response(format!(
            "```json\n{}\n```",
            json!({
                "score": 12,
                "improvements": [{
                    "issue": "**Vague** need",
                    "location": "## First sentence",
                    "suggestion": "Add a statistic",
                    "improvedText": "**Needs:** 40% of rural youth..."
                }]
            })
        )));
        let handler = EvaluateQuestionHandler::new(provider);

        let eval = handler.handle(command()).await.unwrap();

        assert_eq!(eval.score, 10);
        assert_eq!(eval.improvements[0].issue, "Vague need");
        assert_eq!(eval.improvements[0].location, " First sentence");
        assert_eq!(eval.improvements[0].improved_text, "**Needs:** 40% of rural youth...");
    }

    #[tokio::test]
    async fn missing_answer_is_rejected() {
        let provider = Arc::new(MockAIProvider::new());
        let handler = EvaluateQuestionHandler::new(provider.clone());

        let mut cmd = command();
        cmd.answer = String::new();

        assert!(matches!(
            handler.handle(cmd).await,
            Err(ProposalAssistError::InvalidInput(_))
        ));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn prose_answer_is_a_parse_error() {
        let provider = Arc::new(MockAIProvider::new().with_response("Looks great to me."));
        let handler = EvaluateQuestionHandler::new(provider);

        assert!(matches!(
            handler.handle(command()).await,
            Err(ProposalAssistError::Parse(_))
        ));
    }
}
