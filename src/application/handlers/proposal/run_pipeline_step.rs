//! RunPipelineStepHandler - Fills one chapter of the form.
//!
//! Questions are answered one model call at a time, in form order. A failed
//! answer is recorded against its key and the stored answer stays as it
//! was; the other answers of the step are still written. A rate limit or a
//! missing key ends the step early, since every further call would fail the
//! same way. Answers the user wrote by hand are never overwritten.

use std::sync::Arc;

use serde::Serialize;

use super::error::{complete_nonempty_text, ProposalAssistError};
use crate::domain::pipeline::{
    ai_answer, clean_generated_answer, is_manual, known_answer, step_targets, Answer,
    PipelineState, ProposalStructure, QuestionKind, StepScope,
};
use crate::domain::prompts::answer_question_prompt;
use crate::ports::{AIError, AIProvider};

/// Command to generate one step.
#[derive(Debug, Clone)]
pub struct RunPipelineStepCommand {
    pub state: PipelineState,
    /// Chapter id of the official form.
    pub chapter_id: u32,
    pub scope: StepScope,
    pub language: String,
    pub api_key: Option<String>,
}

/// An answer that could not be generated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFailure {
    pub key: String,
    pub message: String,
}

/// How the step ended; the returned state is usable in every case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Completed,
    /// Some answers were written, others failed.
    Partial { message: String },
    /// Nothing was written.
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub struct RunPipelineStepResult {
    pub state: PipelineState,
    /// Keys written by the model.
    pub generated: Vec<String>,
    /// Keys filled from session settings.
    pub filled: Vec<String>,
    /// Keys left alone: manual answers and short fields with no known value.
    pub skipped: Vec<String>,
    pub failures: Vec<AnswerFailure>,
    pub outcome: StepOutcome,
}

/// Handler for whole-step generation.
pub struct RunPipelineStepHandler<P: ?Sized + AIProvider> {
    ai_provider: Arc<P>,
}

impl<P: ?Sized + AIProvider> RunPipelineStepHandler<P> {
    pub fn new(ai_provider: Arc<P>) -> Self {
        Self { ai_provider }
    }

    pub async fn handle(
        &self,
        cmd: RunPipelineStepCommand,
    ) -> Result<RunPipelineStepResult, ProposalAssistError> {
        let structure = ProposalStructure::official(cmd.state.action_type(), cmd.state.configuration.wp_count);
        let targets = step_targets(&structure, &cmd.state, cmd.chapter_id, cmd.scope)?;

        let mut state = cmd.state.clone();
        let mut generated = Vec::new();
        let mut filled = Vec::new();
        let mut skipped = Vec::new();
        let mut failures = Vec::new();
        let mut abort: Option<String> = None;

        for target in &targets {
            if let Some(message) = &abort {
                failures.push(AnswerFailure {
                    key: target.key.clone(),
                    message: message.clone(),
                });
                continue;
            }
            if is_manual(&cmd.state, &target.key) {
                skipped.push(target.key.clone());
                continue;
            }
            if let Some(value) = known_answer(&cmd.state, target) {
                state.set_answer(target.key.clone(), Answer::Plain(value));
                filled.push(target.key.clone());
                continue;
            }
            if target.question.kind == QuestionKind::Text {
                skipped.push(target.key.clone());
                continue;
            }

            let prompt = answer_question_prompt(&cmd.state, target, None, &cmd.language);
            match complete_nonempty_text(self.ai_provider.as_ref(), prompt, cmd.api_key.clone()).await {
                Ok(raw) => {
                    let value = clean_generated_answer(&raw, &target.question.id);
                    state.set_answer(target.key.clone(), ai_answer(value, Vec::new()));
                    generated.push(target.key.clone());
                }
                Err(err) => {
                    let message = err.user_message(&format!("Answer to \"{}\"", target.question.text));
                    tracing::warn!(
                        chapter = cmd.chapter_id,
                        key = %target.key,
                        error = %err,
                        "Answer generation failed"
                    );
                    if ends_step(&err) {
                        abort = Some(message.clone());
                    }
                    failures.push(AnswerFailure {
                        key: target.key.clone(),
                        message,
                    });
                }
            }
        }

        let outcome = outcome(generated.len() + filled.len(), &failures);
        tracing::info!(
            chapter = cmd.chapter_id,
            generated = generated.len(),
            failed = failures.len(),
            "Pipeline step finished"
        );
        Ok(RunPipelineStepResult {
            state,
            generated,
            filled,
            skipped,
            failures,
            outcome,
        })
    }
}

fn ends_step(err: &ProposalAssistError) -> bool {
    matches!(
        err,
        ProposalAssistError::Model(AIError::RateLimited { .. } | AIError::MissingApiKey)
    )
}

fn outcome(written: usize, failures: &[AnswerFailure]) -> StepOutcome {
    match failures.first() {
        None => StepOutcome::Completed,
        Some(first) if written == 0 => StepOutcome::Failed {
            message: first.message.clone(),
        },
        Some(_) => StepOutcome::Partial {
            message: format!(
                "{} of {} answers could not be generated.",
                failures.len(),
                written + failures.len()
            ),
        },
    }
}
