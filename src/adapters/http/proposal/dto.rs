//! HTTP DTOs for proposal assistance endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::concept::dto::default_language;
use crate::application::handlers::proposal::{
    AnswerFailure, DescriptionMode, ExtractPartnerResult, GenerateAnswerResult,
    PartnerDescriptionResult, RunPipelineStepResult, StepOutcome,
};
use crate::domain::budget::{BudgetPlan, DistributionMode};
use crate::domain::concept::{PartnerProfile, ProjectBrief};
use crate::domain::pipeline::{Answer, PipelineState, StepScope};
use crate::domain::proposal::Project;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateTextRequest {
    pub text: String,
    #[serde(default = "default_language")]
    pub target_language: String,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateProjectRequest {
    pub project: Project,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateQuestionRequest {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub project_title: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateProjectRequest {
    pub state: PipelineState,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidatePipelineRequest {
    pub state: PipelineState,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateProjectRequest {
    pub project: Project,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractPartnerRequest {
    pub url: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestPartnersRequest {
    /// Partner library to choose from.
    pub partners: Vec<PartnerProfile>,
    pub project_idea: ProjectBrief,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDescriptionRequest {
    pub partner: PartnerProfile,
    #[serde(default)]
    pub project_context: Option<ProjectBrief>,
    #[serde(default)]
    pub additional_info: Option<String>,
    #[serde(default)]
    pub mode: DescriptionMode,
    #[serde(default)]
    pub existing_description: Option<String>,
    #[serde(default)]
    pub correction_instruction: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAnswerRequest {
    pub state: PipelineState,
    pub question_id: String,
    #[serde(default)]
    pub partner_id: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPipelineStepRequest {
    pub state: PipelineState,
    pub chapter_id: u32,
    #[serde(default)]
    pub scope: StepScope,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BudgetFromPipelineRequest {
    pub state: PipelineState,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributeBudgetRequest {
    pub plan: BudgetPlan,
    #[serde(default)]
    pub mode: DistributionMode,
    #[serde(default)]
    pub suggest_percentages: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckBudgetRequest {
    pub plan: BudgetPlan,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateTextResponse {
    pub translated_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslateProjectResponse {
    pub project: Project,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractPartnerResponse {
    pub partner: PartnerProfile,
    /// Whether the website content was available to the model.
    pub fetched: bool,
    pub truncated: bool,
}

impl From<ExtractPartnerResult> for ExtractPartnerResponse {
    fn from(result: ExtractPartnerResult) -> Self {
        Self {
            partner: result.partner,
            fetched: result.fetched,
            truncated: result.truncated,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDescriptionResponse {
    pub description: String,
    pub word_count: usize,
    pub corrected: bool,
}

impl From<PartnerDescriptionResult> for PartnerDescriptionResponse {
    fn from(result: PartnerDescriptionResult) -> Self {
        Self {
            description: result.description,
            word_count: result.word_count,
            corrected: result.corrected,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAnswerResponse {
    pub state: PipelineState,
    pub key: String,
    pub answer: Answer,
}

impl From<GenerateAnswerResult> for GenerateAnswerResponse {
    fn from(result: GenerateAnswerResult) -> Self {
        Self {
            state: result.state,
            key: result.key,
            answer: result.answer,
        }
    }
}

/// The session after a step run, written answers and failures included.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPipelineStepResponse {
    pub state: PipelineState,
    pub generated: Vec<String>,
    pub filled: Vec<String>,
    pub skipped: Vec<String>,
    pub failures: Vec<AnswerFailure>,
    pub outcome: StepOutcome,
}

impl From<RunPipelineStepResult> for RunPipelineStepResponse {
    fn from(result: RunPipelineStepResult) -> Self {
        Self {
            state: result.state,
            generated: result.generated,
            filled: result.filled,
            skipped: result.skipped,
            failures: result.failures,
            outcome: result.outcome,
        }
    }
}
