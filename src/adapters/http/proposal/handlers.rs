//! HTTP handlers for proposal assistance endpoints.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::api_key::ApiKeyOverride;
use crate::adapters::http::error::{ai_error_parts, ErrorResponse};
use crate::application::handlers::proposal::{
    BudgetHandler, DistributeBudgetCommand, EvaluateProjectCommand, EvaluateProjectHandler,
    EvaluateQuestionCommand, EvaluateQuestionHandler, ExtractPartnerCommand,
    ExtractPartnerHandler, GenerateAnswerCommand, GenerateAnswerHandler,
    GeneratePartnerDescriptionCommand, GeneratePartnerDescriptionHandler, ProposalAssistError,
    RunPipelineStepCommand, RunPipelineStepHandler, SuggestPartnersCommand,
    SuggestPartnersHandler, TranslateProjectCommand, TranslateProjectHandler,
    TranslateProjectResult, TranslateTextCommand, TranslateTextHandler, ValidateHandler,
    ValidatePipelineQuery, ValidateProjectQuery,
};
use crate::domain::prompts::QuestionContext;
use crate::ports::{AIProvider, WebFetcher};

use super::dto::{
    BudgetFromPipelineRequest, CheckBudgetRequest, DistributeBudgetRequest,
    EvaluateProjectRequest, EvaluateQuestionRequest, ExtractPartnerRequest,
    ExtractPartnerResponse, GenerateAnswerRequest, GenerateAnswerResponse,
    PartnerDescriptionRequest, PartnerDescriptionResponse, RunPipelineStepRequest,
    RunPipelineStepResponse, SuggestPartnersRequest, TranslateProjectRequest,
    TranslateProjectResponse, TranslateTextRequest, TranslateTextResponse,
    ValidatePipelineRequest, ValidateProjectRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Dependencies shared by the proposal assistance endpoints.
#[derive(Clone)]
pub struct ProposalAppState {
    pub ai_provider: Arc<dyn AIProvider>,
    pub web_fetcher: Arc<dyn WebFetcher>,
}

impl ProposalAppState {
    pub fn new(ai_provider: Arc<dyn AIProvider>, web_fetcher: Arc<dyn WebFetcher>) -> Self {
        Self {
            ai_provider,
            web_fetcher,
        }
    }

    pub fn translate_project_handler(&self) -> TranslateProjectHandler<dyn AIProvider> {
        TranslateProjectHandler::new(self.ai_provider.clone())
    }

    pub fn translate_text_handler(&self) -> TranslateTextHandler<dyn AIProvider> {
        TranslateTextHandler::new(self.ai_provider.clone())
    }

    pub fn evaluate_question_handler(&self) -> EvaluateQuestionHandler<dyn AIProvider> {
        EvaluateQuestionHandler::new(self.ai_provider.clone())
    }

    pub fn evaluate_project_handler(&self) -> EvaluateProjectHandler<dyn AIProvider> {
        EvaluateProjectHandler::new(self.ai_provider.clone())
    }

    pub fn extract_partner_handler(&self) -> ExtractPartnerHandler<dyn AIProvider> {
        ExtractPartnerHandler::new(self.web_fetcher.clone(), self.ai_provider.clone())
    }

    pub fn suggest_partners_handler(&self) -> SuggestPartnersHandler<dyn AIProvider> {
        SuggestPartnersHandler::new(self.ai_provider.clone())
    }

    pub fn partner_description_handler(&self) -> GeneratePartnerDescriptionHandler<dyn AIProvider> {
        GeneratePartnerDescriptionHandler::new(self.ai_provider.clone())
    }

    pub fn generate_answer_handler(&self) -> GenerateAnswerHandler<dyn AIProvider> {
        GenerateAnswerHandler::new(self.ai_provider.clone())
    }

    pub fn run_pipeline_step_handler(&self) -> RunPipelineStepHandler<dyn AIProvider> {
        RunPipelineStepHandler::new(self.ai_provider.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/translate
pub async fn translate_text(
    State(state): State<ProposalAppState>,
    ApiKeyOverride(api_key): ApiKeyOverride,
    Json(request): Json<TranslateTextRequest>,
) -> Result<impl IntoResponse, ProposalApiError> {
    let translated_text = state
        .translate_text_handler()
        .handle(TranslateTextCommand {
            text: request.text,
            target_language: request.target_language,
            context: request.context,
            api_key,
        })
        .await?;
    Ok(Json(TranslateTextResponse { translated_text }))
}

/// POST /api/projects/translate
///
/// A failed translation returns no project, only the failure message.
pub async fn translate_project(
    State(state): State<ProposalAppState>,
    ApiKeyOverride(api_key): ApiKeyOverride,
    Json(request): Json<TranslateProjectRequest>,
) -> Result<axum::response::Response, ProposalApiError> {
    let result = state
        .translate_project_handler()
        .handle(TranslateProjectCommand {
            project: request.project,
            api_key,
        })
        .await?;

    Ok(match result {
        TranslateProjectResult::Translated(project) => {
            Json(TranslateProjectResponse { project }).into_response()
        }
        TranslateProjectResult::Failed { message } => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new("TRANSLATION_FAILED", message)),
        )
            .into_response(),
    })
}

/// POST /api/evaluate-question
pub async fn evaluate_question(
    State(state): State<ProposalAppState>,
    ApiKeyOverride(api_key): ApiKeyOverride,
    Json(request): Json<EvaluateQuestionRequest>,
) -> Result<impl IntoResponse, ProposalApiError> {
    let evaluation = state
        .evaluate_question_handler()
        .handle(EvaluateQuestionCommand {
            question: request.question,
            answer: request.answer,
            context: QuestionContext {
                project_title: request.project_title,
                sector: request.sector,
            },
            language: request.language,
            api_key,
        })
        .await?;
    Ok(Json(evaluation))
}

/// POST /api/evaluate-project
pub async fn evaluate_project(
    State(state): State<ProposalAppState>,
    ApiKeyOverride(api_key): ApiKeyOverride,
    Json(request): Json<EvaluateProjectRequest>,
) -> Result<impl IntoResponse, ProposalApiError> {
    let evaluation = state
        .evaluate_project_handler()
        .handle(EvaluateProjectCommand {
            state: request.state,
            language: request.language,
            api_key,
        })
        .await?;
    Ok(Json(evaluation))
}

/// POST /api/validate
pub async fn validate_pipeline(Json(request): Json<ValidatePipelineRequest>) -> impl IntoResponse {
    Json(ValidateHandler::new().pipeline(ValidatePipelineQuery {
        state: request.state,
    }))
}

/// POST /api/validate-project
pub async fn validate_project(Json(request): Json<ValidateProjectRequest>) -> impl IntoResponse {
    Json(ValidateHandler::new().project(ValidateProjectQuery {
        project: request.project,
    }))
}

/// POST /api/extract-partner
pub async fn extract_partner(
    State(state): State<ProposalAppState>,
    ApiKeyOverride(api_key): ApiKeyOverride,
    Json(request): Json<ExtractPartnerRequest>,
) -> Result<impl IntoResponse, ProposalApiError> {
    let result = state
        .extract_partner_handler()
        .handle(ExtractPartnerCommand {
            url: request.url,
            language: request.language,
            api_key,
        })
        .await?;
    Ok(Json(ExtractPartnerResponse::from(result)))
}

/// POST /api/suggest-partners
pub async fn suggest_partners(
    State(state): State<ProposalAppState>,
    ApiKeyOverride(api_key): ApiKeyOverride,
    Json(request): Json<SuggestPartnersRequest>,
) -> Result<impl IntoResponse, ProposalApiError> {
    let suggestions = state
        .suggest_partners_handler()
        .handle(SuggestPartnersCommand {
            candidates: request.partners,
            brief: request.project_idea,
            language: request.language,
            api_key,
        })
        .await?;
    Ok(Json(suggestions))
}

/// POST /api/generate-partner-description
pub async fn generate_partner_description(
    State(state): State<ProposalAppState>,
    ApiKeyOverride(api_key): ApiKeyOverride,
    Json(request): Json<PartnerDescriptionRequest>,
) -> Result<impl IntoResponse, ProposalApiError> {
    let result = state
        .partner_description_handler()
        .handle(GeneratePartnerDescriptionCommand {
            partner: request.partner,
            brief: request.project_context,
            additional_info: request.additional_info,
            mode: request.mode,
            existing_description: request.existing_description,
            correction_instruction: request.correction_instruction,
            language: request.language,
            api_key,
        })
        .await?;
    Ok(Json(PartnerDescriptionResponse::from(result)))
}

/// POST /api/pipeline/generate-answer
pub async fn generate_answer(
    State(state): State<ProposalAppState>,
    ApiKeyOverride(api_key): ApiKeyOverride,
    Json(request): Json<GenerateAnswerRequest>,
) -> Result<impl IntoResponse, ProposalApiError> {
    let result = state
        .generate_answer_handler()
        .handle(GenerateAnswerCommand {
            state: request.state,
            question_id: request.question_id,
            partner_id: request.partner_id,
            instruction: request.instruction,
            language: request.language,
            api_key,
        })
        .await?;
    Ok(Json(GenerateAnswerResponse::from(result)))
}

/// POST /api/pipeline/run-step
///
/// Answers that failed are listed in the body; the status stays 200 so the
/// written ones reach the client.
pub async fn run_pipeline_step(
    State(state): State<ProposalAppState>,
    ApiKeyOverride(api_key): ApiKeyOverride,
    Json(request): Json<RunPipelineStepRequest>,
) -> Result<impl IntoResponse, ProposalApiError> {
    let result = state
        .run_pipeline_step_handler()
        .handle(RunPipelineStepCommand {
            state: request.state,
            chapter_id: request.chapter_id,
            scope: request.scope,
            language: request.language,
            api_key,
        })
        .await?;
    Ok(Json(RunPipelineStepResponse::from(result)))
}

/// POST /api/budget/from-pipeline
pub async fn budget_from_pipeline(Json(request): Json<BudgetFromPipelineRequest>) -> impl IntoResponse {
    Json(BudgetHandler::new().from_pipeline(&request.state))
}

/// POST /api/budget/distribute
pub async fn distribute_budget(Json(request): Json<DistributeBudgetRequest>) -> impl IntoResponse {
    Json(BudgetHandler::new().distribute(DistributeBudgetCommand {
        plan: request.plan,
        mode: request.mode,
        suggest_percentages: request.suggest_percentages,
    }))
}

/// POST /api/budget/check
pub async fn check_budget(Json(request): Json<CheckBudgetRequest>) -> impl IntoResponse {
    Json(BudgetHandler::new().check(request.plan))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper for proposal assistance errors.
#[derive(Debug)]
pub struct ProposalApiError(ProposalAssistError);

impl From<ProposalAssistError> for ProposalApiError {
    fn from(err: ProposalAssistError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ProposalApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self.0 {
            ProposalAssistError::InvalidInput(err) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("VALIDATION_FAILED", err.to_string()),
            ),
            ProposalAssistError::Model(err) => {
                let (status, code, message) = ai_error_parts(err);
                (status, ErrorResponse::new(code, message))
            }
            ProposalAssistError::Parse(err) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse::with_details(
                    "UNPARSABLE_RESPONSE",
                    "The model response could not be read. Please try again.",
                    serde_json::json!({ "reason": err.reason }),
                ),
            ),
        };
        (status, Json(body)).into_response()
    }
}
