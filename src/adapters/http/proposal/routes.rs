//! Axum router configuration for proposal assistance endpoints.

use axum::{routing::post, Router};

use super::handlers::{
    budget_from_pipeline, check_budget, distribute_budget, evaluate_project, evaluate_question,
    extract_partner, generate_answer, generate_partner_description, run_pipeline_step,
    suggest_partners, translate_project, translate_text, validate_pipeline, validate_project,
    ProposalAppState,
};

/// Create the proposal assistance router, mounted at `/api`.
pub fn proposal_routes() -> Router<ProposalAppState> {
    Router::new()
        .route("/translate", post(translate_text))
        .route("/projects/translate", post(translate_project))
        .route("/evaluate-question", post(evaluate_question))
        .route("/evaluate-project", post(evaluate_project))
        .route("/validate", post(validate_pipeline))
        .route("/validate-project", post(validate_project))
        .route("/extract-partner", post(extract_partner))
        .route("/suggest-partners", post(suggest_partners))
        .route("/generate-partner-description", post(generate_partner_description))
        .route("/pipeline/generate-answer", post(generate_answer))
        .route("/pipeline/run-step", post(run_pipeline_step))
        .route("/budget/from-pipeline", post(budget_from_pipeline))
        .route("/budget/distribute", post(distribute_budget))
        .route("/budget/check", post(check_budget))
}
