//! HTTP adapter for proposal assistance endpoints.
//!
//! - `POST /api/translate` - Translate a passage
//! - `POST /api/projects/translate` - Translate a project, merged back by id
//! - `POST /api/evaluate-question` - Reviewer feedback on one answer
//! - `POST /api/evaluate-project` - Score a whole proposal
//! - `POST /api/validate` - Compliance rules over a writing session
//! - `POST /api/validate-project` - Compliance rules over a project
//! - `POST /api/extract-partner` - Partner profile from a website
//! - `POST /api/suggest-partners` - Pick partners from a library for an idea
//! - `POST /api/generate-partner-description` - Write or correct a partner description
//! - `POST /api/pipeline/generate-answer` - Write one answer of the form
//! - `POST /api/pipeline/run-step` - Write every answer of one form chapter
//! - `POST /api/budget/from-pipeline` - Budget table from a writing session
//! - `POST /api/budget/distribute` - Fill the budget table from the lump sum
//! - `POST /api/budget/check` - Totals and budget rule findings

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{ProposalApiError, ProposalAppState};
pub use routes::proposal_routes;
