//! HTTP adapter for concept development sessions.
//!
//! Exposes the six-step concept workflow via REST API:
//! - `POST /api/concepts` - Start a session
//! - `GET /api/concepts/:session_id` - Read a session
//! - `PUT /api/concepts/:session_id` - Apply a user edit
//! - `DELETE /api/concepts/:session_id` - Discard a session
//! - `POST /api/concepts/:session_id/navigate` - Move to another step
//! - `POST /api/concepts/:session_id/generate` - Run a model-backed step
//! - `POST /api/concepts/:session_id/export` - Export as a draft project

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{ConceptApiError, ConceptAppState};
pub use routes::concept_routes;
