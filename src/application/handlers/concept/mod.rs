//! Concept Session Command and Query Handlers
//!
//! ## Commands
//! - `CreateConceptSession` - Start a session, optionally with step 1 filled in
//! - `EditConceptSession` - Apply one user edit
//! - `NavigateConceptStep` - Move between steps
//! - `RunGeneration` - Run one model-backed step
//! - `ExportProject` - Build a draft project from the session
//! - `DeleteConceptSession` - Discard a session
//!
//! ## Queries
//! - `GetConceptSession` - Read a session

mod create_session;
mod delete_session;
mod edit_session;
mod error;
mod export_project;
mod get_session;
mod navigate_step;
mod run_generation;

pub use create_session::{CreateConceptSessionCommand, CreateConceptSessionHandler};
pub use delete_session::{DeleteConceptSessionCommand, DeleteConceptSessionHandler};
pub use edit_session::{EditConceptSessionCommand, EditConceptSessionHandler};
pub use error::ConceptSessionError;
pub use export_project::{ExportProjectCommand, ExportProjectHandler, ExportProjectResult};
pub use get_session::{GetConceptSessionHandler, GetConceptSessionQuery, GetConceptSessionResult};
pub use navigate_step::{NavigateConceptStepCommand, NavigateConceptStepHandler};
pub use run_generation::{
    GenerationOperation, GenerationOutcome, RunGenerationCommand, RunGenerationHandler,
    RunGenerationResult, MISSING_KEY_MESSAGE, RATE_LIMITED_MESSAGE, TIMED_OUT_MESSAGE,
};
