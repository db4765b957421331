//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, programme enums, the step state machine and the
//! error types used across the proposal drafting domain.

mod action_type;
mod concept_step;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use action_type::{ActionType, Sector};
pub use concept_step::ConceptStep;
pub use errors::ValidationError;
pub use ids::{EntityId, SessionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
