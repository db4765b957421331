//! Pipeline module - Proposal-writing session state.
//!
//! Holds the answers to the official application form, the form structure
//! itself, the answer slots a generation step fills, and the document
//! assembly used by evaluation.

mod answer;
mod document;
mod generation;
mod state;
mod structure;

pub use answer::{Answer, AnswerMode};
pub use document::{assemble_document, NOT_ANSWERED};
pub use generation::{
    ai_answer, clean_generated_answer, is_manual, known_answer, question_target, step_targets,
    AnswerTarget, StepScope,
};
pub use state::{
    partner_answer_key, ConsortiumPartner, PipelineConfiguration, PipelineState, ProjectIdea,
    DEFAULT_DURATION_MONTHS, DEFAULT_TOTAL_BUDGET, DEFAULT_WP_COUNT,
};
pub use structure::{Chapter, ProposalStructure, Question, QuestionKind, Section};
