//! Proposal Assistance Handlers
//!
//! Stateless model-backed helpers used while writing a proposal.
//!
//! ## Commands
//! - `TranslateProject` - Translate a stored project, merged back by id
//! - `TranslateText` - Translate one passage
//! - `EvaluateQuestion` - Reviewer feedback on one answer
//! - `EvaluateProject` - Score a whole proposal
//! - `ExtractPartner` - Partner profile from a website
//! - `SuggestPartners` - Pick partners for an idea from a known list
//! - `GeneratePartnerDescription` - Write or correct a partner description
//! - `GenerateAnswer` - Write one answer of the application form
//! - `RunPipelineStep` - Write every answer of one form chapter
//!
//! ## Queries
//! - `ValidatePipeline` / `ValidateProject` - Compliance rules, no model call
//! - `Budget` - Lump-sum table import, distribution and checks, no model call

mod budget;
mod error;
mod evaluate_project;
mod evaluate_question;
mod extract_partner;
mod generate_answer;
mod generate_partner_description;
mod run_pipeline_step;
mod suggest_partners;
mod translate_project;
mod translate_text;
mod validate;

pub use budget::{BudgetHandler, BudgetReport, DistributeBudgetCommand};
pub use error::ProposalAssistError;
pub use evaluate_project::{EvaluateProjectCommand, EvaluateProjectHandler};
pub use evaluate_question::{EvaluateQuestionCommand, EvaluateQuestionHandler};
pub use extract_partner::{ExtractPartnerCommand, ExtractPartnerHandler, ExtractPartnerResult};
pub use generate_answer::{GenerateAnswerCommand, GenerateAnswerHandler, GenerateAnswerResult};
pub use generate_partner_description::{
    DescriptionMode, GeneratePartnerDescriptionCommand, GeneratePartnerDescriptionHandler,
    PartnerDescriptionResult,
};
pub use run_pipeline_step::{
    AnswerFailure, RunPipelineStepCommand, RunPipelineStepHandler, RunPipelineStepResult,
    StepOutcome,
};
pub use suggest_partners::{SuggestPartnersCommand, SuggestPartnersHandler};
pub use translate_project::{
    TranslateProjectCommand, TranslateProjectHandler, TranslateProjectResult,
};
pub use translate_text::{TranslateTextCommand, TranslateTextHandler};
pub use validate::{ValidateHandler, ValidatePipelineQuery, ValidateProjectQuery};
