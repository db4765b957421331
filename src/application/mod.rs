//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Concept handlers own stored session state; proposal handlers are
//! stateless and take everything they need in the command.

pub mod handlers;

pub use handlers::concept::{
    ConceptSessionError, CreateConceptSessionCommand, CreateConceptSessionHandler,
    DeleteConceptSessionCommand, DeleteConceptSessionHandler, EditConceptSessionCommand,
    EditConceptSessionHandler, ExportProjectCommand, ExportProjectHandler, ExportProjectResult,
    GenerationOperation, GenerationOutcome, GetConceptSessionHandler, GetConceptSessionQuery,
    GetConceptSessionResult, NavigateConceptStepCommand, NavigateConceptStepHandler,
    RunGenerationCommand, RunGenerationHandler, RunGenerationResult,
};
pub use handlers::proposal::{
    AnswerFailure, BudgetHandler, BudgetReport, DescriptionMode, DistributeBudgetCommand, EvaluateProjectCommand, EvaluateProjectHandler,
    EvaluateQuestionCommand, EvaluateQuestionHandler, ExtractPartnerCommand,
    ExtractPartnerHandler, ExtractPartnerResult, GenerateAnswerCommand, GenerateAnswerHandler,
    GenerateAnswerResult, GeneratePartnerDescriptionCommand, GeneratePartnerDescriptionHandler,
    PartnerDescriptionResult, ProposalAssistError, RunPipelineStepCommand,
    RunPipelineStepHandler, RunPipelineStepResult, StepOutcome, SuggestPartnersCommand,
    SuggestPartnersHandler, TranslateProjectCommand, TranslateProjectHandler,
    TranslateProjectResult, TranslateTextCommand, TranslateTextHandler, ValidateHandler,
    ValidatePipelineQuery, ValidateProjectQuery,
};
