//! Proposal module - The stored project and operations over it.

mod evaluation;
mod project;
mod rules;
mod translation;

pub use evaluation::{
    CategoryEvaluation, EvaluationCategories, Improvement, ProjectEvaluation, QuestionEvaluation,
};
pub use project::{
    Activity, ConsortiumMember, Deliverable, DeliverableType, DisseminationLevel, Indicator,
    IndicatorType, MultiplierEvent, Objective, ObjectiveType, PartnerRole, Project, ProjectResult,
    ProjectStatus, WorkPackage, WorkPackageType,
};
pub use rules::{validate_project_entity, PROJECT_RULES};
pub use translation::{
    merge_translated, TranslatedItem, TranslatedObjective, TranslatedWorkPackage,
    TranslationPayload, TRANSLATION_FAILED_MESSAGE,
};
