//! Validation queries. Pure rule evaluation, no model involved.

use crate::domain::pipeline::PipelineState;
use crate::domain::proposal::{validate_project_entity, Project};
use crate::domain::validation::{evaluate, summarize, ValidationSummary};

/// Query to check a proposal-writing session.
#[derive(Debug, Clone)]
pub struct ValidatePipelineQuery {
    pub state: PipelineState,
}

/// Query to check a stored project.
#[derive(Debug, Clone)]
pub struct ValidateProjectQuery {
    pub project: Project,
}

/// Handler for both validation queries.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidateHandler;

impl ValidateHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn pipeline(&self, query: ValidatePipelineQuery) -> ValidationSummary {
        let summary = summarize(evaluate(&query.state));
        tracing::debug!(score = summary.score, errors = summary.errors, "Pipeline validated");
        summary
    }

    pub fn project(&self, query: ValidateProjectQuery) -> ValidationSummary {
        let summary = summarize(validate_project_entity(&query.project));
        tracing::debug!(
            project_id = %query.project.id,
            score = summary.score,
            errors = summary.errors,
            "Project validated"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ActionType, EntityId};
    use crate::domain::validation::TrafficLight;

    #[test]
    fn empty_pipeline_has_errors() {
        let summary = ValidateHandler::new().pipeline(ValidatePipelineQuery {
            state: PipelineState::default(),
        });
        assert!(summary.errors > 0);
        assert_eq!(summary.status, TrafficLight::Red);
    }

    #[test]
    fn bare_project_fails_title_rule() {
        let project = Project::new(EntityId::from("p1"), "X", ActionType::Ka210);
        let summary = ValidateHandler::new().project(ValidateProjectQuery { project });
        assert!(summary
            .results
            .iter()
            .any(|r| r.rule_id == "proj-missing-title"));
    }
}
