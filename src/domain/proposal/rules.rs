//! Compliance rules over a stored project.

use super::project::{ObjectiveType, PartnerRole, Project};
use crate::domain::foundation::ActionType;
use crate::domain::validation::{Rule, Severity, ValidationCategory, ValidationResult};

const MIN_PROBLEM_WORDS: usize = 50;
const MIN_SPECIFIC_OBJECTIVES: usize = 3;

pub const PROJECT_RULES: &[Rule<Project>] = &[
    Rule {
        id: "proj-missing-title",
        category: ValidationCategory::Eligibility,
        severity: Severity::Error,
        message: "Project title is required",
        criterion: None,
        action_types: None,
        check: |p| p.title.chars().count() > 5,
    },
    Rule {
        id: "proj-missing-acronym",
        category: ValidationCategory::Eligibility,
        severity: Severity::Error,
        message: "Project acronym is required (2-15 characters)",
        criterion: None,
        action_types: None,
        check: |p| (2..=15).contains(&p.acronym.chars().count()),
    },
    Rule {
        id: "proj-min-partners",
        category: ValidationCategory::Consortium,
        severity: Severity::Error,
        message: "Minimum partner requirement not met",
        criterion: Some("Eligibility"),
        action_types: None,
        check: |p| p.consortium.len() >= p.action_type.min_partners(),
    },
    Rule {
        id: "proj-has-coordinator",
        category: ValidationCategory::Consortium,
        severity: Severity::Error,
        message: "Project must have a coordinator",
        criterion: None,
        action_types: None,
        check: |p| p.consortium.iter().any(|m| m.role == PartnerRole::Coordinator),
    },
    Rule {
        id: "proj-problem-statement",
        category: ValidationCategory::Content,
        severity: Severity::Warning,
        message: "Problem statement is too short",
        criterion: None,
        action_types: None,
        check: |p| {
            p.problem_statement.trim().is_empty()
                || crate::domain::validation::word_count(&p.problem_statement) >= MIN_PROBLEM_WORDS
        },
    },
    Rule {
        id: "proj-has-objectives",
        category: ValidationCategory::Content,
        severity: Severity::Warning,
        message: "Project should have defined objectives",
        criterion: None,
        action_types: None,
        check: |p| !p.objectives.is_empty(),
    },
    Rule {
        id: "proj-has-general-objective",
        category: ValidationCategory::Content,
        severity: Severity::Warning,
        message: "Project should have at least one general objective",
        criterion: None,
        action_types: None,
        check: |p| p.objectives.iter().any(|o| o.kind == ObjectiveType::General),
    },
    Rule {
        id: "proj-has-specific-objectives",
        category: ValidationCategory::Content,
        severity: Severity::Info,
        message: "Consider adding specific objectives (recommended: 3-5)",
        criterion: None,
        action_types: None,
        check: |p| {
            p.objectives
                .iter()
                .filter(|o| o.kind == ObjectiveType::Specific)
                .count()
                >= MIN_SPECIFIC_OBJECTIVES
        },
    },
    Rule {
        id: "proj-has-work-packages",
        category: ValidationCategory::Workplan,
        severity: Severity::Warning,
        message: "Project should have work packages",
        criterion: None,
        action_types: None,
        check: |p| !p.work_packages.is_empty(),
    },
    Rule {
        id: "proj-wp-duration",
        category: ValidationCategory::Workplan,
        severity: Severity::Warning,
        message: "Work packages should cover the full project duration",
        criterion: None,
        action_types: None,
        check: |p| {
            p.work_packages
                .iter()
                .map(|wp| wp.end_month)
                .max()
                .map_or(true, |end| end + 1 >= p.duration)
        },
    },
    Rule {
        id: "proj-has-results",
        category: ValidationCategory::Workplan,
        severity: Severity::Warning,
        message: "Project should have defined results/outputs",
        criterion: None,
        action_types: None,
        check: |p| !p.results.is_empty(),
    },
    Rule {
        id: "proj-has-indicators",
        category: ValidationCategory::Impact,
        severity: Severity::Warning,
        message: "Project should have measurable indicators",
        criterion: None,
        action_types: None,
        check: |p| !p.indicators.is_empty(),
    },
    Rule {
        id: "proj-has-multiplier-events",
        category: ValidationCategory::Impact,
        severity: Severity::Info,
        message: "Consider adding multiplier events for dissemination",
        criterion: None,
        action_types: Some(&[ActionType::Ka220]),
        check: |p| !p.multiplier_events.is_empty(),
    },
    Rule {
        id: "proj-budget-valid",
        category: ValidationCategory::Budget,
        severity: Severity::Error,
        message: "Budget must match eligible tiers",
        criterion: None,
        action_types: None,
        check: |p| p.action_type.is_valid_budget(p.budget_tier),
    },
    Rule {
        id: "proj-budget-distribution",
        category: ValidationCategory::Budget,
        severity: Severity::Warning,
        message: "Budget should be distributed among partners",
        criterion: None,
        action_types: None,
        check: |p| p.consortium.iter().map(|m| m.budget_share).sum::<f64>() > 0.0,
    },
];

/// Runs every applicable project rule and returns the failures.
pub fn validate_project_entity(project: &Project) -> Vec<ValidationResult> {
    PROJECT_RULES
        .iter()
        .filter(|rule| rule.applies_to(project.action_type))
        .filter_map(|rule| rule.run(project))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::EntityId;
    use crate::domain::proposal::project::{
        ConsortiumMember, Indicator, IndicatorType, MultiplierEvent, Objective, ProjectResult,
        WorkPackage,
    };

    fn member(id: &str, role: PartnerRole, share: f64) -> ConsortiumMember {
        ConsortiumMember {
            id: EntityId::from(format!("cm_{}", id)),
            partner_id: id.into(),
            role,
            budget_share: share,
            justification: None,
            work_package_leadership: vec![],
        }
    }

    fn objective(id: &str, kind: ObjectiveType) -> Objective {
        Objective {
            id: EntityId::from(id),
            code: id.to_uppercase(),
            kind,
            description: "Improve skills".into(),
            indicators: vec![],
            sources: vec![],
        }
    }

    fn wp(number: u32, end_month: u32) -> WorkPackage {
        WorkPackage {
            id: EntityId::from(format!("wp_{}", number)),
            number,
            title: format!("WP{}", number),
            kind: None,
            objectives: vec![],
            description: String::new(),
            start_month: 1,
            end_month,
            lead_partner: "a".into(),
            activities: vec![],
            deliverables: vec![],
        }
    }

    fn complete_project() -> Project {
        let mut p = Project::new(EntityId::from("p1"), "Digital Bridges", ActionType::Ka220);
        p.acronym = "DIBRA".into();
        p.budget_tier = 250_000;
        p.consortium = vec![
            member("a", PartnerRole::Coordinator, 40.0),
            member("b", PartnerRole::Partner, 30.0),
            member("c", PartnerRole::Partner, 30.0),
        ];
        p.objectives = vec![
            objective("go1", ObjectiveType::General),
            objective("so1", ObjectiveType::Specific),
            objective("so2", ObjectiveType::Specific),
            objective("so3", ObjectiveType::Specific),
        ];
        p.work_packages = vec![wp(1, 24), wp(2, 18)];
        p.results = vec![ProjectResult {
            id: EntityId::from("r1"),
            code: "R1".into(),
            title: "Toolkit".into(),
            kind: "TOOL".into(),
            description: String::new(),
            work_package_id: "wp_2".into(),
            languages: vec![],
            target_audience: vec![],
        }];
        p.indicators = vec![Indicator {
            id: EntityId::from("i1"),
            name: "Trained adults".into(),
            kind: IndicatorType::Output,
            target: 200.0,
            unit: "people".into(),
        }];
        p.multiplier_events = vec![MultiplierEvent {
            id: EntityId::from("me1"),
            name: "Final conference".into(),
            month: 23,
            location: "Zagreb".into(),
            country: "HR".into(),
            target_participants: 60,
            host_partner_id: "c".into(),
        }];
        p
    }

    fn ids(project: &Project) -> Vec<String> {
        validate_project_entity(project)
            .into_iter()
            .map(|r| r.rule_id)
            .collect()
    }

    #[test]
    fn complete_project_passes() {
        assert!(ids(&complete_project()).is_empty());
    }

    #[test]
    fn short_work_plan_is_flagged() {
        let mut p = complete_project();
        p.work_packages = vec![wp(1, 12)];
        assert!(ids(&p).contains(&"proj-wp-duration".to_string()));
    }

    #[test]
    fn work_plan_ending_one_month_early_is_accepted() {
        let mut p = complete_project();
        p.work_packages = vec![wp(1, 23)];
        assert!(!ids(&p).contains(&"proj-wp-duration".to_string()));
    }

    #[test]
    fn multiplier_events_only_checked_for_ka220() {
        let mut p = complete_project();
        p.multiplier_events.clear();
        assert!(ids(&p).contains(&"proj-has-multiplier-events".to_string()));

        p.action_type = ActionType::Ka210;
        p.budget_tier = 60_000;
        assert!(!ids(&p).contains(&"proj-has-multiplier-events".to_string()));
    }

    #[test]
    fn projects_without_indicators_get_a_warning() {
        for (action_type, tier) in [(ActionType::Ka220, 250_000), (ActionType::Ka210, 60_000)] {
            let mut p = complete_project();
            p.action_type = action_type;
            p.budget_tier = tier;
            p.indicators.clear();

            let results = validate_project_entity(&p);
            let r = results
                .iter()
                .find(|r| r.rule_id == "proj-has-indicators")
                .unwrap();
            assert_eq!(r.severity, Severity::Warning);
        }
    }

    #[test]
    fn missing_multiplier_events_are_only_informational() {
        let mut p = complete_project();
        p.multiplier_events.clear();
        let results = validate_project_entity(&p);
        let r = results
            .iter()
            .find(|r| r.rule_id == "proj-has-multiplier-events")
            .unwrap();
        assert_eq!(r.severity, Severity::Info);
    }

    #[test]
    fn missing_coordinator_and_budget() {
        let mut p = complete_project();
        p.consortium = vec![member("a", PartnerRole::Partner, 0.0)];
        p.budget_tier = 99_000;
        let failed = ids(&p);
        for id in [
            "proj-min-partners",
            "proj-has-coordinator",
            "proj-budget-valid",
            "proj-budget-distribution",
        ] {
            assert!(failed.contains(&id.to_string()), "{} should fail", id);
        }
    }

    #[test]
    fn short_problem_statement_is_a_warning() {
        let mut p = complete_project();
        p.problem_statement = "Too short.".into();
        let results = validate_project_entity(&p);
        let r = results
            .iter()
            .find(|r| r.rule_id == "proj-problem-statement")
            .unwrap();
        assert_eq!(r.severity, Severity::Warning);
    }
}
