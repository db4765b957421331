//! Compliance rules over a pipeline session.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::{word_count, Rule, Severity, ValidationCategory, ValidationResult};
use crate::domain::foundation::ActionType;
use crate::domain::pipeline::PipelineState;

const PROBLEM_STATEMENT_KEY: &str = "problem_definition";
const PROBLEM_MIN_WORDS: usize = 100;
const PROBLEM_MAX_WORDS: usize = 500;

/// Countries a consortium should not be drawn from exclusively.
const WESTERN_EU: &[&str] = &["DE", "FR", "NL", "BE", "AT", "LU"];

const PLACEHOLDERS: &[&str] = &["...", "[Platzhalter]", "[TODO]", "INSERT", "TBD"];

static STATISTIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+%|\d+\.\d+|[0-9]{4}").expect("statistic regex"));

static PARTICIPANT_COUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+\s*(participants|teilnehmer|users|nutzer)").expect("participant regex")
});

pub const PIPELINE_RULES: &[Rule<PipelineState>] = &[
    Rule {
        id: "missing-title",
        category: ValidationCategory::Eligibility,
        severity: Severity::Error,
        message: "Project title is missing.",
        criterion: Some("Eligibility 1.1"),
        action_types: None,
        check: has_title,
    },
    Rule {
        id: "missing-acronym",
        category: ValidationCategory::Eligibility,
        severity: Severity::Error,
        message: "Project acronym is missing.",
        criterion: Some("Eligibility 1.2"),
        action_types: None,
        check: has_acronym,
    },
    Rule {
        id: "min-partners-ka220",
        category: ValidationCategory::Consortium,
        severity: Severity::Error,
        message: "KA220 requires minimum 3 partners from 3 different countries.",
        criterion: Some("Eligibility 2.1 (KA220)"),
        action_types: None,
        check: |s| s.action_type() == ActionType::Ka210 || s.consortium.len() >= 3,
    },
    Rule {
        id: "min-partners-ka210",
        category: ValidationCategory::Consortium,
        severity: Severity::Error,
        message: "KA210 requires minimum 2 partners from 2 different countries.",
        criterion: Some("Eligibility 2.1 (KA210)"),
        action_types: None,
        check: |s| s.action_type() == ActionType::Ka220 || s.consortium.len() >= 2,
    },
    Rule {
        id: "min-countries",
        category: ValidationCategory::Consortium,
        severity: Severity::Error,
        message: "Partners must be from different eligible countries.",
        criterion: Some("Eligibility 2.2"),
        action_types: None,
        check: has_enough_countries,
    },
    Rule {
        id: "missing-coordinator",
        category: ValidationCategory::Consortium,
        severity: Severity::Error,
        message: "No coordinator defined.",
        criterion: Some("Eligibility 2.3"),
        action_types: None,
        check: |s| s.consortium.iter().any(|p| p.is_lead),
    },
    Rule {
        id: "balanced-consortium",
        category: ValidationCategory::Consortium,
        severity: Severity::Warning,
        message: "Consortium should have balanced geographical representation.",
        criterion: Some("Quality 3.1"),
        action_types: None,
        check: is_geographically_balanced,
    },
    Rule {
        id: "diverse-org-types",
        category: ValidationCategory::Consortium,
        severity: Severity::Info,
        message: "Consider including different organization types for complementary expertise.",
        criterion: Some("Quality 3.2"),
        action_types: None,
        check: |s| {
            s.consortium
                .iter()
                .map(|p| p.organization_type.as_str())
                .collect::<HashSet<_>>()
                .len()
                >= 2
        },
    },
    Rule {
        id: "min-work-packages",
        category: ValidationCategory::Workplan,
        severity: Severity::Error,
        message: "At least one Work Package must be defined.",
        criterion: Some("Quality 4.1"),
        action_types: None,
        check: |s| !s.work_packages.is_empty() || s.answers.keys().any(|k| k.contains("wp_")),
    },
    Rule {
        id: "wp-management",
        category: ValidationCategory::Workplan,
        severity: Severity::Warning,
        message: "Consider including a dedicated Project Management Work Package.",
        criterion: Some("Quality 4.2"),
        action_types: None,
        check: has_management_wp,
    },
    Rule {
        id: "short-problem-statement",
        category: ValidationCategory::Content,
        severity: Severity::Warning,
        message: "Problem statement should be at least 100 words.",
        criterion: Some("Quality 1.1"),
        action_types: None,
        check: |s| problem_statement(s).map_or(true, |t| word_count(&t) >= PROBLEM_MIN_WORDS),
    },
    Rule {
        id: "too-long-problem-statement",
        category: ValidationCategory::Content,
        severity: Severity::Info,
        message: "Problem statement exceeds recommended 500 words.",
        criterion: Some("Quality 1.1"),
        action_types: None,
        check: |s| problem_statement(s).map_or(true, |t| word_count(&t) <= PROBLEM_MAX_WORDS),
    },
    Rule {
        id: "missing-statistics",
        category: ValidationCategory::Content,
        severity: Severity::Warning,
        message: "Problem statement should include statistical evidence.",
        criterion: Some("Quality 1.2"),
        action_types: None,
        check: |s| problem_statement(s).map_or(true, |t| STATISTIC.is_match(&t)),
    },
    Rule {
        id: "ai-placeholders",
        category: ValidationCategory::Content,
        severity: Severity::Warning,
        message: "Content contains placeholder text.",
        criterion: Some("Formal"),
        action_types: None,
        check: |s| {
            !s.answers
                .values()
                .map(|a| a.text())
                .any(|t| PLACEHOLDERS.iter().any(|p| t.contains(p)))
        },
    },
    Rule {
        id: "missing-horizontal-priorities",
        category: ValidationCategory::Content,
        severity: Severity::Warning,
        message: "Project should address at least one EU horizontal priority.",
        criterion: Some("Quality 1.3"),
        action_types: None,
        check: |s| {
            mentions_any(
                s,
                &[
                    "digital",
                    "green",
                    "nachhaltig",
                    "sustainable",
                    "inclusion",
                    "inklusion",
                    "participat",
                ],
            )
        },
    },
    Rule {
        id: "missing-indicators",
        category: ValidationCategory::Impact,
        severity: Severity::Warning,
        message: "Project should define measurable indicators.",
        criterion: Some("Quality 5.1"),
        action_types: None,
        check: |s| {
            mentions_any(s, &["indicator", "indikator", "kpi", "measure"])
                || PARTICIPANT_COUNT.is_match(&s.all_answer_text())
        },
    },
    Rule {
        id: "missing-sustainability",
        category: ValidationCategory::Impact,
        severity: Severity::Warning,
        message: "Sustainability plan should be addressed.",
        criterion: Some("Quality 5.2"),
        action_types: None,
        check: |s| mentions_any(s, &["sustain", "nachhaltig", "long-term", "langfrist"]),
    },
    Rule {
        id: "budget-zero",
        category: ValidationCategory::Budget,
        severity: Severity::Warning,
        message: "Total budget is not defined.",
        criterion: Some("Eligibility 3.1"),
        action_types: None,
        check: |s| s.configuration.total_budget > 0,
    },
    Rule {
        id: "budget-tier-mismatch",
        category: ValidationCategory::Budget,
        severity: Severity::Error,
        message: "Budget does not match eligible tiers for the action type.",
        criterion: Some("Eligibility 3.2"),
        action_types: None,
        check: |s| {
            let budget = s.configuration.total_budget;
            budget == 0 || s.action_type().is_valid_budget(budget)
        },
    },
];

/// Runs every pipeline rule and returns the failures, in rule order.
pub fn evaluate(state: &PipelineState) -> Vec<ValidationResult> {
    PIPELINE_RULES
        .iter()
        .filter(|rule| rule.applies_to(state.action_type()))
        .filter_map(|rule| rule.run(state))
        .collect()
}

fn has_title(s: &PipelineState) -> bool {
    s.project_title
        .as_deref()
        .map_or(false, |t| t.chars().count() > 5)
}

fn has_acronym(s: &PipelineState) -> bool {
    s.acronym
        .as_deref()
        .map_or(false, |a| (2..=15).contains(&a.chars().count()))
}

fn has_enough_countries(s: &PipelineState) -> bool {
    let countries: HashSet<&str> = s.consortium.iter().map(|p| p.country.as_str()).collect();
    countries.len() >= s.action_type().min_countries()
}

/// At least one partner comes from outside the western core.
/// An empty consortium is not balanced.
fn is_geographically_balanced(s: &PipelineState) -> bool {
    s.consortium
        .iter()
        .any(|p| !WESTERN_EU.contains(&p.country.as_str()))
}

fn has_management_wp(s: &PipelineState) -> bool {
    s.answers
        .iter()
        .filter(|(k, _)| k.contains("wp_") && k.contains("title"))
        .any(|(_, a)| {
            let text = a.text().to_lowercase();
            text.contains("management") || text.contains("koordination")
        })
}

fn problem_statement(s: &PipelineState) -> Option<String> {
    s.answer_text(PROBLEM_STATEMENT_KEY)
        .filter(|t| !t.trim().is_empty())
}

fn mentions_any(s: &PipelineState, needles: &[&str]) -> bool {
    let text = s.all_answer_text().to_lowercase();
    needles.iter().any(|n| text.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pipeline::{Answer, ConsortiumPartner};

    fn partner(id: &str, country: &str, kind: &str, lead: bool) -> ConsortiumPartner {
        ConsortiumPartner {
            id: id.into(),
            name: id.into(),
            country: country.into(),
            organization_type: kind.into(),
            expertise: vec![],
            is_lead: lead,
            role: None,
        }
    }

    fn ids(results: &[ValidationResult]) -> Vec<&str> {
        results.iter().map(|r| r.rule_id.as_str()).collect()
    }

    fn complete_state() -> PipelineState {
        let mut state = PipelineState::default();
        state.project_title = Some("Digital Bridges for Adults".into());
        state.acronym = Some("DIBRA".into());
        state.configuration.total_budget = 250_000;
        state.consortium = vec![
            partner("a", "DE", "NGO", true),
            partner("b", "RO", "SCHOOL", false),
            partner("c", "HR", "NGO", false),
        ];
        let problem = format!(
            "In 2023 only 54% of adults had basic digital skills. {}",
            "word ".repeat(120)
        );
        state.set_answer("problem_definition", Answer::from(problem));
        state.set_answer("wp_1_title", Answer::from("Project Management"));
        state.set_answer(
            "assessment",
            Answer::from("We measure 200 participants and ensure long-term sustainability."),
        );
        state
    }

    #[test]
    fn complete_state_passes_every_rule() {
        let results = evaluate(&complete_state());
        assert!(results.is_empty(), "unexpected failures: {:?}", ids(&results));
    }

    #[test]
    fn empty_state_fails_core_eligibility() {
        let results = evaluate(&PipelineState::default());
        let failed = ids(&results);
        for id in [
            "missing-title",
            "missing-acronym",
            "min-partners-ka220",
            "min-countries",
            "missing-coordinator",
            "balanced-consortium",
            "min-work-packages",
            "budget-zero",
        ] {
            assert!(failed.contains(&id), "{} should fail", id);
        }
        assert!(!failed.contains(&"min-partners-ka210"));
        assert!(!failed.contains(&"short-problem-statement"));
        assert!(!failed.contains(&"budget-tier-mismatch"));
    }

    #[test]
    fn ka210_uses_its_own_partner_minimum() {
        let mut state = complete_state();
        state.configuration.action_type = ActionType::Ka210;
        state.configuration.total_budget = 60_000;
        state.consortium.truncate(1);
        let failed = evaluate(&state);
        let failed = ids(&failed);
        assert!(failed.contains(&"min-partners-ka210"));
        assert!(!failed.contains(&"min-partners-ka220"));
    }

    #[test]
    fn western_only_consortium_is_unbalanced() {
        let mut state = complete_state();
        state.consortium = vec![
            partner("a", "DE", "NGO", true),
            partner("b", "FR", "SME", false),
            partner("c", "NL", "NGO", false),
        ];
        assert!(ids(&evaluate(&state)).contains(&"balanced-consortium"));
    }

    #[test]
    fn placeholder_text_is_flagged() {
        let mut state = complete_state();
        state.set_answer("motivation", Answer::from("Budget TBD"));
        assert!(ids(&evaluate(&state)).contains(&"ai-placeholders"));
    }

    #[test]
    fn short_problem_without_numbers() {
        let mut state = complete_state();
        state.set_answer("problem_definition", Answer::from("Adults lack skills."));
        let results = evaluate(&state);
        let failed = ids(&results);
        assert!(failed.contains(&"short-problem-statement"));
        assert!(failed.contains(&"missing-statistics"));
    }

    #[test]
    fn budget_off_tier_is_an_error() {
        let mut state = complete_state();
        state.configuration.total_budget = 100_000;
        let results = evaluate(&state);
        let mismatch = results
            .iter()
            .find(|r| r.rule_id == "budget-tier-mismatch")
            .unwrap();
        assert_eq!(mismatch.severity, Severity::Error);
    }

    #[test]
    fn participant_counts_count_as_indicators() {
        let mut state = complete_state();
        state.answers.clear();
        state.work_packages.clear();
        state.set_answer("wp_2_title", Answer::from("Koordination"));
        state.set_answer("results", Answer::from("Reaching 40 Nutzer in sustainable ways"));
        assert!(!ids(&evaluate(&state)).contains(&"missing-indicators"));
    }
}
