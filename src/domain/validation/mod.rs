//! Validation module - Declarative compliance checks.
//!
//! Rules are plain data: an id, a category, a severity, a message and a
//! predicate. Evaluation is a pure function over a state snapshot.

mod rules;
mod summary;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ActionType;

pub use rules::{evaluate, PIPELINE_RULES};
pub use summary::{summarize, traffic_light, TrafficLight, ValidationSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Area of the application a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationCategory {
    Eligibility,
    Consortium,
    Content,
    Workplan,
    Impact,
    Budget,
    Formal,
}

impl ValidationCategory {
    pub fn all() -> &'static [ValidationCategory] {
        &[
            ValidationCategory::Eligibility,
            ValidationCategory::Consortium,
            ValidationCategory::Content,
            ValidationCategory::Workplan,
            ValidationCategory::Impact,
            ValidationCategory::Budget,
            ValidationCategory::Formal,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValidationCategory::Eligibility => "Eligibility",
            ValidationCategory::Consortium => "Consortium",
            ValidationCategory::Content => "Content Quality",
            ValidationCategory::Workplan => "Work Plan",
            ValidationCategory::Impact => "Impact & Sustainability",
            ValidationCategory::Budget => "Budget",
            ValidationCategory::Formal => "Formal Requirements",
        }
    }
}

impl fmt::Display for ValidationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub rule_id: String,
    pub category: ValidationCategory,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criterion: Option<String>,
}

/// One compliance check over a state of type `S`.
pub struct Rule<S> {
    pub id: &'static str,
    pub category: ValidationCategory,
    pub severity: Severity,
    pub message: &'static str,
    /// Programme guide reference.
    pub criterion: Option<&'static str>,
    /// Restricts the rule to these action types. `None` means all.
    pub action_types: Option<&'static [ActionType]>,
    /// Returns true when the state passes.
    pub check: fn(&S) -> bool,
}

impl<S> Rule<S> {
    pub fn applies_to(&self, action_type: ActionType) -> bool {
        self.action_types
            .map_or(true, |types| types.contains(&action_type))
    }

    /// Runs the check, yielding a result only on failure.
    pub fn run(&self, state: &S) -> Option<ValidationResult> {
        if (self.check)(state) {
            return None;
        }
        Some(ValidationResult {
            rule_id: self.id.to_string(),
            category: self.category,
            severity: self.severity,
            message: self.message.to_string(),
            criterion: self.criterion.map(str::to_string),
        })
    }
}

/// Whitespace-separated word count.
pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
