//! ConceptStep enum representing the six stages of concept development.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// The ordered stages a proposal concept moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConceptStep {
    #[default]
    Idea,
    Sources,
    Consortium,
    Objectives,
    WorkPackages,
    Summary,
}

impl ConceptStep {
    /// Returns all steps in canonical order.
    pub fn all() -> &'static [ConceptStep] {
        &[
            ConceptStep::Idea,
            ConceptStep::Sources,
            ConceptStep::Consortium,
            ConceptStep::Objectives,
            ConceptStep::WorkPackages,
            ConceptStep::Summary,
        ]
    }

    /// Returns the 0-based index of this step in the canonical order.
    pub fn order_index(&self) -> usize {
        match self {
            ConceptStep::Idea => 0,
            ConceptStep::Sources => 1,
            ConceptStep::Consortium => 2,
            ConceptStep::Objectives => 3,
            ConceptStep::WorkPackages => 4,
            ConceptStep::Summary => 5,
        }
    }

    /// Returns the next step in order, if any.
    pub fn next(&self) -> Option<ConceptStep> {
        Self::all().get(self.order_index() + 1).copied()
    }

    /// Returns the previous step in order, if any.
    pub fn previous(&self) -> Option<ConceptStep> {
        let idx = self.order_index();
        if idx == 0 {
            None
        } else {
            Self::all().get(idx - 1).copied()
        }
    }

    /// Returns true if this step comes before another in order.
    pub fn is_before(&self, other: &ConceptStep) -> bool {
        self.order_index() < other.order_index()
    }

    /// Stable key used in URLs and stored state.
    pub fn key(&self) -> &'static str {
        match self {
            ConceptStep::Idea => "idea",
            ConceptStep::Sources => "sources",
            ConceptStep::Consortium => "consortium",
            ConceptStep::Objectives => "objectives",
            ConceptStep::WorkPackages => "work_packages",
            ConceptStep::Summary => "summary",
        }
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ConceptStep::Idea => "Idea",
            ConceptStep::Sources => "Sources & Concepts",
            ConceptStep::Consortium => "Consortium",
            ConceptStep::Objectives => "Objectives",
            ConceptStep::WorkPackages => "Work Packages",
            ConceptStep::Summary => "Summary & Export",
        }
    }
}

impl fmt::Display for ConceptStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Users move one step forward at a time and may jump back to any earlier step.
impl StateMachine for ConceptStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        target.is_before(self) || self.next() == Some(*target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        let mut targets: Vec<Self> = Self::all()
            .iter()
            .copied()
            .filter(|s| s.is_before(self))
            .collect();
        if let Some(next) = self.next() {
            targets.push(next);
        }
        targets
    }
}
