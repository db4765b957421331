//! Working state of one proposal-writing session.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::answer::Answer;
use crate::domain::foundation::{ActionType, Sector};
use crate::domain::proposal::WorkPackage;

/// Lump sum assumed when a session starts without one.
pub const DEFAULT_TOTAL_BUDGET: u64 = 250_000;
pub const DEFAULT_WP_COUNT: u32 = 5;
pub const DEFAULT_DURATION_MONTHS: u32 = 24;

/// Organisation taking part in the drafted proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsortiumPartner {
    pub id: String,
    pub name: String,
    /// ISO country code.
    pub country: String,
    #[serde(rename = "type", default)]
    pub organization_type: String,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub is_lead: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// The idea the session writes a proposal for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIdea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub target_groups: Vec<String>,
    #[serde(default)]
    pub main_objective: String,
    #[serde(default)]
    pub sector: Sector,
    #[serde(default)]
    pub action_type: ActionType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfiguration {
    #[serde(default)]
    pub total_budget: u64,
    #[serde(default = "default_wp_count")]
    pub wp_count: u32,
    #[serde(default)]
    pub action_type: ActionType,
    #[serde(default = "default_duration")]
    pub duration: u32,
}

fn default_wp_count() -> u32 {
    DEFAULT_WP_COUNT
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MONTHS
}

impl Default for PipelineConfiguration {
    fn default() -> Self {
        Self {
            total_budget: 0,
            wp_count: DEFAULT_WP_COUNT,
            action_type: ActionType::default(),
            duration: DEFAULT_DURATION_MONTHS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PipelineState {
    #[serde(default)]
    pub configuration: PipelineConfiguration,
    #[serde(default)]
    pub idea: ProjectIdea,
    #[serde(default)]
    pub consortium: Vec<ConsortiumPartner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    #[serde(default)]
    pub work_packages: Vec<WorkPackage>,
    /// Keyed by question id, or `{questionId}_{partnerId}` for per-partner questions.
    #[serde(default)]
    pub answers: BTreeMap<String, Answer>,
}

impl PipelineState {
    /// Starts a session, filling in programme defaults for missing settings.
    pub fn new(
        consortium: Vec<ConsortiumPartner>,
        idea: ProjectIdea,
        configuration: Option<PipelineConfiguration>,
    ) -> Self {
        let mut config = configuration.unwrap_or(PipelineConfiguration {
            action_type: idea.action_type,
            ..PipelineConfiguration::default()
        });
        if config.total_budget == 0 {
            config.total_budget = DEFAULT_TOTAL_BUDGET;
        }
        if config.wp_count == 0 {
            config.wp_count = DEFAULT_WP_COUNT;
        }
        if config.duration == 0 {
            config.duration = DEFAULT_DURATION_MONTHS;
        }

        Self {
            configuration: config,
            project_title: idea.title.clone(),
            acronym: idea.acronym.clone(),
            idea,
            consortium,
            work_packages: Vec::new(),
            answers: BTreeMap::new(),
        }
    }

    pub fn action_type(&self) -> ActionType {
        self.configuration.action_type
    }

    /// Text of an answer, if one is stored.
    pub fn answer_text(&self, key: &str) -> Option<String> {
        self.answers.get(key).map(Answer::text)
    }

    /// Every answer's text, joined by spaces.
    pub fn all_answer_text(&self) -> String {
        self.answers
            .values()
            .map(Answer::text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn set_answer(&mut self, key: impl Into<String>, answer: Answer) {
        self.answers.insert(key.into(), answer);
    }
}

/// Answer key for a question asked once per partner.
pub fn partner_answer_key(question_id: &str, partner_id: &str) -> String {
    format!("{}_{}", question_id, partner_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let state = PipelineState::new(vec![], ProjectIdea::default(), None);
        assert_eq!(state.configuration.total_budget, DEFAULT_TOTAL_BUDGET);
        assert_eq!(state.configuration.wp_count, 5);
        assert_eq!(state.configuration.duration, 24);
    }

    #[test]
    fn new_takes_title_from_idea() {
        let idea = ProjectIdea {
            title: Some("Digital Bridges".into()),
            action_type: ActionType::Ka210,
            ..Default::default()
        };
        let state = PipelineState::new(vec![], idea, None);
        assert_eq!(state.project_title.as_deref(), Some("Digital Bridges"));
        assert_eq!(state.action_type(), ActionType::Ka210);
    }

    #[test]
    fn partner_key_joins_with_underscore() {
        assert_eq!(partner_answer_key("org_presentation", "p1"), "org_presentation_p1");
    }

    #[test]
    fn answer_text_reads_through_variants() {
        let mut state = PipelineState::default();
        state.set_answer("q1", Answer::manual("edited"));
        assert_eq!(state.answer_text("q1").as_deref(), Some("edited"));
        assert_eq!(state.answer_text("missing"), None);
    }
}
