//! Partner organisations available to a consortium.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::{ActionType, Sector};

/// One area an organisation is competent in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExpertiseArea {
    pub domain: String,
    #[serde(default)]
    pub description: String,
    /// Self-assessed level, 1-5.
    #[serde(default)]
    pub level: u8,
}

/// A partner organisation, either entered by hand or extracted from its website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartnerProfile {
    #[serde(default)]
    pub id: String,
    pub organization_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    /// ISO 3166 alpha-2 code.
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub organization_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_statement: Option<String>,
    #[serde(default)]
    pub expertise_areas: Vec<ExpertiseArea>,
    #[serde(default)]
    pub target_groups: Vec<String>,
    /// Confidence of extracted data, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<u8>,
}

impl PartnerProfile {
    /// Domains of the first `limit` expertise areas.
    pub fn top_expertise(&self, limit: usize) -> Vec<&str> {
        self.expertise_areas
            .iter()
            .take(limit)
            .map(|e| e.domain.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsortiumRole {
    Coordinator,
    #[default]
    Partner,
}

impl std::fmt::Display for ConsortiumRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsortiumRole::Coordinator => write!(f, "COORDINATOR"),
            ConsortiumRole::Partner => write!(f, "PARTNER"),
        }
    }
}

/// A partner picked for the consortium of a concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedPartner {
    pub partner: PartnerProfile,
    #[serde(default)]
    pub role: ConsortiumRole,
}

/// What a consortium is being put together for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBrief {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub main_objective: String,
    #[serde(default)]
    pub target_groups: Vec<String>,
    #[serde(default)]
    pub sector: Sector,
    #[serde(default)]
    pub action_type: ActionType,
}

/// Why one known partner fits the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartnerSuggestion {
    pub partner_id: String,
    #[serde(default)]
    pub reason: String,
    /// LEAD, CONTENT_EXPERT, PILOT_SITE, DISSEMINATION or EVALUATION.
    #[serde(default)]
    pub suggested_role: String,
    #[serde(default)]
    pub match_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConsortiumAnalysis {
    #[serde(default)]
    pub coverage_assessment: String,
    #[serde(default)]
    pub missing_expertise: Vec<String>,
    #[serde(default)]
    pub geographic_spread: String,
    #[serde(default)]
    pub overall_score: f64,
}

/// Partners picked from a candidate list for a project idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartnerSuggestions {
    #[serde(default)]
    pub suggested_partner_ids: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<PartnerSuggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consortium_analysis: Option<ConsortiumAnalysis>,
}

impl PartnerSuggestions {
    /// Keeps only partners from `candidates`, once each, with scores in 0-100.
    ///
    /// Ids the model invented are dropped. A suggestion whose id is missing
    /// from `suggested_partner_ids` is added to it in suggestion order.
    pub fn restricted_to(mut self, candidates: &[PartnerProfile]) -> Self {
        let known: HashSet<&str> = candidates.iter().map(|c| c.id.as_str()).collect();

        let mut seen = HashSet::new();
        self.suggestions
            .retain(|s| known.contains(s.partner_id.as_str()) && seen.insert(s.partner_id.clone()));
        for s in &mut self.suggestions {
            s.match_score = clamp_score(s.match_score);
        }

        let mut seen = HashSet::new();
        let ids = std::mem::take(&mut self.suggested_partner_ids);
        self.suggested_partner_ids = ids
            .into_iter()
            .chain(self.suggestions.iter().map(|s| s.partner_id.clone()))
            .filter(|id| known.contains(id.as_str()) && seen.insert(id.clone()))
            .collect();

        if let Some(analysis) = &mut self.consortium_analysis {
            analysis.overall_score = clamp_score(analysis.overall_score);
        }
        self
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracted_profile_tolerates_nulls_and_missing_fields() {
        let profile: PartnerProfile = serde_json::from_value(json!({
            "organizationName": "Volkshochschule Wien",
            "acronym": null,
            "country": "AT",
            "organizationType": "ADULT_EDUCATION",
            "expertiseAreas": [
                {"domain": "TRAINING_DELIVERY", "description": "Courses", "level": 4},
                {"domain": "DIGITAL_TOOLS"},
                {"domain": "TARGET_GROUP_ACCESS"},
                {"domain": "POLICY_ADVOCACY"}
            ]
        }))
        .unwrap();

        assert_eq!(profile.acronym, None);
        assert_eq!(profile.expertise_areas[1].level, 0);
        assert_eq!(
            profile.top_expertise(3),
            vec!["TRAINING_DELIVERY", "DIGITAL_TOOLS", "TARGET_GROUP_ACCESS"]
        );
    }

    fn candidate(id: &str) -> PartnerProfile {
        PartnerProfile {
            id: id.into(),
            organization_name: format!("Org {}", id),
            ..Default::default()
        }
    }

    #[test]
    fn suggestions_are_limited_to_known_partners() {
        let suggestions: PartnerSuggestions = serde_json::from_value(json!({
            "suggestedPartnerIds": ["a", "ghost", "a"],
            "suggestions": [
                {"partnerId": "a", "reason": "Adult education", "suggestedRole": "LEAD", "matchScore": 130},
                {"partnerId": "ghost", "reason": "Made up", "matchScore": 90},
                {"partnerId": "c", "reason": "Pilot region", "suggestedRole": "PILOT_SITE", "matchScore": 72.5},
                {"partnerId": "a", "reason": "Duplicate"}
            ],
            "consortiumAnalysis": {"coverageAssessment": "Good", "overallScore": -4}
        }))
        .unwrap();

        let restricted = suggestions.restricted_to(&[candidate("a"), candidate("b"), candidate("c")]);

        assert_eq!(restricted.suggested_partner_ids, vec!["a", "c"]);
        let ids: Vec<&str> = restricted.suggestions.iter().map(|s| s.partner_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(restricted.suggestions[0].match_score, 100.0);
        assert_eq!(restricted.suggestions[0].reason, "Adult education");
        assert_eq!(restricted.suggestions[1].match_score, 72.5);
        assert_eq!(restricted.consortium_analysis.unwrap().overall_score, 0.0);
    }

    #[test]
    fn role_serializes_screaming() {
        assert_eq!(
            serde_json::to_value(ConsortiumRole::Coordinator).unwrap(),
            json!("COORDINATOR")
        );
    }
}
