//! Project aggregate and its owned entities.
//!
//! Every nested entity carries a stable `EntityId` assigned at creation.
//! Merge operations key on that id, never on position.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ActionType, EntityId, Sector, Timestamp};

/// Lifecycle of a stored proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Concept,
    Draft,
    InProgress,
    ReadyForReview,
    Submitted,
    Approved,
    Rejected,
}

/// Role of an organisation inside the consortium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnerRole {
    Coordinator,
    #[default]
    Partner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectiveType {
    General,
    #[default]
    Specific,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkPackageType {
    Management,
    Research,
    Development,
    Piloting,
    Dissemination,
    Quality,
    Activity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliverableType {
    Report,
    Tool,
    Curriculum,
    Guide,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisseminationLevel {
    #[default]
    Public,
    Sensitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorType {
    #[default]
    Output,
    Outcome,
    Impact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    #[serde(rename = "type", default)]
    pub kind: ObjectiveType,
    pub description: String,
    #[serde(default)]
    pub indicators: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_month: u32,
    #[serde(default)]
    pub end_month: u32,
    #[serde(default)]
    pub lead_partner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deliverable {
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_month: u32,
    #[serde(rename = "type", default)]
    pub kind: DeliverableType,
    #[serde(default)]
    pub dissemination_level: DisseminationLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackage {
    pub id: EntityId,
    pub number: u32,
    pub title: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<WorkPackageType>,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_month: u32,
    #[serde(default)]
    pub end_month: u32,
    /// Partner id of the leading organisation.
    #[serde(default)]
    pub lead_partner: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub deliverables: Vec<Deliverable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResult {
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub work_package_id: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub target_audience: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsortiumMember {
    pub id: EntityId,
    pub partner_id: String,
    #[serde(default)]
    pub role: PartnerRole,
    /// Share of the lump sum, in percent.
    #[serde(default)]
    pub budget_share: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    #[serde(default)]
    pub work_package_leadership: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: IndicatorType,
    #[serde(default)]
    pub target: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiplierEvent {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub month: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub target_participants: u32,
    #[serde(default)]
    pub host_partner_id: String,
}

/// A grant proposal as stored after export from a drafting session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub acronym: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub action_type: ActionType,
    #[serde(default)]
    pub sector: Sector,
    /// Requested lump sum in euro.
    #[serde(default)]
    pub budget_tier: u64,
    /// Project duration in months.
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub call_year: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_agency: Option<String>,
    #[serde(default)]
    pub horizontal_priorities: Vec<String>,
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    pub target_groups: Vec<String>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub consortium: Vec<ConsortiumMember>,
    #[serde(default)]
    pub work_packages: Vec<WorkPackage>,
    #[serde(default)]
    pub results: Vec<ProjectResult>,
    #[serde(default)]
    pub indicators: Vec<Indicator>,
    #[serde(default)]
    pub multiplier_events: Vec<MultiplierEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sustainability_plan: Option<String>,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

fn default_duration() -> u32 {
    24
}

impl Project {
    /// Creates an empty project shell.
    pub fn new(id: EntityId, title: impl Into<String>, action_type: ActionType) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            title: title.into(),
            acronym: String::new(),
            status: ProjectStatus::default(),
            action_type,
            sector: Sector::default(),
            budget_tier: 0,
            duration: default_duration(),
            call_year: 0,
            national_agency: None,
            horizontal_priorities: Vec::new(),
            problem_statement: String::new(),
            target_groups: Vec::new(),
            objectives: Vec::new(),
            consortium: Vec::new(),
            work_packages: Vec::new(),
            results: Vec::new(),
            indicators: Vec::new(),
            multiplier_events: Vec::new(),
            sustainability_plan: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Every nested entity id, in document order.
    pub fn entity_ids(&self) -> Vec<&EntityId> {
        let mut ids: Vec<&EntityId> = self.objectives.iter().map(|o| &o.id).collect();
        for wp in &self.work_packages {
            ids.push(&wp.id);
            ids.extend(wp.activities.iter().map(|a| &a.id));
            ids.extend(wp.deliverables.iter().map(|d| &d.id));
        }
        ids.extend(self.results.iter().map(|r| &r.id));
        ids
    }

    /// Returns the coordinating member, if one is assigned.
    pub fn coordinator(&self) -> Option<&ConsortiumMember> {
        self.consortium
            .iter()
            .find(|m| m.role == PartnerRole::Coordinator)
    }
}
