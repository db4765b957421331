//! Conversion of a finished concept into a stored `Project`.

use chrono::Datelike;

use super::apply::require_selected_concept;
use super::partner::{ConsortiumRole, SelectedPartner};
use super::state::{ConceptState, WorkPackageSuggestion};
use crate::domain::foundation::{ActionType, EntityId, ValidationError};
use crate::domain::proposal::{
    Activity, ConsortiumMember, Deliverable, Objective, ObjectiveType, PartnerRole, Project,
    ProjectResult, ProjectStatus, WorkPackage, WorkPackageType,
};

/// Builds a draft project from the selected concept and the selected step outputs.
pub fn export_project(state: &ConceptState) -> Result<Project, ValidationError> {
    let concept = require_selected_concept(state)?;

    let mut project = Project::new(
        EntityId::generated("project", state.updated_at.as_millis(), 0),
        concept.title.clone(),
        state.action_type,
    );
    project.acronym = concept.acronym.clone();
    project.status = ProjectStatus::Draft;
    project.sector = state.sector;
    project.budget_tier = budget_tier(state);
    project.duration = state.duration;
    project.call_year = u32::try_from(state.updated_at.as_datetime().year()).unwrap_or_default();
    project.horizontal_priorities = concept.erasmus_priorities.clone();
    project.problem_statement = concept.problem_statement.clone();
    project.target_groups = concept.target_groups.clone();

    project.objectives = state
        .selected_objectives()
        .enumerate()
        .map(|(idx, o)| Objective {
            id: EntityId::from(format!("obj_{}", idx)),
            code: format!("SO{}", idx + 1),
            kind: ObjectiveType::Specific,
            description: o.text.clone(),
            indicators: o.indicators.clone(),
            sources: o.sources.clone(),
        })
        .collect();

    project.consortium = state.selected_partners.iter().map(consortium_member).collect();

    project.work_packages = state
        .selected_work_packages()
        .map(|wp| work_package(wp, &state.selected_partners))
        .collect();
    for member in &mut project.consortium {
        member.work_package_leadership = project
            .work_packages
            .iter()
            .filter(|wp| wp.lead_partner == member.partner_id)
            .map(|wp| wp.id.to_string())
            .collect();
    }

    project.results = concept
        .main_outputs
        .iter()
        .enumerate()
        .map(|(i, output)| {
            let (title, description) = split_output(output);
            ProjectResult {
                id: EntityId::from(format!("result_{}", i)),
                code: format!("R{}", i + 1),
                title,
                kind: "other".to_string(),
                description,
                work_package_id: String::new(),
                languages: vec!["en".to_string()],
                target_audience: concept.target_groups.clone(),
            }
        })
        .collect();

    Ok(project)
}

/// The chosen tier when it is eligible, else the usual tier for the action type.
fn budget_tier(state: &ConceptState) -> u64 {
    if state.action_type.is_valid_budget(state.budget_tier) {
        return state.budget_tier;
    }
    match state.action_type {
        ActionType::Ka210 => 60_000,
        ActionType::Ka220 => 250_000,
    }
}

fn partner_key(partner: &SelectedPartner) -> String {
    if partner.partner.id.is_empty() {
        partner.partner.organization_name.clone()
    } else {
        partner.partner.id.clone()
    }
}

fn consortium_member(partner: &SelectedPartner) -> ConsortiumMember {
    let partner_id = partner_key(partner);
    ConsortiumMember {
        id: EntityId::from(format!("cm_{}", partner_id)),
        partner_id,
        role: match partner.role {
            ConsortiumRole::Coordinator => PartnerRole::Coordinator,
            ConsortiumRole::Partner => PartnerRole::Partner,
        },
        budget_share: 0.0,
        justification: None,
        work_package_leadership: Vec::new(),
    }
}

fn work_package(wp: &WorkPackageSuggestion, partners: &[SelectedPartner]) -> WorkPackage {
    let lead_partner = partners
        .iter()
        .find(|p| {
            p.partner.organization_name.eq_ignore_ascii_case(wp.lead.trim())
                || p.partner.acronym.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(wp.lead.trim()))
        })
        .map(partner_key)
        .unwrap_or_else(|| wp.lead.clone());

    let n = wp.number;
    WorkPackage {
        id: EntityId::from(format!("wp_{}", n)),
        number: n,
        title: wp.title.clone(),
        kind: serde_json::from_value::<WorkPackageType>(serde_json::Value::String(wp.kind.to_uppercase())).ok(),
        objectives: Vec::new(),
        description: wp.description.clone(),
        start_month: wp.duration.start,
        end_month: wp.duration.end,
        activities: wp
            .activities
            .iter()
            .enumerate()
            .map(|(i, title)| Activity {
                id: EntityId::from(format!("wp{}_act_{}", n, i)),
                code: format!("A{}.{}", n, i + 1),
                title: title.clone(),
                description: String::new(),
                start_month: wp.duration.start,
                end_month: wp.duration.end,
                lead_partner: lead_partner.clone(),
            })
            .collect(),
        deliverables: wp
            .deliverables
            .iter()
            .enumerate()
            .map(|(i, title)| Deliverable {
                id: EntityId::from(format!("wp{}_del_{}", n, i)),
                code: format!("D{}.{}", n, i + 1),
                title: title.clone(),
                description: String::new(),
                due_month: wp.duration.end,
                kind: Default::default(),
                dissemination_level: Default::default(),
            })
            .collect(),
        lead_partner,
    }
}

/// "Output 1: Toolkit for trainers" becomes ("Output 1", "Toolkit for trainers").
fn split_output(output: &str) -> (String, String) {
    match output.split_once(':') {
        Some((title, rest)) if !rest.trim().is_empty() => {
            (title.trim().to_string(), rest.trim().to_string())
        }
        _ => (output.trim().to_string(), String::new()),
    }
}
