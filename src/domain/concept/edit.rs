//! Direct user edits to a concept session.

use serde::Deserialize;

use super::partner::SelectedPartner;
use super::state::{ConceptState, ResearchSource, SourceKind};
use crate::domain::foundation::{ActionType, EntityId, Sector, Timestamp, ValidationError};

/// Partial update of the step 1 fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaFields {
    pub idea: Option<String>,
    pub target_group: Option<String>,
    pub problem: Option<String>,
    pub sector: Option<Sector>,
    pub action_type: Option<ActionType>,
    pub budget_tier: Option<u64>,
    pub duration: Option<u32>,
    pub priority_focus: Option<String>,
    pub additional_instructions: Option<String>,
}

/// A change made by the user rather than by the model.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ConceptEdit {
    UpdateIdea(IdeaFields),
    AddSource {
        title: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        kind: SourceKind,
    },
    RemoveSource {
        source_id: EntityId,
    },
    SelectConcept {
        concept_id: EntityId,
    },
    ToggleSavedForLater {
        concept_id: EntityId,
    },
    SetPartners {
        partners: Vec<SelectedPartner>,
    },
    SelectObjectives {
        objective_ids: Vec<EntityId>,
    },
    UpdateObjectiveText {
        objective_id: EntityId,
        text: String,
    },
    SelectWorkPackages {
        numbers: Vec<u32>,
    },
    UpdateDetailedConcept {
        markdown: String,
    },
}

/// Applies a user edit, returning the new state.
pub fn apply_edit(state: &ConceptState, edit: ConceptEdit, now: Timestamp) -> Result<ConceptState, ValidationError> {
    let mut next = state.clone();
    match edit {
        ConceptEdit::UpdateIdea(fields) => {
            let idea_changed = fields.idea.is_some() || fields.problem.is_some();
            if let Some(duration) = fields.duration {
                if !(6..=36).contains(&duration) {
                    return Err(ValidationError::out_of_range("duration", 6, 36, i64::from(duration)));
                }
                next.duration = duration;
            }
            if let Some(idea) = fields.idea {
                next.idea = idea;
            }
            if let Some(target_group) = fields.target_group {
                next.target_group = target_group;
            }
            if let Some(problem) = fields.problem {
                next.problem = problem;
            }
            if let Some(sector) = fields.sector {
                next.sector = sector;
            }
            if let Some(action_type) = fields.action_type {
                next.action_type = action_type;
            }
            if let Some(budget_tier) = fields.budget_tier {
                next.budget_tier = budget_tier;
            }
            if let Some(priority_focus) = fields.priority_focus {
                next.priority_focus = priority_focus;
            }
            if let Some(instructions) = fields.additional_instructions {
                next.additional_instructions = instructions;
            }
            if idea_changed {
                next.enhanced_idea = None;
                next.enhanced_problem = None;
                next.is_enhanced = false;
            }
        }
        ConceptEdit::AddSource { title, content, kind } => {
            if title.trim().is_empty() {
                return Err(ValidationError::empty_field("title"));
            }
            let id = EntityId::generated("source", now.as_millis(), next.sources.len());
            next.sources.push(ResearchSource::new(id, title, content, kind));
        }
        ConceptEdit::RemoveSource { source_id } => {
            next.sources.retain(|s| s.id != source_id);
        }
        ConceptEdit::SelectConcept { concept_id } => {
            if !next.concepts.iter().any(|c| c.id == concept_id) {
                return Err(ValidationError::precondition(format!("Unknown concept {}", concept_id)));
            }
            for concept in &mut next.concepts {
                concept.selected = concept.id == concept_id;
            }
            next.selected_concept_id = Some(concept_id);
        }
        ConceptEdit::ToggleSavedForLater { concept_id } => {
            let concept = next
                .concepts
                .iter_mut()
                .find(|c| c.id == concept_id)
                .ok_or_else(|| ValidationError::precondition(format!("Unknown concept {}", concept_id)))?;
            concept.saved_for_later = !concept.saved_for_later;
        }
        ConceptEdit::SetPartners { partners } => {
            next.selected_partners = partners;
        }
        ConceptEdit::SelectObjectives { objective_ids } => {
            next.selected_objective_ids = objective_ids
                .into_iter()
                .filter(|id| state.objectives.iter().any(|o| &o.id == id))
                .collect();
        }
        ConceptEdit::UpdateObjectiveText { objective_id, text } => {
            let objective = next
                .objectives
                .iter_mut()
                .find(|o| o.id == objective_id)
                .ok_or_else(|| ValidationError::precondition(format!("Unknown objective {}", objective_id)))?;
            objective.text = text;
        }
        ConceptEdit::SelectWorkPackages { numbers } => {
            next.selected_wp_numbers = numbers
                .into_iter()
                .filter(|n| state.work_packages.iter().any(|wp| wp.number == *n))
                .collect();
        }
        ConceptEdit::UpdateDetailedConcept { markdown } => {
            next.detailed_concept = Some(markdown);
        }
    }
    Ok(next.touched())
}
