//! Translation payloads and the id-keyed merge back into a project.

use serde::{Deserialize, Serialize};

use super::project::Project;
use crate::domain::foundation::EntityId;

/// Message shown when a project translation cannot be completed.
pub const TRANSLATION_FAILED_MESSAGE: &str = "Translation failed. Please try again later.";

/// Translated objective text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedObjective {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Translated title/description pair for activities, deliverables and results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedItem {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedWorkPackage {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub activities: Vec<TranslatedItem>,
    #[serde(default)]
    pub deliverables: Vec<TranslatedItem>,
}

/// The translatable subset of a project. Absent fields mean "do not touch".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_statement: Option<String>,
    #[serde(default)]
    pub objectives: Vec<TranslatedObjective>,
    #[serde(default)]
    pub work_packages: Vec<TranslatedWorkPackage>,
    #[serde(default)]
    pub results: Vec<TranslatedItem>,
}

impl TranslationPayload {
    /// Extracts every translatable field of a project, keyed by entity id.
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: Some(project.title.clone()),
            acronym: Some(project.acronym.clone()),
            problem_statement: Some(project.problem_statement.clone()),
            objectives: project
                .objectives
                .iter()
                .map(|o| TranslatedObjective {
                    id: o.id.clone(),
                    description: Some(o.description.clone()),
                })
                .collect(),
            work_packages: project
                .work_packages
                .iter()
                .map(|wp| TranslatedWorkPackage {
                    id: wp.id.clone(),
                    title: Some(wp.title.clone()),
                    description: Some(wp.description.clone()),
                    activities: wp
                        .activities
                        .iter()
                        .map(|a| item(&a.id, &a.title, &a.description))
                        .collect(),
                    deliverables: wp
                        .deliverables
                        .iter()
                        .map(|d| item(&d.id, &d.title, &d.description))
                        .collect(),
                })
                .collect(),
            results: project
                .results
                .iter()
                .map(|r| item(&r.id, &r.title, &r.description))
                .collect(),
        }
    }
}

fn item(id: &EntityId, title: &str, description: &str) -> TranslatedItem {
    TranslatedItem {
        id: id.clone(),
        title: Some(title.to_string()),
        description: Some(description.to_string()),
    }
}

/// Merges translated text into a copy of the original project.
///
/// Scalars are replaced only when the payload carries a non-empty value.
/// Collection items are matched by id; only title/description change.
/// Unmatched originals pass through, unmatched translations are dropped,
/// and order is preserved.
pub fn merge_translated(original: &Project, translated: &TranslationPayload) -> Project {
    let mut merged = original.clone();

    overwrite(&mut merged.title, &translated.title);
    overwrite(&mut merged.acronym, &translated.acronym);
    overwrite(&mut merged.problem_statement, &translated.problem_statement);

    for objective in &mut merged.objectives {
        if let Some(t) = translated.objectives.iter().find(|t| t.id == objective.id) {
            overwrite(&mut objective.description, &t.description);
        }
    }

    for wp in &mut merged.work_packages {
        let Some(t) = translated.work_packages.iter().find(|t| t.id == wp.id) else {
            continue;
        };
        overwrite(&mut wp.title, &t.title);
        overwrite(&mut wp.description, &t.description);

        for activity in &mut wp.activities {
            if let Some(ta) = find_item(&t.activities, &activity.id) {
                overwrite(&mut activity.title, &ta.title);
                overwrite(&mut activity.description, &ta.description);
            }
        }
        for deliverable in &mut wp.deliverables {
            if let Some(td) = find_item(&t.deliverables, &deliverable.id) {
                overwrite(&mut deliverable.title, &td.title);
                overwrite(&mut deliverable.description, &td.description);
            }
        }
    }

    for result in &mut merged.results {
        if let Some(t) = find_item(&translated.results, &result.id) {
            overwrite(&mut result.title, &t.title);
            overwrite(&mut result.description, &t.description);
        }
    }

    merged
}

fn find_item<'a>(items: &'a [TranslatedItem], id: &EntityId) -> Option<&'a TranslatedItem> {
    items.iter().find(|t| &t.id == id)
}

fn overwrite(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        if !v.is_empty() {
            *target = v.clone();
        }
    }
}
