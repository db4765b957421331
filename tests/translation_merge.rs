//! Property tests for merging translated text back into a project.

use proptest::prelude::*;

use erasmus_architect::domain::foundation::{ActionType, EntityId};
use erasmus_architect::domain::proposal::{
    merge_translated, Activity, Objective, ObjectiveType, Project, ProjectResult,
    TranslatedItem, TranslatedObjective, TranslatedWorkPackage, TranslationPayload, WorkPackage,
};

fn build_project(objectives: usize, work_packages: &[usize], results: usize) -> Project {
    let mut project = Project::new(EntityId::from("project_1"), "Originaltitel", ActionType::Ka220);
    project.acronym = "ORIG".into();
    project.problem_statement = "Ausgangslage".into();
    project.objectives = (0..objectives)
        .map(|i| Objective {
            id: EntityId::from(format!("obj_{}", i)),
            code: format!("SO{}", i + 1),
            kind: ObjectiveType::Specific,
            description: format!("Ziel {}", i),
            indicators: vec![format!("{} Teilnehmende", 10 * (i + 1))],
            sources: Vec::new(),
        })
        .collect();
    project.work_packages = work_packages
        .iter()
        .enumerate()
        .map(|(n, &activities)| WorkPackage {
            id: EntityId::from(format!("wp_{}", n + 1)),
            number: n as u32 + 1,
            title: format!("Arbeitspaket {}", n + 1),
            kind: None,
            objectives: Vec::new(),
            description: "Beschreibung".into(),
            start_month: 1,
            end_month: 24,
            lead_partner: format!("partner_{}", n),
            activities: (0..activities)
                .map(|a| Activity {
                    id: EntityId::from(format!("wp{}_act_{}", n + 1, a)),
                    code: format!("A{}.{}", n + 1, a + 1),
                    title: format!("Aktivität {}", a),
                    description: String::new(),
                    start_month: 2,
                    end_month: 12,
                    lead_partner: format!("partner_{}", n),
                })
                .collect(),
            deliverables: Vec::new(),
        })
        .collect();
    project.results = (0..results)
        .map(|i| ProjectResult {
            id: EntityId::from(format!("result_{}", i)),
            code: format!("R{}", i + 1),
            title: format!("Ergebnis {}", i),
            kind: "other".into(),
            description: "Beschreibung".into(),
            work_package_id: String::new(),
            languages: vec!["de".into()],
            target_audience: Vec::new(),
        })
        .collect();
    project
}

fn project_strategy() -> impl Strategy<Value = Project> {
    (
        0usize..5,
        prop::collection::vec(0usize..4, 0..4),
        0usize..4,
    )
        .prop_map(|(objectives, wps, results)| build_project(objectives, &wps, results))
}

/// Ids drawn from both the project's own id space and ids it never uses.
fn id_strategy(prefix: &'static str) -> impl Strategy<Value = EntityId> {
    prop_oneof![
        (0usize..6).prop_map(move |i| EntityId::from(format!("{}_{}", prefix, i))),
        (0usize..3).prop_map(|i| EntityId::from(format!("unknown_{}", i))),
    ]
}

fn text_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[a-zA-Z ]{1,20}".prop_map(Some),
    ]
}

fn payload_strategy() -> impl Strategy<Value = TranslationPayload> {
    let objective = (id_strategy("obj"), text_strategy())
        .prop_map(|(id, description)| TranslatedObjective { id, description });
    let activity = ((0usize..4), text_strategy(), text_strategy()).prop_map(|(a, title, description)| {
        TranslatedItem {
            id: EntityId::from(format!("wp1_act_{}", a)),
            title,
            description,
        }
    });
    let work_package = (
        (1usize..6).prop_map(|n| EntityId::from(format!("wp_{}", n))),
        text_strategy(),
        text_strategy(),
        prop::collection::vec(activity, 0..4),
    )
        .prop_map(|(id, title, description, activities)| TranslatedWorkPackage {
            id,
            title,
            description,
            activities,
            deliverables: Vec::new(),
        });
    let result = (id_strategy("result"), text_strategy(), text_strategy())
        .prop_map(|(id, title, description)| TranslatedItem {
            id,
            title,
            description,
        });

    (
        text_strategy(),
        text_strategy(),
        text_strategy(),
        prop::collection::vec(objective, 0..6),
        prop::collection::vec(work_package, 0..4),
        prop::collection::vec(result, 0..5),
    )
        .prop_map(
            |(title, acronym, problem_statement, objectives, work_packages, results)| TranslationPayload {
                title,
                acronym,
                problem_statement,
                objectives,
                work_packages,
                results,
            },
        )
}

/// Blanks out the fields a translation is allowed to change.
fn structure_of(project: &Project) -> Project {
    let mut skeleton = project.clone();
    skeleton.title.clear();
    skeleton.acronym.clear();
    skeleton.problem_statement.clear();
    for o in &mut skeleton.objectives {
        o.description.clear();
    }
    for wp in &mut skeleton.work_packages {
        wp.title.clear();
        wp.description.clear();
        for a in &mut wp.activities {
            a.title.clear();
            a.description.clear();
        }
        for d in &mut wp.deliverables {
            d.title.clear();
            d.description.clear();
        }
    }
    for r in &mut skeleton.results {
        r.title.clear();
        r.description.clear();
    }
    skeleton
}

proptest! {
    #[test]
    fn merge_never_changes_structure(project in project_strategy(), payload in payload_strategy()) {
        let merged = merge_translated(&project, &payload);

        prop_assert_eq!(merged.entity_ids(), project.entity_ids());
        prop_assert_eq!(structure_of(&merged), structure_of(&project));
    }

    #[test]
    fn unknown_ids_are_ignored(project in project_strategy(), payload in payload_strategy()) {
        let merged = merge_translated(&project, &payload);

        prop_assert!(merged
            .entity_ids()
            .iter()
            .all(|id| !id.as_str().starts_with("unknown_")));
    }

    #[test]
    fn matched_non_empty_text_wins(project in project_strategy(), payload in payload_strategy()) {
        let merged = merge_translated(&project, &payload);

        for (original, result) in project.objectives.iter().zip(&merged.objectives) {
            let expected = payload
                .objectives
                .iter()
                .find(|t| t.id == original.id)
                .and_then(|t| t.description.clone())
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| original.description.clone());
            prop_assert_eq!(&result.description, &expected);
        }

        match payload.title.as_deref() {
            Some(title) if !title.is_empty() => prop_assert_eq!(merged.title.as_str(), title),
            _ => prop_assert_eq!(&merged.title, &project.title),
        }
    }

    #[test]
    fn merging_twice_equals_merging_once(project in project_strategy(), payload in payload_strategy()) {
        let once = merge_translated(&project, &payload);
        let twice = merge_translated(&once, &payload);

        prop_assert_eq!(twice, once);
    }

    #[test]
    fn own_payload_is_identity(project in project_strategy()) {
        let payload = TranslationPayload::from_project(&project);

        prop_assert_eq!(merge_translated(&project, &payload), project);
    }
}
