//! Which answers a generation step writes, and how generated text is stored.
//!
//! A step is one chapter of the official form. Partner-specific chapters are
//! answered once per consortium partner; a step may be narrowed to a single
//! partner or a single work package so long chapters can be generated piece
//! by piece.

use serde::{Deserialize, Serialize};

use super::answer::{Answer, AnswerMode};
use super::state::{partner_answer_key, ConsortiumPartner, PipelineState};
use super::structure::{Chapter, ProposalStructure, Question, QuestionKind, Section};
use crate::domain::foundation::{Timestamp, ValidationError};

/// Part of a chapter a generation step covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum StepScope {
    #[default]
    Whole,
    /// Zero-based index into the consortium; partner-specific chapters only.
    Partner(usize),
    /// Work package number, 1-based.
    WorkPackage(u32),
}

/// One answer slot to fill.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerTarget<'a> {
    /// Key the answer is stored under.
    pub key: String,
    pub chapter: &'a Chapter,
    pub section: &'a Section,
    pub question: &'a Question,
    pub partner: Option<&'a ConsortiumPartner>,
}

/// Answer slots of one chapter, in form order.
///
/// Only free-text questions are returned; selections, numbers and info
/// blocks are left to the user.
pub fn step_targets<'a>(
    structure: &'a ProposalStructure,
    state: &'a PipelineState,
    chapter_id: u32,
    scope: StepScope,
) -> Result<Vec<AnswerTarget<'a>>, ValidationError> {
    let chapter = structure
        .chapters
        .iter()
        .find(|c| c.id == chapter_id)
        .ok_or_else(|| {
            ValidationError::invalid_format(
                "chapterId",
                format!("step {} is not part of the {} form", chapter_id, state.action_type().label()),
            )
        })?;

    let partners: Vec<&ConsortiumPartner> = if chapter.partner_specific {
        if state.consortium.is_empty() {
            return Err(ValidationError::precondition(
                "Please add consortium partners before generating this step.",
            ));
        }
        match scope {
            StepScope::Partner(index) => {
                let partner = state.consortium.get(index).ok_or_else(|| {
                    ValidationError::out_of_range(
                        "partnerIndex",
                        0,
                        state.consortium.len() as i64 - 1,
                        index as i64,
                    )
                })?;
                vec![partner]
            }
            _ => state.consortium.iter().collect(),
        }
    } else {
        if let StepScope::Partner(_) = scope {
            return Err(ValidationError::precondition(format!(
                "Step {} is not answered per partner.",
                chapter_id
            )));
        }
        Vec::new()
    };

    let sections = chapter.sections.iter().filter(|s| match scope {
        StepScope::WorkPackage(n) => section_belongs_to_work_package(&s.id, n),
        _ => true,
    });

    let mut targets = Vec::new();
    for section in sections {
        for question in section.questions.iter().filter(|q| q.kind.is_answerable()) {
            if partners.is_empty() {
                targets.push(AnswerTarget {
                    key: question.id.clone(),
                    chapter,
                    section,
                    question,
                    partner: None,
                });
            } else {
                for partner in &partners {
                    targets.push(AnswerTarget {
                        key: partner_answer_key(&question.id, &partner.id),
                        chapter,
                        section,
                        question,
                        partner: Some(*partner),
                    });
                }
            }
        }
    }
    Ok(targets)
}

/// The answer slot for one question, found anywhere in the form.
pub fn question_target<'a>(
    structure: &'a ProposalStructure,
    state: &'a PipelineState,
    question_id: &str,
    partner_id: Option<&str>,
) -> Result<AnswerTarget<'a>, ValidationError> {
    let (chapter, section, question) = structure
        .chapters
        .iter()
        .flat_map(|c| c.sections.iter().map(move |s| (c, s)))
        .find_map(|(c, s)| s.questions.iter().find(|q| q.id == question_id).map(|q| (c, s, q)))
        .ok_or_else(|| {
            ValidationError::invalid_format("questionId", format!("unknown question '{}'", question_id))
        })?;

    if !question.kind.is_answerable() {
        return Err(ValidationError::precondition(format!(
            "Question '{}' is not a free-text question.",
            question_id
        )));
    }

    let partner = match (chapter.partner_specific, partner_id) {
        (true, Some(id)) => Some(
            state
                .consortium
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| ValidationError::invalid_format("partnerId", format!("unknown partner '{}'", id)))?,
        ),
        (true, None) => {
            return Err(ValidationError::empty_field("partnerId"));
        }
        (false, _) => None,
    };

    let key = match partner {
        Some(p) => partner_answer_key(&question.id, &p.id),
        None => question.id.clone(),
    };
    Ok(AnswerTarget {
        key,
        chapter,
        section,
        question,
        partner,
    })
}

/// Sections of the work-plan chapters that describe work package `n`.
/// Project management belongs to WP1.
fn section_belongs_to_work_package(section_id: &str, n: u32) -> bool {
    section_id.ends_with(&format!("_wp{}", n)) || (n == 1 && section_id == "wp_management")
}

/// Answer taken from session settings instead of the model.
pub fn known_answer(state: &PipelineState, target: &AnswerTarget<'_>) -> Option<String> {
    if target.partner.is_some() || target.question.kind != QuestionKind::Text {
        return None;
    }
    let value = match target.question.id.as_str() {
        "projectTitle" => state.project_title.clone().or_else(|| state.idea.title.clone()),
        "acronym" => state.acronym.clone().or_else(|| state.idea.acronym.clone()),
        _ => None,
    }?;
    Some(value).filter(|v| !v.trim().is_empty())
}

/// True when the stored answer was written by the user.
pub fn is_manual(state: &PipelineState, key: &str) -> bool {
    matches!(
        state.answers.get(key),
        Some(Answer::Wrapped {
            mode: AnswerMode::Manual,
            ..
        })
    )
}

/// Wraps generated text as a model-written answer.
pub fn ai_answer(value: impl Into<String>, sources: Vec<String>) -> Answer {
    Answer::Wrapped {
        value: value.into(),
        mode: AnswerMode::Ai,
        sources,
        last_edited_at: Some(Timestamp::now()),
    }
}

/// Generated text with a stray code fence or a one-field JSON wrapper removed.
///
/// Models sometimes answer `{"<questionId>": "..."}` or a quoted string
/// instead of prose; the text inside is used when it can be found.
pub fn clean_generated_answer(raw: &str, question_id: &str) -> String {
    let text = crate::domain::normalizer::strip_markdown_fence(raw, "markdown");
    if text.starts_with('{') || text.starts_with('"') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
            let inner = match &value {
                serde_json::Value::String(s) => Some(s.as_str()),
                serde_json::Value::Object(map) => map.get(question_id).and_then(|v| v.as_str()),
                _ => None,
            };
            if let Some(inner) = inner {
                return inner.trim().to_string();
            }
        }
    }
    text
}
