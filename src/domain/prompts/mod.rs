//! Prompt templates.
//!
//! Pure string builders. Each returns a [`Prompt`] holding the user text,
//! the system instruction and the sampling temperature the step uses; the
//! caller turns it into a completion request.

mod concept;
mod partners;
mod pipeline;
mod proposal;

pub use concept::{
    analyze_source_prompt, compare_concepts_prompt, concepts_context, consortium_text,
    detailed_concept_prompt, enhance_idea_prompt, generate_concepts_prompt,
    generate_objectives_prompt, generate_work_packages_prompt, regenerate_objective_prompt,
    translate_concept_prompt, ANALYSIS_CONTENT_LIMIT, UNANALYZED_CONTENT_LIMIT,
};
pub use partners::{
    correct_partner_description_prompt, partner_description_prompt, suggest_partners_prompt,
    DESCRIPTION_WORDS, PARTNER_SUGGESTION_TEMPERATURE,
};
pub use pipeline::{answer_question_prompt, PARTNER_ANSWER_TEMPERATURE};
pub use proposal::{
    evaluate_project_prompt, evaluate_question_prompt, extract_partner_prompt,
    translate_project_prompt, translate_text_prompt, QuestionContext, WEBSITE_CONTENT_LIMIT,
};

use crate::domain::foundation::Sector;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const JSON_TEMPERATURE: f32 = 0.5;
pub const TRANSLATION_TEMPERATURE: f32 = 0.3;
pub const CONCEPT_TRANSLATION_TEMPERATURE: f32 = 0.2;

/// A rendered prompt ready to be sent to a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub text: String,
    pub system: String,
    pub temperature: f32,
}

impl Prompt {
    pub fn new(text: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            system: system.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// English name for a language code; unknown codes are passed through.
pub fn language_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "de" => "German",
        "fr" => "French",
        "es" => "Spanish",
        "it" => "Italian",
        "ro" => "Romanian",
        "hr" => "Croatian",
        other => other,
    }
}

pub(crate) fn sector_label(sector: Sector) -> &'static str {
    sector.label()
}

/// At most `max` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
