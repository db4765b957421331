//! Prompts that write answers to the official application form.

use super::{language_name, Prompt};
use crate::domain::pipeline::{AnswerTarget, ConsortiumPartner, PipelineState, QuestionKind};

/// Partner texts stay closer to the supplied facts.
pub const PARTNER_ANSWER_TEMPERATURE: f32 = 0.4;

const ANSWER_SYSTEM: &str = "You are a precise Erasmus+ expert writing an application.
RULE 1: Stick to the facts of the project context. Do NOT invent activities, partners, results or target groups that are not mentioned.
RULE 2: When details are missing, describe the approach in general terms that fit the project idea.

WORDING:
- Say \"Europe\" or \"European\" instead of \"EU\", associated non-EU countries take part too.
- No buzzwords. Name concrete, feasible technical approaches.
- Work packages and phases overlap where possible instead of waiting on each other.
- When trainers are trained, state that they then test the tools with their own learners.

FORMATTING: clean Markdown. ### headings (H3) for main parts, #### for details, - bullet lists, **bold** only for key terms.";

const PARTNER_SYSTEM: &str = "You are an Erasmus+ expert describing a partner organisation.
Use the concrete facts supplied. When information is missing, phrase it in general terms and never invent projects or figures.
FORMAT with Markdown: ## headings, - bullet points, **bold** for key terms. Write in detail.";

/// Writes one answer of the application form.
///
/// Partner-specific questions are written about the target's partner; all
/// others about the project as a whole. A stored answer and a user
/// instruction, when present, are passed along so the model revises instead
/// of starting over.
pub fn answer_question_prompt(
    state: &PipelineState,
    target: &AnswerTarget<'_>,
    instruction: Option<&str>,
    language: &str,
) -> Prompt {
    let previous = state
        .answer_text(&target.key)
        .filter(|a| !a.trim().is_empty())
        .map(|a| format!("=== PREVIOUS ANSWER (build on it) ===\n{}\n\n", a))
        .unwrap_or_default();
    let instruction = instruction
        .filter(|i| !i.trim().is_empty())
        .map(|i| format!("=== USER INSTRUCTION ===\n{}\n\n", i))
        .unwrap_or_default();

    match target.partner {
        Some(partner) => partner_prompt(state, target, partner, &previous, &instruction, language),
        None => project_prompt(state, target, &previous, &instruction, language),
    }
}

fn project_context(state: &PipelineState) -> String {
    let title = state
        .project_title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| state.idea.short_description.clone());
    let partners = state
        .consortium
        .iter()
        .map(|p| format!("{} ({})", p.name, p.country))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "PROJECT CONTEXT:
Project title: {}
Acronym: {}
Action type: {}
Sector: {}
Partners: {}
Main objective: {}
Target groups: {}
Duration: {} months
Budget: {} EUR
Work packages: {}",
        title,
        state.acronym.as_deref().unwrap_or("N/A"),
        state.action_type().code(),
        state.idea.sector.label(),
        if partners.is_empty() { "N/A".to_string() } else { partners },
        state.idea.main_objective,
        state.idea.target_groups.join(", "),
        state.configuration.duration,
        state.configuration.total_budget,
        state.configuration.wp_count,
    )
}

fn project_prompt(
    state: &PipelineState,
    target: &AnswerTarget<'_>,
    previous: &str,
    instruction: &str,
    language: &str,
) -> Prompt {
    let length = if target.question.kind == QuestionKind::Text {
        "Answer in one short line, no Markdown, no explanation."
    } else {
        "Write a professional, convincing answer of about 300-500 words (2000-3500 characters) in at least 2-3 structured parts.
- Use concrete examples and numbers that follow from the project context
- Use Erasmus+ terminology
- No filler phrases, only substantial statements"
    };
    let text = format!(
        "{context}

=== QUESTION ===
Chapter: {chapter}
Section: {section}
Question: \"{question}\"

{previous}{instruction}=== ANSWER FORMAT ===
{length}

Answer in {language}:",
        context = project_context(state),
        chapter = target.chapter.title,
        section = target.section.title,
        question = target.question.full_question,
        previous = previous,
        instruction = instruction,
        length = length,
        language = language_name(language),
    );
    Prompt::new(text, ANSWER_SYSTEM)
}

fn partner_facts(partner: &ConsortiumPartner) -> String {
    let role = partner.role.clone().unwrap_or_else(|| {
        if partner.is_lead {
            "Coordinator".to_string()
        } else {
            "Partner".to_string()
        }
    });
    let mut facts = vec![
        format!("Name: {}", partner.name),
        format!("Country: {}", partner.country),
        format!(
            "Organisation type: {}",
            if partner.organization_type.is_empty() {
                "not stated"
            } else {
                partner.organization_type.as_str()
            }
        ),
        format!("Role in the project: {}", role),
    ];
    if partner.expertise.is_empty() {
        facts.push("Expertise: not stated".to_string());
    } else {
        facts.push(format!("Expertise: {}", partner.expertise.join(", ")));
    }
    facts.join("\n")
}

fn partner_structure(question_id: &str) -> &'static str {
    match question_id {
        "org_presentation" => "## About the organisation
## Field of work and expertise
## Target groups and reach
## Role in the consortium",
        "org_experience" => "## Thematic expertise
## Project experience
## Methodological competence
## Contribution to this project",
        _ => "## Approach
## Contribution of this partner",
    }
}

fn partner_prompt(
    state: &PipelineState,
    target: &AnswerTarget<'_>,
    partner: &ConsortiumPartner,
    previous: &str,
    instruction: &str,
    language: &str,
) -> Prompt {
    let text = format!(
        "TASK: Answer the question below for ONE partner organisation in detail (400-700 words).

=== PARTNER DATA ===
{facts}

{context}

QUESTION: \"{question}\"

{previous}{instruction}STRUCTURE:
{structure}

Write in {language}.",
        facts = partner_facts(partner),
        context = project_context(state),
        question = target.question.full_question,
        previous = previous,
        instruction = instruction,
        structure = partner_structure(&target.question.id),
        language = language_name(language),
    );
    Prompt::new(text, PARTNER_SYSTEM).with_temperature(PARTNER_ANSWER_TEMPERATURE)
}
