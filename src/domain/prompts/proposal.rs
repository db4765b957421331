//! Prompts for translation, evaluation and partner extraction.

use super::{language_name, Prompt, TRANSLATION_TEMPERATURE};
use crate::domain::pipeline::PipelineState;
use crate::domain::proposal::TranslationPayload;

/// Characters of fetched website text passed to partner extraction.
pub const WEBSITE_CONTENT_LIMIT: usize = 30_000;

const QUESTION_EVALUATION_SHAPE: &str = r#"{
  "score": number (0-10),
  "improvements": [
    {
      "issue": "What is the problem? (short)",
      "location": "Where in the text? (quote or description)",
      "suggestion": "What should change?",
      "improvedText": "The improved passage only, with **bold** and - bullets where fitting"
    }
  ]
}"#;

const PROJECT_EVALUATION_SHAPE: &str = r#"{
  "score": 0-100,
  "categories": {
    "relevance": {"score": 0-30, "maxScore": 30, "feedback": "One concise paragraph on relevance.", "strengths": ["..."], "weaknesses": ["..."]},
    "design": {"score": 0-20, "maxScore": 20, "feedback": "One paragraph on design and implementation (WPs, activities).", "strengths": ["..."], "weaknesses": ["..."]},
    "partnership": {"score": 0-20, "maxScore": 20, "feedback": "One paragraph on the partnership (profiles, tasks).", "strengths": ["..."], "weaknesses": ["..."]},
    "impact": {"score": 0-30, "maxScore": 30, "feedback": "One paragraph on impact (KPIs, sustainability, dissemination).", "strengths": ["..."], "weaknesses": ["..."]}
  },
  "overallFeedback": "Summary assessment (2-3 sentences).",
  "suggestions": ["Concrete suggestion 1", "Concrete suggestion 2", "Concrete suggestion 3"]
}"#;

const PARTNER_SHAPE: &str = r#"{
  "organizationName": "Full name",
  "acronym": "Short name or null",
  "country": "ISO 2-letter code (DE, AT, ES, ...)",
  "city": "City",
  "website": "URL",
  "organizationType": "HIGHER_EDUCATION|SCHOOL|VET_PROVIDER|ADULT_EDUCATION|NGO|PUBLIC_AUTHORITY|SME|LARGE_ENTERPRISE|RESEARCH_INSTITUTE|SOCIAL_ENTERPRISE|OTHER",
  "missionStatement": "Short mission description (max 200 words) or null",
  "expertiseAreas": [
    {"domain": "CURRICULUM_DEVELOPMENT|DIGITAL_TOOLS|TRAINING_DELIVERY|RESEARCH_EVALUATION|TARGET_GROUP_ACCESS|POLICY_ADVOCACY|COMMUNICATION_MEDIA|TECHNICAL_DEVELOPMENT|QUALITY_ASSURANCE|PROJECT_MANAGEMENT|OTHER", "description": "Description", "level": 1-5}
  ],
  "targetGroups": ["Target group"],
  "dataQuality": 0-100
}"#;

/// Plain-text translation that keeps structure and EU terminology.
pub fn translate_text_prompt(text: &str, target_language: &str, context: Option<&str>) -> Prompt {
    let context = context
        .filter(|c| !c.trim().is_empty())
        .map(|c| format!("CONTEXT: This text is part of an Erasmus+ {} application.\n", c))
        .unwrap_or_default();
    let prompt = format!(
        "You are a professional translator specializing in EU project proposals (Erasmus+, Horizon Europe, etc.).

TASK: Translate the following text into {}.

RULES:
1. Keep the EXACT structure, formatting and paragraph breaks
2. Keep EU terminology accurate (e.g. \"Work Package\", \"Dissemination\", \"Multiplier Event\")
3. Keep proper nouns, organization names, country names and abbreviations unchanged
4. Keep bullet points, numbered lists and headings as they are
5. Use formal, professional language suitable for an EU funding application
6. Do NOT add commentary, notes or explanations
7. Do NOT wrap the output in quotes or code blocks
8. Output ONLY the translated text

{}
TEXT TO TRANSLATE:
{}",
        language_name(target_language),
        context,
        text
    );
    Prompt::new(prompt, "You are a professional translator.").with_temperature(TRANSLATION_TEMPERATURE)
}

/// Sends the translatable subset of a project as JSON and asks for the same shape back.
pub fn translate_project_prompt(payload: &TranslationPayload) -> Result<Prompt, serde_json::Error> {
    let json = serde_json::to_string_pretty(payload)?;
    let system = "You are a professional translator for Erasmus+ project applications.
Translate the following JSON content to ACADEMIC ENGLISH.

RULES:
1. Keep the exact JSON structure.
2. Do NOT translate ids, codes or keys.
3. Translate values to high-quality, formal English.
4. Keep markdown formatting.
5. Return ONLY the valid JSON. No markdown code blocks.";
    Ok(Prompt::new(json, system).with_temperature(TRANSLATION_TEMPERATURE))
}

/// Project metadata shown to the question evaluator.
#[derive(Debug, Clone, Default)]
pub struct QuestionContext {
    pub project_title: Option<String>,
    pub sector: Option<String>,
}

/// Feedback on one answer: a 0-10 score and 3-5 concrete improvements.
pub fn evaluate_question_prompt(
    question: &str,
    answer: &str,
    context: &QuestionContext,
    language: &str,
) -> Prompt {
    let system = format!(
        "You are an Erasmus+ proposal reviewer.

TASK: Find CONCRETE improvements in the text.

PROJECT CONTEXT:
- Project title: {title}
- Sector: {sector}

QUESTION: \"{question}\"

CURRENT ANSWER:
\"{answer}\"

REVIEW CRITERIA:
1. Concreteness (missing numbers, examples, tool names?)
2. Completeness (missing aspects?)
3. Erasmus+ relevance (inclusion, digital, green, democracy)
4. Clarity and precision

Find 3-5 CONCRETE improvement points. Each one names a SPECIFIC place in the text, makes a CONCRETE suggestion and supplies the IMPROVED passage (only that part, not the whole text).

FORMATTING:
- In \"issue\", \"location\", \"suggestion\": plain prose WITHOUT markdown
- In \"improvedText\": use **bold** for headings and key terms, - for bullet lists

Answer in JSON:
{shape}

If the text is very good, fewer points are fine.
Language: {language}",
        title = context.project_title.as_deref().unwrap_or("N/A"),
        sector = context.sector.as_deref().unwrap_or("N/A"),
        question = question,
        answer = answer,
        shape = QUESTION_EVALUATION_SHAPE,
        language = language_name(language),
    );
    let payload = serde_json::json!({ "question": question, "answer": answer }).to_string();
    Prompt::new(payload, system)
}

/// Full-proposal review against the four award criteria.
pub fn evaluate_project_prompt(state: &PipelineState, document: &str, language: &str) -> Prompt {
    let system = format!(
        "You are a strict, highly qualified official Erasmus+ evaluator of the European Commission.
Assess a submitted proposal precisely against the official quality criteria.
You are critical but constructive. You penalize empty phrases, missing KPIs and vague statements, and reward specific, well-founded concepts tailored to the target group.

You score exactly 4 categories:
1. Relevance of the project (max 30 points)
2. Quality of project design and implementation (max 20 points)
3. Quality of partnership and cooperation arrangements (max 20 points)
4. Impact and dissemination (max 30 points)

Return your evaluation in this strict JSON format:
{shape}

SCORING RULES:
- Deduct heavily for answers marked \"[NOT ANSWERED]\". If essential chapters (such as impact or partnership) are incomplete, the total score must not exceed 50.
- An average draft scores 60-70. Give 85+ only when specific budgets, clear milestones and fine-grained KPIs are present.
- Answer entirely in {language}.
- Answer ONLY with valid JSON. A ```json code block is allowed, nothing else.",
        shape = PROJECT_EVALUATION_SHAPE,
        language = language_name(language),
    );
    let text = format!(
        "Please evaluate the following Erasmus+ application:

Title: {}
Action type: {}
Duration: {} months
Budget: {} EUR

### FULL APPLICATION TEXT ###
{}",
        state.project_title.as_deref().unwrap_or("Untitled"),
        state.action_type().code(),
        state.configuration.duration,
        state.configuration.total_budget,
        document
    );
    Prompt::new(text, system)
}

/// Partner profile from website text, or from the URL alone when fetching failed.
pub fn extract_partner_prompt(
    url: &str,
    website_text: Option<&str>,
    fetch_error: Option<&str>,
    language: &str,
) -> Prompt {
    let content = website_text.filter(|t| !t.trim().is_empty());
    let grounding = match content {
        Some(_) => "IMPORTANT: the actual website content is provided.
Analyze ONLY this information and invent NOTHING.
If something is not in the text, use null or empty arrays."
            .to_string(),
        None => format!(
            "NOTE: the website could not be fetched ({}).
Use the URL and your knowledge of the organisation.
Mark uncertain information with a lower dataQuality (30-50).",
            fetch_error.unwrap_or("unknown error")
        ),
    };
    let system = format!(
        "You are an expert in Erasmus+ projects analyzing organisations for EU funding applications.
Respond in {}.

{}

Be especially thorough with: organisation name, type, country, city; expertise areas relevant to EU projects; previous EU projects or international cooperation; target groups the organisation works with.",
        language_name(language),
        grounding
    );

    let website = content
        .map(|t| {
            format!(
                "\nWEBSITE CONTENT:\n===============\n{}\n===============\n",
                super::truncate_chars(t, WEBSITE_CONTENT_LIMIT)
            )
        })
        .unwrap_or_default();
    let text = format!(
        "Analyze this organisation: {}
{}
Return a JSON object with this structure (ONLY the JSON, no explanations):
{}",
        url, website, PARTNER_SHAPE
    );
    Prompt::new(text, system)
}
