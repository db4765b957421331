//! Prompts for picking consortium partners and describing them.

use serde_json::json;

use super::{language_name, Prompt};
use crate::domain::concept::{PartnerProfile, ProjectBrief};

pub const PARTNER_SUGGESTION_TEMPERATURE: f32 = 0.4;
const CORRECTION_TEMPERATURE: f32 = 0.5;

/// Word range a partner description is written to.
pub const DESCRIPTION_WORDS: &str = "1000-1500";

const SUGGESTIONS_SHAPE: &str = r#"{
  "suggestedPartnerIds": ["id1", "id2", "id3"],
  "suggestions": [
    {
      "partnerId": "id1",
      "reason": "Short reason why this partner fits",
      "suggestedRole": "LEAD|CONTENT_EXPERT|PILOT_SITE|DISSEMINATION|EVALUATION",
      "matchScore": 85
    }
  ],
  "consortiumAnalysis": {
    "coverageAssessment": "How well does the consortium cover every aspect?",
    "missingExpertise": ["If something is missing"],
    "geographicSpread": "Assessment of the geographic distribution",
    "overallScore": 78
  }
}"#;

const CONSORTIUM_ADVISOR_SYSTEM: &str = "You are an Erasmus+ programme advisor with 15 years of experience in building European project consortia.
A strong consortium follows these rules:
- At least 3 partners from 3 different countries for cooperation partnerships.
- COMPLEMENTARY EXPERTISE: a mix of organisation types (university, NGO, SME).
- TECH & TOUCH: pair partners that deliver methodological excellence with partners that have direct access to the target group.
- GEOGRAPHIC DIVERSITY: balance between west and east, north and south.
- ROLE CLARITY: no partner without an indispensable contribution.";

fn candidate_summary(partner: &PartnerProfile) -> serde_json::Value {
    let expertise = partner.top_expertise(usize::MAX);
    json!({
        "id": partner.id,
        "name": partner.organization_name,
        "country": partner.country,
        "type": partner.organization_type,
        "expertise": if expertise.is_empty() { "not stated".to_string() } else { expertise.join(", ") },
        "targetGroups": if partner.target_groups.is_empty() {
            "not stated".to_string()
        } else {
            partner.target_groups.join(", ")
        },
    })
}

/// Picks the 3-5 best fitting partners from a candidate list.
pub fn suggest_partners_prompt(
    candidates: &[PartnerProfile],
    brief: &ProjectBrief,
    language: &str,
) -> Prompt {
    let summaries: Vec<serde_json::Value> = candidates.iter().map(candidate_summary).collect();
    let listing = serde_json::to_string_pretty(&summaries).unwrap_or_else(|_| "[]".to_string());
    let action = brief.action_type.code();
    let text = format!(
        "Analyse which partners from the available list fit this project best.

PROJECT IDEA:
{description}

MAIN OBJECTIVE:
{objective}

TARGET GROUPS:
{groups}

SECTOR: {sector}
ACTION TYPE: {action}

AVAILABLE PARTNERS:
{listing}

YOUR TASK:
1. Check every partner for fit with the project idea
2. Choose the 3-5 best fitting partners, using ONLY ids from the list above
3. Briefly justify each choice
4. Propose a role split (who should lead?)

CRITERIA:
- At least {countries} different countries for {action}
- Matching expertise areas
- Experience with the target groups
- Matching sector
- Complementary strengths

Answer ONLY in JSON:
{shape}",
        description = brief.description,
        objective = brief.main_objective,
        groups = brief.target_groups.join(", "),
        sector = brief.sector.label(),
        action = action,
        listing = listing,
        countries = brief.action_type.min_countries(),
        shape = SUGGESTIONS_SHAPE,
    );
    let system = format!("{}\n\nRespond in {}.", CONSORTIUM_ADVISOR_SYSTEM, language_name(language));
    Prompt::new(text, system).with_temperature(PARTNER_SUGGESTION_TEMPERATURE)
}

fn partner_facts(partner: &PartnerProfile) -> String {
    let mut lines = vec![format!("ORGANISATION: {}", partner.organization_name)];
    if let Some(acronym) = partner.acronym.as_deref().filter(|a| !a.is_empty()) {
        lines.push(format!("ACRONYM: {}", acronym));
    }
    lines.push(format!("COUNTRY: {}", partner.country));
    if let Some(city) = partner.city.as_deref().filter(|c| !c.is_empty()) {
        lines.push(format!("CITY: {}", city));
    }
    lines.push(format!("ORGANISATION TYPE: {}", partner.organization_type));
    lines.push(String::new());
    lines.push("MISSION/PROFILE:".to_string());
    lines.push(
        partner
            .mission_statement
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "not stated".to_string()),
    );
    lines.push(String::new());
    lines.push("EXPERTISE:".to_string());
    if partner.expertise_areas.is_empty() {
        lines.push("not stated".to_string());
    } else {
        lines.extend(partner.expertise_areas.iter().map(|e| {
            if e.description.is_empty() {
                format!("- {}", e.domain)
            } else {
                format!("- {}: {}", e.domain, e.description)
            }
        }));
    }
    lines.push(String::new());
    lines.push(format!(
        "TARGET GROUPS: {}",
        if partner.target_groups.is_empty() {
            "not stated".to_string()
        } else {
            partner.target_groups.join(", ")
        }
    ));
    lines.join("\n")
}

/// A 1000-1500 word profile of a partner for the application.
pub fn partner_description_prompt(
    partner: &PartnerProfile,
    brief: Option<&ProjectBrief>,
    additional_info: Option<&str>,
    language: &str,
) -> Prompt {
    let context = brief
        .map(|b| {
            let mut lines = vec![
                "PROJECT CONTEXT:".to_string(),
                format!("- Action type: {}", b.action_type.code()),
                format!("- Sector: {}", b.sector.label()),
            ];
            if let Some(title) = b.title.as_deref().filter(|t| !t.is_empty()) {
                lines.push(format!("- Project title: {}", title));
            }
            if !b.description.trim().is_empty() {
                lines.push(format!("- Project description: {}", b.description));
            }
            lines.join("\n") + "\n\n"
        })
        .unwrap_or_default();
    let additional = additional_info
        .filter(|a| !a.trim().is_empty())
        .map(|a| {
            format!(
                "ADDITIONAL INFORMATION FROM THE USER (high priority, not found on the website):\n{}\n\n",
                a
            )
        })
        .unwrap_or_default();

    let text = format!(
        "Write a professional partner description for a European project application.

CORE RULES:
1. NO PARTNER WITHOUT A ROLE: the organisation has a clearly defined, indispensable task.
2. DIVERSITY IS QUALITY: stress the synergy with the other partners.
3. TECH & TOUCH: state whether the organisation mainly delivers methods and technical expertise or access to the target group and local implementation.

{facts}

{context}{additional}REQUIREMENTS:
1. Length: {words} words
2. Write in {language}, formal and professional, third person
3. Structure: profile and history; core competences; experience with target groups; relevant European project experience; specific contribution to the project; capacities and resources
4. Use concrete numbers and facts where available
5. Do NOT invent information that is not in the data. Phrase missing details in general terms.

Return ONLY the description, without headings or meta comments.",
        facts = partner_facts(partner),
        context = context,
        additional = additional,
        words = DESCRIPTION_WORDS,
        language = language_name(language),
    );
    Prompt::new(text, "You are an experienced Erasmus+ application writer.")
}

/// Applies a correction to an existing partner description.
pub fn correct_partner_description_prompt(existing: &str, instruction: &str, language: &str) -> Prompt {
    let text = format!(
        "Correct an existing partner description.

CURRENT DESCRIPTION:
{existing}

CORRECTION:
{instruction}

TASK:
1. Read the current description carefully
2. Apply the requested correction
3. Keep the rest of the text consistent
4. Keep the professional tone
5. Keep roughly the same length ({words} words)

Write in {language}.

Return ONLY the corrected description, no explanations or meta comments.",
        existing = existing,
        instruction = instruction,
        words = DESCRIPTION_WORDS,
        language = language_name(language),
    );
    Prompt::new(text, "You are an experienced Erasmus+ application writer.").with_temperature(CORRECTION_TEMPERATURE)
}
