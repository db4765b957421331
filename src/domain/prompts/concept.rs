//! Prompts for the six concept-development steps.

use super::{
    language_name, sector_label, truncate_chars, Prompt, CONCEPT_TRANSLATION_TEMPERATURE,
    JSON_TEMPERATURE,
};
use crate::domain::concept::{ConceptProposal, ConceptState};
use crate::domain::foundation::ActionType;

/// Characters of a source sent for analysis.
pub const ANALYSIS_CONTENT_LIMIT: usize = 10_000;
/// Characters of a not-yet-analyzed source used as extra concept context.
pub const UNANALYZED_CONTENT_LIMIT: usize = 1_500;

const JSON_ONLY: &str = "You are an Erasmus+ project developer. Answer ONLY in JSON. No markdown.";

const WORDING_RULES: &str = "\
WORDING AND LOGIC RULES:
- INCLUSIVE WORDING: say \"Europe\" or \"European\" instead of \"EU\"; associated non-EU countries take part in Erasmus+ on equal terms.
- NO BUZZWORDS: replace empty phrases like \"AI-based learning companion\" with concrete, feasible technical approaches (e.g. \"web application connected to an existing LLM API\").
- NO BOTTLENECKS: project phases run in parallel or overlap. Development starts on preliminary analysis results.
- TRAIN-THE-TRAINER: when educators are trained, they must then pilot the methods with their own learners.";

const ENHANCE_SHAPE: &str = r#"{
  "enhancedIdea": "The refined project idea...",
  "enhancedProblem": "The refined problem statement..."
}"#;

const ANALYSIS_SHAPE: &str = r#"{
  "summary": "Short summary (3-4 sentences)",
  "keyFindings": ["Finding 1", "Finding 2", "Finding 3", "Finding 4", "Finding 5"]
}"#;

const COMPARISON_SHAPE: &str = r#"{
  "recommendationId": "The exact ID of the concept you recommend most",
  "overallSummary": "Reasoning for the choice in 2-3 clear sentences.",
  "comparisons": [
    {
      "conceptId": "The exact ID of the assessed concept",
      "strengths": ["Strength 1", "Strength 2"],
      "weaknesses": ["Weakness 1 (constructive)", "Weakness 2"],
      "improvementTip": "One concrete, short tip to improve this concept"
    }
  ]
}"#;

const OBJECTIVES_SHAPE: &str = r#"{
  "objectives": [
    {
      "text": "The SMART objective",
      "indicators": ["Indicator 1 with target value", "Indicator 2 with target value"],
      "sources": ["Which source evidences the need for this objective"],
      "erasmusPriority": "Inclusion / Digital / Green / Democratic participation"
    }
  ]
}"#;

const SINGLE_OBJECTIVE_SHAPE: &str = r#"{
  "objective": {
    "text": "New SMART objective",
    "indicators": ["Indicator 1", "Indicator 2"],
    "sources": ["Source 1"],
    "erasmusPriority": "Priority"
  }
}"#;

fn priority_focus(state: &ConceptState) -> &str {
    if state.priority_focus.trim().is_empty() {
        "No specific priority given"
    } else {
        &state.priority_focus
    }
}

fn additional_instructions(state: &ConceptState, heading: &str) -> String {
    if state.additional_instructions.trim().is_empty() {
        String::new()
    } else {
        format!("{}:\n{}\n", heading, state.additional_instructions)
    }
}

fn action_type_label(action_type: ActionType) -> &'static str {
    match action_type {
        ActionType::Ka210 => "KA210 (small-scale partnership)",
        ActionType::Ka220 => "KA220 (cooperation partnership)",
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Context builders
// ════════════════════════════════════════════════════════════════════════════════

/// Analyzed sources with summary and findings.
fn analyzed_source_context(state: &ConceptState) -> String {
    state
        .analyzed_sources()
        .map(|s| {
            format!(
                "SOURCE \"{}\":\n{}\nFindings: {}",
                s.title,
                s.summary.as_deref().unwrap_or_default(),
                s.key_findings.join("; ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Raw content of sources nobody analyzed yet, truncated.
fn unanalyzed_source_context(state: &ConceptState) -> String {
    state
        .sources
        .iter()
        .filter(|s| !s.is_analyzed && !s.content.trim().is_empty())
        .map(|s| {
            format!(
                "SOURCE \"{}\":\n{}",
                s.title,
                truncate_chars(&s.content, UNANALYZED_CONTENT_LIMIT)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One line per analyzed source: title and findings.
fn findings_context(state: &ConceptState) -> String {
    state
        .analyzed_sources()
        .map(|s| format!("\"{}\": {}", s.title, s.key_findings.join("; ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The concepts as a block the comparison prompt can cite by id.
pub fn concepts_context(concepts: &[ConceptProposal]) -> String {
    concepts
        .iter()
        .map(|c| {
            format!(
                "ID: {}\nTITLE: {}\nACRONYM: {}\nSUMMARY: {}\nINNOVATION: {}\nOUTPUTS: {}",
                c.id,
                c.title,
                c.acronym,
                c.summary,
                c.innovation,
                c.main_outputs.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// `- ROLE: Name (CC) - Expertise: a, b, c` per selected partner.
pub fn consortium_text(state: &ConceptState) -> String {
    state
        .selected_partners
        .iter()
        .map(|sp| {
            format!(
                "- {}: {} ({}) - Expertise: {}",
                sp.role,
                sp.partner.organization_name,
                sp.partner.country,
                sp.partner.top_expertise(3).join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn numbered_objectives(state: &ConceptState, with_priority: bool) -> String {
    state
        .selected_objectives()
        .enumerate()
        .map(|(i, o)| {
            if with_priority {
                format!(
                    "{}. {} (Priority: {})",
                    i + 1,
                    o.text,
                    o.erasmus_priority.as_deref().unwrap_or("None")
                )
            } else {
                format!("{}. {}", i + 1, o.text)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn work_plan_text(state: &ConceptState) -> String {
    state
        .selected_work_packages()
        .map(|wp| {
            let label = match state.action_type {
                ActionType::Ka210 => format!("Activity {}", wp.number),
                ActionType::Ka220 => format!("WP{}", wp.number),
            };
            format!(
                "{}: {} (Lead: {})\n{}\nResults: {}",
                label,
                wp.title,
                wp.lead,
                wp.description,
                wp.deliverables.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ════════════════════════════════════════════════════════════════════════════════
// Step 1
// ════════════════════════════════════════════════════════════════════════════════

pub fn enhance_idea_prompt(state: &ConceptState) -> Prompt {
    let text = format!(
        "You are an experienced Erasmus+ project developer in the field of {sector}.

A user described their project idea roughly and informally. Turn it into a clear, precise and professional wording suitable for EU funding applications.

RAW IDEA:
\"{idea}\"

TARGET GROUP: {target}
ERASMUS+ PRIORITY: {priority}

RAW PROBLEM:
\"{problem}\"

TASK:
1. Understand the core of the idea.
2. Rephrase the idea as a clear, professional project approach (3-4 sentences).
3. Rephrase the problem clearly and show the need (3-4 sentences).

RULES:
- Keep the user's CONTENT and INTENTION
- Do NOT invent anything the user did not say
- Professional, not overly academic
- Use the relevant technical terms so the text works well for research prompts

Answer ONLY in JSON:
{shape}",
        sector = sector_label(state.sector),
        idea = state.idea,
        target = state.target_group,
        priority = priority_focus(state),
        problem = state.problem,
        shape = ENHANCE_SHAPE,
    );
    Prompt::new(text, JSON_ONLY)
}

// ════════════════════════════════════════════════════════════════════════════════
// Step 2
// ════════════════════════════════════════════════════════════════════════════════

pub fn analyze_source_prompt(title: &str, content: &str) -> Prompt {
    let text = format!(
        "Analyze this research source and extract the most important findings.

SOURCE: \"{}\"

CONTENT:
{}

Answer in JSON:
{}",
        title,
        truncate_chars(content, ANALYSIS_CONTENT_LIMIT),
        ANALYSIS_SHAPE
    );
    Prompt::new(text, "You are a research analyst. Answer ONLY in JSON.")
}

pub fn generate_concepts_prompt(state: &ConceptState, language: &str) -> Prompt {
    let small = state.action_type == ActionType::Ka210;
    let frame = if small {
        "IMPORTANT - KA210 framework:
- Budget: max. 60,000 EUR
- Duration: 6-24 months
- At least 2 partners from 2 countries
- SIMPLE, feasible activities
- Fewer outputs than KA220 (2-3 instead of 4-6)
- No formal work packages, direct activities instead"
    } else {
        "IMPORTANT - KA220 framework:
- Budget: 120,000-400,000 EUR
- Duration: 12-36 months
- At least 3 partners from 3 countries
- Transnational cooperation and innovation
- 3-6 concrete outputs
- Formal work package structure with WP1 Management"
    };
    let scale = if small {
        "Keep the concepts REALISTIC for a small budget (max 60k) and short duration."
    } else {
        "Use the larger budget and longer duration for ambitious, innovative approaches."
    };
    let (summary_len, innovation_len) = if small { ("3-4", "2-3") } else { ("4-5", "3-4") };
    let extra_objective = if small { "" } else { ", \"Objective 3\"" };
    let extra_output = if small { "" } else { ", \"Output 3: description\"" };

    let further = unanalyzed_source_context(state);
    let further = if further.is_empty() {
        String::new()
    } else {
        format!("\nFURTHER SOURCES:\n{}", further)
    };

    let text = format!(
        "You are an experienced Erasmus+ project developer in the field of {sector}.

PROJECT IDEA: \"{idea}\"
TARGET GROUP: {target}
ERASMUS+ PRIORITY: {priority}
PROBLEM: \"{problem}\"
ACTION TYPE: {action}
{frame}

RESEARCH RESULTS:
{sources}{further}

{instructions}
TASK: Develop 3 DIFFERENT concept proposals for an Erasmus+ {code} project.
Each concept follows a DIFFERENT approach, but all of them must treat the priority (\"{priority}\") as the common thread.
They must differ clearly in method, focus and innovation, and the kind of outputs.

{scale}
Build on the research results and cite concrete data.

{rules}

LANGUAGE: Answer in {language}.
EXCEPTION: project title and acronym MUST be in English; the final application is submitted in English.

ACRONYM RULE: the acronym is a creative English word where EVERY letter stands for a word of the English title.
Examples: BRIDGE = Building Resilience through Inclusive Digital Growth in Education, LEARN = Leveraging Education for Accessible Resources Network.

Answer in JSON:
{{
  \"concepts\": [
    {{
      \"title\": \"ENGLISH project title containing the acronym letters\",
      \"acronym\": \"CREATIVE ENGLISH acronym (max 10 letters)\",
      \"summary\": \"Summary in {summary_len} sentences\",
      \"problemStatement\": \"Which specific problem does this concept address? (3-4 sentences, citing studies)\",
      \"innovation\": \"What is new? ({innovation_len} sentences)\",
      \"targetGroups\": [\"Target group 1\", \"Target group 2\"],
      \"objectives\": [\"Objective 1\", \"Objective 2\"{extra_objective}],
      \"mainOutputs\": [\"Output 1: description\", \"Output 2: description\"{extra_output}],
      \"erasmusPriorities\": [\"Which Erasmus+ priorities are addressed\"]
    }}
  ]
}}

IMPORTANT: 3 concepts that differ clearly from each other!",
        sector = sector_label(state.sector),
        idea = state.idea_text(),
        target = state.target_group,
        priority = priority_focus(state),
        problem = state.problem_text(),
        action = action_type_label(state.action_type),
        frame = frame,
        sources = analyzed_source_context(state),
        further = further,
        instructions = additional_instructions(state, "ADDITIONAL INSTRUCTIONS (MUST BE INTEGRATED)"),
        code = state.action_type.code(),
        scale = scale,
        rules = WORDING_RULES,
        language = language_name(language),
        summary_len = summary_len,
        innovation_len = innovation_len,
        extra_objective = extra_objective,
        extra_output = extra_output,
    );
    Prompt::new(text, JSON_ONLY)
}

pub fn compare_concepts_prompt(state: &ConceptState) -> Prompt {
    let budget_note = match state.action_type {
        ActionType::Ka210 => " (small-scale partnership, budget max 60k)",
        ActionType::Ka220 => " (cooperation partnership)",
    };
    let text = format!(
        "You are a strict but constructive evaluator of Erasmus+ project concepts in the field of {sector}.

ORIGINAL NEED:
Project idea: \"{idea}\"
Target group: {target}
Problem: \"{problem}\"
Action type: {code}{budget_note}
Erasmus+ priority: {priority}

CONCEPTS TO ASSESS:
{concepts}

TASK:
Compare these {count} concepts directly. Which one has the best chance of funding and solves the target group's problem most efficiently within the chosen action type?

Criteria:
1. Relevance and fit to problem and target group
2. Innovation and method
3. Feasibility, especially for the {code} budget
4. Integration of the Erasmus+ priority

Answer ONLY in JSON:
{shape}",
        sector = sector_label(state.sector),
        idea = state.idea_text(),
        target = state.target_group,
        problem = state.problem_text(),
        code = state.action_type.code(),
        budget_note = budget_note,
        priority = priority_focus(state),
        concepts = concepts_context(&state.concepts),
        count = state.concepts.len(),
        shape = COMPARISON_SHAPE,
    );
    Prompt::new(text, "You are a project evaluator. Answer ONLY in JSON.").with_temperature(JSON_TEMPERATURE)
}

// ════════════════════════════════════════════════════════════════════════════════
// Step 4
// ════════════════════════════════════════════════════════════════════════════════

pub fn generate_objectives_prompt(state: &ConceptState, concept: &ConceptProposal) -> Prompt {
    let small = state.action_type == ActionType::Ka210;
    let count = if small { "2-3" } else { "3-5" };
    let months = state.duration;
    let text = format!(
        "You are an Erasmus+ project planner{planner}.

ORIGINAL IDEA:
\"{idea}\"

CONCEPT: \"{title}\"
{summary}

PROBLEM: {problem}
INNOVATION: {innovation}
ACTION TYPE: {action}
PROJECT DURATION: {months} MONTHS. Every time reference in the objectives must fit these {months} months.

RESEARCH SOURCES:
{sources}

{instructions}
TASK: Define {count} SMART objectives for this project.
Each objective must:
- be Specific, Measurable, Achievable, Relevant, Time-bound
- have concrete indicators (numbers!)
- refer to the research sources that evidence the need
- be assigned to an Erasmus+ priority
- fit the actual project duration ({months} months){realistic}

Answer in JSON:
{shape}",
        planner = if small { " for small-scale partnerships (KA210)" } else { "" },
        idea = state.idea_text(),
        title = concept.title,
        summary = concept.summary,
        problem = concept.problem_statement,
        innovation = concept.innovation,
        action = action_type_label(state.action_type),
        months = months,
        sources = findings_context(state),
        instructions = additional_instructions(state, "ADDITIONAL INSTRUCTIONS (MUST BE REFLECTED IN THE OBJECTIVES)"),
        count = count,
        realistic = if small { "\n- be REALISTIC for a small budget and short duration" } else { "" },
        shape = OBJECTIVES_SHAPE,
    );
    Prompt::new(text, "You are a project planner. Answer ONLY in JSON.")
}

pub fn regenerate_objective_prompt(
    state: &ConceptState,
    concept: &ConceptProposal,
    objective_id: &crate::domain::foundation::EntityId,
) -> Prompt {
    let others = state
        .objectives
        .iter()
        .filter(|o| &o.id != objective_id)
        .map(|o| format!("- {}", o.text))
        .collect::<Vec<_>>()
        .join("\n");
    let others = if others.is_empty() {
        "No other objectives left.".to_string()
    } else {
        others
    };

    let text = format!(
        "You are an Erasmus+ project planner.

CONCEPT: \"{title}\"
{summary}
PROBLEM: {problem}
INNOVATION: {innovation}
ACTION TYPE: {code}

RESEARCH SOURCES:
{sources}

EXISTING OBJECTIVES (DO NOT DUPLICATE):
{others}

TASK: Generate exactly ONE NEW SMART objective that complements the existing ones and relates to the sources.
It must be Specific, Measurable, Achievable, Relevant and Time-bound, have concrete indicators and be assigned to an Erasmus+ priority.

Answer in JSON:
{shape}",
        title = concept.title,
        summary = concept.summary,
        problem = concept.problem_statement,
        innovation = concept.innovation,
        code = state.action_type.code(),
        sources = findings_context(state),
        others = others,
        shape = SINGLE_OBJECTIVE_SHAPE,
    );
    Prompt::new(text, "You are a project planner. Answer ONLY in JSON.")
}

// ════════════════════════════════════════════════════════════════════════════════
// Step 5
// ════════════════════════════════════════════════════════════════════════════════

pub fn generate_work_packages_prompt(state: &ConceptState, concept: &ConceptProposal) -> Prompt {
    let months = state.duration;
    let header = format!(
        "ORIGINAL IDEA:
\"{idea}\"

CONCEPT: \"{title}\"
{summary}

OBJECTIVES:
{objectives}

OUTPUTS:
{outputs}

CONSORTIUM:
{consortium}
",
        idea = state.idea_text(),
        title = concept.title,
        summary = concept.summary,
        objectives = numbered_objectives(state, false),
        outputs = concept.main_outputs.join("\n"),
        consortium = consortium_text(state),
    );

    let text = match state.action_type {
        ActionType::Ka210 => format!(
            "You are an Erasmus+ project planner for small-scale partnerships (KA210).

{header}
KA210 FRAMEWORK:
- Budget: max. 60,000 EUR
- PROJECT DURATION: {months} MONTHS. Every \"start\"/\"end\" lies between month 1 and month {months}.
- NO formal work packages, direct ACTIVITIES instead
- Simple, feasible structure

{rules}

{instructions}
TASK: Create 3-5 project activities for this KA210 project.
Each activity has a clear purpose, 2-3 concrete steps, 1-2 results, one lead partner and a realistic time frame.

STRUCTURE RULES (BINDING):
- If the additional instructions fix a number of activities, create EXACTLY that number.
- The acronym \"{acronym}\" is LOCKED; do not modify it.
- Name every lead partner EXACTLY as in the CONSORTIUM block.

Spread the activities over the {months} months; the last one ends in month {months} at the latest.

Answer in JSON:
{{
  \"workPackages\": [
    {{
      \"number\": 1,
      \"title\": \"Activity title\",
      \"type\": \"ACTIVITY\",
      \"description\": \"Description (2-3 sentences)\",
      \"activities\": [\"Step 1\", \"Step 2\"],
      \"deliverables\": [\"Result 1\"],
      \"duration\": {{ \"start\": 1, \"end\": {third} }},
      \"lead\": \"EXACT name of the lead partner from the consortium\"
    }}
  ]
}}

IMPORTANT: keep it simple and realistic for a small budget!",
            header = header,
            months = months,
            rules = WORDING_RULES,
            instructions = additional_instructions(state, "ADDITIONAL INSTRUCTIONS (MUST BECOME ACTIVITIES OR RESULTS)"),
            acronym = concept.acronym,
            third = (f64::from(months) / 3.0).round() as u32,
        ),
        ActionType::Ka220 => format!(
            "You are an Erasmus+ work package expert.

{header}
PROJECT DURATION: {months} MONTHS. Every \"start\"/\"end\" lies between month 1 and month {months}. No WP may run past month {months}.

{rules}

{instructions}
TASK: Create a logical WP structure (4-5 work packages including WP1 Management).
Each WP has a clear purpose, 2-3 concrete activities, 2-3 deliverables, one lead partner from the consortium and a realistic time frame.

STRUCTURE RULES (BINDING):
1. If the additional instructions or the concept fix a number of WPs, create EXACTLY that number. Keep given WP titles and leads 1:1.
2. Every WP has EXACTLY ONE lead partner, named EXACTLY as in the CONSORTIUM block.
3. The acronym \"{acronym}\" is LOCKED. Do not write \"{acronym} AI\" or \"{acronym}+\".

Spread the work over the {months} months. The last WP (dissemination) ends in month {months}.

Answer in JSON:
{{
  \"workPackages\": [
    {{
      \"number\": 1,
      \"title\": \"Project Management & Quality Assurance\",
      \"type\": \"MANAGEMENT\",
      \"description\": \"Description (3-4 sentences)\",
      \"activities\": [\"Activity 1\", \"Activity 2\"],
      \"deliverables\": [\"Deliverable 1\", \"Deliverable 2\"],
      \"duration\": {{ \"start\": 1, \"end\": {months} }},
      \"lead\": \"EXACT name of the lead partner from the consortium\"
    }}
  ]
}}

WP1 is always management and the last WP is dissemination.",
            header = header,
            months = months,
            rules = WORDING_RULES,
            instructions = additional_instructions(state, "ADDITIONAL INSTRUCTIONS (MUST BE INTEGRATED INTO THE WORK PACKAGES)"),
            acronym = concept.acronym,
        ),
    };
    Prompt::new(text, "You are a project planner. Answer ONLY in JSON.")
}

// ════════════════════════════════════════════════════════════════════════════════
// Step 6
// ════════════════════════════════════════════════════════════════════════════════

pub fn detailed_concept_prompt(state: &ConceptState, concept: &ConceptProposal) -> Prompt {
    let sources = state
        .analyzed_sources()
        .map(|s| {
            format!(
                "\"{}\": {}\nFindings: {}",
                s.title,
                s.summary.as_deref().unwrap_or_default(),
                s.key_findings.join("; ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    let instructions = if state.additional_instructions.trim().is_empty() {
        "No additional instructions."
    } else {
        state.additional_instructions.as_str()
    };

    let text = format!(
        "You are a highly qualified Erasmus+ grant writer. Write a convincing, consistent and detailed concept draft (2-3 pages of prose and structured paragraphs) in Markdown.

PROJECT: \"{title}\" ({acronym})
SECTOR: {sector}
ACTION TYPE: {code}
INNOVATION: {innovation}

OBJECTIVES:
{objectives}

CONSORTIUM (WHY WE ARE THE RIGHT TEAM):
{consortium}

RESEARCH RESULTS (THE NEED):
{sources}

STRUCTURE / WORK PACKAGES:
{work_plan}

FURTHER INSTRUCTIONS:
{instructions}

TASK:
Write a detailed concept draft that serves as the basis for the funding application, with these sections:

# 1. Relevance & Needs Analysis
# 2. Approach & Innovation
# 3. Consortium & Partnership
# 4. Methodology & Work Plan
# 5. Expected Impact

{rules}

STRUCTURE RULES (BINDING):
1. The work packages above are BINDING: same number, titles and order. Do not add, remove or rename any.
2. Every WP lead is identical in every mention throughout the document.
3. The acronym \"{acronym}\" is LOCKED. Use it EXACTLY as given.
4. ALL Erasmus+ priorities of the concept appear in the document.
5. Concrete partner commitments from the concept or instructions are kept verbatim.
6. If budget percentages are given they add up to exactly 100%.

OUTPUT RULES:
- Markdown only (no JSON)
- No introduction such as \"Here is your concept:\"
- At least 800-1000 words
- Cite the supplied study findings and partner specifics explicitly",
        title = concept.title,
        acronym = concept.acronym,
        sector = sector_label(state.sector),
        code = state.action_type.code(),
        innovation = concept.innovation,
        objectives = numbered_objectives(state, true),
        consortium = consortium_text(state),
        sources = sources,
        work_plan = work_plan_text(state),
        instructions = instructions,
        rules = WORDING_RULES,
    );
    Prompt::new(
        text,
        "You are an experienced Erasmus+ grant writer. Answer ONLY in Markdown.",
    )
}

pub fn translate_concept_prompt(markdown: &str) -> Prompt {
    let text = format!(
        "You are a professional translator for EU funding applications (Erasmus+).
Translate the following concept draft into professional, formal and persuasive British English.
Use Erasmus+ terminology correctly (e.g. \"Work Package\", \"Deliverables\", \"Target Group\", \"Dissemination\").
Keep the Markdown formatting strictly. Return ONLY the translated text, no comment before or after.

CONCEPT DRAFT:
{}",
        markdown
    );
    Prompt::new(
        text,
        "You are an Erasmus+ translation expert. Answer ONLY in Markdown.",
    )
    .with_temperature(CONCEPT_TRANSLATION_TEMPERATURE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::concept::{
        ConsortiumRole, MonthSpan, PartnerProfile, ResearchSource, SelectedPartner,
        SmartObjective, SourceKind, WorkPackageSuggestion,
    };
    use crate::domain::foundation::{EntityId, SessionId};

    fn concept(id: &str) -> ConceptProposal {
        ConceptProposal {
            id: EntityId::from(id),
            title: "Green Routes".into(),
            acronym: "GREEN".into(),
            summary: "Summary".into(),
            problem_statement: "Problem".into(),
            innovation: "Innovation".into(),
            target_groups: vec![],
            objectives: vec![],
            main_outputs: vec!["Toolkit".into(), "MOOC".into()],
            erasmus_priorities: vec![],
            selected: false,
            saved_for_later: false,
        }
    }

    fn state() -> ConceptState {
        let mut state = ConceptState::new(SessionId::new());
        state.idea = "raw".into();
        state.enhanced_idea = Some("Green skills for rural adults".into());
        state.target_group = "Rural adults".into();
        state
    }

    #[test]
    fn concepts_use_enhanced_idea_and_unanalyzed_sources() {
        let mut state = state();
        let long = "x".repeat(UNANALYZED_CONTENT_LIMIT + 500);
        state.sources.push(ResearchSource::new(EntityId::from("s1"), "Raw study", long, SourceKind::Study));
        let prompt = generate_concepts_prompt(&state, "de");

        assert!(prompt.text.contains("Green skills for rural adults"));
        assert!(prompt.text.contains("FURTHER SOURCES"));
        assert!(prompt.text.contains(&"x".repeat(UNANALYZED_CONTENT_LIMIT)));
        assert!(!prompt.text.contains(&"x".repeat(UNANALYZED_CONTENT_LIMIT + 1)));
        assert!(prompt.text.contains("Answer in German"));
    }

    #[test]
    fn source_analysis_truncates_content() {
        let content = "y".repeat(ANALYSIS_CONTENT_LIMIT * 2);
        let prompt = analyze_source_prompt("Report", &content);
        assert!(!prompt.text.contains(&"y".repeat(ANALYSIS_CONTENT_LIMIT + 1)));
        assert!(prompt.text.contains("\"keyFindings\""));
    }

    #[test]
    fn comparison_context_lists_ids_and_uses_lower_temperature() {
        let mut state = state();
        state.concepts = vec![concept("c1"), concept("c2")];
        let prompt = compare_concepts_prompt(&state);
        assert!(prompt.text.contains("ID: c1"));
        assert!(prompt.text.contains("\n\n---\n\nID: c2"));
        assert_eq!(prompt.temperature, JSON_TEMPERATURE);
    }

    #[test]
    fn objective_count_follows_action_type() {
        let mut state = state();
        assert!(generate_objectives_prompt(&state, &concept("c1")).text.contains("Define 3-5 SMART"));
        state.action_type = ActionType::Ka210;
        assert!(generate_objectives_prompt(&state, &concept("c1")).text.contains("Define 2-3 SMART"));
    }

    #[test]
    fn regeneration_excludes_target_objective() {
        let mut state = state();
        state.objectives = vec![
            SmartObjective { id: EntityId::from("o1"), text: "Keep me".into(), indicators: vec![], sources: vec![], erasmus_priority: None },
            SmartObjective { id: EntityId::from("o2"), text: "Replace me".into(), indicators: vec![], sources: vec![], erasmus_priority: None },
        ];
        let prompt = regenerate_objective_prompt(&state, &concept("c1"), &EntityId::from("o2"));
        assert!(prompt.text.contains("- Keep me"));
        assert!(!prompt.text.contains("Replace me"));
    }

    #[test]
    fn work_package_prompt_differs_per_action_type() {
        let mut state = state();
        state.duration = 18;
        state.selected_partners.push(SelectedPartner {
            partner: PartnerProfile { organization_name: "Agora".into(), country: "GR".into(), ..Default::default() },
            role: ConsortiumRole::Coordinator,
        });
        let ka220 = generate_work_packages_prompt(&state, &concept("c1"));
        assert!(ka220.text.contains("\"type\": \"MANAGEMENT\""));
        assert!(ka220.text.contains("- COORDINATOR: Agora (GR) - Expertise: "));

        state.action_type = ActionType::Ka210;
        let ka210 = generate_work_packages_prompt(&state, &concept("c1"));
        assert!(ka210.text.contains("\"type\": \"ACTIVITY\""));
        assert!(ka210.text.contains("\"end\": 6"));
    }

    #[test]
    fn detailed_concept_labels_activities_for_ka210() {
        let mut state = state();
        state.action_type = ActionType::Ka210;
        state.work_packages = vec![WorkPackageSuggestion {
            number: 2,
            title: "Pilot".into(),
            kind: "ACTIVITY".into(),
            description: "Piloting".into(),
            activities: vec![],
            deliverables: vec!["Report".into()],
            duration: MonthSpan { start: 3, end: 9 },
            lead: "Agora".into(),
        }];
        state.selected_wp_numbers = vec![2];
        let prompt = detailed_concept_prompt(&state, &concept("c1"));
        assert!(prompt.text.contains("Activity 2: Pilot (Lead: Agora)\nPiloting\nResults: Report"));
    }

    #[test]
    fn concept_translation_is_low_temperature() {
        assert_eq!(translate_concept_prompt("# Text").temperature, CONCEPT_TRANSLATION_TEMPERATURE);
    }
}
