//! Renders the answered form as one markdown document.

use super::state::{partner_answer_key, PipelineState};
use super::structure::{ProposalStructure, Question};

/// Placeholder written for every question without an answer.
pub const NOT_ANSWERED: &str = "[NOT ANSWERED]";

/// Builds the full application text that evaluators read.
///
/// Only text questions are emitted. Partner-specific chapters get one block
/// per consortium partner; when the consortium is empty, every stored answer
/// keyed `{questionId}_...` is used instead.
pub fn assemble_document(state: &PipelineState, structure: &ProposalStructure) -> String {
    let mut doc = String::new();

    for chapter in &structure.chapters {
        doc.push_str(&format!("\n\n# Chapter {}: {}\n", chapter.id, chapter.title));

        for section in &chapter.sections {
            doc.push_str(&format!("\n## Section: {}\n", section.title));

            for question in section.questions.iter().filter(|q| q.kind.is_answerable()) {
                if chapter.partner_specific {
                    push_partner_answers(&mut doc, state, question);
                } else {
                    push_answer(&mut doc, question, state.answer_text(&question.id));
                }
            }
        }
    }

    doc
}

fn push_partner_answers(doc: &mut String, state: &PipelineState, question: &Question) {
    if !state.consortium.is_empty() {
        for partner in &state.consortium {
            let key = partner_answer_key(&question.id, &partner.id);
            push_answer(doc, question, state.answer_text(&key));
        }
        return;
    }

    let prefix = format!("{}_", question.id);
    let texts: Vec<String> = state
        .answers
        .iter()
        .filter(|(k, _)| k.starts_with(&prefix))
        .map(|(_, a)| a.text())
        .filter(|t| !t.trim().is_empty())
        .collect();

    if texts.is_empty() {
        push_answer(doc, question, None);
    }
    for text in texts {
        push_answer(doc, question, Some(text));
    }
}

fn push_answer(doc: &mut String, question: &Question, text: Option<String>) {
    let body = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => NOT_ANSWERED.to_string(),
    };
    doc.push_str(&format!("\n**Q: {}**\n{}\n", question.full_question, body));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ActionType;
    use crate::domain::pipeline::structure::{Chapter, QuestionKind, Section};
    use crate::domain::pipeline::{Answer, ConsortiumPartner};

    fn question(id: &str, full: &str, kind: QuestionKind) -> Question {
        Question {
            id: id.into(),
            text: id.into(),
            full_question: full.into(),
            kind,
            options: vec![],
        }
    }

    fn two_chapter_structure() -> ProposalStructure {
        ProposalStructure {
            chapters: vec![
                Chapter {
                    id: 1,
                    title: "General".into(),
                    partner_specific: false,
                    sections: vec![Section {
                        id: "s1".into(),
                        title: "Basics".into(),
                        questions: vec![
                            question("q1", "What is it?", QuestionKind::Textarea),
                            question("q_pick", "Pick one", QuestionKind::Select),
                            question("q3", "Why now?", QuestionKind::Text),
                        ],
                    }],
                },
                Chapter {
                    id: 2,
                    title: "Partners".into(),
                    partner_specific: true,
                    sections: vec![Section {
                        id: "s2".into(),
                        title: "Each partner".into(),
                        questions: vec![question("q2", "Who are you?", QuestionKind::Textarea)],
                    }],
                },
            ],
        }
    }

    fn partner(id: &str) -> ConsortiumPartner {
        ConsortiumPartner {
            id: id.into(),
            name: id.into(),
            country: "DE".into(),
            organization_type: "NGO".into(),
            expertise: vec![],
            is_lead: false,
            role: None,
        }
    }

    #[test]
    fn missing_answers_render_not_answered_verbatim() {
        let mut state = PipelineState::default();
        state.consortium = vec![partner("partnerA"), partner("partnerB")];
        state.set_answer("q1", Answer::from("draft text"));
        state.set_answer("q2_partnerA", Answer::from("partner answer"));

        let doc = assemble_document(&state, &two_chapter_structure());

        assert!(doc.contains("\n**Q: What is it?**\ndraft text\n"));
        assert!(doc.contains("\n**Q: Why now?**\n[NOT ANSWERED]\n"));
        assert!(doc.contains("\n**Q: Who are you?**\npartner answer\n"));
        assert!(doc.contains("\n**Q: Who are you?**\n[NOT ANSWERED]\n"));
        assert!(!doc.contains("Pick one"));
    }

    #[test]
    fn headers_follow_the_document_format() {
        let doc = assemble_document(&PipelineState::default(), &two_chapter_structure());
        assert!(doc.starts_with("\n\n# Chapter 1: General\n\n## Section: Basics\n"));
        assert!(doc.contains("\n\n# Chapter 2: Partners\n"));
    }

    #[test]
    fn empty_consortium_falls_back_to_prefix_keys() {
        let mut state = PipelineState::default();
        state.set_answer("q2_p1", Answer::from("first"));
        state.set_answer("q2_p2", Answer::from("second"));

        let doc = assemble_document(&state, &two_chapter_structure());

        assert!(doc.contains("\nfirst\n"));
        assert!(doc.contains("\nsecond\n"));
        assert!(!doc.contains("Who are you?**\n[NOT ANSWERED]"));
    }

    #[test]
    fn wrapped_and_blank_answers() {
        let mut state = PipelineState::default();
        state.set_answer("q1", Answer::manual("edited by hand"));
        state.set_answer("q3", Answer::from("   "));

        let doc = assemble_document(&state, &two_chapter_structure());

        assert!(doc.contains("edited by hand"));
        assert!(doc.contains("\n**Q: Why now?**\n[NOT ANSWERED]\n"));
    }

    #[test]
    fn official_structure_renders_every_chapter() {
        let state = PipelineState::default();
        let doc = assemble_document(&state, &ProposalStructure::official(ActionType::Ka220, 3));
        assert!(doc.contains("# Chapter 8: Final Evaluation"));
        assert!(!doc.contains("Assess the overall quality"));
    }
}
