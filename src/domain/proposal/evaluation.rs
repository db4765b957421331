//! Evaluator feedback shapes returned by the model.

use serde::{Deserialize, Serialize};

/// Scores for one award criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEvaluation {
    pub score: u32,
    pub max_score: u32,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

/// The four Erasmus+ award criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationCategories {
    /// Relevance of the project, max 30.
    pub relevance: CategoryEvaluation,
    /// Quality of design and implementation, max 20.
    pub design: CategoryEvaluation,
    /// Quality of partnership and cooperation, max 20.
    pub partnership: CategoryEvaluation,
    /// Impact and dissemination, max 30.
    pub impact: CategoryEvaluation,
}

impl EvaluationCategories {
    pub const MAX_RELEVANCE: u32 = 30;
    pub const MAX_DESIGN: u32 = 20;
    pub const MAX_PARTNERSHIP: u32 = 20;
    pub const MAX_IMPACT: u32 = 30;

    /// Sum of the category scores, each capped at its maximum.
    pub fn total(&self) -> u32 {
        self.relevance.score.min(Self::MAX_RELEVANCE)
            + self.design.score.min(Self::MAX_DESIGN)
            + self.partnership.score.min(Self::MAX_PARTNERSHIP)
            + self.impact.score.min(Self::MAX_IMPACT)
    }
}

/// Full-proposal evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEvaluation {
    /// Overall score 0-100.
    pub score: u32,
    pub categories: EvaluationCategories,
    #[serde(default)]
    pub overall_feedback: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// One concrete improvement to an answer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvement {
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub suggestion: String,
    /// Replacement text; markdown is kept for rich display.
    #[serde(default)]
    pub improved_text: String,
}

/// Evaluation of a single answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionEvaluation {
    /// Score 0-10.
    pub score: u32,
    #[serde(default)]
    pub improvements: Vec<Improvement>,
}

impl QuestionEvaluation {
    /// Removes markdown emphasis from the prose fields and clamps the score.
    pub fn cleaned(mut self) -> Self {
        self.score = self.score.min(10);
        for imp in &mut self.improvements {
            imp.issue = strip_emphasis(&imp.issue);
            imp.location = strip_emphasis(&imp.location);
            imp.suggestion = strip_emphasis(&imp.suggestion);
        }
        self
    }
}

fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace("###", "").replace("##", "")
}
