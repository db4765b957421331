//! Stored answers to official form questions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// How an answer came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    #[default]
    Ai,
    Manual,
}

/// Answer to one question.
///
/// The wire format is untagged: a bare string, a list of selected options,
/// or an object wrapping the text with edit metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Plain(String),
    Selection(Vec<String>),
    Wrapped {
        value: String,
        #[serde(default)]
        mode: AnswerMode,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        sources: Vec<String>,
        #[serde(
            rename = "lastEditedAt",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        last_edited_at: Option<Timestamp>,
    },
}

impl Answer {
    /// A manual edit made now.
    pub fn manual(value: impl Into<String>) -> Self {
        Answer::Wrapped {
            value: value.into(),
            mode: AnswerMode::Manual,
            sources: Vec::new(),
            last_edited_at: Some(Timestamp::now()),
        }
    }

    /// The answer as text. Selections are joined with ", ".
    pub fn text(&self) -> String {
        match self {
            Answer::Plain(s) => s.clone(),
            Answer::Selection(items) => items.join(", "),
            Answer::Wrapped { value, .. } => value.clone(),
        }
    }

    /// True when the answer carries no visible text.
    pub fn is_blank(&self) -> bool {
        match self {
            Answer::Plain(s) | Answer::Wrapped { value: s, .. } => s.trim().is_empty(),
            Answer::Selection(items) => items.iter().all(|i| i.trim().is_empty()),
        }
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Answer::Plain(s.to_string())
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Answer::Plain(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_every_wire_shape() {
        let plain: Answer = serde_json::from_value(json!("draft")).unwrap();
        let list: Answer = serde_json::from_value(json!(["a", "b"])).unwrap();
        let wrapped: Answer =
            serde_json::from_value(json!({"value": "edited", "mode": "manual"})).unwrap();

        assert_eq!(plain.text(), "draft");
        assert_eq!(list.text(), "a, b");
        assert_eq!(wrapped.text(), "edited");
        assert!(matches!(wrapped, Answer::Wrapped { mode: AnswerMode::Manual, .. }));
    }

    #[test]
    fn blank_detection_ignores_whitespace() {
        assert!(Answer::from("  ").is_blank());
        assert!(!Answer::manual("text").is_blank());
        assert!(Answer::Selection(vec![]).is_blank());
    }
}
