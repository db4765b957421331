//! GeneratePartnerDescriptionHandler - Writes or corrects a partner description.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::{complete_nonempty_text, require_text, ProposalAssistError};
use crate::domain::concept::{PartnerProfile, ProjectBrief};
use crate::domain::foundation::ValidationError;
use crate::domain::prompts::{correct_partner_description_prompt, partner_description_prompt};
use crate::domain::validation::word_count;
use crate::ports::AIProvider;

/// Whether to write a new description or revise an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionMode {
    #[default]
    Generate,
    Correct,
}

#[derive(Debug, Clone)]
pub struct GeneratePartnerDescriptionCommand {
    pub partner: PartnerProfile,
    pub brief: Option<ProjectBrief>,
    /// Facts from the user that the website does not show.
    pub additional_info: Option<String>,
    pub mode: DescriptionMode,
    /// Required in correct mode.
    pub existing_description: Option<String>,
    /// Required in correct mode.
    pub correction_instruction: Option<String>,
    pub language: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartnerDescriptionResult {
    pub description: String,
    pub word_count: usize,
    pub corrected: bool,
}

pub struct GeneratePartnerDescriptionHandler<P: ?Sized + AIProvider> {
    ai_provider: Arc<P>,
}

impl<P: ?Sized + AIProvider> GeneratePartnerDescriptionHandler<P> {
    pub fn new(ai_provider: Arc<P>) -> Self {
        Self { ai_provider }
    }

    pub async fn handle(
        &self,
        cmd: GeneratePartnerDescriptionCommand,
    ) -> Result<PartnerDescriptionResult, ProposalAssistError> {
        require_text("organizationName", &cmd.partner.organization_name)?;

        let prompt = match cmd.mode {
            DescriptionMode::Generate => partner_description_prompt(
                &cmd.partner,
                cmd.brief.as_ref(),
                cmd.additional_info.as_deref(),
                &cmd.language,
            ),
            DescriptionMode::Correct => {
                let existing = non_blank("existingDescription", cmd.existing_description.as_deref())?;
                let instruction =
                    non_blank("correctionInstruction", cmd.correction_instruction.as_deref())?;
                correct_partner_description_prompt(existing, instruction, &cmd.language)
            }
        };

        let raw = complete_nonempty_text(self.ai_provider.as_ref(), prompt, cmd.api_key).await?;
        let description = raw.trim().to_string();
        let words = word_count(&description);
        tracing::info!(partner = %cmd.partner.id, mode = ?cmd.mode, words, "Partner description written");

        Ok(PartnerDescriptionResult {
            description,
            word_count: words,
            corrected: cmd.mode == DescriptionMode::Correct,
        })
    }
}

fn non_blank<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ValidationError::empty_field(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;

    fn command(mode: DescriptionMode) -> GeneratePartnerDescriptionCommand {
        GeneratePartnerDescriptionCommand {
            partner: PartnerProfile {
                id: "p1".into(),
                organization_name: "Volkshochschule Nord".into(),
                country: "DE".into(),
                ..Default::default()
            },
            brief: None,
            additional_info: Some("Founded in 1998".into()),
            mode,
            existing_description: None,
            correction_instruction: None,
            language: "en".into(),
            api_key: None,
        }
    }

    #[tokio::test]
    async fn generated_description_reports_word_count() {
        let provider = Arc::new(MockAIProvider::new().with_response("  Volkshochschule Nord is an adult education centre.  "));
        let handler = GeneratePartnerDescriptionHandler::new(provider.clone());

        let result = handler.handle(command(DescriptionMode::Generate)).await.unwrap();

        assert_eq!(result.description, "Volkshochschule Nord is an adult education centre.");
        assert_eq!(result.word_count, 7);
        assert!(!result.corrected);
        assert!(provider.last_call().unwrap().prompt.contains("Founded in 1998"));
    }

    #[tokio::test]
    async fn correction_sends_existing_text() {
        let provider = Arc::new(MockAIProvider::new().with_response("Corrected text."));
        let handler = GeneratePartnerDescriptionHandler::new(provider.clone());
        let mut cmd = command(DescriptionMode::Correct);
        cmd.existing_description = Some("Old text.".into());
        cmd.correction_instruction = Some("Add the founding year.".into());

        let result = handler.handle(cmd).await.unwrap();

        assert!(result.corrected);
        let prompt = provider.last_call().unwrap().prompt;
        assert!(prompt.contains("Old text."));
        assert!(prompt.contains("Add the founding year."));
    }

    #[tokio::test]
    async fn correction_without_instruction_is_rejected() {
        let provider = Arc::new(MockAIProvider::new());
        let handler = GeneratePartnerDescriptionHandler::new(provider.clone());
        let mut cmd = command(DescriptionMode::Correct);
        cmd.existing_description = Some("Old text.".into());

        let result = handler.handle(cmd).await;

        assert!(matches!(
            result,
            Err(ProposalAssistError::InvalidInput(ValidationError::EmptyField { .. }))
        ));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn nameless_partner_is_rejected() {
        let provider = Arc::new(MockAIProvider::new());
        let handler = GeneratePartnerDescriptionHandler::new(provider.clone());
        let mut cmd = command(DescriptionMode::Generate);
        cmd.partner.organization_name = String::new();

        assert!(handler.handle(cmd).await.is_err());
        assert_eq!(provider.call_count(), 0);
    }
}
