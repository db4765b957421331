//! SuggestPartnersHandler - Picks partners for a project idea from a known list.

use std::sync::Arc;

use super::error::{complete_json, require_text, ProposalAssistError};
use crate::domain::concept::{PartnerProfile, PartnerSuggestions, ProjectBrief};
use crate::domain::foundation::ValidationError;
use crate::domain::prompts::suggest_partners_prompt;
use crate::ports::AIProvider;

/// Command to suggest partners.
#[derive(Debug, Clone)]
pub struct SuggestPartnersCommand {
    /// The partner library to choose from.
    pub candidates: Vec<PartnerProfile>,
    pub brief: ProjectBrief,
    pub language: String,
    pub api_key: Option<String>,
}

/// Handler for partner suggestions.
///
/// The answer only ever names partners from the candidate list.
pub struct SuggestPartnersHandler<P: ?Sized + AIProvider> {
    ai_provider: Arc<P>,
}

impl<P: ?Sized + AIProvider> SuggestPartnersHandler<P> {
    pub fn new(ai_provider: Arc<P>) -> Self {
        Self { ai_provider }
    }

    pub async fn handle(
        &self,
        cmd: SuggestPartnersCommand,
    ) -> Result<PartnerSuggestions, ProposalAssistError> {
        if cmd.candidates.is_empty() {
            return Err(ValidationError::precondition("No partners available to choose from").into());
        }
        require_text("description", &cmd.brief.description)?;

        let prompt = suggest_partners_prompt(&cmd.candidates, &cmd.brief, &cmd.language);
        let suggestions: PartnerSuggestions =
            complete_json(self.ai_provider.as_ref(), prompt, cmd.api_key).await?;
        let suggestions = suggestions.restricted_to(&cmd.candidates);

        tracing::info!(
            candidates = cmd.candidates.len(),
            suggested = suggestions.suggested_partner_ids.len(),
            "Partners suggested"
        );
        Ok(suggestions)
    }
}
