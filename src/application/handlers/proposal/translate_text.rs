//! TranslateTextHandler - Translates a free-text passage.

use std::sync::Arc;

use super::error::{complete_text, require_text, ProposalAssistError};
use crate::domain::prompts::translate_text_prompt;
use crate::ports::AIProvider;

/// Command to translate one passage.
#[derive(Debug, Clone)]
pub struct TranslateTextCommand {
    pub text: String,
    /// Language code, for example "en" or "de".
    pub target_language: String,
    /// Kind of application the text belongs to, e.g. "KA220".
    pub context: Option<String>,
    pub api_key: Option<String>,
}

/// Handler for free-text translation.
pub struct TranslateTextHandler<P: ?Sized + AIProvider> {
    ai_provider: Arc<P>,
}

impl<P: ?Sized + AIProvider> TranslateTextHandler<P> {
    pub fn new(ai_provider: Arc<P>) -> Self {
        Self { ai_provider }
    }

    /// Returns the translated text, trimmed.
    pub async fn handle(&self, cmd: TranslateTextCommand) -> Result<String, ProposalAssistError> {
        require_text("text", &cmd.text)?;
        require_text("targetLanguage", &cmd.target_language)?;

        let prompt = translate_text_prompt(&cmd.text, &cmd.target_language, cmd.context.as_deref());
        let translated = complete_text(self.ai_provider.as_ref(), prompt, cmd.api_key).await?;

        tracing::debug!(
            target_language = %cmd.target_language,
            input_chars = cmd.text.chars().count(),
            output_chars = translated.chars().count(),
            "Text translated"
        );
        Ok(translated.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::ports::AIError;

    fn command(text: &str) -> TranslateTextCommand {
        TranslateTextCommand {
            text: text.into(),
            target_language: "en".into(),
            context: Some("KA220".into()),
            api_key: Some("header-key".into()),
        }
    }

    #[tokio::test]
    async fn returns_trimmed_translation() {
        let provider = Arc::new(MockAIProvider::new().with_response("  Digital skills for all\n"));
        let handler = TranslateTextHandler::new(provider.clone());

        let out = handler.handle(command("Digitale Kompetenzen für alle")).await.unwrap();

        assert_eq!(out, "Digital skills for all");
        let call = provider.last_call().unwrap();
        assert!(call.prompt.contains("Digitale Kompetenzen für alle"));
        assert!(call.prompt.contains("KA220"));
        assert!(call.api_key_override.is_some());
    }

    #[tokio::test]
    async fn blank_text_is_rejected_without_model_call() {
        let provider = Arc::new(MockAIProvider::new());
        let handler = TranslateTextHandler::new(provider.clone());

        let result = handler.handle(command("   ")).await;

        assert!(matches!(result, Err(ProposalAssistError::InvalidInput(_))));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn model_errors_propagate() {
        let provider = Arc::new(MockAIProvider::new().with_error(MockError::RateLimited { attempts: 2 }));
        let handler = TranslateTextHandler::new(provider);

        let result = handler.handle(command("Hallo")).await;

        assert_eq!(
            result,
            Err(ProposalAssistError::Model(AIError::RateLimited { attempts: 2 }))
        );
    }
}
