//! ExtractPartnerHandler - Builds a partner profile from an organisation's website.
//!
//! The page is fetched and reduced to text first. A failed fetch does not
//! abort the command: the model is asked to work from the URL alone and told
//! why the content is missing.

use std::sync::Arc;

use chrono::Utc;

use super::error::{complete_json, require_text, ProposalAssistError};
use crate::domain::concept::PartnerProfile;
use crate::domain::foundation::ValidationError;
use crate::domain::prompts::extract_partner_prompt;
use crate::ports::{normalize_url, AIProvider, FetchError, WebFetcher};

/// Command to extract a partner profile.
#[derive(Debug, Clone)]
pub struct ExtractPartnerCommand {
    pub url: String,
    pub language: String,
    pub api_key: Option<String>,
}

/// The extracted profile and how much of the website backed it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractPartnerResult {
    pub partner: PartnerProfile,
    /// Whether the website text reached the model.
    pub fetched: bool,
    /// Whether the page markup was cut before extraction.
    pub truncated: bool,
}

/// Handler for partner extraction.
pub struct ExtractPartnerHandler<P: ?Sized + AIProvider> {
    fetcher: Arc<dyn WebFetcher>,
    ai_provider: Arc<P>,
}

impl<P: ?Sized + AIProvider> ExtractPartnerHandler<P> {
    pub fn new(fetcher: Arc<dyn WebFetcher>, ai_provider: Arc<P>) -> Self {
        Self {
            fetcher,
            ai_provider,
        }
    }

    pub async fn handle(
        &self,
        cmd: ExtractPartnerCommand,
    ) -> Result<ExtractPartnerResult, ProposalAssistError> {
        require_text("url", &cmd.url)?;
        let url = normalize_url(&cmd.url)
            .map_err(|e| ValidationError::invalid_format("url", e.to_string()))?;

        let (text, fetch_error, truncated) = match self.fetcher.fetch_text(&url).await {
            Ok(page) => (Some(page.text), None, page.truncated),
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "Website fetch failed, extracting from URL only");
                (None, Some(describe_fetch_error(&err)), false)
            }
        };
        let fetched = text.as_deref().is_some_and(|t| !t.trim().is_empty());

        let prompt = extract_partner_prompt(
            &url,
            text.as_deref(),
            fetch_error.as_deref(),
            &cmd.language,
        );
        let mut partner: PartnerProfile =
            complete_json(self.ai_provider.as_ref(), prompt, cmd.api_key).await?;

        if partner.id.trim().is_empty() {
            partner.id = format!("partner_{}", Utc::now().timestamp_millis());
        }
        if partner.website.as_deref().map_or(true, |w| w.trim().is_empty()) {
            partner.website = Some(url.clone());
        }
        partner.data_quality = partner.data_quality.map(|q| q.min(100));

        tracing::info!(
            url = %url,
            organization = %partner.organization_name,
            fetched,
            truncated,
            "Partner profile extracted"
        );
        Ok(ExtractPartnerResult {
            partner,
            fetched,
            truncated,
        })
    }
}

fn describe_fetch_error(err: &FetchError) -> String {
    match err {
        FetchError::TimedOut { .. } => "Timeout".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::ports::FetchedPage;
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticFetcher {
        result: Result<FetchedPage, FetchError>,
    }

    #[async_trait]
    impl WebFetcher for StaticFetcher {
        async fn fetch_text(&self, url: &str) -> Result<FetchedPage, FetchError> {
            self.result.clone().map(|mut page| {
                page.url = url.to_string();
                page
            })
        }
    }

    fn page(text: &str) -> FetchedPage {
        FetchedPage {
            url: String::new(),
            text: text.into(),
            truncated: false,
        }
    }

    fn command(url: &str) -> ExtractPartnerCommand {
        ExtractPartnerCommand {
            url: url.into(),
            language: "en".into(),
            api_key: None,
        }
    }

    #[tokio::test]
    async fn fills_id_and_website_from_fetched_page() {
        let fetcher = Arc::new(StaticFetcher {
            result: Ok(page("Jugendwerk Nord e.V. works with young refugees in Hamburg.")),
        });
        let provider = Arc::new(MockAIProvider::new().with_json(json!({
            "organizationName": "Jugendwerk Nord",
            "country": "DE",
            "city": "Hamburg",
            "organizationType": "NGO",
            "expertiseAreas": [{"domain": "TARGET_GROUP_ACCESS", "description": "Refugee youth", "level": 4}],
            "targetGroups": ["Young refugees"],
            "dataQuality": 85
        })));
        let handler = ExtractPartnerHandler::new(fetcher, provider.clone());

        let result = handler.handle(command("jugendwerk-nord.de")).await.unwrap();

        assert!(result.fetched);
        assert!(result.partner.id.starts_with("partner_"));
        assert_eq!(result.partner.website.as_deref(), Some("https://jugendwerk-nord.de"));
        assert_eq!(result.partner.data_quality, Some(85));
        let call = provider.last_call().unwrap();
        assert!(call.prompt.contains("young refugees in Hamburg"));
    }

    #[tokio::test]
    async fn fetch_failure_falls_back_to_url_only() {
        let fetcher = Arc::new(StaticFetcher {
            result: Err(FetchError::TimedOut { timeout_secs: 15 }),
        });
        let provider = Arc::new(MockAIProvider::new().with_json(json!({
            "organizationName": "Unknown School",
            "website": "https://school.example",
            "dataQuality": 200
        })));
        let handler = ExtractPartnerHandler::new(fetcher, provider.clone());

        let result = handler.handle(command("https://school.example")).await.unwrap();

        assert!(!result.fetched);
        assert_eq!(result.partner.data_quality, Some(100));
        let call = provider.last_call().unwrap();
        assert!(call.system_prompt.unwrap_or_default().contains("Timeout"));
    }

    #[tokio::test]
    async fn rejects_non_http_url() {
        let fetcher = Arc::new(StaticFetcher { result: Ok(page("")) });
        let provider = Arc::new(MockAIProvider::new());
        let handler = ExtractPartnerHandler::new(fetcher, provider.clone());

        let result = handler.handle(command("ftp://files.example")).await;

        assert!(matches!(result, Err(ProposalAssistError::InvalidInput(_))));
        assert_eq!(provider.call_count(), 0);
    }
}
