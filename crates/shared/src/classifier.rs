//! Picks the configured provider, tries it once, and falls back to keywords.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::ProviderError;
use crate::fallback::KeywordClassifier;
use crate::http::HttpClient;
use crate::models::ClassificationResult;
use crate::providers::{
    ClassificationProvider, GeminiProvider, HuggingFaceProvider, OpenAiProvider,
};

/// Sample sent by [`Classifier::check_provider`].
const CHECK_CAPTION: &str = "Just shipped a small Rust CLI that sorts saved links into categories.";

pub struct Classifier {
    provider: Option<Box<dyn ClassificationProvider>>,
    fallback: KeywordClassifier,
}

impl Classifier {
    /// Build the classifier for the preferred provider in `config`.
    ///
    /// A provider missing its required credential is not built at all, so every
    /// call goes straight to the keyword fallback.
    pub fn from_config(config: &ProviderConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            provider: build_provider(config, http),
            fallback: KeywordClassifier::new(),
        }
    }

    pub fn with_provider(provider: Box<dyn ClassificationProvider>) -> Self {
        Self {
            provider: Some(provider),
            fallback: KeywordClassifier::new(),
        }
    }

    /// Keyword fallback only; never touches the network.
    pub fn offline() -> Self {
        Self {
            provider: None,
            fallback: KeywordClassifier::new(),
        }
    }

    pub fn provider_name(&self) -> Option<&'static str> {
        self.provider.as_ref().map(|p| p.name())
    }

    /// Send one sample classification to the remote provider and return its raw
    /// outcome, errors included. `None` when no provider is configured.
    pub async fn check_provider(&self) -> Option<Result<ClassificationResult, ProviderError>> {
        let provider = self.provider.as_ref()?;
        let hashtags = vec!["coding".to_string(), "rust".to_string()];
        Some(provider.classify(CHECK_CAPTION, &hashtags).await)
    }

    /// Always returns a result: a provider failure of any kind falls through.
    pub async fn classify(&self, caption: &str, hashtags: &[String]) -> ClassificationResult {
        if let Some(provider) = &self.provider {
            match provider.classify(caption, hashtags).await {
                Ok(result) => {
                    info!(provider = provider.name(), category = %result.category, "classified");
                    return result;
                }
                Err(e @ ProviderError::RateLimited { .. }) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "provider rate limited, using keyword fallback"
                    );
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "provider failed, using keyword fallback"
                    );
                }
            }
        }

        let result = self.fallback.classify(caption, hashtags);
        info!(provider = "fallback", category = %result.category, "classified");
        result
    }
}

/// The preferred provider in `config`, or `None` when it is the keyword
/// fallback or is missing its required credential.
fn build_provider(
    config: &ProviderConfig,
    http: Arc<dyn HttpClient>,
) -> Option<Box<dyn ClassificationProvider>> {
    match config.provider {
        ProviderKind::OpenAi => match &config.openai_api_key {
            Some(key) => Some(Box::new(OpenAiProvider::new(
                http,
                Some(key.clone()),
                config.openai_model.clone(),
            ))),
            None => {
                warn!("AI_PROVIDER is openai but OPENAI_API_KEY is not set");
                None
            }
        },
        ProviderKind::Gemini => match &config.gemini_api_key {
            Some(key) => Some(Box::new(GeminiProvider::new(
                http,
                Some(key.clone()),
                config.gemini_candidates.clone(),
            ))),
            None => {
                warn!("AI_PROVIDER is gemini but GEMINI_API_KEY is not set");
                None
            }
        },
        ProviderKind::HuggingFace => Some(Box::new(HuggingFaceProvider::new(
            http,
            config.huggingface_api_token.clone(),
            config.huggingface_model.clone(),
        ))),
        ProviderKind::Fallback => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{MockClient, MockResponse};
    use crate::models::Category;
    use crate::providers::FakeProvider;

    const CAPTION: &str = "Morning workout done! #fitness #gym feeling strong";

    fn hashtags() -> Vec<String> {
        vec!["fitness".to_string(), "gym".to_string()]
    }

    #[tokio::test]
    async fn test_provider_answer_wins() {
        let classifier =
            Classifier::with_provider(Box::new(FakeProvider::answering(Category::Music, "Song")));
        let result = classifier.classify(CAPTION, &hashtags()).await;
        assert_eq!(result, ClassificationResult::new(Category::Music, "Song"));
    }

    #[tokio::test]
    async fn test_rate_limit_falls_through() {
        let provider = Arc::new(FakeProvider::rate_limited());
        let classifier = Classifier::with_provider(Box::new(provider.clone()));

        let result = classifier.classify(CAPTION, &hashtags()).await;

        assert_eq!(result, KeywordClassifier::new().classify(CAPTION, &hashtags()));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_check_provider_surfaces_the_error() {
        let provider = Arc::new(FakeProvider::rate_limited());
        let classifier = Classifier::with_provider(Box::new(provider.clone()));

        let outcome = classifier.check_provider().await;

        assert!(matches!(outcome, Some(Err(ProviderError::RateLimited { .. }))));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_check_provider_without_provider() {
        assert!(Classifier::offline().check_provider().await.is_none());
    }

    #[tokio::test]
    async fn test_check_provider_reports_answer() {
        let classifier =
            Classifier::with_provider(Box::new(FakeProvider::answering(Category::Coding, "A CLI.")));
        let outcome = classifier.check_provider().await;
        assert_eq!(
            outcome.map(|r| r.map_err(|e| e.to_string())),
            Some(Ok(ClassificationResult::new(Category::Coding, "A CLI.")))
        );
    }

    #[tokio::test]
    async fn test_malformed_output_falls_through() {
        let classifier = Classifier::with_provider(Box::new(FakeProvider::malformed()));
        let result = classifier.classify(CAPTION, &hashtags()).await;
        assert_eq!(result.category, Category::Fitness);
    }

    #[tokio::test]
    async fn test_fallback_config_builds_no_provider() {
        let client = Arc::new(MockClient::new());
        let classifier = Classifier::from_config(&ProviderConfig::default(), client.clone());

        assert_eq!(classifier.provider_name(), None);
        let hashtags = vec!["coding".to_string(), "python".to_string()];
        let result = classifier.classify("", &hashtags).await;
        assert_eq!(result.summary, "Coding content: coding, python");
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_key_skips_provider() {
        let config = ProviderConfig {
            provider: ProviderKind::Gemini,
            ..ProviderConfig::default()
        };
        let client = Arc::new(MockClient::new());
        let classifier = Classifier::from_config(&config, client.clone());

        assert_eq!(classifier.provider_name(), None);
        classifier.classify(CAPTION, &hashtags()).await;
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_only_the_preferred_provider_is_tried() {
        let config = ProviderConfig {
            provider: ProviderKind::OpenAi,
            openai_api_key: Some("sk-test".to_string()),
            gemini_api_key: Some("gemini-key".to_string()),
            ..ProviderConfig::default()
        };
        let client = Arc::new(
            MockClient::new().with_fallback(MockResponse::Status(500, "down".to_string())),
        );
        let classifier = Classifier::from_config(&config, client.clone());

        let result = classifier.classify(CAPTION, &hashtags()).await;

        assert_eq!(classifier.provider_name(), Some("openai"));
        assert_eq!(result.category, Category::Fitness);
        assert_eq!(client.request_count(), 1);
    }

    #[tokio::test]
    async fn test_huggingface_needs_no_token() {
        let config = ProviderConfig {
            provider: ProviderKind::HuggingFace,
            ..ProviderConfig::default()
        };
        let classifier = Classifier::from_config(&config, Arc::new(MockClient::new()));
        assert_eq!(classifier.provider_name(), Some("huggingface"));
    }
}
