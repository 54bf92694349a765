//! Google Gemini provider with model probing.
//!
//! Which API versions and model names a key can reach varies, so the adapter
//! walks a fixed candidate list and uses the first pair that answers 200.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{build_prompt, ClassificationProvider};
use crate::error::ProviderError;
use crate::http::HttpClient;
use crate::models::ClassificationResult;
use crate::parser::parse_classification;

const NAME: &str = "gemini";
const BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_API_VERSIONS: [&str; 2] = ["v1", "v1beta"];
pub const DEFAULT_MODELS: [&str; 3] = ["gemini-1.5-flash", "gemini-1.5-pro", "gemini-pro"];

/// One (API version, model) pair to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidate {
    pub api_version: String,
    pub model: String,
}

impl ModelCandidate {
    pub fn new(api_version: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            model: model.into(),
        }
    }

    /// Every version crossed with every model, versions outermost.
    /// Repeated pairs are dropped, keeping the first occurrence.
    pub fn cross<V: AsRef<str>, M: AsRef<str>>(versions: &[V], models: &[M]) -> Vec<Self> {
        unique(
            versions
                .iter()
                .flat_map(move |v| models.iter().map(move |m| Self::new(v.as_ref(), m.as_ref())))
                .collect(),
        )
    }

    pub fn defaults() -> Vec<Self> {
        Self::cross(&DEFAULT_API_VERSIONS, &DEFAULT_MODELS)
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            BASE_URL, self.api_version, self.model
        )
    }
}

fn unique(candidates: Vec<ModelCandidate>) -> Vec<ModelCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert((c.api_version.clone(), c.model.clone())))
        .collect()
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

pub struct GeminiProvider {
    http: Arc<dyn HttpClient>,
    api_key: Option<String>,
    candidates: Vec<ModelCandidate>,
}

impl GeminiProvider {
    pub fn new(
        http: Arc<dyn HttpClient>,
        api_key: Option<String>,
        candidates: Vec<ModelCandidate>,
    ) -> Self {
        Self {
            http,
            api_key,
            candidates: unique(candidates),
        }
    }

    fn answer_text(body: &str) -> Result<String, ProviderError> {
        let response: GenerateResponse =
            serde_json::from_str(body).map_err(|e| ProviderError::UnexpectedSchema {
                provider: NAME,
                detail: e.to_string(),
            })?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| ProviderError::UnexpectedSchema {
                provider: NAME,
                detail: "no candidates in response".to_string(),
            })
    }
}

#[async_trait]
impl ClassificationProvider for GeminiProvider {
    async fn classify(
        &self,
        caption: &str,
        hashtags: &[String],
    ) -> Result<ClassificationResult, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured(NAME))?;

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": build_prompt(caption, hashtags) }] }]
        });
        let headers = [("x-goog-api-key", api_key.to_string())];

        let mut answered = false;
        let mut last_transport_error = None;

        for candidate in &self.candidates {
            let response = match self
                .http
                .post_json(&candidate.endpoint(), &headers, &body)
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!(
                        api_version = %candidate.api_version,
                        model = %candidate.model,
                        error = %e,
                        "gemini request failed, trying next"
                    );
                    last_transport_error = Some(e);
                    continue;
                }
            };
            answered = true;

            match response.status {
                200 => {
                    info!(
                        api_version = %candidate.api_version,
                        model = %candidate.model,
                        "using gemini model"
                    );
                    let text = Self::answer_text(&response.body)?;
                    return Ok(parse_classification(&text)?);
                }
                404 => {
                    debug!(
                        api_version = %candidate.api_version,
                        model = %candidate.model,
                        "gemini model not found, trying next"
                    );
                }
                status => return Err(ProviderError::from_status(NAME, status, &response.body)),
            }
        }

        if let (false, Some(source)) = (answered, last_transport_error) {
            return Err(ProviderError::Http {
                provider: NAME,
                source,
            });
        }

        Err(ProviderError::NoModelAvailable {
            provider: NAME,
            attempts: self.candidates.len(),
        })
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
