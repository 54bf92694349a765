//! Hugging Face hosted inference provider.
//!
//! The public endpoint serves general text-generation models that rarely emit
//! clean JSON, so this adapter mostly falls through to the keyword classifier.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use super::{build_prompt, ClassificationProvider};
use crate::error::ProviderError;
use crate::http::HttpClient;
use crate::models::ClassificationResult;
use crate::parser::parse_classification;

const NAME: &str = "huggingface";
const BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MODEL: &str = "gpt2";

#[derive(Deserialize)]
struct Generation {
    generated_text: Option<String>,
}

pub struct HuggingFaceProvider {
    http: Arc<dyn HttpClient>,
    api_token: Option<String>,
    model: String,
}

impl HuggingFaceProvider {
    pub fn new(http: Arc<dyn HttpClient>, api_token: Option<String>, model: String) -> Self {
        Self {
            http,
            api_token,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", BASE_URL, self.model)
    }
}

#[async_trait]
impl ClassificationProvider for HuggingFaceProvider {
    async fn classify(
        &self,
        caption: &str,
        hashtags: &[String],
    ) -> Result<ClassificationResult, ProviderError> {
        let body = serde_json::json!({
            "inputs": build_prompt(caption, hashtags),
            "parameters": {
                "max_new_tokens": 150,
                "temperature": 0.7,
                "return_full_text": false
            }
        });

        let headers: Vec<(&str, String)> = self
            .api_token
            .iter()
            .map(|token| ("Authorization", format!("Bearer {}", token)))
            .collect();

        let response = self
            .http
            .post_json(&self.endpoint(), &headers, &body)
            .await
            .map_err(|source| ProviderError::Http {
                provider: NAME,
                source,
            })?;

        if !response.is_ok() {
            return Err(ProviderError::from_status(NAME, response.status, &response.body));
        }

        let generations: Vec<Generation> =
            serde_json::from_str(&response.body).map_err(|e| ProviderError::UnexpectedSchema {
                provider: NAME,
                detail: e.to_string(),
            })?;

        let text = generations
            .into_iter()
            .next()
            .and_then(|g| g.generated_text)
            .ok_or_else(|| ProviderError::UnexpectedSchema {
                provider: NAME,
                detail: "no generated_text in response".to_string(),
            })?;

        Ok(parse_classification(&text)?)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
