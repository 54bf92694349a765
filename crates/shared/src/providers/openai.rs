//! OpenAI chat-completions provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::{build_prompt, ClassificationProvider};
use crate::error::ProviderError;
use crate::http::HttpClient;
use crate::models::ClassificationResult;
use crate::parser::{parse_classification, strip_code_fence};

const NAME: &str = "openai";
const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const SYSTEM_PROMPT: &str = "You are a helpful assistant that categorizes and summarizes social media content. Always respond with valid JSON only, no markdown.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct OpenAiProvider {
    http: Arc<dyn HttpClient>,
    api_key: Option<String>,
    model: String,
}

impl OpenAiProvider {
    pub fn new(http: Arc<dyn HttpClient>, api_key: Option<String>, model: String) -> Self {
        Self {
            http,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl ClassificationProvider for OpenAiProvider {
    async fn classify(
        &self,
        caption: &str,
        hashtags: &[String],
    ) -> Result<ClassificationResult, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured(NAME))?;

        let prompt = build_prompt(caption, hashtags);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.7,
            max_tokens: 150,
        };
        let body = serde_json::to_value(&request).map_err(|e| {
            ProviderError::UnexpectedSchema {
                provider: NAME,
                detail: e.to_string(),
            }
        })?;

        let headers = [("Authorization", format!("Bearer {}", api_key))];
        let response = self
            .http
            .post_json(ENDPOINT, &headers, &body)
            .await
            .map_err(|source| ProviderError::Http {
                provider: NAME,
                source,
            })?;

        if !response.is_ok() {
            return Err(ProviderError::from_status(NAME, response.status, &response.body));
        }

        let chat: ChatResponse =
            serde_json::from_str(&response.body).map_err(|e| ProviderError::UnexpectedSchema {
                provider: NAME,
                detail: e.to_string(),
            })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::UnexpectedSchema {
                provider: NAME,
                detail: "no message content in response".to_string(),
            })?;

        debug!(model = %self.model, "openai responded");
        Ok(parse_classification(strip_code_fence(&content))?)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
