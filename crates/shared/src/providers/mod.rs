//! Remote classification providers.
//!
//! Each adapter owns its wire format and error shape, and hands the model's
//! free text to [`crate::parser::parse_classification`].

mod fake;
mod gemini;
mod huggingface;
mod openai;

pub use fake::FakeProvider;
pub use gemini::{GeminiProvider, ModelCandidate, DEFAULT_API_VERSIONS, DEFAULT_MODELS};
pub use huggingface::{HuggingFaceProvider, DEFAULT_MODEL as HUGGINGFACE_DEFAULT_MODEL};
pub use openai::{OpenAiProvider, DEFAULT_MODEL as OPENAI_DEFAULT_MODEL};

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ProviderError;
use crate::models::ClassificationResult;

/// A remote service that turns a caption and hashtags into a category and summary.
#[async_trait]
pub trait ClassificationProvider: Send + Sync {
    async fn classify(
        &self,
        caption: &str,
        hashtags: &[String],
    ) -> Result<ClassificationResult, ProviderError>;

    /// Short identifier used in logs, e.g. "openai".
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<P: ClassificationProvider + ?Sized> ClassificationProvider for Arc<P> {
    async fn classify(
        &self,
        caption: &str,
        hashtags: &[String],
    ) -> Result<ClassificationResult, ProviderError> {
        (**self).classify(caption, hashtags).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Captions shorter than this (after trimming) are replaced in the prompt.
const MIN_PROMPT_CAPTION_CHARS: usize = 5;
const PLACEHOLDER_CAPTION: &str = "Social media content";

/// The instruction prompt shared by every provider.
pub fn build_prompt(caption: &str, hashtags: &[String]) -> String {
    let caption = if caption.trim().chars().count() < MIN_PROMPT_CAPTION_CHARS {
        PLACEHOLDER_CAPTION
    } else {
        caption
    };
    let hashtags = if hashtags.is_empty() {
        "none".to_string()
    } else {
        hashtags.join(", ")
    };

    format!(
        r#"Analyze this social media content and provide:
1. A category (choose ONE from: Fitness, Coding, Food, Travel, Design, Fashion, Music, Photography, Business, Education, Other)
2. A one-sentence summary

Content: {}
Hashtags: {}

Respond in JSON format:
{{
    "category": "category_name",
    "summary": "one sentence summary"
}}"#,
        caption, hashtags
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_caption_and_hashtags() {
        let prompt = build_prompt(
            "Homemade sourdough",
            &["baking".to_string(), "bread".to_string()],
        );
        assert!(prompt.contains("Content: Homemade sourdough"));
        assert!(prompt.contains("Hashtags: baking, bread"));
        assert!(prompt.contains("\"category\": \"category_name\""));
    }

    #[test]
    fn test_prompt_placeholders() {
        let prompt = build_prompt("  hi ", &[]);
        assert!(prompt.contains("Content: Social media content"));
        assert!(prompt.contains("Hashtags: none"));
    }
}
