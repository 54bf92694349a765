//! Recovers a `{category, summary}` object from free-form model output.

use serde::Deserialize;

use crate::error::ParseError;
use crate::models::{Category, ClassificationResult};

pub const DEFAULT_SUMMARY: &str = "Content saved";

#[derive(Deserialize)]
struct RawClassification {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

/// Parse the first-`{`-to-last-`}` span of `raw` as a classification.
///
/// Commentary and code fences around the object are ignored. A missing
/// category becomes `Other` and a missing summary becomes [`DEFAULT_SUMMARY`].
pub fn parse_classification(raw: &str) -> Result<ClassificationResult, ParseError> {
    let json_text = json_object_span(raw).ok_or(ParseError::NoJsonObject)?;

    let parsed: RawClassification =
        serde_json::from_str(json_text).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    let category = parsed
        .category
        .as_deref()
        .map(Category::from_label)
        .unwrap_or(Category::Other);

    let summary = parsed
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SUMMARY.to_string());

    Ok(ClassificationResult::new(category, summary))
}

/// Remove a wrapping markdown code fence (```` ``` ```` or ```` ```json ````).
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    inner.strip_prefix("json").unwrap_or(inner).trim()
}

fn json_object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}
