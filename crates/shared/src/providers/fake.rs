//! Fake provider for testing.
//!
//! Replays a scripted outcome and counts calls, so orchestration can be tested
//! without network access.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::ClassificationProvider;
use crate::error::{ParseError, ProviderError};
use crate::models::{Category, ClassificationResult};

#[derive(Debug, Clone)]
enum Outcome {
    Answer(ClassificationResult),
    RateLimited,
    Malformed,
}

#[derive(Debug)]
pub struct FakeProvider {
    outcome: Outcome,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub fn answering(category: Category, summary: &str) -> Self {
        Self::with_outcome(Outcome::Answer(ClassificationResult::new(category, summary)))
    }

    pub fn rate_limited() -> Self {
        Self::with_outcome(Outcome::RateLimited)
    }

    /// Behaves like a model that replied without any JSON object.
    pub fn malformed() -> Self {
        Self::with_outcome(Outcome::Malformed)
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassificationProvider for FakeProvider {
    async fn classify(
        &self,
        _caption: &str,
        _hashtags: &[String],
    ) -> Result<ClassificationResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::Answer(result) => Ok(result.clone()),
            Outcome::RateLimited => Err(ProviderError::RateLimited {
                provider: "fake",
                message: "quota exceeded".to_string(),
            }),
            Outcome::Malformed => Err(ParseError::NoJsonObject.into()),
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}
