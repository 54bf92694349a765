//! Message in, saved and classified link out.

use anyhow::Result;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};

use crate::classifier::Classifier;
use crate::extractor::ContentExtractor;
use crate::http::HttpClient;
use crate::models::{Category, ClassificationResult, ExtractedContent, Platform};
use crate::store::{NewSave, SaveStore};

/// Summary stored for links that could not be processed.
pub const UNCLASSIFIED_SUMMARY: &str = "Link saved";

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("url pattern is valid"));

/// The first http(s) URL in a free-form message.
pub fn find_first_url(message: &str) -> Option<&str> {
    URL_RE.find(message).map(|m| m.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedLink {
    pub url: String,
    pub content: ExtractedContent,
    pub result: ClassificationResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The message held no link.
    NoLink,
    Classified { id: i64, link: ProcessedLink },
    /// The raw URL was stored as `Other` without extraction or classification.
    SavedUnclassified { id: i64, url: String, reason: String },
}

pub struct LinkIngestor {
    extractor: ContentExtractor,
    classifier: Classifier,
}

impl LinkIngestor {
    pub fn new(http: Arc<dyn HttpClient>, classifier: Classifier) -> Self {
        Self {
            extractor: ContentExtractor::new(http),
            classifier,
        }
    }

    /// Extract and classify `url` without saving anything.
    pub async fn process(&self, url: &str) -> ProcessedLink {
        let content = self.extractor.extract(url).await;
        let result = self
            .classifier
            .classify(&content.caption, &content.hashtags)
            .await;

        ProcessedLink {
            url: url.to_string(),
            content,
            result,
        }
    }

    /// Find the link in `message`, process it and record it in `store`.
    ///
    /// Only fails when even the bare URL cannot be written.
    pub async fn ingest(&self, message: &str, store: &SaveStore) -> Result<IngestOutcome> {
        let Some(url) = find_first_url(message) else {
            return Ok(IngestOutcome::NoLink);
        };

        if let Err(reason) = check_fetchable(url) {
            warn!(url, %reason, "saving link without processing");
            return save_unclassified(store, url, reason);
        }

        let link = self.process(url).await;
        let saved = store.save(&NewSave {
            url: &link.url,
            platform: link.content.platform,
            caption: &link.content.caption,
            hashtags: &link.content.hashtags,
            category: link.result.category,
            summary: &link.result.summary,
        });

        match saved {
            Ok(id) => {
                info!(id, url, category = %link.result.category, "link saved");
                Ok(IngestOutcome::Classified { id, link })
            }
            Err(e) => {
                warn!(url, error = %e, "failed to save processed link, storing bare URL");
                save_unclassified(store, url, e.to_string())
            }
        }
    }
}

fn check_fetchable(raw: &str) -> Result<(), String> {
    let parsed = url::Url::parse(raw).map_err(|e| format!("invalid URL: {}", e))?;
    if parsed.host_str().is_none() {
        return Err("URL has no host".to_string());
    }
    Ok(())
}

fn save_unclassified(store: &SaveStore, url: &str, reason: String) -> Result<IngestOutcome> {
    let id = store.save(&NewSave {
        url,
        platform: Platform::Unknown,
        caption: url,
        hashtags: &[],
        category: Category::Other,
        summary: UNCLASSIFIED_SUMMARY,
    })?;
    Ok(IngestOutcome::SavedUnclassified {
        id,
        url: url.to_string(),
        reason,
    })
}
