use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest summary shown to the user, in characters.
pub const SUMMARY_MAX_CHARS: usize = 150;

/// The closed set of buckets a saved link can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Fitness,
    Coding,
    Food,
    Travel,
    Design,
    Fashion,
    Music,
    Photography,
    Business,
    Education,
    Other,
}

impl Category {
    /// Every category, in the order used for tie-breaking.
    pub const ALL: [Category; 11] = [
        Category::Fitness,
        Category::Coding,
        Category::Food,
        Category::Travel,
        Category::Design,
        Category::Fashion,
        Category::Music,
        Category::Photography,
        Category::Business,
        Category::Education,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fitness => "Fitness",
            Category::Coding => "Coding",
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Design => "Design",
            Category::Fashion => "Fashion",
            Category::Music => "Music",
            Category::Photography => "Photography",
            Category::Business => "Business",
            Category::Education => "Education",
            Category::Other => "Other",
        }
    }

    /// Map a free-form label onto the closed set. Anything unrecognised is `Other`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
            .unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Twitter,
    Article,
    Unknown,
}

impl Platform {
    /// Pick the extraction strategy for a URL by substring match.
    pub fn detect(url: &str) -> Self {
        if url.contains("instagram.com") {
            Platform::Instagram
        } else if url.contains("twitter.com") || url.contains("x.com") {
            Platform::Twitter
        } else {
            Platform::Article
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
            Platform::Article => "article",
            Platform::Unknown => "unknown",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "instagram" => Platform::Instagram,
            "twitter" => Platform::Twitter,
            "article" => Platform::Article,
            _ => Platform::Unknown,
        }
    }

    /// Caption used when nothing could be pulled from the page.
    pub fn placeholder_caption(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram content saved",
            Platform::Twitter => "Twitter content saved",
            Platform::Article => "Article content saved",
            Platform::Unknown => "Content saved",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text pulled from a shared link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub caption: String,
    pub hashtags: Vec<String>,
    pub platform: Platform,
}

impl ExtractedContent {
    pub fn placeholder(platform: Platform) -> Self {
        Self {
            caption: platform.placeholder_caption().to_string(),
            hashtags: Vec::new(),
            platform,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub summary: String,
}

impl ClassificationResult {
    /// Builds a result with the summary clamped to its display length.
    pub fn new(category: Category, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        let summary = if summary.chars().count() > SUMMARY_MAX_CHARS {
            format!("{}...", take_chars(&summary, SUMMARY_MAX_CHARS - 3))
        } else {
            summary
        };
        Self { category, summary }
    }
}

/// A row in the saves table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedItem {
    pub id: i64,
    pub url: String,
    pub platform: Platform,
    pub caption: String,
    pub hashtags: String,
    pub category: Category,
    pub summary: String,
    pub created_at: String,
}

/// Prefix of `text` holding at most `max` characters, respecting UTF-8 boundaries.
pub fn take_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_label_is_closed() {
        assert_eq!(Category::from_label("Food"), Category::Food);
        assert_eq!(Category::from_label(" coding "), Category::Coding);
        assert_eq!(Category::from_label("Gardening"), Category::Other);
        assert_eq!(Category::from_label(""), Category::Other);
    }

    #[test]
    fn test_platform_detection() {
        assert_eq!(
            Platform::detect("https://www.instagram.com/p/abc/"),
            Platform::Instagram
        );
        assert_eq!(
            Platform::detect("https://twitter.com/rustlang/status/1"),
            Platform::Twitter
        );
        assert_eq!(Platform::detect("https://x.com/rustlang/status/1"), Platform::Twitter);
        assert_eq!(Platform::detect("https://blog.rust-lang.org/"), Platform::Article);
    }

    #[test]
    fn test_long_summary_is_clamped() {
        let result = ClassificationResult::new(Category::Music, "é".repeat(200));
        assert_eq!(result.summary.chars().count(), SUMMARY_MAX_CHARS);
        assert!(result.summary.ends_with("..."));
    }

    #[test]
    fn test_take_chars_multibyte() {
        assert_eq!(take_chars("héllo", 2), "hé");
        assert_eq!(take_chars("hi", 10), "hi");
    }
}
