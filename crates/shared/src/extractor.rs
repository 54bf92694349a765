use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::http::HttpClient;
use crate::models::{take_chars, ExtractedContent, Platform};

const ARTICLE_BODY_MAX_CHARS: usize = 1000;
const ARTICLE_PARAGRAPH_LIMIT: usize = 10;

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("hashtag pattern is valid"));

pub struct ContentExtractor {
    http: Arc<dyn HttpClient>,
}

impl ContentExtractor {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Pull a caption and hashtags out of the page behind `url`.
    ///
    /// Never fails: anything that goes wrong yields the platform's placeholder.
    pub async fn extract(&self, url: &str) -> ExtractedContent {
        let platform = Platform::detect(url);

        let fetched = match platform {
            Platform::Instagram | Platform::Twitter => self.fetch_social(url).await,
            _ => self.fetch_article(url).await,
        };

        match fetched {
            Ok(caption) if !caption.trim().is_empty() => {
                let hashtags = match platform {
                    Platform::Instagram | Platform::Twitter => extract_hashtags(&caption),
                    _ => Vec::new(),
                };
                ExtractedContent {
                    caption,
                    hashtags,
                    platform,
                }
            }
            Ok(_) | Err(ExtractError::NoContent) => {
                debug!(url, %platform, "no caption found, using placeholder");
                ExtractedContent::placeholder(platform)
            }
            Err(e) => {
                warn!(url, %platform, error = %e, "content extraction failed");
                ExtractedContent::placeholder(platform)
            }
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ExtractError> {
        let response = self.http.get(url).await?;
        if !response.is_ok() {
            return Err(ExtractError::Status(response.status));
        }
        Ok(response.body)
    }

    async fn fetch_social(&self, url: &str) -> Result<String, ExtractError> {
        let html = self.fetch_page(url).await?;
        parse_social_caption(&html).ok_or(ExtractError::NoContent)
    }

    async fn fetch_article(&self, url: &str) -> Result<String, ExtractError> {
        let html = self.fetch_page(url).await?;
        Ok(parse_article(&html))
    }
}

/// Caption of a social post, read from its `og:description` meta tag.
pub fn parse_social_caption(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    meta_property(&document, "og:description").filter(|c| !c.trim().is_empty())
}

/// Title and body of an article, as `title\n\nbody` (or body alone).
pub fn parse_article(html: &str) -> String {
    let document = Html::parse_document(html);

    let title = first_element(&document, "title")
        .map(|t| joined_text(&t))
        .filter(|t| !t.is_empty())
        .or_else(|| meta_property(&document, "og:title"))
        .unwrap_or_default();

    let body = if let Some(article) = first_element(&document, "article") {
        joined_text(&article)
    } else if let Some(main) = first_element(&document, "main") {
        joined_text(&main)
    } else {
        match Selector::parse("p") {
            Ok(selector) => document
                .select(&selector)
                .take(ARTICLE_PARAGRAPH_LIMIT)
                .map(|p| joined_text(&p))
                .collect::<Vec<_>>()
                .join(" "),
            Err(_) => String::new(),
        }
    };

    let body = if body.chars().count() > ARTICLE_BODY_MAX_CHARS {
        format!("{}...", take_chars(&body, ARTICLE_BODY_MAX_CHARS))
    } else {
        body
    };

    if title.is_empty() {
        body
    } else {
        format!("{}\n\n{}", title, body)
    }
}

/// Every `#word` token in `text`, without the `#`, in order of appearance.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn first_element<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

fn meta_property(document: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[property="{}"]"#, property)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(|c| c.trim().to_string())
}

/// Text nodes under `element`, each trimmed, joined by single spaces.
fn joined_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;
    use crate::http::MockClient;

    const INSTAGRAM_URL: &str = "https://www.instagram.com/p/Cxyz/";

    fn extractor(client: MockClient) -> ContentExtractor {
        ContentExtractor::new(Arc::new(client))
    }

    #[test]
    fn test_extract_hashtags() {
        assert_eq!(
            extract_hashtags("Leg day #fitness #gym_life! no#tag? #"),
            vec!["fitness", "gym_life", "tag"]
        );
        assert!(extract_hashtags("nothing here").is_empty());
    }

    #[tokio::test]
    async fn test_instagram_og_description() {
        let html = r#"<html><head>
            <meta property="og:description" content="Pasta night #food #italian">
            </head><body></body></html>"#;
        let content = extractor(MockClient::new().with_html(INSTAGRAM_URL, html))
            .extract(INSTAGRAM_URL)
            .await;

        assert_eq!(content.platform, Platform::Instagram);
        assert_eq!(content.caption, "Pasta night #food #italian");
        assert_eq!(content.hashtags, vec!["food", "italian"]);
    }

    #[tokio::test]
    async fn test_server_error_yields_placeholder() {
        let url = "https://x.com/someone/status/42";
        let content = extractor(MockClient::new().with_status(url, 500, "oops"))
            .extract(url)
            .await;

        assert_eq!(
            content,
            ExtractedContent {
                caption: "Twitter content saved".to_string(),
                hashtags: vec![],
                platform: Platform::Twitter,
            }
        );
    }

    #[tokio::test]
    async fn test_missing_meta_yields_placeholder() {
        let content = extractor(MockClient::new().with_html(INSTAGRAM_URL, "<html></html>"))
            .extract(INSTAGRAM_URL)
            .await;
        assert_eq!(content, ExtractedContent::placeholder(Platform::Instagram));
    }

    #[tokio::test]
    async fn test_unreachable_url_is_stable() {
        let url = "https://blog.invalid/post";
        let extractor = extractor(MockClient::new().with_error(url, HttpError::Timeout));

        let first = extractor.extract(url).await;
        let second = extractor.extract(url).await;

        assert_eq!(first, ExtractedContent::placeholder(Platform::Article));
        assert_eq!(first, second);
    }

    #[test]
    fn test_article_prefers_article_tag() {
        let html = r#"<html><head><title> My Post </title></head><body>
            <main><p>main text</p><article><h1>Heading</h1><p>Body   text.</p></article></main>
            </body></html>"#;
        assert_eq!(parse_article(html), "My Post\n\nHeading Body   text.");
    }

    #[test]
    fn test_article_falls_back_to_main_then_paragraphs() {
        let html = r#"<html><body><main><p>Inside main</p></main></body></html>"#;
        assert_eq!(parse_article(html), "Inside main");

        let paragraphs: String = (1..=12).map(|i| format!("<p>p{}</p>", i)).collect();
        let html = format!(
            r#"<html><head><meta property="og:title" content="OG Title"></head><body>{}</body></html>"#,
            paragraphs
        );
        assert_eq!(
            parse_article(&html),
            "OG Title\n\np1 p2 p3 p4 p5 p6 p7 p8 p9 p10"
        );
    }

    #[test]
    fn test_article_body_truncated() {
        let html = format!("<html><body><article>{}</article></body></html>", "a".repeat(1500));
        let caption = parse_article(&html);
        assert_eq!(caption.chars().count(), ARTICLE_BODY_MAX_CHARS + 3);
        assert!(caption.ends_with("..."));
    }

    #[tokio::test]
    async fn test_empty_article_yields_placeholder() {
        let url = "https://example.com/empty";
        let content = extractor(MockClient::new().with_html(url, "<html><body></body></html>"))
            .extract(url)
            .await;
        assert_eq!(content.caption, "Article content saved");
        assert_eq!(content.platform, Platform::Article);
    }
}
