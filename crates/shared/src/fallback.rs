//! Offline keyword classifier used when no remote provider answers.

use crate::models::{take_chars, Category, ClassificationResult, SUMMARY_MAX_CHARS};

/// Captions at or below this many characters are too short to summarise.
const MIN_CAPTION_CHARS: usize = 10;
const SUMMARY_HASHTAG_LIMIT: usize = 3;

fn keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::Fitness => &[
            "workout", "fitness", "exercise", "gym", "abs", "cardio", "yoga", "pilates",
            "running", "training", "muscle", "strength", "health", "fit", "diet", "weight",
            "nutrition",
        ],
        Category::Coding => &[
            "code", "programming", "developer", "python", "javascript", "coding", "tutorial",
            "algorithm", "software", "tech", "webdev", "app", "api", "github", "stackoverflow",
        ],
        Category::Food => &[
            "recipe", "food", "cooking", "pasta", "meal", "dish", "cuisine", "chef", "baking",
            "restaurant", "delicious", "tasty", "cook", "kitchen", "dinner", "lunch",
            "breakfast",
        ],
        Category::Travel => &[
            "travel", "trip", "vacation", "destination", "traveling", "adventure", "wanderlust",
            "explore", "journey", "holiday", "tourism", "visit", "sightseeing",
        ],
        Category::Design => &[
            "design", "graphic", "ui", "ux", "art", "creative", "illustration", "logo",
            "branding", "aesthetic", "visual", "typography", "layout",
        ],
        Category::Fashion => &[
            "fashion", "style", "outfit", "clothing", "wardrobe", "trend", "fashionable",
            "dress", "accessories",
        ],
        Category::Music => &[
            "music", "song", "artist", "album", "concert", "musician", "beat", "lyrics",
            "spotify", "playlist",
        ],
        Category::Photography => &[
            "photo", "photography", "camera", "shot", "picture", "image", "photographer",
            "lens", "portrait", "landscape",
        ],
        Category::Business => &[
            "business", "entrepreneur", "startup", "marketing", "sales", "strategy", "finance",
            "investment", "company",
        ],
        Category::Education => &[
            "learn", "education", "study", "course", "tutorial", "lesson", "student", "school",
            "university", "knowledge",
        ],
        Category::Other => &[],
    }
}

/// Deterministic classifier: substring keyword scoring plus a heuristic summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, caption: &str, hashtags: &[String]) -> ClassificationResult {
        let category = self.categorize(caption, hashtags);
        let summary = summarize_caption(caption)
            .unwrap_or_else(|| synthesized_summary(category, hashtags));
        ClassificationResult::new(category, summary)
    }

    pub fn categorize(&self, caption: &str, hashtags: &[String]) -> Category {
        let search_text = format!(
            "{} {}",
            caption.to_lowercase(),
            hashtags
                .iter()
                .map(|h| h.to_lowercase())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut best = (Category::Other, 0);
        for category in Category::ALL {
            let score = score(&search_text, keywords(category));
            // Strictly greater keeps the earliest category on ties
            if score > best.1 {
                best = (category, score);
            }
        }
        best.0
    }
}

fn score(search_text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| search_text.contains(*k)).count()
}

fn summarize_caption(caption: &str) -> Option<String> {
    if caption.trim().chars().count() <= MIN_CAPTION_CHARS {
        return None;
    }

    let sentences: Vec<&str> = caption.split('.').collect();
    let summary = if sentences.len() > 1 {
        let first = sentences[0].trim();
        if first.chars().count() > SUMMARY_MAX_CHARS {
            format!("{}...", take_chars(first, SUMMARY_MAX_CHARS - 3))
        } else {
            first.to_string()
        }
    } else {
        let head = take_chars(caption, SUMMARY_MAX_CHARS).trim();
        if caption.chars().count() > SUMMARY_MAX_CHARS {
            format!("{}...", head)
        } else {
            head.to_string()
        }
    };

    Some(summary).filter(|s| !s.is_empty())
}

fn synthesized_summary(category: Category, hashtags: &[String]) -> String {
    if hashtags.is_empty() {
        format!("{} content saved", category)
    } else {
        let tags: Vec<&str> = hashtags
            .iter()
            .take(SUMMARY_HASHTAG_LIMIT)
            .map(String::as_str)
            .collect();
        format!("{} content: {}", category, tags.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_workout_caption() {
        let caption = "Morning workout done! #fitness #gym feeling strong";
        let result = KeywordClassifier::new().classify(caption, &tags(&["fitness", "gym"]));

        assert_eq!(result.category, Category::Fitness);
        assert!(result.summary.contains("Morning workout done"));
    }

    #[test]
    fn test_empty_caption_uses_hashtags() {
        let result = KeywordClassifier::new().classify("", &tags(&["coding", "python"]));
        assert_eq!(result.category, Category::Coding);
        assert_eq!(result.summary, "Coding content: coding, python");
    }

    #[test]
    fn test_no_signal_is_other() {
        let result = KeywordClassifier::new().classify("zzz", &[]);
        assert_eq!(result.category, Category::Other);
        assert_eq!(result.summary, "Other content saved");
    }

    #[test]
    fn test_summary_lists_at_most_three_hashtags() {
        let result = KeywordClassifier::new().classify("", &tags(&["a", "b", "c", "d"]));
        assert_eq!(result.summary, "Other content: a, b, c");
    }

    #[test]
    fn test_tie_goes_to_first_category() {
        // One Food keyword and one Music keyword
        let category = KeywordClassifier::new().categorize("pasta and a song", &[]);
        assert_eq!(category, Category::Food);
    }

    #[test]
    fn test_first_sentence_summary() {
        let caption = "Best ramen in Tokyo. We queued for an hour. Worth it";
        let result = KeywordClassifier::new().classify(caption, &[]);
        assert_eq!(result.summary, "Best ramen in Tokyo");
    }

    #[test]
    fn test_long_sentence_is_truncated() {
        let caption = format!("{}. Second sentence", "word ".repeat(60));
        let result = KeywordClassifier::new().classify(&caption, &[]);
        assert_eq!(result.summary.chars().count(), SUMMARY_MAX_CHARS);
        assert!(result.summary.ends_with("..."));

        let caption = "x".repeat(200);
        let result = KeywordClassifier::new().classify(&caption, &[]);
        assert_eq!(result.summary, format!("{}...", "x".repeat(147)));
    }

    #[test]
    fn test_empty_first_sentence_falls_back_to_synthesized() {
        let result = KeywordClassifier::new().classify("... recipe ideas", &tags(&["food"]));
        assert_eq!(result.category, Category::Food);
        assert_eq!(result.summary, "Food content: food");
    }

    #[test]
    fn test_deterministic_and_closed() {
        let classifier = KeywordClassifier::new();
        let inputs = [
            ("Startup marketing strategy for 2024", vec![]),
            ("Sunset landscape shot with a new lens", tags(&["photography"])),
            ("", vec![]),
            ("¿Qué tal? ünïcödé caption here", tags(&["Travel"])),
        ];
        for (caption, hashtags) in inputs {
            let a = classifier.classify(caption, &hashtags);
            let b = classifier.classify(caption, &hashtags);
            assert_eq!(a, b);
            assert!(Category::ALL.contains(&a.category));
            assert!(!a.summary.is_empty());
        }
    }
}
