use serde::{Deserialize, Serialize};

use crate::analysis::metrics::Metrics;
use crate::analysis::readability::Readability;
use crate::analysis::social::SocialElements;

pub const MAX_WORDS: usize = 50;
pub const MIN_WORDS: usize = 5;
pub const MAX_HASHTAGS: usize = 10;
pub const MAX_EMOJIS: usize = 5;
pub const MIN_READING_EASE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionKind {
    #[serde(rename = "Length Optimization")]
    Length,
    #[serde(rename = "Hashtag Strategy")]
    Hashtags,
    #[serde(rename = "Engagement")]
    Engagement,
    #[serde(rename = "Call to Action")]
    CallToAction,
    #[serde(rename = "Visual Appeal")]
    VisualAppeal,
    #[serde(rename = "Readability")]
    Readability,
}

impl SuggestionKind {
    pub fn label(self) -> &'static str {
        match self {
            SuggestionKind::Length => "Length Optimization",
            SuggestionKind::Hashtags => "Hashtag Strategy",
            SuggestionKind::Engagement => "Engagement",
            SuggestionKind::CallToAction => "Call to Action",
            SuggestionKind::VisualAppeal => "Visual Appeal",
            SuggestionKind::Readability => "Readability",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub priority: Priority,
    #[serde(rename = "suggestion")]
    pub message: String,
    pub action: String,
}

impl Suggestion {
    fn new(kind: SuggestionKind, priority: Priority, message: &str, action: String) -> Self {
        Self {
            kind,
            priority,
            message: message.to_string(),
            action,
        }
    }
}

/// Rules run in a fixed order; each contributes at most one suggestion.
pub fn generate_suggestions(
    metrics: &Metrics,
    social: &SocialElements,
    readability: &Readability,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if metrics.word_count > MAX_WORDS {
        suggestions.push(Suggestion::new(
            SuggestionKind::Length,
            Priority::High,
            "Consider shortening your content. Social media posts perform better with 20-50 words.",
            format!(
                "Current: {} words. Try reducing to under {} words.",
                metrics.word_count, MAX_WORDS
            ),
        ));
    } else if metrics.word_count < MIN_WORDS {
        suggestions.push(Suggestion::new(
            SuggestionKind::Length,
            Priority::Medium,
            "Your post is very short. Add more context to engage your audience.",
            format!(
                "Current: {} words. Try adding 10-20 more words for better engagement.",
                metrics.word_count
            ),
        ));
    }

    let hashtags = social.hashtag_count();
    if hashtags == 0 {
        suggestions.push(Suggestion::new(
            SuggestionKind::Hashtags,
            Priority::High,
            "Add 3-5 relevant hashtags to increase discoverability.",
            "Research trending hashtags in your niche and add them strategically.".to_string(),
        ));
    } else if hashtags > MAX_HASHTAGS {
        suggestions.push(Suggestion::new(
            SuggestionKind::Hashtags,
            Priority::Medium,
            "Too many hashtags can look spammy.",
            format!(
                "Current: {} hashtags. Reduce to 3-5 high-quality ones.",
                hashtags
            ),
        ));
    }

    if social.question_count == 0 && social.exclamation_count == 0 {
        suggestions.push(Suggestion::new(
            SuggestionKind::Engagement,
            Priority::High,
            "Add a question or exclamation to encourage interaction.",
            "End your post with \"What do you think?\" or add excitement with exclamation marks!"
                .to_string(),
        ));
    }

    if social.cta_count == 0 {
        suggestions.push(Suggestion::new(
            SuggestionKind::CallToAction,
            Priority::High,
            "Include a clear call-to-action to guide your audience.",
            "Add phrases like \"Share your thoughts\", \"Follow for more\", or \"Click the link\"."
                .to_string(),
        ));
    }

    let emojis = social.emoji_count();
    if emojis == 0 {
        suggestions.push(Suggestion::new(
            SuggestionKind::VisualAppeal,
            Priority::Medium,
            "Add 1-2 relevant emojis to make your post more visually appealing.",
            "Choose emojis that match your content tone and message.".to_string(),
        ));
    } else if emojis > MAX_EMOJIS {
        suggestions.push(Suggestion::new(
            SuggestionKind::VisualAppeal,
            Priority::Low,
            "Too many emojis can be distracting.",
            format!("Current: {} emojis. Consider reducing to 2-3.", emojis),
        ));
    }

    if readability.flesch_reading_ease < MIN_READING_EASE {
        suggestions.push(Suggestion::new(
            SuggestionKind::Readability,
            Priority::Medium,
            "Content may be too complex for social media.",
            "Use simpler words and shorter sentences for better engagement.".to_string(),
        ));
    }

    suggestions
}
