use serde::{Deserialize, Serialize};

use crate::round_to;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub character_count: usize,
    pub character_count_no_spaces: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_words_per_sentence: f64,
    pub avg_chars_per_word: f64,
}

/// Splits on runs of `.`, `!` and `?`, dropping fragments that are blank after trimming.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(|c: char| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

pub fn calculate_metrics(text: &str) -> Metrics {
    let character_count = text.chars().count();
    let character_count_no_spaces = text.chars().filter(|c| *c != ' ').count();
    let word_count = text.split_whitespace().count();
    let sentence_count = split_sentences(text).len();

    let avg_words_per_sentence = if sentence_count == 0 {
        0.0
    } else {
        round_to(word_count as f64 / sentence_count as f64, 2)
    };
    let avg_chars_per_word = if word_count == 0 {
        0.0
    } else {
        round_to(character_count_no_spaces as f64 / word_count as f64, 2)
    };

    Metrics {
        character_count,
        character_count_no_spaces,
        word_count,
        sentence_count,
        avg_words_per_sentence,
        avg_chars_per_word,
    }
}
