//! Readability indices computed from word, sentence, syllable and letter counts.
//!
//! Formulas:
//! - Flesch reading ease: `206.835 - 1.015 * (W/S) - 84.6 * (Syl/W)`
//! - Flesch-Kincaid grade: `0.39 * (W/S) + 11.8 * (Syl/W) - 15.59`
//! - Automated readability index: `4.71 * (C/W) + 0.5 * (W/S) - 21.43`
//! - Coleman-Liau index: `0.0588 * L - 0.296 * S - 15.8`, with `L` letters and
//!   `S` sentences per 100 words.

use serde::{Deserialize, Serialize};

use crate::analysis::metrics::split_sentences;
use crate::error::AnalysisError;
use crate::round_to;

pub const WORDS_PER_MINUTE: f64 = 200.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    pub flesch_kincaid_grade: f64,
    pub flesch_reading_ease: f64,
    pub automated_readability_index: f64,
    pub coleman_liau_index: f64,
    pub reading_time_minutes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextCounts {
    pub words: usize,
    pub sentences: usize,
    pub syllables: usize,
    pub letters: usize,
    pub alphanumerics: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indices {
    pub flesch_kincaid_grade: f64,
    pub flesch_reading_ease: f64,
    pub automated_readability_index: f64,
    pub coleman_liau_index: f64,
}

impl Indices {
    fn zero() -> Self {
        Self {
            flesch_kincaid_grade: 0.0,
            flesch_reading_ease: 0.0,
            automated_readability_index: 0.0,
            coleman_liau_index: 0.0,
        }
    }
}

/// Never fails: degenerate input yields zeroed indices with a valid reading time.
pub fn analyze_readability(text: &str) -> Readability {
    let indices = compute_indices(text).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "readability analysis failed, using zero scores");
        Indices::zero()
    });

    Readability {
        flesch_kincaid_grade: indices.flesch_kincaid_grade,
        flesch_reading_ease: indices.flesch_reading_ease,
        automated_readability_index: indices.automated_readability_index,
        coleman_liau_index: indices.coleman_liau_index,
        reading_time_minutes: reading_time_minutes(text),
    }
}

pub fn reading_time_minutes(text: &str) -> f64 {
    round_to(text.split_whitespace().count() as f64 / WORDS_PER_MINUTE, 1)
}

pub fn compute_indices(text: &str) -> Result<Indices, AnalysisError> {
    let counts = count_text(text);
    if counts.words == 0 {
        return Err(AnalysisError::ComputationDegenerate(
            "text has no words".to_string(),
        ));
    }
    if counts.sentences == 0 {
        return Err(AnalysisError::ComputationDegenerate(
            "text has no sentences".to_string(),
        ));
    }

    let words = counts.words as f64;
    let words_per_sentence = words / counts.sentences as f64;
    let syllables_per_word = counts.syllables as f64 / words;
    let chars_per_word = counts.alphanumerics as f64 / words;
    let letters_per_100 = counts.letters as f64 / words * 100.0;
    let sentences_per_100 = counts.sentences as f64 / words * 100.0;

    let indices = Indices {
        flesch_kincaid_grade: round_to(
            0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59,
            2,
        ),
        flesch_reading_ease: round_to(
            206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word,
            2,
        ),
        automated_readability_index: round_to(
            4.71 * chars_per_word + 0.5 * words_per_sentence - 21.43,
            2,
        ),
        coleman_liau_index: round_to(
            0.0588 * letters_per_100 - 0.296 * sentences_per_100 - 15.8,
            2,
        ),
    };

    let all_finite = [
        indices.flesch_kincaid_grade,
        indices.flesch_reading_ease,
        indices.automated_readability_index,
        indices.coleman_liau_index,
    ]
    .iter()
    .all(|value| value.is_finite());
    if !all_finite {
        return Err(AnalysisError::ComputationDegenerate(
            "non-finite readability score".to_string(),
        ));
    }

    Ok(indices)
}

pub fn count_text(text: &str) -> TextCounts {
    let mut words = 0usize;
    let mut syllables = 0usize;
    let mut letters = 0usize;
    let mut alphanumerics = 0usize;

    for token in text.split_whitespace() {
        let word: String = token.chars().filter(|c| c.is_alphanumeric()).collect();
        if word.is_empty() {
            continue;
        }
        words += 1;
        letters += word.chars().filter(|c| c.is_alphabetic()).count();
        alphanumerics += word.chars().count();
        syllables += count_syllables(&word);
    }

    TextCounts {
        words,
        sentences: split_sentences(text).len(),
        syllables,
        letters,
        alphanumerics,
    }
}

/// Vowel-group estimate with a silent trailing `e`; every word has at least one syllable.
pub fn count_syllables(word: &str) -> usize {
    let lower: Vec<char> = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect();
    if lower.is_empty() {
        return 0;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut groups = 0usize;
    let mut previous_vowel = false;
    for &ch in &lower {
        let vowel = is_vowel(ch);
        if vowel && !previous_vowel {
            groups += 1;
        }
        previous_vowel = vowel;
    }

    let len = lower.len();
    if groups > 1 && lower[len - 1] == 'e' && !(len >= 2 && lower[len - 2] == 'l') {
        groups -= 1;
    }

    groups.max(1)
}
