use post_analyzer::analysis::metrics::{calculate_metrics, split_sentences};
use post_analyzer::analysis::platform::{analyze_platform_fit, FitTier};
use post_analyzer::analysis::readability::{
    analyze_readability, compute_indices, count_syllables, reading_time_minutes,
};
use post_analyzer::analysis::social::{
    analyze_social_elements, count_cta_keywords, extract_emojis, extract_hashtags,
    extract_mentions, extract_urls,
};
use post_analyzer::analysis::{
    generate_suggestions, Metrics, Occurrences, Priority, Readability, SocialElements,
    SuggestionKind,
};
use post_analyzer::config::default_platforms;
use post_analyzer::AnalysisError;

fn occurrences(count: usize) -> Occurrences {
    Occurrences {
        count,
        list: (0..count).map(|idx| format!("item{}", idx)).collect(),
    }
}

fn social(hashtags: usize, emojis: usize, questions: usize, exclamations: usize, cta: usize) -> SocialElements {
    SocialElements {
        hashtags: occurrences(hashtags),
        mentions: occurrences(0),
        urls: occurrences(0),
        emojis: occurrences(emojis),
        question_count: questions,
        exclamation_count: exclamations,
        cta_count: cta,
    }
}

fn metrics_with_words(word_count: usize) -> Metrics {
    Metrics {
        character_count: word_count * 5,
        character_count_no_spaces: word_count * 4,
        word_count,
        sentence_count: 1,
        avg_words_per_sentence: word_count as f64,
        avg_chars_per_word: 4.0,
    }
}

fn readability_with_ease(flesch_reading_ease: f64) -> Readability {
    Readability {
        flesch_kincaid_grade: 5.0,
        flesch_reading_ease,
        automated_readability_index: 5.0,
        coleman_liau_index: 5.0,
        reading_time_minutes: 0.1,
    }
}

fn kinds(text: &str) -> Vec<(SuggestionKind, Priority)> {
    let metrics = calculate_metrics(text);
    let social = analyze_social_elements(text);
    let readability = analyze_readability(text);
    generate_suggestions(&metrics, &social, &readability)
        .into_iter()
        .map(|suggestion| (suggestion.kind, suggestion.priority))
        .collect()
}

#[test]
fn metrics_count_words_sentences_and_averages() {
    let metrics = calculate_metrics("Hello world. How are you? Great!");

    assert_eq!(metrics.character_count, 32);
    assert_eq!(metrics.character_count_no_spaces, 27);
    assert_eq!(metrics.word_count, 6);
    assert_eq!(metrics.sentence_count, 3);
    assert!((metrics.avg_words_per_sentence - 2.0).abs() < 1e-9);
    assert!((metrics.avg_chars_per_word - 4.5).abs() < 1e-9);
}

#[test]
fn metrics_on_empty_text_are_zero() {
    let metrics = calculate_metrics("");

    assert_eq!(metrics.character_count, 0);
    assert_eq!(metrics.word_count, 0);
    assert_eq!(metrics.sentence_count, 0);
    assert_eq!(metrics.avg_words_per_sentence, 0.0);
    assert_eq!(metrics.avg_chars_per_word, 0.0);
}

#[test]
fn metrics_count_unicode_characters_not_bytes() {
    let metrics = calculate_metrics("café 😀");
    assert_eq!(metrics.character_count, 6);
    assert_eq!(metrics.character_count_no_spaces, 5);
}

#[test]
fn word_count_matches_whitespace_tokens() {
    let text = "  one\ttwo\n\nthree   four five  ";
    assert_eq!(calculate_metrics(text).word_count, text.split_whitespace().count());
    assert_eq!(calculate_metrics(text).word_count, 5);
}

#[test]
fn sentence_split_collapses_punctuation_runs() {
    assert_eq!(split_sentences("Wait... what?! Really"), vec!["Wait", "what", "Really"]);
    assert!(split_sentences("?!. ...").is_empty());
}

#[test]
fn hashtags_keep_order_and_duplicates() {
    let hashtags = extract_hashtags("Love #rust and #RustLang, also #rust!");
    assert_eq!(hashtags, vec!["#rust", "#RustLang", "#rust"]);
}

#[test]
fn hashtag_extraction_round_trips() {
    let hashtags = extract_hashtags("Morning #coffee ☕ then #deep_work and #100DaysOfCode.");
    let again = extract_hashtags(&hashtags.join(" "));
    assert_eq!(hashtags, again);

    let mentions = extract_mentions("thanks @alice and @bob_2 for the help");
    assert_eq!(mentions, vec!["@alice", "@bob_2"]);
    assert_eq!(extract_mentions(&mentions.join("")), mentions);
}

#[test]
fn urls_run_until_whitespace() {
    let urls = extract_urls("Read https://example.com/a?b=1 and http://x.io now, not ftp://nope");
    assert_eq!(urls, vec!["https://example.com/a?b=1", "http://x.io"]);
}

#[test]
fn emojis_are_deduplicated_in_table_order() {
    let emojis = extract_emojis("\u{1F680} launch day \u{1F600}\u{1F600} with love \u{2764}\u{FE0F}");
    assert_eq!(emojis, vec!["\u{1F600}", "\u{2764}\u{FE0F}", "\u{1F680}"]);
    assert!(extract_emojis("no emoji here :)").is_empty());
}

#[test]
fn cta_count_is_distinct_keywords_case_insensitive() {
    assert_eq!(count_cta_keywords("Click here, CLICK again and share. Like it?"), 3);
    assert_eq!(count_cta_keywords("Sign up today and check out the demo"), 2);
    assert_eq!(count_cta_keywords("nothing to see"), 0);
}

#[test]
fn punctuation_counts_are_literal() {
    let social = analyze_social_elements("Really?! Yes!!");
    assert_eq!(social.question_count, 1);
    assert_eq!(social.exclamation_count, 3);
}

#[test]
fn social_elements_on_empty_text_are_empty() {
    let social = analyze_social_elements("");
    assert_eq!(social.hashtags.count, 0);
    assert_eq!(social.mentions.count, 0);
    assert_eq!(social.urls.count, 0);
    assert_eq!(social.emojis.count, 0);
    assert_eq!(social.cta_count, 0);
}

#[test]
fn syllable_heuristic_handles_common_words() {
    assert_eq!(count_syllables("cat"), 1);
    assert_eq!(count_syllables("make"), 1);
    assert_eq!(count_syllables("table"), 2);
    assert_eq!(count_syllables("the"), 1);
    assert_eq!(count_syllables("readability"), 5);
    assert_eq!(count_syllables("rhythm"), 1);
    assert_eq!(count_syllables("123"), 0);
}

#[test]
fn readability_scores_simple_text_as_easy() {
    let readability = analyze_readability("The cat sat on the mat. The dog ran fast.");

    assert!((readability.flesch_reading_ease - 117.16).abs() < 1e-6);
    assert!((readability.flesch_kincaid_grade + 1.84).abs() < 1e-6);
    assert!(readability.coleman_liau_index < 5.0);
    assert!(readability.reading_time_minutes <= 0.1);
}

#[test]
fn readability_never_fails_on_empty_text() {
    assert!(matches!(
        compute_indices(""),
        Err(AnalysisError::ComputationDegenerate(_))
    ));

    let readability = analyze_readability("");
    assert_eq!(readability.flesch_kincaid_grade, 0.0);
    assert_eq!(readability.flesch_reading_ease, 0.0);
    assert_eq!(readability.automated_readability_index, 0.0);
    assert_eq!(readability.coleman_liau_index, 0.0);
    assert_eq!(readability.reading_time_minutes, 0.0);
}

#[test]
fn readability_falls_back_but_keeps_reading_time() {
    let text = vec!["🚀"; 300].join(" ");
    let readability = analyze_readability(&text);

    assert_eq!(readability.flesch_reading_ease, 0.0);
    assert!((readability.reading_time_minutes - 1.5).abs() < 1e-9);
}

#[test]
fn reading_time_rounds_to_one_decimal() {
    let text = vec!["word"; 130].join(" ");
    assert!((reading_time_minutes(&text) - 0.7).abs() < 1e-9);
}

#[test]
fn suggestions_follow_rule_order() {
    let suggestions = generate_suggestions(
        &metrics_with_words(80),
        &social(0, 0, 0, 0, 0),
        &readability_with_ease(30.0),
    );
    let kinds: Vec<SuggestionKind> = suggestions.iter().map(|s| s.kind).collect();

    assert_eq!(
        kinds,
        vec![
            SuggestionKind::Length,
            SuggestionKind::Hashtags,
            SuggestionKind::Engagement,
            SuggestionKind::CallToAction,
            SuggestionKind::VisualAppeal,
            SuggestionKind::Readability,
        ]
    );
    assert!(suggestions[0].action.contains("80 words"));
}

#[test]
fn suggestions_keep_order_when_only_some_rules_fire() {
    let suggestions = generate_suggestions(
        &metrics_with_words(20),
        &social(12, 8, 1, 0, 2),
        &readability_with_ease(45.0),
    );
    let summary: Vec<(SuggestionKind, Priority)> =
        suggestions.iter().map(|s| (s.kind, s.priority)).collect();

    assert_eq!(
        summary,
        vec![
            (SuggestionKind::Hashtags, Priority::Medium),
            (SuggestionKind::VisualAppeal, Priority::Low),
            (SuggestionKind::Readability, Priority::Medium),
        ]
    );
    assert!(suggestions[0].action.contains("12 hashtags"));
    assert!(suggestions[1].action.contains("8 emojis"));
}

#[test]
fn suggestion_thresholds_are_strict() {
    let suggestions = generate_suggestions(
        &metrics_with_words(50),
        &social(10, 5, 0, 1, 1),
        &readability_with_ease(60.0),
    );
    assert!(suggestions.is_empty());

    let suggestions = generate_suggestions(
        &metrics_with_words(5),
        &social(1, 1, 1, 0, 1),
        &readability_with_ease(60.0),
    );
    assert!(suggestions.is_empty());
}

#[test]
fn blog_post_scenario_needs_no_core_fixes() {
    let text = "Check out my new blog post! #blogging #writing 😀";
    let social = analyze_social_elements(text);

    assert_eq!(social.hashtags.list, vec!["#blogging", "#writing"]);
    assert_eq!(social.exclamation_count, 1);
    assert_eq!(social.emojis.count, 1);
    assert!(social.cta_count >= 1);

    let fired = kinds(text);
    for unwanted in [
        SuggestionKind::CallToAction,
        SuggestionKind::Hashtags,
        SuggestionKind::VisualAppeal,
    ] {
        assert!(!fired.iter().any(|(kind, _)| *kind == unwanted));
    }
}

#[test]
fn single_word_is_too_short_not_too_long() {
    let metrics = calculate_metrics("aaaaa");
    assert_eq!(metrics.word_count, 1);

    let fired = kinds("aaaaa");
    assert_eq!(fired[0], (SuggestionKind::Length, Priority::Medium));
    assert_eq!(
        fired
            .iter()
            .filter(|(kind, _)| *kind == SuggestionKind::Length)
            .count(),
        1
    );
}

#[test]
fn long_plain_text_triggers_five_suggestions_in_order() {
    let text = vec!["word"; 60].join(" ");
    let fired = kinds(&text);

    assert_eq!(
        fired,
        vec![
            (SuggestionKind::Length, Priority::High),
            (SuggestionKind::Hashtags, Priority::High),
            (SuggestionKind::Engagement, Priority::High),
            (SuggestionKind::CallToAction, Priority::High),
            (SuggestionKind::VisualAppeal, Priority::Medium),
        ]
    );
}

#[test]
fn platform_tiers_are_exclusive_and_exhaustive() {
    for max_chars in [1usize, 2, 7, 280] {
        for char_count in 0..=(max_chars * 3) {
            let tier = FitTier::classify(char_count, max_chars);
            let well_within = char_count * 2 <= max_chars;
            let suitable = char_count * 2 > max_chars && char_count <= max_chars;
            let exceeds = char_count > max_chars;

            assert_eq!(
                [well_within, suitable, exceeds].iter().filter(|flag| **flag).count(),
                1
            );
            match tier {
                FitTier::WellWithin => assert!(well_within),
                FitTier::Suitable => assert!(suitable),
                FitTier::ExceedsLimit => assert!(exceeds),
            }
        }
    }
}

#[test]
fn platform_fit_reports_usage_and_excess() {
    let text = "a".repeat(300);
    let fits = analyze_platform_fit(&text, &default_platforms());

    assert_eq!(fits.len(), 4);
    let twitter = &fits[0];
    assert_eq!(twitter.platform, "twitter");
    assert!(!twitter.suitable);
    assert_eq!(twitter.tier, FitTier::ExceedsLimit);
    assert_eq!(twitter.char_usage, "300/280");
    assert!((twitter.usage_percent - 107.1).abs() < 1e-9);
    assert!(twitter.recommendation.contains("20 characters"));
    assert!(twitter.recommendation.contains("Twitter"));

    let instagram = &fits[1];
    assert!(instagram.suitable);
    assert_eq!(instagram.tier, FitTier::WellWithin);
    assert!((instagram.usage_percent - 13.6).abs() < 1e-9);
}

#[test]
fn platform_fit_boundaries() {
    let fits = analyze_platform_fit(&"b".repeat(140), &default_platforms());
    assert_eq!(fits[0].tier, FitTier::WellWithin);

    let fits = analyze_platform_fit(&"b".repeat(141), &default_platforms());
    assert_eq!(fits[0].tier, FitTier::Suitable);

    let fits = analyze_platform_fit(&"b".repeat(280), &default_platforms());
    assert_eq!(fits[0].tier, FitTier::Suitable);
    assert!(fits[0].suitable);
}
