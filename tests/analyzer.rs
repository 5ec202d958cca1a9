use async_trait::async_trait;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use post_analyzer::config::{AnalyzerConfig, PlatformLimit};
use post_analyzer::llm::{suggestion_prompt, SuggestionProvider};
use post_analyzer::{AnalysisError, Analyzer, Stage, AI_NOT_CONFIGURED, AI_UNAVAILABLE};

struct FixedSuggester {
    reply: String,
    calls: AtomicUsize,
}

impl FixedSuggester {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SuggestionProvider for FixedSuggester {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn suggest(&self, _text: &str) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

struct DownSuggester;

#[async_trait]
impl SuggestionProvider for DownSuggester {
    fn name(&self) -> &str {
        "down"
    }

    async fn suggest(&self, _text: &str) -> Result<String, AnalysisError> {
        Err(AnalysisError::ExternalServiceUnavailable(
            "connection refused".to_string(),
        ))
    }
}

const POST: &str = "Check out my new blog post! #blogging #writing 😀";

fn analyzer() -> Analyzer {
    Analyzer::new(&AnalyzerConfig::default())
}

#[tokio::test]
async fn analysis_without_provider_uses_not_configured_sentinel() {
    let analyzer = analyzer();
    assert!(!analyzer.has_suggester());

    let result = analyzer.analyze(POST).await.unwrap();

    assert_eq!(result.ai_suggestions, AI_NOT_CONFIGURED);
    assert_eq!(result.metrics.word_count, 9);
    assert_eq!(result.metrics.sentence_count, 2);
    assert_eq!(result.social_analysis.hashtags.count, 2);
    assert_eq!(result.platform_analysis.len(), 4);
    assert!(result.platform_analysis.iter().all(|fit| fit.suitable));
    assert_eq!(result.warnings.len(), 1);
}

#[tokio::test]
async fn provider_text_is_passed_through() {
    let suggester = Arc::new(FixedSuggester::new("1. Ask your readers a question"));
    let analyzer = analyzer().with_suggester(suggester.clone());

    let result = analyzer.analyze(POST).await.unwrap();

    assert_eq!(result.ai_suggestions, "1. Ask your readers a question");
    assert!(result.warnings.is_empty());
    assert_eq!(suggester.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn provider_failure_degrades_to_unavailable_sentinel() {
    let analyzer = analyzer().with_suggester(Arc::new(DownSuggester));

    let result = analyzer.analyze(POST).await.unwrap();

    assert_eq!(result.ai_suggestions, AI_UNAVAILABLE);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("connection refused"));
    assert_eq!(result.metrics.word_count, 9);
    assert_eq!(result.social_analysis.hashtags.count, 2);
}

#[tokio::test]
async fn empty_and_blank_text_are_invalid_input() {
    let suggester = Arc::new(FixedSuggester::new("unused"));
    let analyzer = analyzer().with_suggester(suggester.clone());

    for text in ["", "   \n\t  "] {
        let err = analyzer.analyze(text).await.unwrap_err();
        assert!(err.is_invalid_input());
    }
    assert_eq!(suggester.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn short_text_is_rejected_below_minimum_length() {
    let err = analyzer().analyze("hi there").await.unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidInput(_)));

    let mut config = AnalyzerConfig::default();
    config.analysis.min_text_chars = 1;
    let result = Analyzer::new(&config).analyze("aaaaa").await.unwrap();
    assert_eq!(result.metrics.word_count, 1);
}

#[tokio::test]
async fn stages_are_reported_in_pipeline_order() {
    let mut stages = Vec::new();
    analyzer()
        .analyze_with_progress(POST, |stage| stages.push(stage))
        .await
        .unwrap();

    assert_eq!(
        stages,
        vec![
            Stage::Metrics,
            Stage::SocialElements,
            Stage::Readability,
            Stage::Suggestions,
            Stage::PlatformFit,
            Stage::AiSuggestions,
            Stage::Done,
        ]
    );
}

#[tokio::test]
async fn invalid_input_reports_no_stages() {
    let mut stages = Vec::new();
    let result = analyzer()
        .analyze_with_progress("", |stage| stages.push(stage))
        .await;

    assert!(result.is_err());
    assert!(stages.is_empty());
}

#[tokio::test]
async fn configured_platforms_drive_fit_results() {
    let mut config = AnalyzerConfig::default();
    config.platforms = vec![PlatformLimit::new("sms", 20), PlatformLimit::new("mastodon", 500)];
    let analyzer = Analyzer::new(&config);
    assert_eq!(analyzer.platforms().len(), 2);

    let result = analyzer.analyze(POST).await.unwrap();
    let names: Vec<&str> = result
        .platform_analysis
        .iter()
        .map(|fit| fit.platform.as_str())
        .collect();
    assert_eq!(names, vec!["sms", "mastodon"]);
    assert!(!result.platform_analysis[0].suitable);
    assert!(result.platform_analysis[1].suitable);
}

#[tokio::test]
async fn result_serializes_with_wire_field_names() {
    let result = analyzer().analyze(POST).await.unwrap();
    let value = serde_json::to_value(&result).unwrap();

    for key in [
        "metrics",
        "social_analysis",
        "readability",
        "suggestions",
        "ai_suggestions",
        "platform_analysis",
    ] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(value["social_analysis"]["exclamations"], 1);
    assert!(value["social_analysis"]["cta_elements"].as_u64().unwrap() >= 1);
    assert_eq!(value["platform_analysis"][0]["platform"], "twitter");
    assert_eq!(value["platform_analysis"][0]["tier"], "well_within");
    assert!(value["platform_analysis"][0].get("char_percentage").is_some());
}

#[tokio::test]
async fn suggestions_serialize_type_priority_and_message() {
    let text = vec!["word"; 60].join(" ");
    let result = analyzer().analyze(&text).await.unwrap();
    let value = serde_json::to_value(&result.suggestions).unwrap();

    assert_eq!(value[0]["type"], "Length Optimization");
    assert_eq!(value[0]["priority"], "high");
    assert!(value[0]["suggestion"].as_str().unwrap().contains("shortening"));
    assert_eq!(value[4]["type"], "Visual Appeal");
    assert_eq!(value[4]["priority"], "medium");
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn every_stage_emits_a_debug_event() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    analyzer().analyze(POST).await.unwrap();

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    for message in [
        "metrics",
        "social elements",
        "readability",
        "suggestions",
        "platform fit",
    ] {
        assert!(
            output
                .lines()
                .any(|line| line.contains("DEBUG") && line.contains(message)),
            "no debug event for {}:\n{}",
            message,
            output
        );
    }
}

#[test]
fn prompt_embeds_post_text() {
    let prompt = suggestion_prompt("Launch day!");
    assert!(prompt.contains("Content: \"Launch day!\""));
    assert!(prompt.contains("3-5 specific suggestions"));
}

#[test]
fn stage_events_have_stable_names() {
    assert_eq!(Stage::Metrics.event(), "metrics");
    assert_eq!(Stage::PlatformFit.event(), "platforms");
    assert_eq!(Stage::Done.event(), "done");
    assert!(!Stage::AiSuggestions.message().is_empty());
}
