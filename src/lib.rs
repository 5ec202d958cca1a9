pub mod analysis;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::analysis::{
    analyze_platform_fit, analyze_readability, analyze_social_elements, calculate_metrics,
    generate_suggestions, Metrics, PlatformFit, Readability, SocialElements, Suggestion,
};
use crate::config::{AnalyzerConfig, PlatformLimit};
use crate::llm::SuggestionProvider;

pub use crate::error::{AnalysisError, ExtractionError};

pub const AI_NOT_CONFIGURED: &str = "AI suggestions not configured";
pub const AI_UNAVAILABLE: &str = "AI suggestions unavailable";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub metrics: Metrics,
    pub social_analysis: SocialElements,
    pub readability: Readability,
    pub suggestions: Vec<Suggestion>,
    pub ai_suggestions: String,
    pub platform_analysis: Vec<PlatformFit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Output of the heuristic stages, before any external suggestions are attached.
struct ContentReport {
    metrics: Metrics,
    social_analysis: SocialElements,
    readability: Readability,
    suggestions: Vec<Suggestion>,
    platform_analysis: Vec<PlatformFit>,
}

impl ContentReport {
    fn into_result(self, ai_suggestions: String, warnings: Vec<String>) -> AnalysisResult {
        AnalysisResult {
            metrics: self.metrics,
            social_analysis: self.social_analysis,
            readability: self.readability,
            suggestions: self.suggestions,
            ai_suggestions,
            platform_analysis: self.platform_analysis,
            warnings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Metrics,
    SocialElements,
    Readability,
    Suggestions,
    PlatformFit,
    AiSuggestions,
    Done,
}

impl Stage {
    pub fn event(self) -> &'static str {
        match self {
            Stage::Metrics => "metrics",
            Stage::SocialElements => "social",
            Stage::Readability => "readability",
            Stage::Suggestions => "suggestions",
            Stage::PlatformFit => "platforms",
            Stage::AiSuggestions => "ai",
            Stage::Done => "done",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Stage::Metrics => "Calculating basic metrics",
            Stage::SocialElements => "Analyzing social elements",
            Stage::Readability => "Analyzing readability",
            Stage::Suggestions => "Generating suggestions",
            Stage::PlatformFit => "Checking platform limits",
            Stage::AiSuggestions => "Requesting AI suggestions",
            Stage::Done => "Analysis complete",
        }
    }
}

/// Runs every heuristic stage, then asks the optional suggestion provider,
/// absorbing its failures. Only invalid input is reported as an error.
#[derive(Clone)]
pub struct Analyzer {
    platforms: Vec<PlatformLimit>,
    min_text_chars: usize,
    suggester: Option<Arc<dyn SuggestionProvider>>,
}

impl Analyzer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            platforms: config.platforms.clone(),
            min_text_chars: config.analysis.min_text_chars,
            suggester: None,
        }
    }

    pub fn with_suggester(mut self, suggester: Arc<dyn SuggestionProvider>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    pub fn has_suggester(&self) -> bool {
        self.suggester.is_some()
    }

    pub fn platforms(&self) -> &[PlatformLimit] {
        &self.platforms
    }

    pub fn validate(&self, text: &str) -> Result<(), AnalysisError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "no text provided for analysis".to_string(),
            ));
        }
        let chars = trimmed.chars().count();
        if chars < self.min_text_chars {
            return Err(AnalysisError::InvalidInput(format!(
                "text too short for meaningful analysis ({} < {} characters)",
                chars, self.min_text_chars
            )));
        }
        Ok(())
    }

    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        self.analyze_with_progress(text, |_| {}).await
    }

    pub async fn analyze_with_progress<F>(
        &self,
        text: &str,
        mut on_stage: F,
    ) -> Result<AnalysisResult, AnalysisError>
    where
        F: FnMut(Stage) + Send,
    {
        self.validate(text)?;
        tracing::info!(text_len = text.len(), "starting content analysis");

        let report = run_stages(text, &self.platforms, &mut on_stage);

        on_stage(Stage::AiSuggestions);
        let mut warnings = Vec::new();
        let ai_suggestions = match &self.suggester {
            Some(suggester) => match suggester.suggest(text).await {
                Ok(suggestions) => suggestions,
                Err(err) => {
                    tracing::warn!(provider = suggester.name(), error = %err, "AI suggestions failed");
                    warnings.push(format!("AI suggestions failed: {}", err));
                    AI_UNAVAILABLE.to_string()
                }
            },
            None => {
                tracing::debug!("no suggestion provider configured");
                warnings.push("AI suggestions not configured: set AI_API_KEY".to_string());
                AI_NOT_CONFIGURED.to_string()
            }
        };

        on_stage(Stage::Done);
        tracing::info!(
            suggestions = report.suggestions.len(),
            warnings = warnings.len(),
            "content analysis completed"
        );
        Ok(report.into_result(ai_suggestions, warnings))
    }
}

fn run_stages(
    text: &str,
    platforms: &[PlatformLimit],
    on_stage: &mut dyn FnMut(Stage),
) -> ContentReport {
    on_stage(Stage::Metrics);
    let metrics = calculate_metrics(text);
    tracing::debug!(words = metrics.word_count, sentences = metrics.sentence_count, "metrics");

    on_stage(Stage::SocialElements);
    let social_analysis = analyze_social_elements(text);
    tracing::debug!(
        hashtags = social_analysis.hashtags.count,
        emojis = social_analysis.emojis.count,
        cta = social_analysis.cta_count,
        "social elements"
    );

    on_stage(Stage::Readability);
    let readability = analyze_readability(text);
    tracing::debug!(
        reading_ease = readability.flesch_reading_ease,
        grade = readability.flesch_kincaid_grade,
        "readability"
    );

    on_stage(Stage::Suggestions);
    let suggestions = generate_suggestions(&metrics, &social_analysis, &readability);
    tracing::debug!(count = suggestions.len(), "suggestions");

    on_stage(Stage::PlatformFit);
    let platform_analysis = analyze_platform_fit(text, platforms);
    tracing::debug!(
        platforms = platform_analysis.len(),
        exceeded = platform_analysis.iter().filter(|fit| !fit.suitable).count(),
        "platform fit"
    );

    ContentReport {
        metrics,
        social_analysis,
        readability,
        suggestions,
        platform_analysis,
    }
}

pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
