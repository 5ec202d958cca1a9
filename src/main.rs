mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use post_analyzer::config::AnalyzerConfig;
use post_analyzer::extract::extract_text;
use post_analyzer::llm::LlmClient;
use post_analyzer::{format_float, AnalysisResult, Analyzer};

#[derive(Parser)]
#[command(name = "post-analyzer", about = "Social media post analyzer")]
struct Cli {
    /// Path to a TOML config file (defaults to config/analyzer.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    Analyze(AnalyzeArgs),
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct AnalyzeArgs {
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,
    /// PDF, image or plain-text file to analyze.
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long)]
    ai: bool,
    #[arg(long)]
    ai_model: Option<String>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 5000)]
    port: u16,
    /// Skip AI suggestions even when an API key is configured.
    #[arg(long)]
    no_ai: bool,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (mut config, config_path) = AnalyzerConfig::load(cli.config)?;
    if let Some(path) = config_path.filter(|path| path.exists()) {
        tracing::info!(path = %path.display(), "loaded config");
    }

    let command = cli.command.unwrap_or(Command::Analyze(AnalyzeArgs::default()));
    match command {
        Command::Analyze(args) => {
            if let Some(model) = args.ai_model.clone() {
                config.ai.model = model;
            }
            run_analyze(args, config).await
        }
        Command::Serve(args) => {
            let analyzer = build_analyzer(&config, !args.no_ai)?;
            server::serve(args, config, analyzer).await
        }
    }
}

fn build_analyzer(config: &AnalyzerConfig, use_ai: bool) -> Result<Analyzer, String> {
    let analyzer = Analyzer::new(config);
    if !use_ai {
        return Ok(analyzer);
    }
    match LlmClient::from_config(&config.ai)? {
        Some(client) => {
            tracing::info!(model = client.model(), "AI suggestions enabled");
            Ok(analyzer.with_suggester(Arc::new(client)))
        }
        None => {
            tracing::warn!("AI suggestions disabled: no API key configured");
            Ok(analyzer)
        }
    }
}

async fn run_analyze(args: AnalyzeArgs, config: AnalyzerConfig) -> Result<(), String> {
    if args.ai && config.ai.api_key.is_none() {
        return Err("AI_API_KEY (or GEMINI_API_KEY) is not set".to_string());
    }
    let analyzer = build_analyzer(&config, args.ai)?;

    let text = match args.file.as_deref() {
        Some(path) => read_file_text(path, &config).await?,
        None => read_text(args.text)?,
    };

    let output = analyzer
        .analyze(&text)
        .await
        .map_err(|err| err.to_string())?;

    if args.json {
        let payload = serde_json::to_string_pretty(&output)
            .map_err(|err| format!("failed to serialize analysis: {}", err))?;
        println!("{}", payload);
        return Ok(());
    }

    print_report(&output);
    Ok(())
}

fn print_report(output: &AnalysisResult) {
    let metrics = &output.metrics;
    println!(
        "Metrics: {} words | {} sentences | {} characters ({} without spaces)",
        metrics.word_count,
        metrics.sentence_count,
        metrics.character_count,
        metrics.character_count_no_spaces
    );
    println!(
        "Averages: {} words per sentence | {} characters per word",
        format_float(metrics.avg_words_per_sentence, 2),
        format_float(metrics.avg_chars_per_word, 2)
    );

    let social = &output.social_analysis;
    println!(
        "Social: hashtags {} | mentions {} | urls {} | emojis {} | questions {} | exclamations {} | CTA keywords {}",
        social.hashtags.count,
        social.mentions.count,
        social.urls.count,
        social.emojis.count,
        social.question_count,
        social.exclamation_count,
        social.cta_count
    );
    if !social.hashtags.list.is_empty() {
        println!("  hashtags: {}", social.hashtags.list.join(" "));
    }

    let readability = &output.readability;
    println!(
        "Readability: reading ease {} | FK grade {} | ARI {} | Coleman-Liau {} | ~{} min read",
        format_float(readability.flesch_reading_ease, 1),
        format_float(readability.flesch_kincaid_grade, 1),
        format_float(readability.automated_readability_index, 1),
        format_float(readability.coleman_liau_index, 1),
        format_float(readability.reading_time_minutes, 1)
    );

    if !output.suggestions.is_empty() {
        println!("\nSuggestions:");
        for suggestion in &output.suggestions {
            println!(
                "- [{}] {}: {} -> {}",
                suggestion.priority.label(),
                suggestion.kind.label(),
                suggestion.message,
                suggestion.action
            );
        }
    }

    println!("\nPlatforms:");
    for fit in &output.platform_analysis {
        println!(
            "  {}: {} ({}%) {}",
            fit.platform,
            fit.char_usage,
            format_float(fit.usage_percent, 1),
            fit.recommendation
        );
    }

    println!("\nAI suggestions:\n{}", output.ai_suggestions);
}

async fn read_file_text(path: &Path, config: &AnalyzerConfig) -> Result<String, String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    if matches!(extension.as_str(), "txt" | "md" | "") {
        return std::fs::read_to_string(path)
            .map_err(|err| format!("failed reading {}: {}", path.display(), err));
    }

    let data =
        std::fs::read(path).map_err(|err| format!("failed reading {}: {}", path.display(), err))?;
    let ocr_config = config.ocr.clone();
    let result = tokio::task::spawn_blocking(move || extract_text(&data, &extension, &ocr_config))
        .await
        .map_err(|err| format!("text extraction task failed: {}", err))?
        .map_err(|err| err.to_string())?;

    if !result.success {
        return Err(result
            .error
            .unwrap_or_else(|| "text extraction failed".to_string()));
    }
    Ok(result.text)
}

fn read_text(arg: Option<String>) -> Result<String, String> {
    if let Some(text) = arg {
        if !text.trim().is_empty() {
            return Ok(text);
        }
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Err("missing post text: pass --text, --file or pipe stdin".to_string());
    }
    Ok(trimmed.to_string())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "post_analyzer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
