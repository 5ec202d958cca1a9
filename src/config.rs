use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformLimit {
    pub name: String,
    pub max_chars: usize,
}

impl PlatformLimit {
    pub fn new(name: &str, max_chars: usize) -> Self {
        Self {
            name: name.to_string(),
            max_chars,
        }
    }
}

pub fn default_platforms() -> Vec<PlatformLimit> {
    vec![
        PlatformLimit::new("twitter", 280),
        PlatformLimit::new("instagram", 2200),
        PlatformLimit::new("facebook", 63206),
        PlatformLimit::new("linkedin", 3000),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub min_text_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { min_text_chars: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub api_base: String,
    pub model: String,
    pub timeout_ms: u64,
    pub temperature: f64,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout_ms: 30_000,
            temperature: 0.7,
            api_key: None,
        }
    }
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub language: String,
    pub min_confidence: f64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            min_confidence: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub max_upload_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 16 * 1024 * 1024,
            allowed_extensions: ["pdf", "png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:5173".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    pub fn is_allowed(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub analysis: AnalysisConfig,
    pub platforms: Vec<PlatformLimit>,
    pub ai: AiConfig,
    pub ocr: OcrConfig,
    pub server: ServerConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            platforms: default_platforms(),
            ai: AiConfig::default(),
            ocr: OcrConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => AnalyzerConfig::default(),
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read config: {}", err))?;
        let config: AnalyzerConfig =
            toml::from_str(&contents).map_err(|err| format!("failed to parse config: {}", err))?;
        config.validate()?;
        Ok(config)
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload).map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn validate(&self) -> Result<(), String> {
        if let Some(platform) = self.platforms.iter().find(|p| p.max_chars == 0) {
            return Err(format!(
                "platform {} must have a positive max_chars",
                platform.name
            ));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.ai.api_key = ["AI_API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"]
            .iter()
            .filter_map(|name| env::var(name).ok())
            .find(|value| !value.trim().is_empty());

        if let Ok(api_base) = env::var("AI_API_BASE") {
            if !api_base.trim().is_empty() {
                self.ai.api_base = api_base;
            }
        }
        if let Ok(model) = env::var("AI_MODEL") {
            if !model.trim().is_empty() {
                self.ai.model = model;
            }
        }
        if let Ok(timeout) = env::var("AI_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.ai.timeout_ms = value;
            }
        }
        if let Ok(language) = env::var("OCR_LANGUAGE") {
            if !language.trim().is_empty() {
                self.ocr.language = language;
            }
        }
        if let Ok(min_chars) = env::var("ANALYZER_MIN_TEXT_CHARS") {
            if let Ok(value) = min_chars.parse::<usize>() {
                self.analysis.min_text_chars = value;
            }
        }
        if let Ok(max_bytes) = env::var("ANALYZER_MAX_UPLOAD_BYTES") {
            if let Ok(value) = max_bytes.parse::<usize>() {
                self.server.max_upload_bytes = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("ANALYZER_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/analyzer.toml")))
}
