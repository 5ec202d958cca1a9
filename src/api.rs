use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use post_analyzer::extract::ExtractionResult;
use post_analyzer::AnalysisResult;

#[derive(Debug, Deserialize)]
pub struct ApiAnalyzeRequest {
    pub text: Option<String>,
    pub request_id: Option<String>,
}

impl ApiAnalyzeRequest {
    pub fn into_text(self) -> Result<String, String> {
        let text = self.text.ok_or_else(|| "No text provided".to_string())?;
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err("Empty text provided".to_string());
        }
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
pub struct TextInfo {
    pub length: usize,
    pub word_count: usize,
    pub character_count: usize,
}

impl TextInfo {
    pub fn from_text(text: &str) -> Self {
        let chars = text.chars().count();
        Self {
            length: chars,
            word_count: text.split_whitespace().count(),
            character_count: chars,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiAnalyzeResponse {
    pub success: bool,
    pub request_id: String,
    pub analysis: AnalysisResult,
    pub text_info: TextInfo,
    pub timestamp: DateTime<Utc>,
}

impl ApiAnalyzeResponse {
    pub fn new(request_id: String, text: &str, analysis: AnalysisResult) -> Self {
        Self {
            success: true,
            request_id,
            analysis,
            text_info: TextInfo::from_text(text),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub filename: String,
    pub size: usize,
    #[serde(rename = "type")]
    pub extension: String,
    pub pages: usize,
}

#[derive(Debug, Serialize)]
pub struct ProcessingInfo {
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub text_length: usize,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_confidence: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ApiUploadResponse {
    pub success: bool,
    pub request_id: String,
    pub extracted_text: String,
    pub file_info: FileInfo,
    pub analysis: AnalysisResult,
    pub processing_info: ProcessingInfo,
}

impl ApiUploadResponse {
    pub fn new(
        request_id: String,
        filename: String,
        size: usize,
        extension: String,
        extraction: ExtractionResult,
        analysis: AnalysisResult,
    ) -> Self {
        let processing_info = ProcessingInfo {
            timestamp: Utc::now(),
            method: extraction.method.label().to_string(),
            text_length: extraction.text.chars().count(),
            word_count: extraction.text.split_whitespace().count(),
            ocr_confidence: extraction.confidence,
        };
        Self {
            success: true,
            request_id,
            file_info: FileInfo {
                filename,
                size,
                extension,
                pages: extraction.pages.unwrap_or(1),
            },
            extracted_text: extraction.text,
            analysis,
            processing_info,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<String>,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            processing_method: None,
            extracted_text: None,
            max_size: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.processing_method = Some(method.to_string());
        self
    }

    pub fn with_extracted_text(mut self, text: String) -> Self {
        self.extracted_text = Some(text);
        self
    }

    pub fn with_max_size(mut self, max_size: String) -> Self {
        self.max_size = Some(max_size);
        self
    }
}

/// Human-readable upload limit, e.g. `16MB`.
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;
    if bytes >= MB {
        format!("{}MB", bytes / MB)
    } else if bytes >= KB {
        format!("{}KB", bytes / KB)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Lowercased extension of an uploaded filename, if it has one.
pub fn file_extension(filename: &str) -> Option<String> {
    let (_, extension) = filename.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_lowercase())
}

/// Keeps only the final path component and characters safe for display.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect()
}
