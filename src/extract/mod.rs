//! Text extraction from uploaded documents and images.
//!
//! PDFs go through `pdf-extract`; images are handed to the `tesseract` CLI.
//! Both paths report failures inside [`ExtractionResult`] instead of erroring,
//! so callers can surface the message next to the processing method.

pub mod ocr;
pub mod pdf;

use serde::{Deserialize, Serialize};

use crate::config::OcrConfig;
use crate::error::ExtractionError;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionMethod {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "OCR")]
    Ocr,
}

impl ExtractionMethod {
    pub fn for_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_lowercase();
        if extension == "pdf" {
            Some(ExtractionMethod::Pdf)
        } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Some(ExtractionMethod::Ocr)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExtractionMethod::Pdf => "PDF",
            ExtractionMethod::Ocr => "OCR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub method: ExtractionMethod,
}

impl ExtractionResult {
    pub fn failure(method: ExtractionMethod, err: ExtractionError) -> Self {
        Self {
            success: false,
            text: String::new(),
            error: Some(err.to_string()),
            pages: None,
            confidence: None,
            method,
        }
    }
}

/// Picks the extractor from the file extension. Blocking; run it off the async runtime.
pub fn extract_text(
    data: &[u8],
    extension: &str,
    ocr_config: &OcrConfig,
) -> Result<ExtractionResult, ExtractionError> {
    let method = ExtractionMethod::for_extension(extension)
        .ok_or_else(|| ExtractionError::UnsupportedType(extension.to_string()))?;

    let result = match method {
        ExtractionMethod::Pdf => pdf::extract(data),
        ExtractionMethod::Ocr => ocr::extract(data, extension, ocr_config),
    };

    Ok(result.unwrap_or_else(|err| {
        tracing::warn!(method = method.label(), error = %err, "text extraction failed");
        ExtractionResult::failure(method, err)
    }))
}
