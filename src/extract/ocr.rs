use std::io::Write;
use std::path::Path;
use std::process::Command;

use crate::config::OcrConfig;
use crate::error::ExtractionError;
use crate::extract::{ExtractionMethod, ExtractionResult};
use crate::round_to;

pub const NO_TEXT_DETECTED: &str = "No text detected in image";

const WORD_LEVEL: &str = "5";

#[derive(Debug, Clone, PartialEq)]
pub struct OcrWords {
    pub text: String,
    pub detections: usize,
    pub kept: usize,
    pub mean_confidence: Option<f64>,
}

pub fn extract(
    data: &[u8],
    extension: &str,
    config: &OcrConfig,
) -> Result<ExtractionResult, ExtractionError> {
    let mut image = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&format!(".{}", extension.to_lowercase()))
        .tempfile()?;
    image.write_all(data)?;
    image.flush()?;

    let tsv = run_tesseract(image.path(), &config.language)?;
    let words = parse_tsv(&tsv, config.min_confidence);
    tracing::info!(
        detections = words.detections,
        kept = words.kept,
        text_len = words.text.len(),
        "OCR completed"
    );

    let text = if words.text.is_empty() {
        NO_TEXT_DETECTED.to_string()
    } else {
        words.text
    };

    Ok(ExtractionResult {
        success: true,
        text,
        error: None,
        pages: Some(1),
        confidence: Some(words.mean_confidence.unwrap_or(0.0)),
        method: ExtractionMethod::Ocr,
    })
}

fn run_tesseract(image_path: &Path, language: &str) -> Result<String, ExtractionError> {
    let output = Command::new("tesseract")
        .arg(image_path)
        .arg("stdout")
        .args(["-l", language])
        .arg("tsv")
        .output();

    match output {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ExtractionError::Ocr(format!(
                "tesseract failed: {}",
                stderr.trim()
            )))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::BackendNotAvailable(
                "tesseract not found (install tesseract-ocr)".to_string(),
            ))
        }
        Err(err) => Err(ExtractionError::Io(err)),
    }
}

/// Parses tesseract TSV output, keeping word rows whose confidence exceeds `min_confidence`.
pub fn parse_tsv(tsv: &str, min_confidence: f64) -> OcrWords {
    let mut words = Vec::new();
    let mut confidences = Vec::new();
    let mut detections = 0usize;

    for line in tsv.lines().skip(1) {
        let columns: Vec<&str> = line.splitn(12, '\t').collect();
        if columns.len() < 12 || columns[0] != WORD_LEVEL {
            continue;
        }
        let word = columns[11].trim();
        if word.is_empty() {
            continue;
        }
        let confidence = match columns[10].trim().parse::<f64>() {
            Ok(value) => value,
            Err(_) => continue,
        };
        detections += 1;
        if confidence > min_confidence {
            words.push(word);
            confidences.push(confidence);
        }
    }

    let mean_confidence = if confidences.is_empty() {
        None
    } else {
        Some(round_to(
            confidences.iter().sum::<f64>() / confidences.len() as f64,
            2,
        ))
    };

    OcrWords {
        text: words.join(" "),
        detections,
        kept: confidences.len(),
        mean_confidence,
    }
}
