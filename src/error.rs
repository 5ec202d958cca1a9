use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("external service unavailable: {0}")]
    ExternalServiceUnavailable(String),
    #[error("readability undefined: {0}")]
    ComputationDegenerate(String),
}

impl AnalysisError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AnalysisError::InvalidInput(_))
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF processing error: {0}")]
    Pdf(String),
    #[error("OCR processing error: {0}")]
    Ocr(String),
    #[error("OCR backend not available: {0}")]
    BackendNotAvailable(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
