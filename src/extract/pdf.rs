use crate::error::ExtractionError;
use crate::extract::{ExtractionMethod, ExtractionResult};

pub fn extract(data: &[u8]) -> Result<ExtractionResult, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(data)
        .map_err(|err| ExtractionError::Pdf(err.to_string()))?;

    let text = join_pages(&pages);
    if text.is_empty() {
        tracing::warn!(pages = pages.len(), "PDF text extraction returned empty");
    } else {
        tracing::debug!(pages = pages.len(), text_len = text.len(), "PDF text extracted");
    }

    Ok(ExtractionResult {
        success: true,
        text,
        error: None,
        pages: Some(pages.len()),
        confidence: None,
        method: ExtractionMethod::Pdf,
    })
}

pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
