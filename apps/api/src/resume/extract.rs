//! PDF text extraction behind one fixed contract.
//!
//! The extraction library is an external capability; everything above it sees
//! only `TextExtractor::extract_text(bytes) -> String`. Swapping libraries
//! touches exactly one impl.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

/// Minimum normalized length before we treat the document as a scanned or
/// empty text layer.
pub const MIN_EXTRACTED_CHARS: usize = 50;

pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Please upload a PDF file.")]
    UnsupportedFileType,

    #[error("file data is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("PDF text layer appears empty. Please paste text manually.")]
    EmptyExtractedText,

    #[error("PDF extraction failed: {0}")]
    Extraction(String),
}

/// The single extraction contract.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Production extractor backed by the `pdf-extract` crate.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::Extraction(e.to_string()))
    }
}

/// Collapses the extraction layer's line breaks into single spaces and trims.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Full read-resume pipeline: mime gate → base64 decode → extract → length
/// gate. Returns the raw extracted text; the length gate runs on the
/// normalized form so stray whitespace cannot pass off as content.
pub fn read_resume(
    extractor: &dyn TextExtractor,
    file_data: &str,
    mime_type: &str,
) -> Result<String, ExtractError> {
    if mime_type != PDF_MIME {
        return Err(ExtractError::UnsupportedFileType);
    }

    let bytes = BASE64.decode(file_data)?;
    let text = extractor.extract_text(&bytes)?;

    let clean = normalize_text(&text);
    if clean.chars().count() < MIN_EXTRACTED_CHARS {
        return Err(ExtractError::EmptyExtractedText);
    }

    tracing::info!("Extracted {} chars from resume", clean.len());
    Ok(text)
}
