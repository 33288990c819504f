//! PDF text extraction.
//!
//! Extraction is delegated to `pdf-extract`, which yields page text in page
//! order with newlines between pages. The `pdf` cargo feature gates the
//! parser; without it, every call reports the capability as missing so the
//! front end can tell the user how to remediate.

use std::fmt;

/// Errors that can occur while extracting text from a document
#[derive(Debug, Clone)]
pub enum PdfError {
    /// The parsing capability is not available in this build
    MissingDependency,

    /// The document could not be parsed, or contained no extractable text
    Unsupported(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::MissingDependency => write!(
                f,
                "PDF support is not available in this build. Rebuild with the `pdf` feature enabled."
            ),
            PdfError::Unsupported(msg) => write!(f, "Could not read the document: {}", msg),
        }
    }
}

impl std::error::Error for PdfError {}

/// Extract the text of a PDF, pages concatenated in order.
#[cfg(feature = "pdf")]
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PdfError::Unsupported(e.to_string()))?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PdfError::Unsupported(
            "the document contains no extractable text".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

#[cfg(not(feature = "pdf"))]
pub fn extract_text(_bytes: &[u8]) -> Result<String, PdfError> {
    Err(PdfError::MissingDependency)
}
