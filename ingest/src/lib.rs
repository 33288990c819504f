//! Document ingestion - turning uploaded rulebook bytes into text.

pub mod pdf;

pub use pdf::{PdfError, extract_text};
