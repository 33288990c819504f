use ingest::PdfError;
use std::fmt;

/// Errors surfaced to the user by session operations.
/// All of these are non-fatal; nothing here aborts the session.
#[derive(Debug, Clone)]
pub enum SessionError {
    /// A required parsing capability is absent from this build
    MissingDependency(String),

    /// The uploaded document could not be parsed
    UnsupportedFormat(String),

    /// The completion call failed (network, auth, or model error)
    Gateway(String),

    /// A document is already cached; reset before uploading another
    DocumentCached,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::MissingDependency(msg) => write!(f, "{}", msg),
            SessionError::UnsupportedFormat(msg) => write!(f, "Unsupported document: {}", msg),
            SessionError::Gateway(msg) => write!(f, "Completion failed: {}", msg),
            SessionError::DocumentCached => write!(
                f,
                "A rules document is already loaded. Reset the session before uploading another."
            ),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<PdfError> for SessionError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::MissingDependency => SessionError::MissingDependency(err.to_string()),
            PdfError::Unsupported(msg) => SessionError::UnsupportedFormat(msg),
        }
    }
}
