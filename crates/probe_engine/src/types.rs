use std::fmt;
use std::time::Duration;

/// Where a job currently is inside its background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Queued,
    Loading,
    Extracting,
    Releasing,
    Done,
}

/// Rejected submission; no job is created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("URL is required")]
    MissingUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct NavigationError {
    pub kind: NavigationFailure,
    pub message: String,
}

impl NavigationError {
    pub fn new(kind: NavigationFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationFailure {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for NavigationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationFailure::InvalidUrl => write!(f, "invalid url"),
            NavigationFailure::HttpStatus(code) => write!(f, "http status {code}"),
            NavigationFailure::Timeout => write!(f, "timeout"),
            NavigationFailure::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            NavigationFailure::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            NavigationFailure::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            NavigationFailure::Network => write!(f, "network error"),
        }
    }
}

/// Fault while querying an already loaded page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
    #[error("page query failed: {0}")]
    Query(String),
    #[error("unexpected fault while analysing the page")]
    Panicked,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to release page: {0}")]
pub struct ReleaseError(pub String);

/// Why a job ended in the failed state. The display text becomes the job's
/// `error` field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum JobFailure {
    #[error("navigation failed: {0}")]
    Navigation(#[from] NavigationError),
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("analysis timed out after {0:?}")]
    TimedOut(Duration),
}
