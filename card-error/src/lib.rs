use std::str::Utf8Error;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CardError>;

/// Failure kinds surfaced by the card pipeline.
///
/// Upstream fetch failures keep their kind all the way to the request
/// boundary; everything unexpected collapses into `Other`.
#[derive(Error, Debug)]
pub enum CardError {
    #[error("User \"{0}\" not found")]
    NotFound(String),
    #[error("Upstream rate limit exceeded")]
    RateLimited,
    #[error("Upstream request timed out")]
    Timeout,
    #[error("Upstream error ({status}): {}", .message.as_deref().unwrap_or("no detail"))]
    Upstream { status: u16, message: Option<String> },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parsing error")]
    Parse,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<Utf8Error> for CardError {
    fn from(_: Utf8Error) -> Self {
        Self::Parse
    }
}

impl From<serde_json::Error> for CardError {
    fn from(_: serde_json::Error) -> Self {
        Self::Parse
    }
}

impl From<url::ParseError> for CardError {
    fn from(_: url::ParseError) -> Self {
        Self::Parse
    }
}

impl From<reqwest::Error> for CardError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if let Some(status) = e.status() {
            Self::Upstream {
                status: status.as_u16(),
                message: None,
            }
        } else {
            Self::Other(anyhow::anyhow!(e.to_string()))
        }
    }
}
