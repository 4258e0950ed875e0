// src/github/error.rs
// =============================================================================
// Errors produced while talking to the GitHub API.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[from]: lets the ? operator convert library errors into ours
// =============================================================================

use thiserror::Error;

use crate::records::RecordError;

#[derive(Debug, Error)]
pub enum GitHubError {
    /// GitHub answered with a JSON object carrying a non-empty `message`
    /// ("Not Found", "Bad credentials", rate limit notices, ...)
    #[error("GitHub API error: {message}")]
    Api { message: String },

    /// Connection failures and bodies that aren't valid JSON
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("base URL cannot carry a path: {0}")]
    BaseUrl(String),

    #[error("API token contains characters not allowed in an HTTP header")]
    InvalidToken,

    /// A listing endpoint returned an object, or a detail endpoint a list
    #[error("unexpected response from {url}: expected {expected}")]
    UnexpectedShape { url: String, expected: &'static str },

    #[error(transparent)]
    Record(#[from] RecordError),
}
