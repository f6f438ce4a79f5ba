//! Error types for fwblock.

use thiserror::Error;

/// Error type for fwblock operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A required option was absent or empty
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Delete count is not a positive integer
    #[error("invalid rule count (expected a positive integer): {0}")]
    InvalidCount(String),

    /// Rule prefix that cannot form a valid rule name
    #[error("invalid rule prefix {prefix:?}: {reason}")]
    InvalidPrefix { prefix: String, reason: &'static str },

    /// Chunk size of zero
    #[error("invalid max entries per rule: {0}")]
    InvalidChunkSize(usize),

    /// More rules than the three-digit naming scheme can address
    #[error("too many rules: {count} requested, at most {max} supported")]
    TooManyRules { count: usize, max: usize },

    /// Error reported by the compute API
    #[error("compute API error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint that is not an absolute base URL
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Unusable credentials file
    #[error("credentials error: {0}")]
    Credentials(String),
}

impl Error {
    /// Whether this error came back from the remote side.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote { .. } | Error::Http(_))
    }
}

/// Result type alias for fwblock operations.
pub type Result<T> = std::result::Result<T, Error>;
