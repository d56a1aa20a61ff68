//! Search Error Types
//!
//! Error handling for the search client and URL adapter. Errors never reach
//! the controller's state: the client folds them into a failed outcome.

use miette::Diagnostic;
use thiserror::Error;

/// Search operation errors
#[derive(Error, Debug, Diagnostic)]
pub enum SearchError {
    #[error("Transport error: {0}")]
    #[diagnostic(code(search::transport))]
    Transport(#[from] reqwest::Error),

    #[error("Search endpoint returned HTTP {status}: {body}")]
    #[diagnostic(code(search::status))]
    Status { status: u16, body: String },

    #[error("Search rejected: {0}")]
    Rejected(String),

    #[error("Malformed search response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(search::config),
        help("check the [search] section of config.toml")
    )]
    Config(String),

    #[error("Invalid location: {0}")]
    #[diagnostic(
        code(search::location),
        help("pass a path such as /search?query=kool or an absolute URL")
    )]
    InvalidLocation(String),
}

/// Result type alias for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
