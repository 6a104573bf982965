//! Error types for trep-search

use thiserror::Error;

/// Main error type for trep-search operations
#[derive(Error, Debug)]
pub enum Error {
    /// The search engine could not be initialised
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine answered a search with a failure status
    #[error("Error in the search engine: {0}")]
    EngineQueryFailed(String),

    /// The engine could not draw the requested random places
    #[error("Random generation failed: {0}")]
    RandomGenerationFailed(String),

    /// The engine answer could not be decoded
    #[error("Malformed engine answer: {0}")]
    Answer(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    /// Whether the error originates from the search engine boundary
    pub fn is_engine_failure(&self) -> bool {
        matches!(
            self,
            Error::EngineUnavailable(_)
                | Error::EngineQueryFailed(_)
                | Error::RandomGenerationFailed(_)
                | Error::Answer(_)
        )
    }
}

/// Result type alias for trep-search operations
pub type Result<T> = std::result::Result<T, Error>;
