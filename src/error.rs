//! Error types for the caching engine
//!
//! Provides unified error handling using thiserror.
//!
//! These errors stay internal to the engine: the strategy router converts
//! every failure into a fallback response, so no error from this crate ever
//! reaches the code that issued the original request.

use thiserror::Error;

// == Engine Error Enum ==
/// Unified error type for the caching engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Network fetch failed (connection error, DNS failure, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// Shell prewarm failed during install (all-or-nothing)
    #[error("Install failed: {0}")]
    InstallFailed(String),

    /// A request URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Control message payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the caching engine.
pub type Result<T> = std::result::Result<T, EngineError>;
