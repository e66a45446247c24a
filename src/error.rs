//! Error types for cmdhandler
//!
//! Provides a unified error type for everything around the ordered store.
//! The store and executor themselves never fail: missing keys and unsupported
//! actions are reported as result lines, not errors.

use thiserror::Error;

/// Result type alias using HandlerError
pub type Result<T> = std::result::Result<T, HandlerError>;

/// Unified error type for cmdhandler operations
#[derive(Debug, Error)]
pub enum HandlerError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scenario error: {0}")]
    Scenario(String),

    // -------------------------------------------------------------------------
    // Sink Errors
    // -------------------------------------------------------------------------
    #[error("Sink error: {0}")]
    Sink(String),

    // -------------------------------------------------------------------------
    // Dispatch Errors
    // -------------------------------------------------------------------------
    #[error("Worker error: {0}")]
    Worker(String),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Store corruption detected: {0}")]
    Corruption(String),
}
