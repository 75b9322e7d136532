//! services/storefront/src/error.rs
//!
//! Defines the primary error type for the storefront client.

use crate::config::ConfigError;
use robokit_core::authoring::AuthoringError;
use robokit_core::ports::PortError;

/// The primary error type for the `storefront` service.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("{0}")]
    Port(#[from] PortError),

    /// The course authoring workflow aborted.
    #[error("{0}")]
    Authoring(#[from] AuthoringError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A manifest or session file could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Represents a standard Input/Output error (e.g., reading a manifest).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The command line asked for something that cannot be done.
    #[error("{0}")]
    Usage(String),
}
