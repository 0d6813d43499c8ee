//! services/client/src/error.rs
//!
//! Defines the primary error type for the command-line client.

use crate::config::ConfigError;
use icebreaker_core::{AuthError, DashboardError, PortError, RecordError, ValidationError};

/// The primary error type for the `client` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An error that propagated up from one of the core service ports.
    #[error("{0}")]
    Port(#[from] PortError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Dashboard(#[from] DashboardError),

    #[error("{0}")]
    Record(#[from] RecordError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Building the HTTP client failed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., writing to stdout).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
