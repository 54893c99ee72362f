//! Core error types for pawplan-core.
//!
//! A small closed taxonomy: callers match on the variant to decide whether a
//! failure is the caller's fault (`NotFound`, `Conflict`, `InvalidInput`),
//! transient (`Store`), or an installation problem (`Config`).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pawplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Record is missing, or belongs to another family. Cross-family
    /// existence is never revealed as a permission error.
    #[error("{what} not found")]
    NotFound { what: String },

    /// Invalid state transition, or a ledger update that cannot be applied.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Caller-supplied data the engine cannot recover from locally.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Storage-layer failure. Transient; both generation and approval are
    /// safe to retry wholesale.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CoreError {
    /// A missing or out-of-family record.
    pub fn not_found(what: impl Into<String>) -> Self {
        CoreError::NotFound { what: what.into() }
    }

    /// A bad state transition or unsatisfiable ledger update.
    pub fn conflict(message: impl Into<String>) -> Self {
        CoreError::Conflict {
            message: message.into(),
        }
    }

    /// Unrecoverable caller input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            message: message.into(),
        }
    }
}

/// Storage-specific errors.
///
/// Store internals are reported generically; user-visible detail lives on
/// `CoreError::Conflict` and friends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend unreachable or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Snapshot encode/decode failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot file I/O failed.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("failed to parse configuration: {0}")]
    ParseFailed(#[from] toml::de::Error),

    /// A value parsed but is out of range or otherwise unusable.
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
