//! Error types for jwt-inspector
//!
//! Every variant here is fatal: the process logs it and exits. Per-request
//! failures never reach this type; they are `VerifyError`s rendered as 400s.

use std::io;

use jwt_inspector_auth::JwksError;
use thiserror::Error;

/// Result type for startup and serving
pub type InspectorResult<T> = std::result::Result<T, InspectorError>;

/// Main error type for jwt-inspector
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InspectorError {
    /// Missing or invalid setting
    #[error("{message}")]
    Configuration {
        /// Message logged before exiting
        message: String,
        /// Setting that caused the error
        key: Option<String>,
    },

    /// The key set could not be loaded
    #[error("error getting JWKS: {0}")]
    Jwks(#[from] JwksError),

    /// The listener could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that failed to bind
        addr: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The listener failed while serving
    #[error("HTTP server error: {0}")]
    Serve(#[source] io::Error),
}

impl InspectorError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            key: None,
        }
    }

    /// Create a configuration error with the offending setting
    pub fn configuration_with_key(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Create a bind error
    pub fn bind(addr: impl Into<String>, source: io::Error) -> Self {
        Self::Bind {
            addr: addr.into(),
            source,
        }
    }

    /// Whether the error came from the listener rather than startup
    pub fn is_listener_error(&self) -> bool {
        matches!(self, Self::Bind { .. } | Self::Serve(_))
    }
}
