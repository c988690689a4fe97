//! Error types for JWKS loading and token verification
//!
//! Two separate hierarchies with different lifetimes:
//! - [`VerifyError`]: per-request, closed set, rendered to clients verbatim
//! - [`JwksError`]: startup-only, fatal to the process

use thiserror::Error;

/// Result type for JWKS loading
pub type JwksResult<T> = std::result::Result<T, JwksError>;

/// Why a presented credential was rejected
///
/// The `Display` text of each variant is the exact message sent to clients,
/// so it must never carry token or key material.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerifyError {
    /// Header missing or not `Bearer <token>`, token not a compact JWS,
    /// or `kid` absent from the protected header
    #[error("malformed authorization header")]
    MalformedHeader,

    /// `kid` present but not found in the loaded key set
    #[error("invalid signing key")]
    InvalidSigningKey,

    /// Signature did not verify, algorithm incompatible with the key,
    /// or claims could not be decoded
    #[error("unable to validate JWT")]
    InvalidToken,
}

/// JWKS retrieval failure at startup
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum JwksError {
    /// The URI was invalid, the request failed, or the body could not be read
    #[error("JWKS fetch from {uri} failed: {message}")]
    Fetch { uri: String, message: String },

    /// The body was not a well-formed JWK set document
    #[error("invalid JWKS document from {uri}: {source}")]
    Parse {
        uri: String,
        #[source]
        source: serde_json::Error,
    },
}

impl JwksError {
    /// Create a fetch error
    pub fn fetch(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            uri: uri.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(uri: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            uri: uri.into(),
            source,
        }
    }

    /// URI the failed fetch was aimed at
    pub fn uri(&self) -> &str {
        match self {
            Self::Fetch { uri, .. } | Self::Parse { uri, .. } => uri,
        }
    }
}
