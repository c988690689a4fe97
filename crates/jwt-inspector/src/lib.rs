//! jwt-inspector: echo the claims of a verified bearer JWT
//!
//! A single-purpose HTTP service for debugging identity providers. At startup
//! it fetches a JSON Web Key Set from `JWKS_URI`; afterwards every request,
//! whatever its path or method, is answered with the claims of its
//! `Authorization: Bearer <jwt>` token once the signature checks out.
//!
//! ```bash
//! JWKS_URI=https://auth.example.com/.well-known/jwks.json ADDR=:8000 jwt-inspector
//!
//! curl -H "Authorization: Bearer $TOKEN" http://localhost:8000/
//! {"sub":"u1","iss":"https://auth.example.com", ...}
//! ```
//!
//! # Architecture
//!
//! ```text
//! cli ──► config ──► server::run ──► jwks fetch (once) ──► axum router
//!                                                            │
//!                                      every request ──► TokenVerifier ──► 200 / 400 / 500
//! ```
//!
//! Token verification itself lives in the `jwt-inspector-auth` crate.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod server;

// Re-exports for convenience
pub use config::InspectorConfig;
pub use error::{InspectorError, InspectorResult};
