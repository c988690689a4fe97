//! # jwt-inspector-auth
//!
//! Bearer token verification against a JSON Web Key Set.
//!
//! The crate has two halves that meet in [`TokenVerifier`]:
//!
//! - [`jwks`] - one-shot JWKS fetch at startup, producing an immutable [`KeySet`]
//! - [`verifier`] - `Authorization` header parsing, `kid` lookup and signature
//!   verification, producing the token's [`Claims`]
//!
//! All cryptography (JWS parsing, JWK decoding, signature checks) is done by
//! the `jsonwebtoken` crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jwt_inspector_auth::{TokenVerifier, jwks};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let key_set = jwks::fetch_key_set("https://auth.example.com/.well-known/jwks.json").await?;
//! let verifier = TokenVerifier::new(key_set);
//!
//! match verifier.verify("Bearer eyJhbGciOi...") {
//!     Ok(claims) => println!("subject: {:?}", claims.get("sub")),
//!     Err(e) => println!("rejected: {e}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## What is not checked
//!
//! Verification is purely structural plus signature: `exp`, `nbf`, `aud` and
//! `iss` are echoed back, never enforced.

pub mod error;
pub mod jwks;
pub mod verifier;

#[doc(inline)]
pub use error::{JwksError, JwksResult, VerifyError};

#[doc(inline)]
pub use jwks::KeySet;

#[doc(inline)]
pub use verifier::{Claims, CompactToken, ProtectedHeader, TokenVerifier};
