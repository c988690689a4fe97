//! Bearer token verification against a [`KeySet`]
//!
//! The pipeline is:
//!
//! ```text
//! "Bearer <jws>"  ──►  CompactToken  ──►  kid lookup  ──►  alg + signature check  ──►  Claims
//!   MalformedHeader     MalformedHeader    InvalidSigningKey   InvalidToken
//! ```
//!
//! Only the signature and the structure of the token are checked. Registered
//! time and audience claims are returned as-is, never validated.

use std::borrow::Cow;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation, decode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::VerifyError;
use crate::jwks::KeySet;

/// Decoded token claims, in the order they appear in the payload
pub type Claims = Map<String, Value>;

/// Authentication scheme accepted in the `Authorization` header
const BEARER_SCHEME: &str = "bearer";

/// The protected header fields the verifier looks at
///
/// `alg` is kept as written: an algorithm jsonwebtoken does not support is a
/// verification failure, not a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProtectedHeader {
    /// Signature algorithm as named by the token
    #[serde(default)]
    pub alg: String,

    /// Key identifier
    pub kid: Option<String>,
}

/// A compact-serialized JWS whose structure has been checked
///
/// Holds the decoded protected header and the raw token; the signature has
/// not been verified yet.
#[derive(Debug, Clone)]
pub struct CompactToken<'a> {
    raw: &'a str,
    header: ProtectedHeader,
}

impl<'a> CompactToken<'a> {
    /// Parse `header.payload.signature`
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::MalformedHeader`] unless the token has exactly
    /// three base64url segments and the first one is a JSON header object.
    pub fn parse(raw: &'a str) -> Result<Self, VerifyError> {
        let mut segments = raw.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            debug!("Token is not three dot-separated segments");
            return Err(VerifyError::MalformedHeader);
        };

        if URL_SAFE_NO_PAD.decode(payload).is_err() || URL_SAFE_NO_PAD.decode(signature).is_err()
        {
            debug!("Token payload or signature is not base64url");
            return Err(VerifyError::MalformedHeader);
        }

        let header = URL_SAFE_NO_PAD.decode(header).map_err(|e| {
            debug!(error = %e, "JWT header is not base64url");
            VerifyError::MalformedHeader
        })?;

        // Objects only: derived struct deserialization would also take an array
        let header: ProtectedHeader = serde_json::from_slice::<Map<String, Value>>(&header)
            .and_then(|fields| serde_json::from_value(Value::Object(fields)))
            .map_err(|e| {
                debug!(error = %e, "Failed to decode JWT header");
                VerifyError::MalformedHeader
            })?;

        Ok(Self { raw, header })
    }

    /// The decoded protected header
    pub fn header(&self) -> &ProtectedHeader {
        &self.header
    }

    /// Key ID from the protected header, if present and non-empty
    pub fn key_id(&self) -> Option<&str> {
        self.header.kid.as_deref().filter(|kid| !kid.is_empty())
    }

    /// The token as presented
    pub fn as_str(&self) -> &'a str {
        self.raw
    }
}

/// Extract the token from an `Authorization` header value
///
/// The value is split on its first space; the scheme must be `Bearer` in any
/// letter case. Everything after that first space is the token, untrimmed.
///
/// # Errors
///
/// Returns [`VerifyError::MalformedHeader`] for any other shape.
pub fn bearer_token(header_value: &str) -> Result<&str, VerifyError> {
    match header_value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => Ok(token),
        _ => Err(VerifyError::MalformedHeader),
    }
}

/// Remove every whitespace character from a compact token
///
/// Tokens pasted across lines or after an extra space still parse.
fn strip_whitespace(raw: &str) -> Cow<'_, str> {
    if raw.contains(char::is_whitespace) {
        Cow::Owned(raw.chars().filter(|c| !c.is_whitespace()).collect())
    } else {
        Cow::Borrowed(raw)
    }
}

/// Verifies bearer tokens against an immutable key set
///
/// Verification performs no I/O and takes `&self`, so one verifier can be
/// shared by every request handler.
///
/// # Example
///
/// ```rust
/// use jwt_inspector_auth::{KeySet, TokenVerifier, VerifyError};
///
/// let key_set = KeySet::from_slice(br#"{"keys": []}"#).unwrap();
/// let verifier = TokenVerifier::new(key_set);
///
/// assert_eq!(
///     verifier.verify("Basic dXNlcjpwYXNz").unwrap_err(),
///     VerifyError::MalformedHeader,
/// );
/// ```
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    key_set: KeySet,
}

impl TokenVerifier {
    /// Create a verifier over a loaded key set
    pub fn new(key_set: KeySet) -> Self {
        Self { key_set }
    }

    /// Verify an `Authorization` header value and return the token's claims
    ///
    /// # Errors
    ///
    /// See [`verify`].
    pub fn verify(&self, header_value: &str) -> Result<Claims, VerifyError> {
        verify(header_value, &self.key_set)
    }
}

/// Verify an `Authorization` header value against `key_set`
///
/// # Errors
///
/// Returns error if:
/// - The header is not `Bearer <compact JWS>` or has no `kid` ([`VerifyError::MalformedHeader`])
/// - No key in the set has the token's `kid` ([`VerifyError::InvalidSigningKey`])
/// - The algorithm, signature or claims do not check out ([`VerifyError::InvalidToken`])
pub fn verify(header_value: &str, key_set: &KeySet) -> Result<Claims, VerifyError> {
    let raw = bearer_token(header_value)?;
    verify_compact(raw, key_set)
}

fn verify_compact(raw: &str, key_set: &KeySet) -> Result<Claims, VerifyError> {
    let compact = strip_whitespace(raw);
    let token = CompactToken::parse(&compact)?;

    let key_id = token.key_id().ok_or_else(|| {
        debug!("JWT missing kid (key ID) in header");
        VerifyError::MalformedHeader
    })?;

    let jwk = key_set.find(key_id).ok_or_else(|| {
        debug!(key_id = key_id, "Key ID not found in JWKS");
        VerifyError::InvalidSigningKey
    })?;

    let algorithm: Algorithm = token.header().alg.parse().map_err(|e| {
        debug!(
            key_id = key_id,
            alg = %token.header().alg,
            error = %e,
            "Unsupported JWT algorithm"
        );
        VerifyError::InvalidToken
    })?;

    let decoding_key = DecodingKey::from_jwk(jwk).map_err(|e| {
        debug!(key_id = key_id, error = %e, "Failed to create decoding key from JWK");
        VerifyError::InvalidToken
    })?;

    // jsonwebtoken rejects the algorithm if the key family differs
    let mut validation = Validation::new(algorithm);
    validation.required_spec_claims.clear();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;

    let token_data: TokenData<Claims> =
        decode(token.as_str(), &decoding_key, &validation).map_err(|e| {
            debug!(
                key_id = key_id,
                algorithm = ?algorithm,
                error = %e,
                "JWT validation failed"
            );
            VerifyError::InvalidToken
        })?;

    debug!(
        key_id = key_id,
        algorithm = ?algorithm,
        claim_count = token_data.claims.len(),
        "JWT validation successful"
    );

    Ok(token_data.claims)
}
