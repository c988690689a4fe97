//! JWKS (JSON Web Key Set) loading
//!
//! The key set is fetched exactly once, before the server starts accepting
//! connections, and is never refreshed afterwards. There is no cache, no TTL
//! and no retry: a failed fetch is fatal to the process.

use jsonwebtoken::jwk::{Jwk, JwkSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::{JwksError, JwksResult};

/// Immutable set of public verification keys
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeySet {
    jwks: JwkSet,
}

impl KeySet {
    /// Decode a key set from a JWKS JSON document
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `bytes` is not a JWKS document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Find the key for a key identifier
    ///
    /// Keys sharing a `kid` are not disambiguated: the first one in set
    /// order wins.
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.jwks
            .keys
            .iter()
            .find(|jwk| jwk.common.key_id.as_deref() == Some(kid))
    }

    /// Number of keys in the set
    pub fn len(&self) -> usize {
        self.jwks.keys.len()
    }

    /// Whether the set holds no keys at all
    pub fn is_empty(&self) -> bool {
        self.jwks.keys.is_empty()
    }

    /// Key identifiers in set order (keys without a `kid` are skipped)
    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.jwks
            .keys
            .iter()
            .filter_map(|jwk| jwk.common.key_id.as_deref())
    }
}

/// Single-shot JWKS client
///
/// # Example
///
/// ```rust,no_run
/// # use jwt_inspector_auth::jwks::JwksClient;
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = JwksClient::new("https://auth.example.com/.well-known/jwks.json")?;
/// let key_set = client.fetch().await?;
/// println!("loaded {} keys", key_set.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JwksClient {
    /// JWKS endpoint URL
    jwks_uri: Url,
    /// HTTP client
    http_client: reqwest::Client,
}

impl JwksClient {
    /// Create a client for a JWKS endpoint
    ///
    /// # Errors
    ///
    /// Returns [`JwksError::Fetch`] if `jwks_uri` is not an absolute URL or
    /// the HTTP client cannot be initialized.
    pub fn new(jwks_uri: &str) -> JwksResult<Self> {
        let jwks_uri = Url::parse(jwks_uri)
            .map_err(|e| JwksError::fetch(jwks_uri, format!("invalid JWKS URI: {e}")))?;

        Self::from_url(jwks_uri)
    }

    /// Create a client for an already parsed JWKS endpoint URL
    ///
    /// # Errors
    ///
    /// Returns [`JwksError::Fetch`] if the HTTP client cannot be initialized.
    pub fn from_url(jwks_uri: Url) -> JwksResult<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| JwksError::fetch(jwks_uri.as_str(), e.to_string()))?;

        Ok(Self {
            jwks_uri,
            http_client,
        })
    }

    /// Get the JWKS endpoint URI
    pub fn jwks_uri(&self) -> &str {
        self.jwks_uri.as_str()
    }

    /// Fetch and decode the key set
    ///
    /// One GET, no retry. The body is parsed whatever the response status;
    /// an error page fails as [`JwksError::Parse`].
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint is unreachable or the body cannot be read ([`JwksError::Fetch`])
    /// - The body is not a JWKS document ([`JwksError::Parse`])
    pub async fn fetch(&self) -> JwksResult<KeySet> {
        let uri = self.jwks_uri.as_str();
        info!(jwks_uri = %uri, "getting JWKS");

        let response = self
            .http_client
            .get(self.jwks_uri.clone())
            .send()
            .await
            .map_err(|e| {
                error!(jwks_uri = %uri, error = %e, "Failed to fetch JWKS");
                JwksError::fetch(uri, e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(jwks_uri = %uri, status = %status, "JWKS endpoint returned non-success status");
        }

        let body = response.bytes().await.map_err(|e| {
            error!(jwks_uri = %uri, error = %e, "Failed to read JWKS response body");
            JwksError::fetch(uri, e.to_string())
        })?;

        debug!(jwks_uri = %uri, status = %status, bytes = body.len(), "JWKS response received");

        let key_set = KeySet::from_slice(&body).map_err(|e| {
            error!(jwks_uri = %uri, error = %e, "Failed to parse JWKS JSON");
            JwksError::parse(uri, e)
        })?;

        info!(
            jwks_uri = %uri,
            key_count = key_set.len(),
            key_ids = ?key_set.key_ids().collect::<Vec<_>>(),
            "Successfully fetched JWKS"
        );

        Ok(key_set)
    }
}

/// Fetch a key set from `jwks_uri` in one call
///
/// # Errors
///
/// See [`JwksClient::new`] and [`JwksClient::fetch`].
pub async fn fetch_key_set(jwks_uri: &str) -> JwksResult<KeySet> {
    JwksClient::new(jwks_uri)?.fetch().await
}
