//! Configuration types for jwt-inspector

use url::Url;

use crate::error::{InspectorError, InspectorResult};

/// Environment variable holding the JWKS endpoint
pub const JWKS_URI_ENV: &str = "JWKS_URI";

/// Environment variable holding the listen address
pub const ADDR_ENV: &str = "ADDR";

/// Listen address used when `ADDR` is unset
pub const DEFAULT_ADDR: &str = ":8000";

/// Hosts tried, in order, when an address has an empty host (`:8000`)
///
/// The IPv6 wildcard is dual-stack on most systems; hosts without IPv6 fall
/// back to the IPv4 wildcard.
const ANY_HOSTS: [&str; 2] = ["[::]", "0.0.0.0"];

/// Startup configuration, resolved once and passed to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorConfig {
    /// Where the key set is fetched from
    pub jwks_uri: Url,

    /// Listen address as configured (`host:port` or `:port`)
    pub bind: String,
}

impl InspectorConfig {
    /// Resolve raw settings into a configuration
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`InspectorError::Configuration`] if the JWKS URI is missing
    /// or is not an absolute URL.
    pub fn new(jwks_uri: Option<&str>, addr: Option<&str>) -> InspectorResult<Self> {
        let jwks_uri = jwks_uri.filter(|uri| !uri.is_empty()).ok_or_else(|| {
            InspectorError::configuration_with_key(
                format!("JWKS URI not defined (did you remember to set {JWKS_URI_ENV}?)"),
                JWKS_URI_ENV,
            )
        })?;

        let jwks_uri = Url::parse(jwks_uri).map_err(|e| {
            InspectorError::configuration_with_key(
                format!("invalid JWKS URI {jwks_uri:?}: {e}"),
                JWKS_URI_ENV,
            )
        })?;

        let addr = addr.filter(|a| !a.is_empty()).unwrap_or(DEFAULT_ADDR);

        Ok(Self {
            jwks_uri,
            bind: addr.to_string(),
        })
    }

    /// Addresses to try binding, in order, until one succeeds
    ///
    /// An empty host (`:8000`) means every interface.
    pub fn listen_addrs(&self) -> Vec<String> {
        if self.bind.starts_with(':') {
            ANY_HOSTS
                .iter()
                .map(|host| format!("{host}{}", self.bind))
                .collect()
        } else {
            vec![self.bind.clone()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InspectorConfig::new(Some("https://auth.example.com/jwks"), None).unwrap();
        assert_eq!(config.jwks_uri.as_str(), "https://auth.example.com/jwks");
        assert_eq!(config.bind, ":8000");
        assert_eq!(config.listen_addrs(), vec!["[::]:8000", "0.0.0.0:8000"]);
    }

    #[test]
    fn test_missing_jwks_uri() {
        for missing in [None, Some("")] {
            let err = InspectorConfig::new(missing, Some(":9000")).unwrap_err();
            assert_eq!(
                err.to_string(),
                "JWKS URI not defined (did you remember to set JWKS_URI?)"
            );
        }
    }

    #[test]
    fn test_invalid_jwks_uri() {
        let err = InspectorConfig::new(Some("auth.example.com/jwks"), None).unwrap_err();
        assert!(matches!(err, InspectorError::Configuration { .. }));
        assert!(err.to_string().contains("invalid JWKS URI"));
    }

    #[test]
    fn test_listen_addrs() {
        let uri = Some("http://localhost:5556/keys");

        let cases: [(Option<&str>, &[&str]); 5] = [
            (Some(":9000"), &["[::]:9000", "0.0.0.0:9000"]),
            (Some(""), &["[::]:8000", "0.0.0.0:8000"]),
            (Some("127.0.0.1:3000"), &["127.0.0.1:3000"]),
            (Some("localhost:3000"), &["localhost:3000"]),
            (Some("[::1]:3000"), &["[::1]:3000"]),
        ];

        for (addr, expected) in cases {
            let config = InspectorConfig::new(uri, addr).unwrap();
            assert_eq!(config.listen_addrs(), expected, "ADDR={addr:?}");
        }
    }
}
