//! Common test utilities for integration tests

#![allow(dead_code)]

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// HMAC secret published under kid `k1`
pub const K1_SECRET: &[u8] = b"jwt-inspector-k1-secret-0123456789";

/// JWKS document publishing `k1`
pub fn k1_jwks() -> Value {
    json!({
        "keys": [{
            "kty": "oct",
            "kid": "k1",
            "alg": "HS256",
            "k": URL_SAFE_NO_PAD.encode(K1_SECRET),
        }]
    })
}

/// Sign `claims` with HS256 under the `k1` secret, advertising `kid`
pub fn sign(kid: &str, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".to_string());
    header.kid = Some(kid.to_string());

    encode(&header, claims, &EncodingKey::from_secret(K1_SECRET)).expect("Failed to encode test JWT")
}

/// Start a mock server serving `document` at `/jwks`; returns it with the endpoint URL
pub async fn mock_jwks_server(document: Value) -> (MockServer, String) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jwks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document))
        .mount(&server)
        .await;

    let endpoint = format!("{}/jwks", server.uri());
    (server, endpoint)
}
