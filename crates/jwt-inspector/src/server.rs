//! HTTP surface
//!
//! One handler serves every path and method: it verifies the request's
//! bearer token and answers with the token's claims or a JSON error.
//!
//! | Outcome                  | Status | Body                                  |
//! |--------------------------|--------|---------------------------------------|
//! | token verified           | 200    | claims object                         |
//! | verification failed      | 400    | `{"error": "<reason>"}`               |
//! | response not serializable| 500    | `{"error": "error writing error"}`    |

use std::io;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use jwt_inspector_auth::{TokenVerifier, VerifyError, jwks::JwksClient};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::config::InspectorConfig;
use crate::error::{InspectorError, InspectorResult};

/// Body sent when a response cannot be serialized
///
/// Written out by hand rather than by `serde_json`, so it keeps the space
/// after the colon that the other error bodies do not have.
pub const FALLBACK_ERROR_BODY: &str = r#"{"error": "error writing error"}"#;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Verification failure rendered as a JSON error response
#[derive(Debug, Clone, Copy)]
struct InspectError {
    status: StatusCode,
    reason: VerifyError,
}

impl InspectError {
    fn bad_request(reason: VerifyError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            reason,
        }
    }
}

impl IntoResponse for InspectError {
    fn into_response(self) -> Response {
        let message = self.reason.to_string();
        json_response(self.status, &ErrorBody { error: &message })
    }
}

/// Serialize `body` as the JSON response, or fall back to a fixed 500
fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => with_json_content_type(status, bytes),
        Err(e) => {
            error!(error = %e, "Failed to serialize response body");
            fallback_response()
        }
    }
}

fn fallback_response() -> Response {
    with_json_content_type(StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_ERROR_BODY)
}

fn with_json_content_type(status: StatusCode, body: impl Into<Body>) -> Response {
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body.into(),
    )
        .into_response()
}

/// Verify the request's bearer token and echo its claims
async fn inspect(State(verifier): State<Arc<TokenVerifier>>, headers: HeaderMap) -> Response {
    // Absent or non-ASCII headers fail the scheme check like an empty one
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match verifier.verify(authorization) {
        Ok(claims) => json_response(StatusCode::OK, &claims),
        Err(reason) => {
            debug!(reason = %reason, "Rejected bearer token");
            InspectError::bad_request(reason).into_response()
        }
    }
}

/// Build the router: every request goes to the inspect handler
pub fn router(verifier: Arc<TokenVerifier>) -> Router {
    Router::new()
        .fallback(inspect)
        .with_state(verifier)
        .layer(TraceLayer::new_for_http())
}

/// Fetch the key set named by `config` and wrap it in a verifier
///
/// # Errors
///
/// Returns [`InspectorError::Jwks`] if the key set cannot be fetched or parsed.
pub async fn load_verifier(config: &InspectorConfig) -> InspectorResult<TokenVerifier> {
    let key_set = JwksClient::from_url(config.jwks_uri.clone())?
        .fetch()
        .await?;

    Ok(TokenVerifier::new(key_set))
}

/// Serve on an already bound listener until it fails
///
/// # Errors
///
/// Returns [`InspectorError::Serve`] if the server stops with an I/O error.
pub async fn serve_listener(listener: TcpListener, verifier: TokenVerifier) -> InspectorResult<()> {
    axum::serve(listener, router(Arc::new(verifier)))
        .await
        .map_err(InspectorError::Serve)
}

/// Bind the first address of [`InspectorConfig::listen_addrs`] that accepts
///
/// # Errors
///
/// Returns [`InspectorError::Bind`] with the last failure if none can be bound.
pub async fn bind_listener(config: &InspectorConfig) -> InspectorResult<TcpListener> {
    let mut last_error = None;

    for addr in config.listen_addrs() {
        match TcpListener::bind(&addr).await {
            Ok(listener) => {
                debug!(addr = %addr, "Listener bound");
                return Ok(listener);
            }
            Err(e) => {
                debug!(addr = %addr, error = %e, "Failed to bind listener");
                last_error = Some(e);
            }
        }
    }

    let source = last_error
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no listen address"));
    Err(InspectorError::bind(&config.bind, source))
}

/// Load the key set, bind the configured address and serve
///
/// Only returns on failure or if the listener stops.
///
/// # Errors
///
/// Returns error if:
/// - The key set cannot be loaded ([`InspectorError::Jwks`])
/// - The address cannot be bound ([`InspectorError::Bind`])
/// - The server stops with an I/O error ([`InspectorError::Serve`])
pub async fn run(config: InspectorConfig) -> InspectorResult<()> {
    let verifier = load_verifier(&config).await?;

    info!("starting jwt-inspector on {}", config.bind);

    let listener = bind_listener(&config).await?;

    serve_listener(listener, verifier).await
}
