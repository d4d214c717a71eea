//! The forwarding handler: classify, pick a backend, relay, and learn
//! game-to-backend mappings from creation responses.

use crate::sticky::{classify_path, Route, StickyRouter};
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, error, info};
use shared::{CreateGameResponse, MessageResponse};
use std::sync::Arc;

/// Request bodies larger than this are refused outright.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Headers that describe the hop rather than the payload. The relayed body
/// is already decoded and re-framed, so these must not be copied through.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "content-encoding",
    "content-length",
    "upgrade",
    "host",
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(name))
}

/// Shared proxy state: the routing table and the outbound HTTP client.
#[derive(Clone)]
pub struct ProxyState {
    pub router: Arc<StickyRouter>,
    pub client: reqwest::Client,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(MessageResponse::error(message))).into_response()
}

/// Catch-all handler: every request to the balancer flows through here.
pub async fn forward(State(state): State<ProxyState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let route = classify_path(parts.uri.path());

    let backend = match state.router.target_for(&route) {
        Some(backend) => backend,
        None => match route {
            Route::Sticky(game_id) => {
                info!("No backend owns game {}, rejecting", game_id);
                return error_response(
                    StatusCode::NOT_FOUND,
                    format!("Game '{}' not found", game_id),
                );
            }
            _ => {
                error!("No backends configured");
                return error_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "No backend servers available",
                );
            }
        },
    };

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = format!("{}{}", backend, path_and_query);
    debug!("Forwarding {} {} to {}", parts.method, parts.uri.path(), url);

    let body_bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Failed to read request body: {}", e),
            )
        }
    };

    let mut outbound = state.client.request(parts.method, &url);
    for (name, value) in parts.headers.iter() {
        if !is_hop_by_hop(name.as_str()) {
            outbound = outbound.header(name, value);
        }
    }

    let backend_response = match outbound.body(body_bytes).send().await {
        Ok(response) => response,
        Err(e) => {
            error!("Backend {} failed: {}", backend, e);
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Backend server unavailable: {}", e),
            );
        }
    };

    let status = backend_response.status();
    let response_headers = backend_response.headers().clone();
    let response_bytes = match backend_response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed reading response from {}: {}", backend, e);
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Backend server unavailable: {}", e),
            );
        }
    };

    // A successful creation tells us which backend owns the new game.
    if route == Route::CreateGame && status.is_success() {
        if let Ok(created) = serde_json::from_slice::<CreateGameResponse>(&response_bytes) {
            if created.success {
                state.router.record(&created.game_id, &backend);
            }
        }
    }

    let mut builder = Response::builder().status(status);
    for (name, value) in response_headers.iter() {
        if !is_hop_by_hop(name.as_str()) {
            builder = builder.header(name, value);
        }
    }
    match builder.body(Body::from(response_bytes)) {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to assemble relayed response: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to relay backend response",
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hop_by_hop_headers_are_filtered() {
        for name in ["Content-Length", "content-encoding", "Transfer-Encoding", "HOST"] {
            assert!(is_hop_by_hop(name), "{} should be filtered", name);
        }
    }

    #[test]
    fn test_payload_headers_pass_through() {
        for name in ["content-type", "accept", "authorization", "x-request-id"] {
            assert!(!is_hop_by_hop(name), "{} should pass through", name);
        }
    }
}
