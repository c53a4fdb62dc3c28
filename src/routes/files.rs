//! Gateway emulation for the local relay server.
//!
//! Incoming HTTP requests are turned into the same event shape API Gateway
//! delivers to Lambda, so uploads and downloads go through exactly the code
//! path they take in production.

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::collections::HashMap;
use tracing::error;

use crate::handler::dispatch;
use crate::models::{AppState, GatewayRequest, GatewayResponse};

/// HTTP-level body limit; the 32 MiB form ceiling is enforced by the upload
/// path itself so oversized forms get the same 500 they get in Lambda.
const RELAY_BODY_LIMIT: usize = 64 << 20;

pub fn router(state: AppState) -> Router {
    Router::new()
        .fallback(relay)
        .layer(DefaultBodyLimit::max(RELAY_BODY_LIMIT))
        .with_state(state)
}

async fn relay(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let event = to_gateway_request(&method, query, &headers, &body);

    match dispatch(&state.service, &event).await {
        Ok(response) => into_http_response(response),
        Err(e) => {
            error!(error = %e, "Failed to encode response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Header names arrive lowercased; repeated headers keep the last value.
pub fn to_gateway_request(
    method: &Method,
    query: HashMap<String, String>,
    headers: &HeaderMap,
    body: &[u8],
) -> GatewayRequest {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();

    GatewayRequest {
        http_method: method.as_str().to_string(),
        headers,
        query_string_parameters: query,
        body: (!body.is_empty()).then(|| BASE64.encode(body)),
        is_base64_encoded: true,
    }
}

pub fn into_http_response(response: GatewayResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let body = match response.body {
        Some(body) if response.is_base64_encoded => match BASE64.decode(body) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "Handler produced an invalid base64 body");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        },
        Some(body) => body.into_bytes(),
        None => Vec::new(),
    };

    let mut builder = Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder.body(Body::from(body)).unwrap_or_else(|e| {
        error!(error = %e, "Handler produced invalid response headers");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CONTENT_TYPE;

    #[test]
    fn test_to_gateway_request() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "text/plain".parse().unwrap());
        let query = HashMap::from([("filename".to_string(), "a.txt".to_string())]);

        let event = to_gateway_request(&Method::GET, query, &headers, b"");
        assert_eq!(event.http_method, "GET");
        assert_eq!(event.header("Content-Type"), Some("text/plain"));
        assert_eq!(event.query("filename"), Some("a.txt"));
        assert!(event.body.is_none());

        let event = to_gateway_request(&Method::POST, HashMap::new(), &headers, b"hi");
        assert_eq!(event.body.as_deref(), Some("aGk="));
        assert!(event.is_base64_encoded);
    }

    #[test]
    fn test_into_http_response_decodes_base64() {
        let response = into_http_response(GatewayResponse {
            status_code: 200,
            headers: HashMap::from([(
                "Content-Disposition".to_string(),
                "attachment; filename=a.txt".to_string(),
            )]),
            body: Some("aGk=".to_string()),
            is_base64_encoded: true,
        });

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=a.txt"
        );
    }

    #[test]
    fn test_into_http_response_bad_base64() {
        let response = into_http_response(GatewayResponse {
            status_code: 200,
            body: Some("%%%".to_string()),
            is_base64_encoded: true,
            ..Default::default()
        });

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
