// JSON response helper

use serde::Serialize;
use std::collections::HashMap;

use crate::models::GatewayResponse;

/// Serialize `body` as JSON into a response with a JSON content type.
pub fn json_response<T: Serialize>(
    status_code: u16,
    body: &T,
) -> Result<GatewayResponse, serde_json::Error> {
    let body = serde_json::to_string(body)?;

    Ok(GatewayResponse {
        status_code,
        headers: HashMap::from([("content-type".to_string(), "application/json".to_string())]),
        body: Some(body),
        is_base64_encoded: false,
    })
}
