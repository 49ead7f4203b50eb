//! API Gateway / Lambda proxy-event binding for [`WebhookHandler`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tracing::{error, warn};

use super::adapter::{WebhookResponse, handle_request};
use super::handler::WebhookHandler;

/// Case-insensitive header lookup on a proxy event's `headers` object.
pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// A missing body is treated as empty so the signature check still runs first.
fn extract_body(payload: &Value) -> Result<Vec<u8>, WebhookResponse> {
    let Some(body) = payload.get("body").and_then(Value::as_str) else {
        warn!("Request missing body, treating as empty");
        return Ok(Vec::new());
    };

    let encoded = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if encoded {
        STANDARD.decode(body).map_err(|e| {
            error!("Failed to decode base64 body: {}", e);
            WebhookResponse::error(400, "Invalid body format")
        })
    } else {
        Ok(body.as_bytes().to_vec())
    }
}

/// Renders a [`WebhookResponse`] as a proxy-integration response.
#[must_use]
pub fn to_proxy_response(response: &WebhookResponse) -> Value {
    json!({
        "statusCode": response.status_code,
        "headers": { "Content-Type": "application/json" },
        "body": response.body.to_string()
    })
}

/// Handles one proxy event end to end and returns the proxy response.
pub fn handle_proxy_event(
    handler: &WebhookHandler,
    payload: &Value,
    signature_header: &str,
) -> Value {
    let empty = Value::Null;
    let headers = payload.get("headers").unwrap_or(&empty);

    let response = match extract_body(payload) {
        Ok(body) => handle_request(
            handler,
            &body,
            |name| get_header_value(headers, name),
            signature_header,
        ),
        Err(response) => response,
    };

    to_proxy_response(&response)
}
