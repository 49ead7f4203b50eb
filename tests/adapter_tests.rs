use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use laneful::webhooks::lambda::{get_header_value, handle_proxy_event};
use laneful::webhooks::{
    DEFAULT_SIGNATURE_HEADER, WebhookEvent, WebhookHandler, WebhookResponse, handle_request, sign,
};
use serde_json::{Value, json};
use std::collections::HashMap;

const SECRET: &str = "test-secret";
const BODY: &str = r#"{"event_type":"email.delivered","message_id":"msg_123","email":"user@example.com","timestamp":1640995200,"data":{}}"#;

fn handler_with_delivery_callback() -> WebhookHandler {
    let mut handler = WebhookHandler::with_secret(SECRET);
    handler.register_handler("email.delivered", |_: &WebhookEvent| Ok(()));
    handler.register_handler("email.failed", |_: &WebhookEvent| {
        Err(anyhow::anyhow!("database unavailable"))
    });
    handler
}

fn respond(handler: &WebhookHandler, body: &str, signature: Option<&str>) -> WebhookResponse {
    let mut headers = HashMap::new();
    if let Some(sig) = signature {
        headers.insert(DEFAULT_SIGNATURE_HEADER.to_string(), sig.to_string());
    }
    handle_request(
        handler,
        body.as_bytes(),
        |name| headers.get(name).map(String::as_str),
        DEFAULT_SIGNATURE_HEADER,
    )
}

fn proxy_body(response: &Value) -> Value {
    let raw = response.get("body").and_then(Value::as_str).unwrap();
    serde_json::from_str(raw).unwrap()
}

// ============================================================================
// Framework-neutral adapter
// ============================================================================

#[test]
fn test_valid_signature_returns_success() {
    let handler = handler_with_delivery_callback();
    let response = respond(&handler, BODY, Some(&sign(BODY, SECRET)));

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, json!({"status": "success"}));
    assert!(response.is_success());
}

#[test]
fn test_bad_signature_returns_unauthorized() {
    let handler = handler_with_delivery_callback();
    let response = respond(&handler, BODY, Some("sha256=invalid"));

    assert_eq!(response.status_code, 401);
    assert_eq!(response.body, json!({"error": "Invalid signature"}));
}

#[test]
fn test_missing_signature_with_secret_returns_unauthorized() {
    let handler = handler_with_delivery_callback();
    let response = respond(&handler, BODY, None);
    assert_eq!(response.status_code, 401);
}

#[test]
fn test_malformed_json_returns_bad_request() {
    let handler = handler_with_delivery_callback();
    let body = "not json";
    let response = respond(&handler, body, Some(&sign(body, SECRET)));

    assert_eq!(response.status_code, 400);
    let message = response.body["error"].as_str().unwrap();
    assert!(message.starts_with("Invalid JSON payload"));
}

#[test]
fn test_handler_failure_returns_server_error() {
    let handler = handler_with_delivery_callback();
    let body = r#"{"event_type":"email.failed"}"#;
    let response = respond(&handler, body, Some(&sign(body, SECRET)));

    assert_eq!(response.status_code, 500);
    assert!(
        response.body["error"]
            .as_str()
            .unwrap()
            .contains("database unavailable")
    );
}

#[test]
fn test_unhandled_event_type_returns_success() {
    let handler = handler_with_delivery_callback();
    let body = r#"{"event_type":"email.sent"}"#;
    let response = respond(&handler, body, Some(&sign(body, SECRET)));
    assert_eq!(response.status_code, 200);
}

// ============================================================================
// Lambda proxy binding
// ============================================================================

#[test]
fn test_get_header_value_is_case_insensitive() {
    let headers = json!({"x-laneful-signature": "sha256=abc", "Content-Type": "application/json"});

    assert_eq!(
        get_header_value(&headers, "X-Laneful-Signature"),
        Some("sha256=abc")
    );
    assert_eq!(
        get_header_value(&headers, "content-type"),
        Some("application/json")
    );
    assert_eq!(get_header_value(&headers, "X-Other"), None);
    assert_eq!(get_header_value(&Value::Null, "X-Other"), None);
}

#[test]
fn test_proxy_event_success() {
    let handler = handler_with_delivery_callback();
    let event = json!({
        "headers": {"x-laneful-signature": sign(BODY, SECRET)},
        "body": BODY,
        "isBase64Encoded": false
    });

    let response = handle_proxy_event(&handler, &event, DEFAULT_SIGNATURE_HEADER);

    assert_eq!(response["statusCode"], 200);
    assert_eq!(response["headers"]["Content-Type"], "application/json");
    assert_eq!(proxy_body(&response), json!({"status": "success"}));
}

#[test]
fn test_proxy_event_base64_body_is_verified_after_decoding() {
    let handler = handler_with_delivery_callback();
    let event = json!({
        "headers": {"X-Laneful-Signature": sign(BODY, SECRET)},
        "body": STANDARD.encode(BODY),
        "isBase64Encoded": true
    });

    let response = handle_proxy_event(&handler, &event, DEFAULT_SIGNATURE_HEADER);
    assert_eq!(response["statusCode"], 200);
}

#[test]
fn test_proxy_event_missing_body_is_verified_first() {
    let handler = handler_with_delivery_callback();
    let event = json!({"headers": {}});

    let response = handle_proxy_event(&handler, &event, DEFAULT_SIGNATURE_HEADER);

    assert_eq!(response["statusCode"], 401);
    assert_eq!(proxy_body(&response), json!({"error": "Invalid signature"}));

    // A correctly signed empty body gets past verification and fails to parse.
    let event = json!({"headers": {DEFAULT_SIGNATURE_HEADER: sign("", SECRET)}});
    let response = handle_proxy_event(&handler, &event, DEFAULT_SIGNATURE_HEADER);
    assert_eq!(response["statusCode"], 400);
}

#[test]
fn test_proxy_event_missing_body_without_secret() {
    let handler = WebhookHandler::without_secret();
    let event = json!({"headers": {}});

    let response = handle_proxy_event(&handler, &event, DEFAULT_SIGNATURE_HEADER);

    assert_eq!(response["statusCode"], 400);
    let body = proxy_body(&response);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON payload"));
}

#[test]
fn test_proxy_event_invalid_base64() {
    let handler = handler_with_delivery_callback();
    let event = json!({"headers": {}, "body": "%%%", "isBase64Encoded": true});

    let response = handle_proxy_event(&handler, &event, DEFAULT_SIGNATURE_HEADER);
    assert_eq!(response["statusCode"], 400);
}

#[test]
fn test_proxy_event_custom_signature_header() {
    let handler = handler_with_delivery_callback();
    let event = json!({
        "headers": {"x-hook-signature": sign(BODY, SECRET)},
        "body": BODY
    });

    let default_header = handle_proxy_event(&handler, &event, DEFAULT_SIGNATURE_HEADER);
    assert_eq!(default_header["statusCode"], 401);

    let custom_header = handle_proxy_event(&handler, &event, "X-Hook-Signature");
    assert_eq!(custom_header["statusCode"], 200);
}
