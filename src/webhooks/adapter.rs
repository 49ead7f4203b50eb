//! Framework-neutral request handling.
//!
//! A host framework binding supplies the raw body and a header lookup; this
//! module verifies, processes and maps the outcome to a status code and JSON
//! body the binding can turn into its own response type.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, info};

use super::handler::WebhookHandler;
use crate::errors::WebhookError;

pub const DEFAULT_SIGNATURE_HEADER: &str = "X-Laneful-Signature";

/// Status code and JSON body for a processed webhook request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookResponse {
    pub status_code: u16,
    pub body: Value,
}

impl WebhookResponse {
    #[must_use]
    pub fn success() -> Self {
        Self {
            status_code: 200,
            body: json!({ "status": "success" }),
        }
    }

    #[must_use]
    pub fn error(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: json!({ "error": message }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Verifies and processes one inbound webhook request.
///
/// A missing signature header is verified as an empty signature, so it only
/// passes when the handler has no secret.
pub fn handle_request<'h, H>(
    handler: &WebhookHandler,
    body: &[u8],
    header: H,
    signature_header: &str,
) -> WebhookResponse
where
    H: Fn(&str) -> Option<&'h str>,
{
    let signature = header(signature_header).unwrap_or_default();

    if !handler.verify_signature(body, signature) {
        error!("Webhook signature verification failed");
        return WebhookResponse::error(401, "Invalid signature");
    }

    let Ok(body_str) = std::str::from_utf8(body) else {
        error!("Webhook body is not valid UTF-8");
        return WebhookResponse::error(400, "Invalid body encoding");
    };

    match handler.process_webhook(body_str) {
        Ok(()) => {
            info!("Webhook processed successfully");
            WebhookResponse::success()
        }
        Err(e @ WebhookError::InvalidPayload(_)) => {
            error!("Rejected webhook payload: {}", e);
            WebhookResponse::error(400, &e.to_string())
        }
        Err(e @ WebhookError::Handler(_)) => {
            error!("Webhook handler failed: {}", e);
            WebhookResponse::error(500, &e.to_string())
        }
    }
}
