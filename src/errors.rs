use thiserror::Error;

/// Errors raised by the outbound email client, models and configuration.
#[derive(Debug, Error)]
pub enum LanefulError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Laneful API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to send HTTP request: {0}")]
    Http(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to (de)serialize payload: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for LanefulError {
    fn from(error: reqwest::Error) -> Self {
        LanefulError::Http(error.to_string())
    }
}

impl From<serde_json::Error> for LanefulError {
    fn from(error: serde_json::Error) -> Self {
        LanefulError::Serialization(error.to_string())
    }
}

impl From<std::io::Error> for LanefulError {
    fn from(error: std::io::Error) -> Self {
        LanefulError::Validation(format!("Failed to read file: {error}"))
    }
}

/// Errors raised while processing an inbound webhook.
///
/// A signature mismatch is not an error; [`crate::webhooks::WebhookHandler::verify_signature`]
/// reports it as `false`.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(String),

    #[error("Webhook handler failed: {0}")]
    Handler(anyhow::Error),
}

impl WebhookError {
    /// True when the caller sent something undecodable (a client error).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, WebhookError::InvalidPayload(_))
    }
}
