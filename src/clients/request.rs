//! Request construction and response mapping shared by the async and blocking clients.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::core::models::{Email, EmailResponse};
use crate::errors::LanefulError;

pub const SEND_PATH: &str = "/v1/email/send";
pub const USER_AGENT: &str = concat!("laneful-rust/", env!("CARGO_PKG_VERSION"));

pub fn send_url(base_url: &str) -> String {
    format!("{base_url}{SEND_PATH}")
}

pub fn status_url(base_url: &str, message_id: &str) -> String {
    format!(
        "{base_url}/v1/email/{}/status",
        urlencoding::encode(message_id)
    )
}

/// Validates each email and wraps them in the provider's batch envelope.
///
/// # Errors
///
/// Returns [`LanefulError::Validation`] for an empty batch or an invalid email.
pub fn build_send_body(emails: &[Email]) -> Result<Value, LanefulError> {
    if emails.is_empty() {
        return Err(LanefulError::Validation(
            "At least one email is required".into(),
        ));
    }
    for email in emails {
        email.validate()?;
    }
    Ok(json!({ "emails": emails }))
}

/// Message-id path segments must be non-empty.
///
/// # Errors
///
/// Returns [`LanefulError::Validation`] for a blank id.
pub fn validate_message_id(message_id: &str) -> Result<(), LanefulError> {
    if message_id.trim().is_empty() {
        return Err(LanefulError::Validation("Message id must not be empty".into()));
    }
    Ok(())
}

/// Maps an HTTP status and body text to a decoded value or the matching error.
///
/// # Errors
///
/// 401/403 become [`LanefulError::Auth`], other non-2xx statuses
/// [`LanefulError::Api`], and undecodable 2xx bodies
/// [`LanefulError::Serialization`].
pub fn parse_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, LanefulError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(LanefulError::from);
    }

    let message = error_message(body);
    match status {
        401 | 403 => Err(LanefulError::Auth(message)),
        _ => Err(LanefulError::Api { status, message }),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SendResponseBody {
    Batch(Vec<EmailResponse>),
    Single(EmailResponse),
}

/// Decodes a send response into one entry per email, in request order.
///
/// The provider answers with a JSON array; a lone object is treated as a
/// batch of one.
///
/// # Errors
///
/// Same as [`parse_response`].
pub fn parse_send_response(
    status: u16,
    body: &str,
) -> Result<Vec<EmailResponse>, LanefulError> {
    match parse_response::<SendResponseBody>(status, body)? {
        SendResponseBody::Batch(responses) => Ok(responses),
        SendResponseBody::Single(response) => Ok(vec![response]),
    }
}

/// The response for a single-email send.
///
/// # Errors
///
/// Returns [`LanefulError::Serialization`] when the provider sent no entries.
pub fn first_response(responses: Vec<EmailResponse>) -> Result<EmailResponse, LanefulError> {
    responses.into_iter().next().ok_or_else(|| {
        LanefulError::Serialization("Send response contained no results".to_string())
    })
}

fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("error")
            .or_else(|| v.get("message"))
            .and_then(|m| m.as_str())
            .map(ToString::to_string)
    });

    from_json.unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            "Unknown error".to_string()
        } else {
            trimmed.to_string()
        }
    })
}
