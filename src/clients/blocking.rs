//! Blocking Laneful API client, enabled with the `blocking` feature.

use reqwest::blocking::Client;
use tracing::info;

use super::laneful_client::REQUEST_TIMEOUT;
use super::request::{
    USER_AGENT, build_send_body, first_response, parse_response, parse_send_response, send_url,
    status_url, validate_message_id,
};
use crate::core::config::LanefulConfig;
use crate::core::models::{Email, EmailResponse, EmailStatus};
use crate::errors::LanefulError;

/// Blocking counterpart of [`super::LanefulClient`]. Must not be used from
/// inside an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingLanefulClient {
    http: Client,
    base_url: String,
    api_token: String,
}

impl BlockingLanefulClient {
    /// # Errors
    ///
    /// Returns an error if the base URL or token is invalid or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, api_token: &str) -> Result<Self, LanefulError> {
        Self::from_config(&LanefulConfig::new(base_url, api_token)?)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &LanefulConfig) -> Result<Self, LanefulError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        })
    }

    /// # Errors
    ///
    /// Validation, authentication, API and transport failures.
    pub fn send_email(&self, email: &Email) -> Result<EmailResponse, LanefulError> {
        first_response(self.send_emails(std::slice::from_ref(email))?)
    }

    /// # Errors
    ///
    /// Validation, authentication, API and transport failures.
    pub fn send_emails(&self, emails: &[Email]) -> Result<Vec<EmailResponse>, LanefulError> {
        let body = build_send_body(emails)?;
        info!(count = emails.len(), "Sending emails via Laneful");

        let response = self
            .http
            .post(send_url(&self.base_url))
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()?;

        let status = response.status().as_u16();
        let text = response.text()?;
        parse_send_response(status, &text)
    }

    /// # Errors
    ///
    /// Authentication, API and transport failures.
    pub fn get_email_status(&self, message_id: &str) -> Result<EmailStatus, LanefulError> {
        validate_message_id(message_id)?;

        let response = self
            .http
            .get(status_url(&self.base_url, message_id))
            .bearer_auth(&self.api_token)
            .send()?;

        let status = response.status().as_u16();
        let text = response.text()?;
        parse_response(status, &text)
    }
}
