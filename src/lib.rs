//! Laneful - a Rust client for the Laneful transactional email API.
//!
//! The crate has two halves:
//! 1. An outbound client that sends single or batched emails and looks up
//!    delivery status ([`clients::LanefulClient`], plus a blocking variant
//!    behind the `blocking` feature)
//! 2. An inbound webhook layer that verifies `sha256=` HMAC signatures and
//!    routes events to registered callbacks ([`webhooks::WebhookHandler`])
//!
//! # Example
//!
//! ```no_run
//! use laneful::clients::LanefulClient;
//! use laneful::core::models::{Address, Email};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     laneful::setup_logging();
//!
//!     let client = LanefulClient::new("https://api.laneful.net", "your-token")?;
//!     let email = Email::builder(Address::new("sender@example.com")?)
//!         .to(Address::with_name("recipient@example.com", "Recipient")?)
//!         .subject("Hello from Laneful")
//!         .text_content("This is a test email.")
//!         .build()?;
//!
//!     let response = client.send_email(&email).await?;
//!     println!("Email sent: {}", response.status);
//!     Ok(())
//! }
//! ```

pub mod clients;
pub mod core;
pub mod errors;
pub mod webhooks;

pub use crate::core::models::{Address, Attachment, Email, EmailResponse, TrackingSettings};
pub use errors::{LanefulError, WebhookError};
pub use webhooks::{WebhookEvent, WebhookEventType, WebhookHandler};

/// Configure structured JSON logging.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// laneful::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
