//! Inbound webhook verification and dispatch

pub mod adapter;
pub mod event;
pub mod handler;
pub mod lambda;
pub mod router;
pub mod signature;

pub use adapter::{DEFAULT_SIGNATURE_HEADER, WebhookResponse, handle_request};
pub use event::{WebhookEvent, WebhookEventType, WebhookPayload};
pub use handler::WebhookHandler;
pub use router::{EventCallback, EventRouter};
pub use signature::{SignatureVerifier, sign};
