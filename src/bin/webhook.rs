//! Lambda entry point that receives Laneful webhooks behind API Gateway and
//! logs every known event.

use laneful::core::config::WebhookConfig;
use laneful::webhooks::lambda::handle_proxy_event;
use laneful::webhooks::{WebhookEvent, WebhookEventType, WebhookHandler};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

fn log_event(event: &WebhookEvent) -> anyhow::Result<()> {
    info!(
        event_type = %event.event_type,
        message_id = %event.message_id,
        email = %event.email,
        timestamp = event.timestamp,
        "Received Laneful event"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    laneful::setup_logging();

    let config = WebhookConfig::from_env();
    let mut handler = WebhookHandler::from_config(&config);
    for kind in WebhookEventType::ALL {
        handler.register_handler(kind, log_event);
    }

    let handler = Arc::new(handler);
    let signature_header = Arc::new(config.signature_header);

    run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        let signature_header = Arc::clone(&signature_header);
        async move {
            Ok::<Value, Error>(handle_proxy_event(
                &handler,
                &event.payload,
                &signature_header,
            ))
        }
    }))
    .await
}
