use chrono::{TimeZone, Utc};
use laneful::core::models::{
    Address, Attachment, Email, EmailResponse, EmailStatus, TrackingSettings,
};
use laneful::errors::LanefulError;
use serde_json::json;
use std::io::Write;

fn sender() -> Address {
    Address::new("sender@example.com").unwrap()
}

fn recipient() -> Address {
    Address::with_name("recipient@example.com", "Recipient").unwrap()
}

#[test]
fn test_address_validation() {
    assert!(Address::new("user@example.com").is_ok());
    assert!(Address::new("first.last+tag@mail.example.co.uk").is_ok());

    for bad in ["", "user", "user@", "@example.com", "user@example", "a b@example.com"] {
        let err = Address::new(bad).unwrap_err();
        assert!(matches!(err, LanefulError::Validation(_)), "accepted {bad:?}");
    }
}

#[test]
fn test_address_serialization_omits_missing_name() {
    assert_eq!(
        serde_json::to_value(sender()).unwrap(),
        json!({"email": "sender@example.com"})
    );
    assert_eq!(
        serde_json::to_value(recipient()).unwrap(),
        json!({"email": "recipient@example.com", "name": "Recipient"})
    );
}

#[test]
fn test_email_builder_minimal() {
    let email = Email::builder(sender())
        .to(recipient())
        .subject("Hello from Laneful")
        .text_content("This is a test email.")
        .build()
        .unwrap();

    let value = serde_json::to_value(&email).unwrap();
    assert_eq!(
        value,
        json!({
            "from": {"email": "sender@example.com"},
            "to": [{"email": "recipient@example.com", "name": "Recipient"}],
            "subject": "Hello from Laneful",
            "text_content": "This is a test email."
        })
    );
}

#[test]
fn test_email_builder_full() {
    let send_at = Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap();
    let email = Email::builder(sender())
        .to(recipient())
        .cc(Address::new("cc@example.com").unwrap())
        .bcc(Address::new("bcc@example.com").unwrap())
        .subject("Welcome")
        .template("welcome-v2", Some(json!({"first_name": "Ada"})))
        .attachment(Attachment::from_bytes("hello.txt", b"hello", None))
        .header("X-Campaign", "spring")
        .reply_to(Address::new("support@example.com").unwrap())
        .send_at(send_at)
        .webhook_data("user_id", "42")
        .tag("onboarding")
        .tracking(TrackingSettings {
            opens: true,
            clicks: true,
            unsubscribes: false,
        })
        .build()
        .unwrap();

    let value = serde_json::to_value(&email).unwrap();
    assert_eq!(value["template_id"], "welcome-v2");
    assert_eq!(value["template_data"]["first_name"], "Ada");
    assert_eq!(value["attachments"][0]["file_name"], "hello.txt");
    assert_eq!(value["attachments"][0]["content"], "aGVsbG8=");
    assert_eq!(value["attachments"][0]["content_type"], "text/plain");
    assert_eq!(value["headers"]["X-Campaign"], "spring");
    assert_eq!(value["send_time"], send_at.timestamp());
    assert_eq!(value["webhook_data"]["user_id"], "42");
    assert_eq!(value["tracking"]["opens"], true);
    assert_eq!(value["tracking"]["unsubscribes"], false);

    let back: Email = serde_json::from_value(value).unwrap();
    assert_eq!(back, email);
}

#[test]
fn test_email_requires_recipient() {
    let err = Email::builder(sender())
        .text_content("no one to send to")
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("recipient"));
}

#[test]
fn test_email_requires_content() {
    let err = Email::builder(sender())
        .to(recipient())
        .subject("empty")
        .text_content("")
        .build()
        .unwrap_err();
    assert!(matches!(err, LanefulError::Validation(_)));
}

#[test]
fn test_bcc_only_recipient_is_enough() {
    let email = Email::builder(sender())
        .bcc(recipient())
        .html_content("<p>hi</p>")
        .build();
    assert!(email.is_ok());
}

#[test]
fn test_attachment_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("invoice.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"id,total\n1,9.99\n").unwrap();

    let attachment = Attachment::from_path(&path).unwrap();
    assert_eq!(attachment.file_name, "invoice.csv");
    assert_eq!(attachment.content_type, "text/csv");
    assert_eq!(attachment.content, "aWQsdG90YWwKMSw5Ljk5Cg==");
}

#[test]
fn test_attachment_from_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = Attachment::from_path(dir.path().join("missing.pdf")).unwrap_err();
    assert!(matches!(err, LanefulError::Validation(_)));
}

#[test]
fn test_email_response_decoding() {
    let response: EmailResponse =
        serde_json::from_value(json!({"status": "accepted", "message_id": "msg_1"})).unwrap();
    assert_eq!(response.status, "accepted");
    assert_eq!(response.message_id.as_deref(), Some("msg_1"));

    let bare: EmailResponse = serde_json::from_value(json!({"status": "queued"})).unwrap();
    assert_eq!(bare.message_id, None);
}

#[test]
fn test_email_status_keeps_extra_fields() {
    let status: EmailStatus = serde_json::from_value(json!({
        "message_id": "msg_1",
        "status": "delivered",
        "delivered_at": 1640995200
    }))
    .unwrap();

    assert_eq!(status.status, "delivered");
    assert_eq!(status.extra["delivered_at"], 1640995200);
}
