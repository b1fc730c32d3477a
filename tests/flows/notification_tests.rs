//! Channel resolution and best-effort dispatch through the wired application

use vet_clinic::application::services::RegistryError;
use vet_clinic::domain::Notification;
use vet_clinic::infrastructure::metrics;

use crate::common::TestApp;

#[tokio::test]
async fn registry_resolves_email_in_any_case() {
    let app = TestApp::new().await;
    let channels = &app.state.channels;

    assert_eq!(channels.resolve("EMAIL").unwrap().kind().as_str(), "EMAIL");
    assert_eq!(channels.resolve("email").unwrap().kind().as_str(), "EMAIL");
    assert_eq!(channels.resolve("Email").unwrap().kind().as_str(), "EMAIL");
}

#[tokio::test]
async fn registry_error_names_the_discriminator() {
    let app = TestApp::new().await;

    let err = app.state.channels.resolve("sms").err().unwrap();

    assert!(matches!(err, RegistryError::UnsupportedChannel(ref c) if c == "sms"));
    assert!(err.to_string().contains("sms"));
}

#[tokio::test]
async fn dispatch_to_unknown_channel_returns_normally() {
    let app = TestApp::new().await;

    app.state
        .dispatcher
        .dispatch(Notification::new(&app.owner.email, "Hello", "Body").with_channel("SMS"))
        .await;

    assert!(app.outbox.is_empty());
}

#[tokio::test]
async fn dispatch_without_channel_uses_email() {
    let app = TestApp::new().await;

    app.state
        .dispatcher
        .dispatch(Notification::new(&app.owner.email, "Hello", "Body"))
        .await;

    let sent = app.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Hello");
    assert_eq!(sent[0].from, "Vet Clinic <no-reply@clinic.example>");
}

#[tokio::test]
async fn blank_recipient_is_never_transmitted() {
    let app = TestApp::new().await;

    app.state
        .dispatcher
        .dispatch(Notification::new("   ", "Hello", "Body"))
        .await;

    assert!(app.outbox.is_empty());
}

#[tokio::test]
async fn test_email_goes_through_the_pipeline() {
    let app = TestApp::new().await;

    let application_email = "frontdesk@clinic.example";
    app.state
        .dispatcher
        .dispatch(Notification::test_message(application_email))
        .await;

    let sent = app.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, application_email);
    assert!(metrics::gather_metrics().contains("vet_clinic_notifications_total"));
}
