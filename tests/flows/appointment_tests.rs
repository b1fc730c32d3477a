//! Appointment booking and rescheduling with owner notifications

use pretty_assertions::assert_eq;

use vet_clinic::application::services::{AppointmentError, UpdateAppointmentDto};
use vet_clinic::config::DispatchMode;

use crate::common::{at, TestApp};

fn reschedule(day: u32, hour: u32) -> UpdateAppointmentDto {
    UpdateAppointmentDto {
        scheduled_at: at(day, hour, 30),
        reason: "Annual vaccination".into(),
        notes: None,
        status: None,
    }
}

#[tokio::test]
async fn booking_sends_confirmation_to_owner() {
    let app = TestApp::new().await;

    let created = app
        .state
        .facade
        .create_with_notification(app.booking(at(5, 10, 30)))
        .await
        .unwrap();

    assert_eq!(created.pet_name, "Luna");
    assert_eq!(created.owner_email, app.owner.email);

    let sent = app.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, app.owner.email);
    assert!(!sent[0].subject.is_empty());
    assert!(sent[0].body.contains("Luna"));
    assert!(sent[0].body.contains("05/09/2025 10:30"));
    assert!(sent[0].body.contains("Annual vaccination"));
}

#[tokio::test]
async fn booking_unknown_pet_fails_before_notifying() {
    let app = TestApp::new().await;
    let mut request = app.booking(at(5, 10, 30));
    request.pet_id = 1;

    let err = app
        .state
        .facade
        .create_with_notification(request)
        .await
        .unwrap_err();

    assert!(matches!(err, AppointmentError::PetNotFound(1)));
    assert!(app.outbox.is_empty());
}

#[tokio::test]
async fn booking_survives_mail_outage() {
    let app = TestApp::new().await;
    app.outbox.set_failure(Some("relay unreachable"));

    let created = app
        .state
        .facade
        .create_with_notification(app.booking(at(6, 9, 0)))
        .await
        .unwrap();

    assert!(app.outbox.is_empty());
    assert_eq!(app.state.appointments.get(created.id).await.unwrap().id, created.id);
}

#[tokio::test]
async fn booking_with_mail_disabled_sends_nothing() {
    let app = TestApp::with(|s| s.mail.enabled = false).await;

    for day in 1..=3 {
        app.state
            .facade
            .create_with_notification(app.booking(at(day, 9, 0)))
            .await
            .unwrap();
    }

    assert!(app.outbox.is_empty());
    assert_eq!(app.state.appointments.list().await.unwrap().len(), 3);
}

#[tokio::test]
async fn rescheduling_notifies_only_when_time_changes() {
    let app = TestApp::new().await;
    let created = app
        .state
        .facade
        .create_with_notification(app.booking(at(5, 10, 30)))
        .await
        .unwrap();
    app.outbox.clear();

    let mut same_time = reschedule(5, 10);
    same_time.notes = Some("Fasting required".into());
    app.state
        .facade
        .update_with_notification(created.id, same_time)
        .await
        .unwrap();
    assert!(app.outbox.is_empty());

    let updated = app
        .state
        .facade
        .update_with_notification(created.id, reschedule(8, 16))
        .await
        .unwrap();

    assert_eq!(updated.scheduled_at, at(8, 16, 30));
    let sent = app.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("08/09/2025 16:30"));
    assert!(sent[0].body.contains("Luna"));
}

#[tokio::test]
async fn rescheduling_unknown_appointment_is_not_found() {
    let app = TestApp::new().await;
    let err = app
        .state
        .facade
        .update_with_notification(42, reschedule(8, 16))
        .await
        .unwrap_err();

    assert!(matches!(err, AppointmentError::NotFound(42)));
    assert!(app.outbox.is_empty());
}

#[tokio::test]
async fn async_dispatch_delivers_in_background() {
    let app = TestApp::with(|s| s.notification.dispatch_mode = DispatchMode::Async).await;

    app.state
        .facade
        .create_with_notification(app.booking(at(7, 11, 0)))
        .await
        .unwrap();

    assert_eq!(app.wait_for_outbox(1).await, 1);
}
