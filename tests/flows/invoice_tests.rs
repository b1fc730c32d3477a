//! Invoice issuing with calculation policies

use std::str::FromStr;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::json;

use vet_clinic::application::services::{CreateInvoiceDto, InvoiceError, InvoiceLineDto};
use vet_clinic::domain::BillingError;

use crate::common::{at, TestApp};

fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap()
}

fn invoice_for(app: &TestApp, lines: &[(&str, u32, &str)]) -> CreateInvoiceDto {
    CreateInvoiceDto {
        owner_id: app.owner.id,
        pet_id: app.pet.id,
        appointment_id: None,
        notes: None,
        lines: lines
            .iter()
            .map(|(description, quantity, price)| InvoiceLineDto {
                description: description.to_string(),
                quantity: *quantity,
                unit_price: dec(price),
            })
            .collect(),
        policy: None,
        parameters: vec![],
    }
}

#[tokio::test]
async fn standard_policy_adds_tax() {
    let app = TestApp::new().await;

    let invoice = app
        .state
        .invoices
        .create(invoice_for(&app, &[("Consultation", 1, "100.00")]))
        .await
        .unwrap();

    assert_eq!(invoice.subtotal, dec("100.00"));
    assert_eq!(invoice.total, dec("119.00"));
    assert_eq!(invoice.tax_rate, dec("19.00"));
    assert_eq!(invoice.policy, "STANDARD");
}

#[tokio::test]
async fn discount_policy_from_request() {
    let app = TestApp::new().await;
    let mut request = invoice_for(&app, &[("Dental cleaning", 2, "50.00")]);
    request.policy = Some("DISCOUNT".into());
    request.parameters = vec![json!("10")];

    let invoice = app.state.invoices.create(request).await.unwrap();

    assert_eq!(invoice.subtotal, dec("100.00"));
    assert_eq!(invoice.total, dec("107.10"));
}

#[tokio::test]
async fn configured_default_policy_applies() {
    let app = TestApp::with(|s| s.billing.default_policy = "discount".into()).await;

    let invoice = app
        .state
        .invoices
        .create(invoice_for(&app, &[("Consultation", 1, "100.00")]))
        .await
        .unwrap();

    assert_eq!(invoice.policy, "DISCOUNT");
    assert_eq!(invoice.total, dec("119.00"));
}

#[tokio::test]
async fn invalid_discount_is_rejected() {
    let app = TestApp::new().await;
    let mut request = invoice_for(&app, &[("Consultation", 1, "100.00")]);
    request.policy = Some("DISCOUNT".into());
    request.parameters = vec![json!(150)];

    let err = app.state.invoices.create(request).await.unwrap_err();

    assert!(matches!(
        err,
        InvoiceError::Billing(BillingError::InvalidParameter(_))
    ));
    assert!(app.state.invoices.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn invoice_links_existing_appointment() {
    let app = TestApp::new().await;
    let appointment = app
        .state
        .facade
        .create_with_notification(app.booking(at(12, 8, 0)))
        .await
        .unwrap();

    let mut request = invoice_for(&app, &[("Vaccine", 1, "35.50")]);
    request.appointment_id = Some(appointment.id);
    let invoice = app.state.invoices.create(request).await.unwrap();

    assert_eq!(invoice.appointment_id, Some(appointment.id));
    assert_eq!(invoice.total, dec("42.25"));
}

#[tokio::test]
async fn paid_invoice_cannot_be_cancelled() {
    let app = TestApp::new().await;
    let invoice = app
        .state
        .invoices
        .create(invoice_for(&app, &[("Consultation", 1, "40.00")]))
        .await
        .unwrap();

    let paid = app.state.invoices.update_status(invoice.id, "PAID").await.unwrap();
    assert_eq!(paid.status, "PAID");

    let err = app
        .state
        .invoices
        .update_status(invoice.id, "CANCELLED")
        .await
        .unwrap_err();
    assert!(matches!(err, InvoiceError::InvalidTransition { .. }));
}
