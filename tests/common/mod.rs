//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use once_cell::sync::Lazy;

use vet_clinic::application::services::CreateAppointmentDto;
use vet_clinic::config::{DispatchMode, MailTransportKind, Settings};
use vet_clinic::domain::{Owner, OwnerRepository, Pet, PetRepository};
use vet_clinic::infrastructure::mail::MemoryOutbox;
use vet_clinic::startup::{AppState, Application};

// Set TEST_LOG=1 to see logs while running the tests.
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        vet_clinic::telemetry::init_tracing();
    }
});

/// Test application wired against the in-memory outbox
pub struct TestApp {
    pub state: AppState,
    pub outbox: Arc<MemoryOutbox>,
    pub owner: Owner,
    pub pet: Pet,
}

impl TestApp {
    /// Mail enabled, synchronous dispatch
    pub async fn new() -> Self {
        Self::with(|_| {}).await
    }

    /// Build with adjusted settings
    pub async fn with(adjust: impl FnOnce(&mut Settings)) -> Self {
        Lazy::force(&TRACING);

        let mut settings = Settings::from_defaults("test").expect("default settings");
        settings.mail.enabled = true;
        settings.mail.transport = MailTransportKind::Memory;
        settings.mail.from = "Vet Clinic <no-reply@clinic.example>".into();
        settings.notification.dispatch_mode = DispatchMode::Sync;
        adjust(&mut settings);

        let state = Application::build(settings)
            .await
            .expect("application builds")
            .into_state();
        let outbox = state.outbox.clone().expect("memory transport configured");

        let owner = state
            .owners
            .create(&Owner {
                id: state.snowflake.generate(),
                first_name: FirstName().fake(),
                last_name: LastName().fake(),
                email: unique_email(),
                phone: None,
                address: None,
                created_at: Utc::now(),
            })
            .await
            .expect("owner seeded");
        let pet = state
            .pets
            .create(&Pet {
                id: state.snowflake.generate(),
                owner_id: owner.id,
                name: "Luna".into(),
                species: "Cat".into(),
                breed: Some("Siamese".into()),
                birth_date: NaiveDate::from_ymd_opt(2020, 5, 17),
                created_at: Utc::now(),
            })
            .await
            .expect("pet seeded");

        Self {
            state,
            outbox,
            owner,
            pet,
        }
    }

    /// Booking request for the seeded pet
    pub fn booking(&self, scheduled_at: NaiveDateTime) -> CreateAppointmentDto {
        CreateAppointmentDto {
            pet_id: self.pet.id,
            scheduled_at,
            reason: "Annual vaccination".into(),
            notes: None,
        }
    }

    /// Wait until the outbox holds `count` messages or the timeout elapses
    pub async fn wait_for_outbox(&self, count: usize) -> usize {
        for _ in 0..50 {
            if self.outbox.len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.outbox.len()
    }
}

/// Clinic-local date-time helper
pub fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 9, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid date")
}

/// Generate a unique test email
pub fn unique_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}_{}", &uuid::Uuid::new_v4().simple().to_string()[..8], email)
}
