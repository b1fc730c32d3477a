//! # Vet Clinic
//!
//! Back-office core for a veterinary clinic.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Notification channels and billing policies
//!
//! Run with `--test-email <address>` to send a test message through the
//! configured mail pipeline.

use anyhow::{bail, Result};
use tracing::{debug, info};

use vet_clinic::config::Settings;
use vet_clinic::infrastructure::metrics;
use vet_clinic::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    vet_clinic::telemetry::init_tracing();

    info!("Starting Vet Clinic...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        environment = %settings.environment,
        mail_enabled = settings.mail.enabled,
        dispatch_mode = ?settings.notification.dispatch_mode,
        default_policy = %settings.billing.default_policy,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => info!("Application ready"),
        [flag, address] if flag == "--test-email" => {
            application.send_test_email(address).await;
            debug!(metrics = %metrics::gather_metrics(), "Metrics after test email");
        }
        _ => bail!("usage: vet-clinic [--test-email <address>]"),
    }

    Ok(())
}
