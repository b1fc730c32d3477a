//! Application Startup
//!
//! Wires repositories, registries, transports and services from settings.

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::{error, info, warn};

use crate::application::services::{
    AppointmentFacade, AppointmentService, AppointmentServiceImpl, ChannelRegistry,
    InvoiceService, InvoiceServiceImpl, NotificationDispatcher,
};
use crate::config::{MailSettings, MailTransportKind, Settings};
use crate::domain::{CalculatorRegistry, DeliveryChannel, Notification};
use crate::infrastructure::mail::{EmailChannel, MailTransport, MemoryOutbox, SmtpMailer};
use crate::infrastructure::repositories::{
    InMemoryAppointmentRepository, InMemoryInvoiceRepository, InMemoryOwnerRepository,
    InMemoryPetRepository,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// Application state shared across callers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub snowflake: Arc<SnowflakeGenerator>,
    pub owners: Arc<InMemoryOwnerRepository>,
    pub pets: Arc<InMemoryPetRepository>,
    pub channels: Arc<ChannelRegistry>,
    pub calculators: Arc<CalculatorRegistry>,
    pub dispatcher: NotificationDispatcher,
    pub appointments: Arc<dyn AppointmentService>,
    pub invoices: Arc<dyn InvoiceService>,
    pub facade: AppointmentFacade,
    /// Present when the memory transport is configured
    pub outbox: Option<Arc<MemoryOutbox>>,
}

/// Application instance
pub struct Application {
    state: AppState,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        log_mail_settings(&settings.mail);
        if settings.mail.enabled
            && settings.mail.transport == MailTransportKind::Smtp
            && !settings.mail.has_credentials()
        {
            error!("Mail is enabled but MAIL_USERNAME or MAIL_PASSWORD is not set");
            bail!("mail credentials are required when SMTP mail is enabled");
        }

        let snowflake = Arc::new(SnowflakeGenerator::new(u64::from(
            settings.snowflake.machine_id,
        )));

        // Mail transport
        let (transport, outbox): (Arc<dyn MailTransport>, Option<Arc<MemoryOutbox>>) =
            match settings.mail.transport {
                MailTransportKind::Smtp => (Arc::new(SmtpMailer::from_settings(&settings.mail)?), None),
                MailTransportKind::Memory => {
                    if settings.is_production() {
                        warn!("Memory mail transport in production; no email leaves the process");
                    }
                    let outbox = Arc::new(MemoryOutbox::new());
                    (outbox.clone(), Some(outbox))
                }
            };
        info!(transport = transport.name(), "Mail transport created");

        // Notification channels
        let channels: Vec<Arc<dyn DeliveryChannel>> =
            vec![Arc::new(EmailChannel::from_settings(&settings.mail, transport))];
        let channels = Arc::new(ChannelRegistry::new(channels));
        let dispatcher = NotificationDispatcher::from_settings(channels.clone(), &settings.notification)?;
        info!(
            channels = ?channels.kinds(),
            default = %settings.notification.default_channel,
            mode = ?settings.notification.dispatch_mode,
            "Notification dispatcher ready"
        );

        // Billing
        let calculators = Arc::new(CalculatorRegistry::builtin(&settings.billing.default_policy)?);
        info!(
            policies = ?calculators.policies(),
            default = %calculators.default_policy(),
            "Calculator registry ready"
        );

        // Repositories
        let owners = Arc::new(InMemoryOwnerRepository::new());
        let pets = Arc::new(InMemoryPetRepository::new());
        let appointment_repo = Arc::new(InMemoryAppointmentRepository::new());
        let invoice_repo = Arc::new(InMemoryInvoiceRepository::new());

        // Services
        let appointments: Arc<dyn AppointmentService> = Arc::new(AppointmentServiceImpl::new(
            appointment_repo.clone(),
            pets.clone(),
            owners.clone(),
            snowflake.clone(),
        ));
        let invoices: Arc<dyn InvoiceService> = Arc::new(InvoiceServiceImpl::new(
            invoice_repo,
            owners.clone(),
            pets.clone(),
            appointment_repo,
            calculators.clone(),
            snowflake.clone(),
        ));
        let facade = AppointmentFacade::new(appointments.clone(), dispatcher.clone());

        let state = AppState {
            settings: Arc::new(settings),
            snowflake,
            owners,
            pets,
            channels,
            calculators,
            dispatcher,
            appointments,
            invoices,
            facade,
            outbox,
        };

        info!(environment = %state.settings.environment, "Application built");
        Ok(Self { state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    /// Send the configuration test message and wait for the attempt.
    pub async fn send_test_email(&self, address: &str) {
        info!(recipient = %address, "Sending test email");
        self.state
            .dispatcher
            .dispatch(Notification::test_message(address))
            .await;
    }
}

fn log_mail_settings(mail: &MailSettings) {
    info!(
        enabled = mail.enabled,
        transport = ?mail.transport,
        host = %mail.host,
        port = mail.port,
        username = %mail.username,
        password = mail.masked_password(),
        from = %mail.from,
        timeout_secs = mail.timeout_secs,
        "Mail configuration"
    );
}
