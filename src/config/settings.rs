//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Outbound mail configuration
    pub mail: MailSettings,

    /// Notification dispatch configuration
    pub notification: NotificationSettings,

    /// Invoice calculation configuration
    pub billing: BillingSettings,

    /// Snowflake ID generator settings
    pub snowflake: SnowflakeSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Which mail transport backs the email channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransportKind {
    /// SMTP relay with STARTTLS
    Smtp,
    /// In-process outbox, nothing leaves the process
    Memory,
}

/// Outbound mail configuration.
#[derive(Clone, Deserialize)]
pub struct MailSettings {
    /// Global switch; when false the email channel suppresses every send
    pub enabled: bool,

    pub transport: MailTransportKind,

    /// SMTP relay host
    pub host: String,

    /// SMTP relay port (587 for STARTTLS)
    pub port: u16,

    pub username: String,

    pub password: String,

    /// Sender identity, e.g. "Vet Clinic <no-reply@clinic.example>"
    pub from: String,

    /// Upgrade the connection with STARTTLS
    pub starttls: bool,

    /// Connect/read/write timeout in seconds
    pub timeout_secs: u64,
}

impl MailSettings {
    /// Password suitable for logs.
    pub fn masked_password(&self) -> &'static str {
        if self.password.is_empty() {
            "<not configured>"
        } else {
            "********"
        }
    }

    /// Whether SMTP credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("enabled", &self.enabled)
            .field("transport", &self.transport)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.masked_password())
            .field("from", &self.from)
            .field("starttls", &self.starttls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Where `dispatch` runs relative to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// On the caller's task; the caller waits for the attempt
    #[default]
    Sync,
    /// On a spawned task; the caller returns immediately
    Async,
}

/// Notification dispatch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    /// Channel used when a message names none
    pub default_channel: String,

    pub dispatch_mode: DispatchMode,
}

/// Invoice calculation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingSettings {
    /// Policy applied when an invoice request names none
    pub default_policy: String,
}

/// Snowflake ID generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeSettings {
    /// Machine/worker ID (0-1023)
    pub machine_id: u16,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. built-in defaults
    /// 2. config/default.toml (base configuration)
    /// 3. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 4. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if it fails [`Settings::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Self::defaults(Config::builder(), &environment)?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__MAIL__PORT=2525 -> mail.port = 2525
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("mail.enabled", std::env::var("MAIL_ENABLED").ok())?
            .set_override_option("mail.host", std::env::var("MAIL_HOST").ok())?
            .set_override_option("mail.port", std::env::var("MAIL_PORT").ok())?
            .set_override_option("mail.username", std::env::var("MAIL_USERNAME").ok())?
            .set_override_option("mail.password", std::env::var("MAIL_PASSWORD").ok())?
            .set_override_option("mail.from", std::env::var("MAIL_FROM").ok())?
            .set_override_option(
                "snowflake.machine_id",
                std::env::var("SNOWFLAKE_MACHINE_ID").ok(),
            )?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    /// Settings built from defaults only, with no files or environment.
    pub fn from_defaults(environment: &str) -> Result<Self, ConfigError> {
        Self::defaults(Config::builder(), environment)?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    fn defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("environment", environment)?
            .set_default("mail.enabled", false)?
            .set_default("mail.transport", "smtp")?
            .set_default("mail.host", "smtp.gmail.com")?
            .set_default("mail.port", 587)?
            .set_default("mail.username", "")?
            .set_default("mail.password", "")?
            .set_default("mail.from", "")?
            .set_default("mail.starttls", true)?
            .set_default("mail.timeout_secs", 10)?
            .set_default("notification.default_channel", "EMAIL")?
            .set_default("notification.dispatch_mode", "sync")?
            .set_default("billing.default_policy", "STANDARD")?
            .set_default("snowflake.machine_id", 1)
    }

    /// Reject configurations that cannot work at runtime.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.mail.enabled && self.mail.from.trim().is_empty() {
            return Err(ConfigError::Message(
                "mail.from must be set when mail is enabled".into(),
            ));
        }

        if self.mail.enabled && self.mail.transport == MailTransportKind::Smtp && self.mail.host.trim().is_empty() {
            return Err(ConfigError::Message(
                "mail.host must be set when the SMTP transport is enabled".into(),
            ));
        }

        if self.notification.default_channel.trim().is_empty() {
            return Err(ConfigError::Message(
                "notification.default_channel must not be empty".into(),
            ));
        }

        if self.snowflake.machine_id > 1023 {
            return Err(ConfigError::Message(format!(
                "snowflake.machine_id must be between 0 and 1023, got {}",
                self.snowflake.machine_id
            )));
        }

        Ok(self)
    }

    /// Whether the process runs in production.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
