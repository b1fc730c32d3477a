//! Notification Service
//!
//! Channel registry and best-effort dispatch of notifications.
//!
//! Notifications are a side effect of primary operations (booking,
//! rescheduling). `dispatch` never fails: unresolved channels and delivery
//! errors are logged and counted, then dropped. There is no retry and no
//! dead-letter path.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{DispatchMode, NotificationSettings};
use crate::domain::{ChannelKind, Delivery, DeliveryChannel, Notification};
use crate::infrastructure::metrics;

/// Channel registry errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No channel is registered under the discriminator. Not transient.
    #[error("unsupported channel: {0}")]
    UnsupportedChannel(String),
}

/// Delivery channels keyed by discriminator.
///
/// Built once at startup; read-only afterwards and safe to share.
pub struct ChannelRegistry {
    channels: HashMap<ChannelKind, Arc<dyn DeliveryChannel>>,
}

impl ChannelRegistry {
    /// Register every available channel under its declared discriminator.
    ///
    /// When two channels declare the same discriminator the later one wins.
    pub fn new(channels: Vec<Arc<dyn DeliveryChannel>>) -> Self {
        let mut registered: HashMap<ChannelKind, Arc<dyn DeliveryChannel>> = HashMap::new();

        for channel in channels {
            let kind = channel.kind();
            if registered.insert(kind.clone(), channel).is_some() {
                warn!(channel = %kind, "Duplicate channel registration; keeping the latest");
            }
        }

        debug!(channels = ?registered.keys().collect::<Vec<_>>(), "Channel registry built");
        Self {
            channels: registered,
        }
    }

    /// Resolve a discriminator, ignoring case.
    pub fn resolve(&self, discriminator: &str) -> Result<Arc<dyn DeliveryChannel>, RegistryError> {
        self.channels
            .get(&ChannelKind::new(discriminator))
            .cloned()
            .ok_or_else(|| RegistryError::UnsupportedChannel(discriminator.to_string()))
    }

    pub fn contains(&self, discriminator: &str) -> bool {
        self.channels.contains_key(&ChannelKind::new(discriminator))
    }

    /// Registered discriminators, sorted.
    pub fn kinds(&self) -> Vec<ChannelKind> {
        let mut kinds: Vec<_> = self.channels.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Best-effort notification dispatcher.
#[derive(Clone)]
pub struct NotificationDispatcher {
    registry: Arc<ChannelRegistry>,
    default_channel: ChannelKind,
    mode: DispatchMode,
}

impl NotificationDispatcher {
    pub fn new(registry: Arc<ChannelRegistry>, default_channel: &str, mode: DispatchMode) -> Self {
        Self {
            registry,
            default_channel: ChannelKind::new(default_channel),
            mode,
        }
    }

    /// Build from settings, rejecting a default channel with no registration.
    pub fn from_settings(
        registry: Arc<ChannelRegistry>,
        settings: &NotificationSettings,
    ) -> Result<Self, RegistryError> {
        if !registry.contains(&settings.default_channel) {
            return Err(RegistryError::UnsupportedChannel(
                settings.default_channel.clone(),
            ));
        }

        Ok(Self::new(
            registry,
            &settings.default_channel,
            settings.dispatch_mode,
        ))
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Send a notification on the caller's task.
    ///
    /// Never fails; every failure is logged and counted.
    #[instrument(
        skip(self, notification),
        fields(recipient = %notification.recipient(), subject = %notification.subject())
    )]
    pub async fn dispatch(&self, notification: Notification) {
        let discriminator = notification
            .channel()
            .unwrap_or_else(|| self.default_channel.as_str())
            .to_string();
        let label = ChannelKind::new(&discriminator);

        let channel = match self.registry.resolve(&discriminator) {
            Ok(channel) => channel,
            Err(e) => {
                error!(channel = %discriminator, error = %e, "Notification channel could not be resolved");
                metrics::record_notification(label.as_str(), "unresolved");
                return;
            }
        };

        let started = Instant::now();
        let result = channel.send(&notification).await;
        metrics::record_notification_latency(label.as_str(), started.elapsed().as_secs_f64());

        match result {
            Ok(Delivery::Sent) => {
                info!(channel = %label, "Notification delivered");
                metrics::record_notification(label.as_str(), Delivery::Sent.as_str());
            }
            Ok(Delivery::Suppressed) => {
                warn!(channel = %label, "Notification suppressed; channel disabled");
                metrics::record_notification(label.as_str(), Delivery::Suppressed.as_str());
            }
            Err(e) => {
                error!(
                    channel = %label,
                    recipient = %notification.recipient(),
                    subject = %notification.subject(),
                    error = %e,
                    "Notification delivery failed"
                );
                metrics::record_notification(label.as_str(), "failed");
            }
        }
    }

    /// Send a notification on a spawned task; the caller does not wait.
    pub fn dispatch_detached(&self, notification: Notification) -> JoinHandle<()> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.dispatch(notification).await })
    }

    /// Send a notification using the configured dispatch mode.
    pub async fn submit(&self, notification: Notification) {
        match self.mode {
            DispatchMode::Sync => self.dispatch(notification).await,
            DispatchMode::Async => {
                self.dispatch_detached(notification);
            }
        }
    }

    /// Confirmation message for a booked appointment.
    pub fn appointment_confirmation(
        &self,
        email: &str,
        pet_name: &str,
        scheduled_at: &str,
        reason: &str,
    ) -> Notification {
        debug!(recipient = %email, pet = %pet_name, "Building appointment confirmation");
        Notification::appointment_confirmation(email, pet_name, scheduled_at, reason)
    }

    /// Notice that an appointment moved to a new time.
    pub fn appointment_rescheduled(
        &self,
        email: &str,
        pet_name: &str,
        scheduled_at: &str,
        reason: &str,
    ) -> Notification {
        debug!(recipient = %email, pet = %pet_name, "Building reschedule notice");
        Notification::appointment_rescheduled(email, pet_name, scheduled_at, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeliveryError, MockDeliveryChannel};
    use crate::infrastructure::mail::{EmailChannel, MemoryOutbox};

    fn mock_channel(kind: &str) -> MockDeliveryChannel {
        let mut mock = MockDeliveryChannel::new();
        mock.expect_kind().return_const(ChannelKind::new(kind));
        mock.expect_is_enabled().return_const(true);
        mock
    }

    fn registry(channels: Vec<Arc<dyn DeliveryChannel>>) -> Arc<ChannelRegistry> {
        Arc::new(ChannelRegistry::new(channels))
    }

    fn outbox_setup(enabled: bool) -> (Arc<MemoryOutbox>, NotificationDispatcher) {
        let outbox = Arc::new(MemoryOutbox::new());
        let email = EmailChannel::new(outbox.clone(), "clinic@example.com", enabled);
        let dispatcher =
            NotificationDispatcher::new(registry(vec![Arc::new(email)]), "EMAIL", DispatchMode::Sync);
        (outbox, dispatcher)
    }

    #[test]
    fn test_registry_resolves_case_insensitively() {
        let registry = registry(vec![Arc::new(mock_channel("EMAIL"))]);

        assert_eq!(registry.resolve("EMAIL").unwrap().kind(), ChannelKind::EMAIL);
        assert_eq!(registry.resolve("email").unwrap().kind(), ChannelKind::EMAIL);
        assert_eq!(registry.kinds(), vec![ChannelKind::EMAIL]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_rejects_unknown_channel() {
        let registry = registry(vec![Arc::new(mock_channel("EMAIL"))]);

        let err = registry.resolve("Sms").err().unwrap();
        assert_eq!(err, RegistryError::UnsupportedChannel("Sms".into()));
        assert!(err.to_string().to_lowercase().contains("sms"));
        assert_eq!(err.to_string(), "unsupported channel: Sms");
    }

    #[test]
    fn test_registry_later_registration_wins() {
        let first = mock_channel("EMAIL");
        let mut second = MockDeliveryChannel::new();
        second.expect_kind().return_const(ChannelKind::EMAIL);
        second.expect_is_enabled().return_const(false);

        let registry = registry(vec![Arc::new(first), Arc::new(second)]);

        assert_eq!(registry.len(), 1);
        assert!(!registry.resolve("email").unwrap().is_enabled());
    }

    #[test]
    fn test_from_settings_rejects_unregistered_default() {
        let settings = NotificationSettings {
            default_channel: "pager".into(),
            dispatch_mode: DispatchMode::Sync,
        };
        let result = NotificationDispatcher::from_settings(registry(vec![]), &settings);
        assert!(matches!(result, Err(RegistryError::UnsupportedChannel(c)) if c == "pager"));
    }

    #[tokio::test]
    async fn test_dispatch_uses_default_channel() {
        let mut channel = mock_channel("EMAIL");
        channel
            .expect_send()
            .withf(|n| n.recipient() == "owner@example.com")
            .times(1)
            .returning(|_| Ok(Delivery::Sent));

        let dispatcher =
            NotificationDispatcher::new(registry(vec![Arc::new(channel)]), "email", DispatchMode::Sync);
        dispatcher
            .dispatch(Notification::new("owner@example.com", "Hello", "Body"))
            .await;
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_message_channel() {
        let mut email = mock_channel("EMAIL");
        email.expect_send().times(0);
        let mut pager = mock_channel("PAGER");
        pager.expect_send().times(1).returning(|_| Ok(Delivery::Sent));

        let dispatcher = NotificationDispatcher::new(
            registry(vec![Arc::new(email), Arc::new(pager)]),
            "EMAIL",
            DispatchMode::Sync,
        );
        dispatcher
            .dispatch(Notification::new("+100", "Hi", "Body").with_channel("pager"))
            .await;
    }

    #[tokio::test]
    async fn test_dispatch_swallows_unresolved_channel() {
        let mut email = mock_channel("EMAIL");
        email.expect_send().times(0);

        let dispatcher =
            NotificationDispatcher::new(registry(vec![Arc::new(email)]), "EMAIL", DispatchMode::Sync);
        let before = metrics::notification_count("UNRESOLVED_TEST", "unresolved");

        dispatcher
            .dispatch(Notification::new("a@b.com", "s", "b").with_channel("unresolved_test"))
            .await;

        assert_eq!(
            metrics::notification_count("UNRESOLVED_TEST", "unresolved"),
            before + 1
        );
    }

    #[tokio::test]
    async fn test_dispatch_swallows_channel_failure() {
        let mut channel = mock_channel("FAILING_TEST");
        channel
            .expect_send()
            .times(1)
            .returning(|_| Err(DeliveryError::Transport("smtp timeout".into())));

        let dispatcher = NotificationDispatcher::new(
            registry(vec![Arc::new(channel)]),
            "FAILING_TEST",
            DispatchMode::Sync,
        );
        let before = metrics::notification_count("FAILING_TEST", "failed");

        dispatcher.dispatch(Notification::new("a@b.com", "s", "b")).await;

        assert_eq!(metrics::notification_count("FAILING_TEST", "failed"), before + 1);
    }

    #[tokio::test]
    async fn test_dispatch_empty_recipient_does_not_transmit() {
        let (outbox, dispatcher) = outbox_setup(true);
        dispatcher.dispatch(Notification::new("", "s", "b")).await;
        assert!(outbox.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_channel_never_transmits() {
        let (outbox, dispatcher) = outbox_setup(false);
        for _ in 0..5 {
            dispatcher
                .dispatch(Notification::new("owner@example.com", "s", "b"))
                .await;
        }
        assert!(outbox.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_delivers_through_email_channel() {
        let (outbox, dispatcher) = outbox_setup(true);
        let message = dispatcher.appointment_confirmation(
            "owner@example.com",
            "Rex",
            "01/01/2025 10:00",
            "checkup",
        );
        dispatcher.dispatch(message).await;

        let sent = outbox.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "owner@example.com");
        assert_eq!(sent[0].from, "clinic@example.com");
        assert!(sent[0].body.contains("Rex"));
    }

    #[tokio::test]
    async fn test_rescheduled_notice_goes_through_default_channel() {
        let (outbox, dispatcher) = outbox_setup(true);
        let message = dispatcher.appointment_rescheduled(
            "owner@example.com",
            "Luna",
            "03/02/2025 16:45",
            "follow-up",
        );
        assert!(message.channel().is_none());

        dispatcher.dispatch(message).await;

        let sent = outbox.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "owner@example.com");
        assert!(sent[0].body.contains("Luna"));
        assert!(sent[0].body.contains("03/02/2025 16:45"));
    }

    #[tokio::test]
    async fn test_dispatch_detached_shares_contract() {
        let (outbox, dispatcher) = outbox_setup(true);

        dispatcher
            .dispatch_detached(Notification::new("owner@example.com", "s", "b"))
            .await
            .unwrap();
        dispatcher
            .dispatch_detached(Notification::new("owner@example.com", "s", "b").with_channel("sms"))
            .await
            .unwrap();

        assert_eq!(outbox.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_in_sync_mode_waits() {
        let (outbox, dispatcher) = outbox_setup(true);
        assert_eq!(dispatcher.mode(), DispatchMode::Sync);
        dispatcher
            .submit(Notification::new("owner@example.com", "s", "b"))
            .await;
        assert_eq!(outbox.len(), 1);
    }
}
