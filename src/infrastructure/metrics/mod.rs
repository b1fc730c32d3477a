//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - Notification dispatch outcomes by channel
//! - Notification send latency histograms
//! - Invoices created by calculation policy

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Notification counter - tracks dispatch outcomes by channel
/// ("sent", "suppressed", "failed", "unresolved")
pub static NOTIFICATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("notifications_total", "Total number of notification dispatches")
            .namespace("vet_clinic"),
        &["channel", "outcome"],
    )
    .expect("Failed to create NOTIFICATIONS_TOTAL metric")
});

/// Notification send latency histogram - time spent inside the channel
pub static NOTIFICATION_SEND_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];
    HistogramVec::new(
        HistogramOpts::new(
            "notification_send_duration_seconds",
            "Notification channel send latency in seconds",
        )
        .namespace("vet_clinic")
        .buckets(buckets),
        &["channel"],
    )
    .expect("Failed to create NOTIFICATION_SEND_DURATION_SECONDS metric")
});

/// Invoice counter - tracks invoices created per calculation policy
pub static INVOICES_CREATED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("invoices_created_total", "Total number of invoices created")
            .namespace("vet_clinic"),
        &["policy"],
    )
    .expect("Failed to create INVOICES_CREATED_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(NOTIFICATIONS_TOTAL.clone()))
        .expect("Failed to register NOTIFICATIONS_TOTAL");
    registry
        .register(Box::new(NOTIFICATION_SEND_DURATION_SECONDS.clone()))
        .expect("Failed to register NOTIFICATION_SEND_DURATION_SECONDS");
    registry
        .register(Box::new(INVOICES_CREATED_TOTAL.clone()))
        .expect("Failed to register INVOICES_CREATED_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to record a notification dispatch outcome
pub fn record_notification(channel: &str, outcome: &str) {
    NOTIFICATIONS_TOTAL
        .with_label_values(&[channel, outcome])
        .inc();
}

/// Helper to record time spent in a channel send
pub fn record_notification_latency(channel: &str, duration_secs: f64) {
    NOTIFICATION_SEND_DURATION_SECONDS
        .with_label_values(&[channel])
        .observe(duration_secs);
}

/// Helper to record a created invoice
pub fn record_invoice_created(policy: &str) {
    INVOICES_CREATED_TOTAL.with_label_values(&[policy]).inc();
}

/// Current value of the notification counter for a label pair
pub fn notification_count(channel: &str, outcome: &str) -> u64 {
    NOTIFICATIONS_TOTAL
        .with_label_values(&[channel, outcome])
        .get()
}
