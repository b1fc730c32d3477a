//! Date/time presentation helpers.

use chrono::NaiveDateTime;

/// Display format used in messages and views (`dd/MM/yyyy HH:mm`).
pub const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Format a local date-time for display.
pub fn format_date_time(value: &NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}
