//! Appointment entity and repository trait.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Appointment lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    /// Booked, awaiting confirmation
    #[default]
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Parse from the uppercase string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SCHEDULED" => Some(Self::Scheduled),
            "CONFIRMED" => Some(Self::Confirmed),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Confirmed => "CONFIRMED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scheduled visit for a pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Pet being seen
    pub pet_id: i64,

    /// Clinic-local date and time of the visit
    pub scheduled_at: NaiveDateTime,

    /// Reason for the visit (up to 200 characters)
    pub reason: String,

    /// Free-text notes (up to 500 characters)
    pub notes: Option<String>,

    pub status: AppointmentStatus,

    pub created_at: DateTime<Utc>,
}

/// Repository trait for Appointment data access operations.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Find an appointment by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>, AppError>;

    /// Find appointments for a pet, ordered by visit time.
    async fn find_by_pet(&self, pet_id: i64) -> Result<Vec<Appointment>, AppError>;

    /// List all appointments, ordered by visit time.
    async fn list(&self) -> Result<Vec<Appointment>, AppError>;

    /// Create a new appointment.
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError>;

    /// Replace an existing appointment.
    async fn update(&self, appointment: &Appointment) -> Result<Appointment, AppError>;

    /// Delete an appointment.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_names() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Confirmed,
            AppointmentStatus::InProgress,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AppointmentStatus::parse("in_progress"), Some(AppointmentStatus::InProgress));
        assert_eq!(AppointmentStatus::parse("LOST"), None);
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&AppointmentStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }
}
