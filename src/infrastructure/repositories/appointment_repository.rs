//! Appointment Repository Implementation
//!
//! In-memory appointment storage ordered by visit time on read.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{Appointment, AppointmentRepository};
use crate::shared::error::AppError;

/// In-memory appointment repository keyed by snowflake ID.
#[derive(Default)]
pub struct InMemoryAppointmentRepository {
    appointments: DashMap<i64, Appointment>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut appointments: Vec<Appointment>) -> Vec<Appointment> {
        appointments.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then(a.id.cmp(&b.id)));
        appointments
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>, AppError> {
        Ok(self.appointments.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_pet(&self, pet_id: i64) -> Result<Vec<Appointment>, AppError> {
        let appointments = self
            .appointments
            .iter()
            .filter(|e| e.value().pet_id == pet_id)
            .map(|e| e.value().clone())
            .collect();
        Ok(Self::sorted(appointments))
    }

    async fn list(&self) -> Result<Vec<Appointment>, AppError> {
        Ok(Self::sorted(
            self.appointments.iter().map(|e| e.value().clone()).collect(),
        ))
    }

    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        if self.appointments.contains_key(&appointment.id) {
            return Err(AppError::Conflict(format!(
                "Appointment already exists: {}",
                appointment.id
            )));
        }
        self.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment.clone())
    }

    async fn update(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        match self.appointments.get_mut(&appointment.id) {
            Some(mut entry) => {
                *entry = appointment.clone();
                Ok(appointment.clone())
            }
            None => Err(AppError::NotFound(format!(
                "Appointment not found: {}",
                appointment.id
            ))),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.appointments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Appointment not found: {}", id)))
    }
}
