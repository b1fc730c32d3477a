//! Appointment Service
//!
//! Booking, lookup, rescheduling and cancellation of appointments.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::domain::{
    Appointment, AppointmentRepository, AppointmentStatus, Owner, OwnerRepository, Pet,
    PetRepository,
};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;
use crate::shared::validation::validation_error;

/// Appointment service trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentService: Send + Sync {
    /// Book an appointment for an existing pet
    async fn create(&self, request: CreateAppointmentDto) -> Result<AppointmentDto, AppointmentError>;

    /// Get a single appointment
    async fn get(&self, id: i64) -> Result<AppointmentDto, AppointmentError>;

    /// List all appointments, ordered by visit time
    async fn list(&self) -> Result<Vec<AppointmentDto>, AppointmentError>;

    /// List appointments of one pet
    async fn list_by_pet(&self, pet_id: i64) -> Result<Vec<AppointmentDto>, AppointmentError>;

    /// Replace time, reason, notes and optionally status
    async fn update(&self, id: i64, request: UpdateAppointmentDto) -> Result<AppointmentDto, AppointmentError>;

    /// Delete an appointment
    async fn delete(&self, id: i64) -> Result<(), AppointmentError>;
}

/// Create appointment request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAppointmentDto {
    pub pet_id: i64,

    pub scheduled_at: NaiveDateTime,

    #[validate(length(min = 1, max = 200, message = "Reason must be 1-200 characters"))]
    pub reason: String,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Update appointment request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAppointmentDto {
    pub scheduled_at: NaiveDateTime,

    #[validate(length(min = 1, max = 200, message = "Reason must be 1-200 characters"))]
    pub reason: String,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,

    /// New status name, e.g. `CONFIRMED`; unchanged when absent
    pub status: Option<String>,
}

/// Appointment data transfer object
///
/// Carries the pet and owner details needed to notify the owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentDto {
    pub id: i64,
    pub pet_id: i64,
    pub pet_name: String,
    pub owner_name: String,
    pub owner_email: String,
    pub scheduled_at: NaiveDateTime,
    pub reason: String,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl AppointmentDto {
    fn from_parts(appointment: Appointment, pet: &Pet, owner: &Owner) -> Self {
        Self {
            id: appointment.id,
            pet_id: appointment.pet_id,
            pet_name: pet.name.clone(),
            owner_name: owner.full_name(),
            owner_email: owner.email.clone(),
            scheduled_at: appointment.scheduled_at,
            reason: appointment.reason,
            notes: appointment.notes,
            status: appointment.status.as_str().to_string(),
            created_at: appointment.created_at.to_rfc3339(),
        }
    }
}

/// Appointment service errors
#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found: {0}")]
    NotFound(i64),

    #[error("Pet not found: {0}")]
    PetNotFound(i64),

    #[error("Owner not found: {0}")]
    OwnerNotFound(i64),

    #[error("Invalid appointment status: {0}")]
    InvalidStatus(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for AppointmentError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(msg) => Self::Validation(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// AppointmentService implementation
pub struct AppointmentServiceImpl<A, P, O>
where
    A: AppointmentRepository,
    P: PetRepository,
    O: OwnerRepository,
{
    appointment_repo: Arc<A>,
    pet_repo: Arc<P>,
    owner_repo: Arc<O>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<A, P, O> AppointmentServiceImpl<A, P, O>
where
    A: AppointmentRepository,
    P: PetRepository,
    O: OwnerRepository,
{
    pub fn new(
        appointment_repo: Arc<A>,
        pet_repo: Arc<P>,
        owner_repo: Arc<O>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            appointment_repo,
            pet_repo,
            owner_repo,
            id_generator,
        }
    }

    async fn find_pet(&self, pet_id: i64) -> Result<Pet, AppointmentError> {
        self.pet_repo
            .find_by_id(pet_id)
            .await?
            .ok_or(AppointmentError::PetNotFound(pet_id))
    }

    async fn find_appointment(&self, id: i64) -> Result<Appointment, AppointmentError> {
        self.appointment_repo
            .find_by_id(id)
            .await?
            .ok_or(AppointmentError::NotFound(id))
    }

    async fn find_owner(&self, pet: &Pet) -> Result<Owner, AppointmentError> {
        self.owner_repo
            .find_by_id(pet.owner_id)
            .await?
            .ok_or(AppointmentError::OwnerNotFound(pet.owner_id))
    }

    async fn to_dto(&self, appointment: Appointment) -> Result<AppointmentDto, AppointmentError> {
        let pet = self.find_pet(appointment.pet_id).await?;
        let owner = self.find_owner(&pet).await?;

        Ok(AppointmentDto::from_parts(appointment, &pet, &owner))
    }

    async fn to_dtos(&self, appointments: Vec<Appointment>) -> Result<Vec<AppointmentDto>, AppointmentError> {
        let mut dtos = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            dtos.push(self.to_dto(appointment).await?);
        }
        Ok(dtos)
    }
}

#[async_trait]
impl<A, P, O> AppointmentService for AppointmentServiceImpl<A, P, O>
where
    A: AppointmentRepository + 'static,
    P: PetRepository + 'static,
    O: OwnerRepository + 'static,
{
    #[instrument(skip(self, request), fields(pet_id = request.pet_id))]
    async fn create(&self, request: CreateAppointmentDto) -> Result<AppointmentDto, AppointmentError> {
        request.validate().map_err(validation_error)?;

        // Resolve everything the view needs before anything is stored.
        let pet = self.find_pet(request.pet_id).await?;
        let owner = self.find_owner(&pet).await?;

        let appointment = Appointment {
            id: self.id_generator.generate(),
            pet_id: pet.id,
            scheduled_at: request.scheduled_at,
            reason: request.reason,
            notes: request.notes,
            status: AppointmentStatus::default(),
            created_at: Utc::now(),
        };

        let created = self.appointment_repo.create(&appointment).await?;
        info!(appointment_id = created.id, pet = %pet.name, "Appointment booked");

        Ok(AppointmentDto::from_parts(created, &pet, &owner))
    }

    async fn get(&self, id: i64) -> Result<AppointmentDto, AppointmentError> {
        let appointment = self.find_appointment(id).await?;
        self.to_dto(appointment).await
    }

    async fn list(&self) -> Result<Vec<AppointmentDto>, AppointmentError> {
        let appointments = self.appointment_repo.list().await?;
        self.to_dtos(appointments).await
    }

    async fn list_by_pet(&self, pet_id: i64) -> Result<Vec<AppointmentDto>, AppointmentError> {
        self.find_pet(pet_id).await?;
        let appointments = self.appointment_repo.find_by_pet(pet_id).await?;
        self.to_dtos(appointments).await
    }

    #[instrument(skip(self, request))]
    async fn update(&self, id: i64, request: UpdateAppointmentDto) -> Result<AppointmentDto, AppointmentError> {
        request.validate().map_err(validation_error)?;

        let mut appointment = self.find_appointment(id).await?;

        if let Some(status) = request.status.as_deref() {
            appointment.status = AppointmentStatus::parse(status)
                .ok_or_else(|| AppointmentError::InvalidStatus(status.to_string()))?;
        }
        appointment.scheduled_at = request.scheduled_at;
        appointment.reason = request.reason;
        appointment.notes = request.notes;

        let updated = self.appointment_repo.update(&appointment).await?;
        debug!(appointment_id = id, status = %updated.status, "Appointment updated");

        self.to_dto(updated).await
    }

    async fn delete(&self, id: i64) -> Result<(), AppointmentError> {
        self.find_appointment(id).await?;
        self.appointment_repo.delete(id).await?;
        info!(appointment_id = id, "Appointment deleted");
        Ok(())
    }
}
