//! Appointment Facade
//!
//! Pairs appointment writes with owner notifications. The write is the
//! primary effect; the notification never changes its outcome.

use std::sync::Arc;

use tracing::{debug, info};

use crate::shared::date_format::format_date_time;

use super::appointment_service::{
    AppointmentDto, AppointmentError, AppointmentService, CreateAppointmentDto,
    UpdateAppointmentDto,
};
use super::notification_service::NotificationDispatcher;

/// Appointment operations that notify the owner.
#[derive(Clone)]
pub struct AppointmentFacade {
    appointments: Arc<dyn AppointmentService>,
    dispatcher: NotificationDispatcher,
}

impl AppointmentFacade {
    pub fn new(appointments: Arc<dyn AppointmentService>, dispatcher: NotificationDispatcher) -> Self {
        Self {
            appointments,
            dispatcher,
        }
    }

    /// Book an appointment and send the owner a confirmation.
    ///
    /// Errors from the booking are returned before anything is sent.
    pub async fn create_with_notification(
        &self,
        request: CreateAppointmentDto,
    ) -> Result<AppointmentDto, AppointmentError> {
        let created = self.appointments.create(request).await?;

        let message = self.dispatcher.appointment_confirmation(
            &created.owner_email,
            &created.pet_name,
            &format_date_time(&created.scheduled_at),
            &created.reason,
        );
        self.dispatcher.submit(message).await;

        info!(appointment_id = created.id, "Appointment created with notification");
        Ok(created)
    }

    /// Update an appointment; notify the owner only when it moved.
    pub async fn update_with_notification(
        &self,
        id: i64,
        request: UpdateAppointmentDto,
    ) -> Result<AppointmentDto, AppointmentError> {
        let previous = self.appointments.get(id).await?;
        let updated = self.appointments.update(id, request).await?;

        if updated.scheduled_at != previous.scheduled_at {
            let message = self.dispatcher.appointment_rescheduled(
                &updated.owner_email,
                &updated.pet_name,
                &format_date_time(&updated.scheduled_at),
                &updated.reason,
            );
            self.dispatcher.submit(message).await;
            info!(appointment_id = id, "Appointment rescheduled; owner notified");
        } else {
            debug!(appointment_id = id, "Visit time unchanged; no notification");
        }

        Ok(updated)
    }
}
