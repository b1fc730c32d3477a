//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **NotificationDispatcher**: Channel resolution and best-effort delivery
//! - **AppointmentService**: Appointment booking and management
//! - **AppointmentFacade**: Appointment writes paired with owner notifications
//! - **InvoiceService**: Invoice issuing, totals and payment status

pub mod appointment_facade;
pub mod appointment_service;
pub mod invoice_service;
pub mod notification_service;

// Re-export notification types
pub use notification_service::{ChannelRegistry, NotificationDispatcher, RegistryError};

// Re-export appointment types
pub use appointment_facade::AppointmentFacade;
pub use appointment_service::{
    AppointmentDto, AppointmentError, AppointmentService, AppointmentServiceImpl,
    CreateAppointmentDto, UpdateAppointmentDto,
};

// Re-export invoice types
pub use invoice_service::{
    CreateInvoiceDto, InvoiceDto, InvoiceError, InvoiceLineDto, InvoiceLineView, InvoiceService,
    InvoiceServiceImpl,
};
