//! # Domain Entities
//!
//! Core domain entities of the clinic back-office.
//!
//! ## Core Entities
//!
//! - **Owner**: Pet owner and notification recipient
//! - **Pet**: Patient record linked to an owner
//! - **Appointment**: A scheduled visit, source of booking notifications
//! - **Invoice**: A bill with immutable line items and a computed total
//!
//! ## Notifications
//!
//! - **Notification**: Channel-agnostic outbound message
//! - **DeliveryChannel**: Contract for concrete transmission mechanisms
//!
//! ## Repository Traits
//!
//! Each persisted entity has an associated repository trait defining data
//! access operations. These traits are implemented in the infrastructure
//! layer, following the dependency inversion principle.

mod appointment;
mod invoice;
mod notification;
mod owner;
mod pet;

pub use appointment::{Appointment, AppointmentRepository, AppointmentStatus};
pub use invoice::{Invoice, InvoiceLine, InvoiceRepository, InvoiceStatus};
pub use notification::{Delivery, DeliveryChannel, DeliveryError, Notification};
pub use owner::{Owner, OwnerRepository};
pub use pet::{Pet, PetRepository};

#[cfg(test)]
pub use notification::MockDeliveryChannel;
