//! Repository Implementations
//!
//! In-memory implementations of the domain repository traits. Durable
//! storage is provided by the hosting application; these back the
//! standalone binary and the test suites.
//!
//! ## Available Repositories
//!
//! - **InMemoryOwnerRepository** - Owners, unique by email
//! - **InMemoryPetRepository** - Pets keyed by ID
//! - **InMemoryAppointmentRepository** - Appointments ordered by visit time
//! - **InMemoryInvoiceRepository** - Invoices newest first

pub mod appointment_repository;
pub mod invoice_repository;
pub mod owner_repository;
pub mod pet_repository;

pub use appointment_repository::InMemoryAppointmentRepository;
pub use invoice_repository::InMemoryInvoiceRepository;
pub use owner_repository::InMemoryOwnerRepository;
pub use pet_repository::InMemoryPetRepository;
