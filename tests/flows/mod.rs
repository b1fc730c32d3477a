//! End-to-end flows through the wired application

mod appointment_tests;
mod invoice_tests;
mod notification_tests;
