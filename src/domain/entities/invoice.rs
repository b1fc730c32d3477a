//! Invoice entity, line items and repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::services::BillingError;
use crate::shared::error::AppError;

/// Invoice payment states.
///
/// The only legal transitions are `Pending -> Paid` and `Pending -> Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "PAID" => Some(Self::Paid),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Check whether moving to `next` is allowed.
    pub fn can_transition_to(&self, next: InvoiceStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid) | (Self::Pending, Self::Cancelled)
        )
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A billed item. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub description: String,

    /// Units billed (at least 1)
    pub quantity: u32,

    /// Price per unit (positive)
    pub unit_price: Decimal,

    /// `quantity * unit_price`
    subtotal: Decimal,
}

impl InvoiceLine {
    /// Build a line, computing its subtotal.
    pub fn new(
        description: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<Self, BillingError> {
        let description = description.into();
        let subtotal = unit_price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| BillingError::Overflow(format!("subtotal of line '{description}'")))?;

        Ok(Self {
            description,
            quantity,
            unit_price,
            subtotal,
        })
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }
}

/// A bill issued to an owner for a pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Human-facing unique number, e.g. `F-1A2B3C4D`
    pub number: String,

    pub issued_at: DateTime<Utc>,

    pub owner_id: i64,

    pub pet_id: i64,

    /// Appointment the invoice settles, if any
    pub appointment_id: Option<i64>,

    pub notes: Option<String>,

    pub lines: Vec<InvoiceLine>,

    /// Sum of line subtotals
    pub subtotal: Decimal,

    /// Tax percentage recorded at issue time (19.00)
    pub tax_rate: Decimal,

    /// Amount due, produced by the calculation policy
    pub total: Decimal,

    /// Policy that produced `total`
    pub policy: String,

    pub status: InvoiceStatus,
}

impl Invoice {
    /// Sum the subtotals of a set of lines.
    pub fn sum_lines(lines: &[InvoiceLine]) -> Result<Decimal, BillingError> {
        lines.iter().try_fold(Decimal::ZERO, |acc, line| {
            acc.checked_add(line.subtotal())
                .ok_or_else(|| BillingError::Overflow("invoice subtotal".into()))
        })
    }
}

/// Repository trait for Invoice data access operations.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Find an invoice by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Invoice>, AppError>;

    /// List all invoices, newest first.
    async fn list(&self) -> Result<Vec<Invoice>, AppError>;

    /// Check whether an invoice number is already taken.
    async fn exists_by_number(&self, number: &str) -> Result<bool, AppError>;

    /// Create a new invoice.
    async fn create(&self, invoice: &Invoice) -> Result<Invoice, AppError>;

    /// Set the status of an invoice.
    async fn update_status(&self, id: i64, status: InvoiceStatus) -> Result<Invoice, AppError>;

    /// Delete an invoice.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
