//! Invoice Service
//!
//! Issues invoices, computes totals through the configured calculation
//! policy and manages the payment status.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::money::{round_money, tax_rate_percent};
use crate::domain::{
    AppointmentRepository, BillingError, CalculatorRegistry, Invoice, InvoiceLine,
    InvoiceRepository, InvoiceStatus, OwnerRepository, PetRepository,
};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;
use crate::shared::validation::validation_error;

/// Attempts at finding an unused invoice number before giving up.
const MAX_NUMBER_ATTEMPTS: usize = 16;

/// Invoice service trait
#[async_trait]
pub trait InvoiceService: Send + Sync {
    /// Issue an invoice
    async fn create(&self, request: CreateInvoiceDto) -> Result<InvoiceDto, InvoiceError>;

    /// Get a single invoice
    async fn get(&self, id: i64) -> Result<InvoiceDto, InvoiceError>;

    /// List invoices, newest first
    async fn list(&self) -> Result<Vec<InvoiceDto>, InvoiceError>;

    /// Move an invoice to PAID or CANCELLED
    async fn update_status(&self, id: i64, status: &str) -> Result<InvoiceDto, InvoiceError>;

    /// Delete an invoice
    async fn delete(&self, id: i64) -> Result<(), InvoiceError>;
}

/// Create invoice request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoiceDto {
    pub owner_id: i64,

    pub pet_id: i64,

    /// Appointment being billed; ignored when it does not exist
    pub appointment_id: Option<i64>,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,

    #[validate(length(min = 1, message = "At least one line is required"), nested)]
    pub lines: Vec<InvoiceLineDto>,

    /// Calculation policy, e.g. `DISCOUNT`; the configured default when absent
    pub policy: Option<String>,

    /// Policy parameters, e.g. `[10]` for a 10% discount
    #[serde(default)]
    pub parameters: Vec<Value>,
}

/// Invoice line request
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct InvoiceLineDto {
    #[validate(length(min = 1, max = 200, message = "Description must be 1-200 characters"))]
    pub description: String,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,

    #[validate(custom(function = "validate_positive_amount"))]
    pub unit_price: Decimal,
}

fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("positive_amount");
        err.message = Some("Unit price must be greater than zero".into());
        Err(err)
    }
}

/// Invoice line view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLineView {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl From<&InvoiceLine> for InvoiceLineView {
    fn from(line: &InvoiceLine) -> Self {
        Self {
            description: line.description.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: line.subtotal(),
        }
    }
}

/// Invoice data transfer object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDto {
    pub id: i64,
    pub number: String,
    pub issued_at: String,
    pub owner_id: i64,
    pub pet_id: i64,
    pub appointment_id: Option<i64>,
    pub notes: Option<String>,
    pub lines: Vec<InvoiceLineView>,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub total: Decimal,
    pub policy: String,
    pub status: String,
}

impl From<Invoice> for InvoiceDto {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            lines: invoice.lines.iter().map(InvoiceLineView::from).collect(),
            number: invoice.number,
            issued_at: invoice.issued_at.to_rfc3339(),
            owner_id: invoice.owner_id,
            pet_id: invoice.pet_id,
            appointment_id: invoice.appointment_id,
            notes: invoice.notes,
            subtotal: invoice.subtotal,
            tax_rate: invoice.tax_rate,
            total: invoice.total,
            policy: invoice.policy,
            status: invoice.status.as_str().to_string(),
        }
    }
}

/// Invoice service errors
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("Invoice not found: {0}")]
    NotFound(i64),

    #[error("Owner not found: {0}")]
    OwnerNotFound(i64),

    #[error("Pet not found: {0}")]
    PetNotFound(i64),

    #[error("Invalid invoice status: {0}")]
    InvalidStatus(String),

    #[error("Invoice cannot move from {from} to {to}")]
    InvalidTransition { from: InvoiceStatus, to: InvoiceStatus },

    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for InvoiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(msg) => Self::Validation(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// InvoiceService implementation
pub struct InvoiceServiceImpl<I, O, P, A>
where
    I: InvoiceRepository,
    O: OwnerRepository,
    P: PetRepository,
    A: AppointmentRepository,
{
    invoice_repo: Arc<I>,
    owner_repo: Arc<O>,
    pet_repo: Arc<P>,
    appointment_repo: Arc<A>,
    calculators: Arc<CalculatorRegistry>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<I, O, P, A> InvoiceServiceImpl<I, O, P, A>
where
    I: InvoiceRepository,
    O: OwnerRepository,
    P: PetRepository,
    A: AppointmentRepository,
{
    pub fn new(
        invoice_repo: Arc<I>,
        owner_repo: Arc<O>,
        pet_repo: Arc<P>,
        appointment_repo: Arc<A>,
        calculators: Arc<CalculatorRegistry>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            invoice_repo,
            owner_repo,
            pet_repo,
            appointment_repo,
            calculators,
            id_generator,
        }
    }

    /// `F-` followed by 8 uppercase hex characters, unique among invoices.
    async fn next_number(&self) -> Result<String, InvoiceError> {
        for _ in 0..MAX_NUMBER_ATTEMPTS {
            let simple = Uuid::new_v4().simple().to_string();
            let number = format!("F-{}", simple[..8].to_uppercase());
            if !self.invoice_repo.exists_by_number(&number).await? {
                return Ok(number);
            }
            warn!(number = %number, "Invoice number collision; regenerating");
        }

        Err(InvoiceError::Internal(
            "could not allocate a unique invoice number".into(),
        ))
    }

    async fn find_invoice(&self, id: i64) -> Result<Invoice, InvoiceError> {
        self.invoice_repo
            .find_by_id(id)
            .await?
            .ok_or(InvoiceError::NotFound(id))
    }
}

#[async_trait]
impl<I, O, P, A> InvoiceService for InvoiceServiceImpl<I, O, P, A>
where
    I: InvoiceRepository + 'static,
    O: OwnerRepository + 'static,
    P: PetRepository + 'static,
    A: AppointmentRepository + 'static,
{
    #[instrument(skip(self, request), fields(owner_id = request.owner_id, pet_id = request.pet_id))]
    async fn create(&self, request: CreateInvoiceDto) -> Result<InvoiceDto, InvoiceError> {
        request.validate().map_err(validation_error)?;

        let owner = self
            .owner_repo
            .find_by_id(request.owner_id)
            .await?
            .ok_or(InvoiceError::OwnerNotFound(request.owner_id))?;
        let pet = self
            .pet_repo
            .find_by_id(request.pet_id)
            .await?
            .ok_or(InvoiceError::PetNotFound(request.pet_id))?;

        if pet.owner_id != owner.id {
            return Err(InvoiceError::Validation(format!(
                "pet {} does not belong to owner {}",
                pet.id, owner.id
            )));
        }

        let appointment_id = match request.appointment_id {
            Some(id) => match self.appointment_repo.find_by_id(id).await? {
                Some(appointment) => Some(appointment.id),
                None => {
                    warn!(appointment_id = id, "Appointment not found; invoice left unlinked");
                    None
                }
            },
            None => None,
        };

        let calculator = match request.policy.as_deref() {
            Some(policy) => self.calculators.resolve(policy)?,
            None => self.calculators.default_calculator(),
        };

        let lines = request
            .lines
            .into_iter()
            .map(|line| InvoiceLine::new(line.description, line.quantity, line.unit_price))
            .collect::<Result<Vec<_>, _>>()?;
        let subtotal = round_money(Invoice::sum_lines(&lines)?);
        let total = calculator.compute_total(subtotal, &request.parameters)?;
        let policy = calculator.policy();

        let invoice = Invoice {
            id: self.id_generator.generate(),
            number: self.next_number().await?,
            issued_at: Utc::now(),
            owner_id: owner.id,
            pet_id: pet.id,
            appointment_id,
            notes: request.notes,
            lines,
            subtotal,
            tax_rate: tax_rate_percent(),
            total,
            policy: policy.to_string(),
            status: InvoiceStatus::default(),
        };

        let created = self.invoice_repo.create(&invoice).await?;
        metrics::record_invoice_created(policy.as_str());
        info!(
            invoice = %created.number,
            policy = %policy,
            subtotal = %created.subtotal,
            total = %created.total,
            "Invoice issued"
        );

        Ok(created.into())
    }

    async fn get(&self, id: i64) -> Result<InvoiceDto, InvoiceError> {
        Ok(self.find_invoice(id).await?.into())
    }

    async fn list(&self) -> Result<Vec<InvoiceDto>, InvoiceError> {
        let invoices = self.invoice_repo.list().await?;
        Ok(invoices.into_iter().map(InvoiceDto::from).collect())
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: i64, status: &str) -> Result<InvoiceDto, InvoiceError> {
        let next = InvoiceStatus::parse(status)
            .ok_or_else(|| InvoiceError::InvalidStatus(status.to_string()))?;
        let invoice = self.find_invoice(id).await?;

        if !invoice.status.can_transition_to(next) {
            return Err(InvoiceError::InvalidTransition {
                from: invoice.status,
                to: next,
            });
        }

        let updated = self.invoice_repo.update_status(id, next).await?;
        info!(invoice = %updated.number, status = %next, "Invoice status changed");
        Ok(updated.into())
    }

    async fn delete(&self, id: i64) -> Result<(), InvoiceError> {
        let invoice = self.find_invoice(id).await?;
        self.invoice_repo.delete(id).await?;
        info!(invoice = %invoice.number, "Invoice deleted");
        Ok(())
    }
}
