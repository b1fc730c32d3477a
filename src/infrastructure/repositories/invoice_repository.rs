//! Invoice Repository Implementation
//!
//! In-memory invoice storage.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{Invoice, InvoiceRepository, InvoiceStatus};
use crate::shared::error::AppError;

/// In-memory invoice repository keyed by snowflake ID.
#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    invoices: DashMap<i64, Invoice>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Invoice>, AppError> {
        Ok(self.invoices.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Invoice>, AppError> {
        let mut invoices: Vec<Invoice> = self.invoices.iter().map(|e| e.value().clone()).collect();
        invoices.sort_by(|a, b| b.issued_at.cmp(&a.issued_at).then(b.id.cmp(&a.id)));
        Ok(invoices)
    }

    async fn exists_by_number(&self, number: &str) -> Result<bool, AppError> {
        Ok(self.invoices.iter().any(|e| e.value().number == number))
    }

    async fn create(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        if self.invoices.contains_key(&invoice.id) {
            return Err(AppError::Conflict(format!(
                "Invoice already exists: {}",
                invoice.id
            )));
        }
        self.invoices.insert(invoice.id, invoice.clone());
        Ok(invoice.clone())
    }

    async fn update_status(&self, id: i64, status: InvoiceStatus) -> Result<Invoice, AppError> {
        let mut entry = self
            .invoices
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Invoice not found: {}", id)))?;
        entry.status = status;
        Ok(entry.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.invoices
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Invoice not found: {}", id)))
    }
}
