//! Owner entity and repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A pet owner and the contact point for notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    /// Snowflake ID (primary key)
    pub id: i64,

    pub first_name: String,

    pub last_name: String,

    /// Contact email, recipient of appointment notifications
    pub email: String,

    pub phone: Option<String>,

    pub address: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Owner {
    /// First and last name joined by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Repository trait for Owner data access operations.
#[async_trait]
pub trait OwnerRepository: Send + Sync {
    /// Find an owner by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Owner>, AppError>;

    /// List all owners.
    async fn list(&self) -> Result<Vec<Owner>, AppError>;

    /// Create a new owner.
    async fn create(&self, owner: &Owner) -> Result<Owner, AppError>;
}
