//! Pet entity and repository trait.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A patient of the clinic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Owning owner ID
    pub owner_id: i64,

    pub name: String,

    /// Species, e.g. "dog" or "cat"
    pub species: String,

    pub breed: Option<String>,

    pub birth_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
}

/// Repository trait for Pet data access operations.
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Find a pet by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Pet>, AppError>;

    /// Create a new pet.
    async fn create(&self, pet: &Pet) -> Result<Pet, AppError>;
}
