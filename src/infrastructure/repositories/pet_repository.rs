//! Pet Repository Implementation
//!
//! In-memory pet storage.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{Pet, PetRepository};
use crate::shared::error::AppError;

/// In-memory pet repository keyed by snowflake ID.
#[derive(Default)]
pub struct InMemoryPetRepository {
    pets: DashMap<i64, Pet>,
}

impl InMemoryPetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PetRepository for InMemoryPetRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Pet>, AppError> {
        Ok(self.pets.get(&id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, pet: &Pet) -> Result<Pet, AppError> {
        if self.pets.contains_key(&pet.id) {
            return Err(AppError::Conflict(format!("Pet already exists: {}", pet.id)));
        }
        self.pets.insert(pet.id, pet.clone());
        Ok(pet.clone())
    }
}
