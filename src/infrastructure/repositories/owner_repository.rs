//! Owner Repository Implementation
//!
//! In-memory owner storage.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{Owner, OwnerRepository};
use crate::shared::error::AppError;

/// In-memory owner repository keyed by snowflake ID.
#[derive(Default)]
pub struct InMemoryOwnerRepository {
    owners: DashMap<i64, Owner>,
}

impl InMemoryOwnerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OwnerRepository for InMemoryOwnerRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Owner>, AppError> {
        Ok(self.owners.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Owner>, AppError> {
        let mut owners: Vec<Owner> = self.owners.iter().map(|e| e.value().clone()).collect();
        owners.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(owners)
    }

    async fn create(&self, owner: &Owner) -> Result<Owner, AppError> {
        if self.owners.iter().any(|e| e.value().email.eq_ignore_ascii_case(&owner.email)) {
            return Err(AppError::Conflict(format!(
                "Owner email already registered: {}",
                owner.email
            )));
        }

        match self.owners.entry(owner.id) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "Owner already exists: {}",
                owner.id
            ))),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(owner.clone());
                Ok(owner.clone())
            }
        }
    }
}
