use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Building, NewBuilding};

/// Opaque failure from a storage backend (connectivity, constraint violation,
/// decoding). Callers are not expected to inspect it.
#[derive(Debug, Error)]
#[error("store error: {source}")]
pub struct StoreError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl StoreError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Storage for `Building` records.
///
/// `update` and `delete_by_id` report the number of affected rows so a backend
/// can be checked in isolation; `BuildingService` does not rely on them.
#[async_trait]
pub trait BuildingRepository: Send + Sync {
    /// Stores `building` and returns the id assigned to it.
    async fn insert(&self, building: &NewBuilding) -> Result<Uuid, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Building>, StoreError>;

    /// Returns every record in whatever order the backend yields them.
    async fn find_all(&self) -> Result<Vec<Building>, StoreError>;

    /// Writes the mutable columns (temperatures, status, last_updated) of
    /// `building`, matched by id.
    async fn update(&self, building: &Building) -> Result<u64, StoreError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError>;
}
