use thiserror::Error;
use uuid::Uuid;

use crate::db::repository::StoreError;

#[derive(Debug, Error)]
pub enum BuildingError {
    /// Input rejected before anything touched the store.
    #[error("{0}")]
    Validation(String),

    #[error("building not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}
