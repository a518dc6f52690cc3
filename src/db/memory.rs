use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    models::{Building, NewBuilding},
    repository::{BuildingRepository, StoreError},
};

/// Process-local `BuildingRepository`, used when no `DATABASE_URL` is set.
///
/// Wrapped in `Arc` so it can be cheaply cloned and shared across tasks.
/// Records are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBuildingRepository {
    inner: Arc<RwLock<HashMap<Uuid, Building>>>,
}

impl InMemoryBuildingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BuildingRepository for InMemoryBuildingRepository {
    async fn insert(&self, building: &NewBuilding) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        self.inner
            .write()
            .await
            .insert(id, building.clone().with_id(id));
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Building>, StoreError> {
        Ok(self.inner.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Building>, StoreError> {
        Ok(self.inner.read().await.values().cloned().collect())
    }

    async fn update(&self, building: &Building) -> Result<u64, StoreError> {
        let mut guard = self.inner.write().await;
        let Some(stored) = guard.get_mut(&building.id) else {
            return Ok(0);
        };

        // Same columns as the Postgres UPDATE; name, location and create_time stay put.
        stored.current_temperature = building.current_temperature;
        stored.target_temperature = building.target_temperature;
        stored.status = building.status;
        stored.last_updated = building.last_updated;
        Ok(1)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError> {
        Ok(self.inner.write().await.remove(&id).map_or(0, |_| 1))
    }
}
