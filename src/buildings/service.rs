use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{error::BuildingError, status::determine_status};
use crate::db::{
    models::{Building, NewBuilding},
    repository::BuildingRepository,
};

/// Input for [`BuildingService::create`].
///
/// Every field is optional so that a missing value can be reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default)]
pub struct CreateBuilding {
    pub name: Option<String>,
    pub location: Option<String>,
    pub current_temperature: Option<f64>,
    pub target_temperature: Option<f64>,
}

/// Owns the lifecycle of `Building` records and keeps each record's status in
/// step with its temperatures.
///
/// Every call maps to exactly one repository call (plus the lookup in
/// `update_target_temperature`). Store errors are passed through untouched.
#[derive(Clone)]
pub struct BuildingService {
    repo: Arc<dyn BuildingRepository>,
}

impl BuildingService {
    pub fn new(repo: Arc<dyn BuildingRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateBuilding) -> Result<Building, BuildingError> {
        let name = require_text(input.name, "Building name")?;
        let location = require_text(input.location, "Building location")?;
        let current = require_temperature(input.current_temperature, "Current temperature")?;
        let target = require_temperature(input.target_temperature, "Target temperature")?;

        let now = now();
        let new = NewBuilding {
            name,
            location,
            current_temperature: current,
            target_temperature: target,
            status: determine_status(current, target),
            last_updated: now,
            create_time: now,
        };

        let id = self.repo.insert(&new).await?;
        let building = new.with_id(id);

        info!(
            building_id = %building.id,
            current_temperature = building.current_temperature,
            target_temperature = building.target_temperature,
            status = %building.status,
            "Building created"
        );
        Ok(building)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Building>, BuildingError> {
        let building = self.repo.find_by_id(id).await?;
        debug!(building_id = %id, found = building.is_some(), "Building lookup");
        Ok(building)
    }

    /// Order is whatever the store yields.
    pub async fn list_all(&self) -> Result<Vec<Building>, BuildingError> {
        let buildings = self.repo.find_all().await?;
        debug!(count = buildings.len(), "Listed buildings");
        Ok(buildings)
    }

    /// Sets a new target temperature and re-derives the status from the
    /// stored current temperature.
    ///
    /// Returns `Ok(None)` without writing anything when `id` is unknown, and
    /// also when the record disappears before the write lands.
    pub async fn update_target_temperature(
        &self,
        id: Uuid,
        target: f64,
    ) -> Result<Option<Building>, BuildingError> {
        let target = require_temperature(Some(target), "Target temperature")?;

        let Some(mut building) = self.repo.find_by_id(id).await? else {
            warn!(building_id = %id, "Target temperature update for unknown building");
            return Ok(None);
        };

        building.target_temperature = target;
        building.status = determine_status(building.current_temperature, target);
        building.last_updated = refreshed(building.last_updated);

        if self.repo.update(&building).await? == 0 {
            warn!(building_id = %id, "Building removed before target temperature update");
            return Ok(None);
        }

        info!(
            building_id = %id,
            current_temperature = building.current_temperature,
            target_temperature = target,
            status = %building.status,
            "Target temperature updated"
        );
        Ok(Some(building))
    }

    /// Deleting an unknown id is not an error.
    pub async fn delete(&self, id: Uuid) -> Result<(), BuildingError> {
        let removed = self.repo.delete_by_id(id).await?;
        info!(building_id = %id, removed, "Building deleted");
        Ok(())
    }
}

/// Current time at the microsecond precision Postgres stores.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A fresh `last_updated` value that is strictly later than `previous`, even
/// when the clock has not advanced past it.
fn refreshed(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

fn require_text(value: Option<String>, label: &str) -> Result<String, BuildingError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => {
            warn!(field = label, "Rejected blank field");
            Err(BuildingError::Validation(format!("{label} is required")))
        }
    }
}

fn require_temperature(value: Option<f64>, label: &str) -> Result<f64, BuildingError> {
    match value {
        None => {
            warn!(field = label, "Rejected missing temperature");
            Err(BuildingError::Validation(format!("{label} is required")))
        }
        Some(v) if !v.is_finite() => {
            warn!(field = label, value = %v, "Rejected non-finite temperature");
            Err(BuildingError::Validation(format!(
                "{label} must be a finite number"
            )))
        }
        Some(v) => Ok(v),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::{
        buildings::status::HvacStatus,
        db::{memory::InMemoryBuildingRepository, repository::StoreError},
    };

    /// Counts every call before delegating to an in-memory store.
    #[derive(Default)]
    struct RecordingRepository {
        store: InMemoryBuildingRepository,
        inserts: AtomicUsize,
        reads: AtomicUsize,
        updates: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl RecordingRepository {
        fn writes(&self) -> usize {
            self.inserts.load(Ordering::SeqCst)
                + self.updates.load(Ordering::SeqCst)
                + self.deletes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BuildingRepository for RecordingRepository {
        async fn insert(&self, building: &NewBuilding) -> Result<Uuid, StoreError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            self.store.insert(building).await
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Building>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.store.find_by_id(id).await
        }

        async fn find_all(&self) -> Result<Vec<Building>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.store.find_all().await
        }

        async fn update(&self, building: &Building) -> Result<u64, StoreError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.store.update(building).await
        }

        async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.store.delete_by_id(id).await
        }
    }

    /// Hands out a record and drops it from the store in the same breath, as
    /// if a concurrent delete won the race.
    #[derive(Default)]
    struct VanishingRepository {
        store: InMemoryBuildingRepository,
    }

    #[async_trait]
    impl BuildingRepository for VanishingRepository {
        async fn insert(&self, building: &NewBuilding) -> Result<Uuid, StoreError> {
            self.store.insert(building).await
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Building>, StoreError> {
            let found = self.store.find_by_id(id).await?;
            self.store.delete_by_id(id).await?;
            Ok(found)
        }

        async fn find_all(&self) -> Result<Vec<Building>, StoreError> {
            self.store.find_all().await
        }

        async fn update(&self, building: &Building) -> Result<u64, StoreError> {
            self.store.update(building).await
        }

        async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError> {
            self.store.delete_by_id(id).await
        }
    }

    struct FailingRepository;

    fn offline() -> StoreError {
        StoreError::new("connection refused")
    }

    #[async_trait]
    impl BuildingRepository for FailingRepository {
        async fn insert(&self, _: &NewBuilding) -> Result<Uuid, StoreError> {
            Err(offline())
        }

        async fn find_by_id(&self, _: Uuid) -> Result<Option<Building>, StoreError> {
            Err(offline())
        }

        async fn find_all(&self) -> Result<Vec<Building>, StoreError> {
            Err(offline())
        }

        async fn update(&self, _: &Building) -> Result<u64, StoreError> {
            Err(offline())
        }

        async fn delete_by_id(&self, _: Uuid) -> Result<u64, StoreError> {
            Err(offline())
        }
    }

    fn setup() -> (Arc<RecordingRepository>, BuildingService) {
        let repo = Arc::new(RecordingRepository::default());
        let service = BuildingService::new(repo.clone());
        (repo, service)
    }

    fn request(current: f64, target: f64) -> CreateBuilding {
        CreateBuilding {
            name: Some("Test Building".to_owned()),
            location: Some("Test Location".to_owned()),
            current_temperature: Some(current),
            target_temperature: Some(target),
        }
    }

    fn assert_validation(err: BuildingError, expected: &str) {
        match err {
            BuildingError::Validation(msg) => assert_eq!(msg, expected),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // create
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn create_derives_status_and_stamps_times() {
        let (repo, service) = setup();

        let building = service.create(request(22.0, 24.0)).await.unwrap();

        assert_eq!(building.name, "Test Building");
        assert_eq!(building.location, "Test Location");
        assert_eq!(building.current_temperature, 22.0);
        assert_eq!(building.target_temperature, 24.0);
        assert_eq!(building.status, HvacStatus::Heating);
        assert_eq!(building.last_updated, building.create_time);
        assert_eq!(repo.inserts.load(Ordering::SeqCst), 1);

        let stored = repo.store.find_by_id(building.id).await.unwrap().unwrap();
        assert_eq!(stored, building);
    }

    #[tokio::test]
    async fn create_maintaining_and_cooling() {
        let (_, service) = setup();

        let maintaining = service.create(request(24.0, 24.0)).await.unwrap();
        assert_eq!(maintaining.status, HvacStatus::Maintaining);

        let cooling = service.create(request(26.0, 24.0)).await.unwrap();
        assert_eq!(cooling.status, HvacStatus::Cooling);
        assert_ne!(maintaining.id, cooling.id);
    }

    #[tokio::test]
    async fn create_rejects_blank_text_without_writing() {
        let (repo, service) = setup();

        let mut blank_name = request(22.0, 24.0);
        blank_name.name = Some("   ".to_owned());
        assert_validation(
            service.create(blank_name).await.unwrap_err(),
            "Building name is required",
        );

        let mut blank_location = request(22.0, 24.0);
        blank_location.location = None;
        assert_validation(
            service.create(blank_location).await.unwrap_err(),
            "Building location is required",
        );

        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn create_rejects_missing_or_non_finite_temperatures() {
        let (repo, service) = setup();

        let mut missing = request(22.0, 24.0);
        missing.current_temperature = None;
        assert_validation(
            service.create(missing).await.unwrap_err(),
            "Current temperature is required",
        );

        let mut missing = request(22.0, 24.0);
        missing.target_temperature = None;
        assert_validation(
            service.create(missing).await.unwrap_err(),
            "Target temperature is required",
        );

        assert_validation(
            service.create(request(f64::NAN, 24.0)).await.unwrap_err(),
            "Current temperature must be a finite number",
        );
        assert_validation(
            service.create(request(22.0, f64::INFINITY)).await.unwrap_err(),
            "Target temperature must be a finite number",
        );

        assert_eq!(repo.writes(), 0);
    }

    // -----------------------------------------------------------------------
    // get / list_all
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn get_returns_existing_building() {
        let (repo, service) = setup();
        let created = service.create(request(22.0, 24.0)).await.unwrap();

        let found = service.get(created.id).await.unwrap().unwrap();

        assert_eq!(found, created);
        assert_eq!(repo.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn get_unknown_returns_none() {
        let (_, service) = setup();
        assert!(service.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_all_on_empty_store_is_empty() {
        let (repo, service) = setup();

        assert!(service.list_all().await.unwrap().is_empty());
        assert_eq!(repo.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn list_all_returns_every_building() {
        let (_, service) = setup();
        let a = service.create(request(22.0, 24.0)).await.unwrap();
        let b = service.create(request(26.0, 24.0)).await.unwrap();

        let mut ids: Vec<Uuid> = service
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        ids.sort();
        let mut expected = vec![a.id, b.id];
        expected.sort();

        assert_eq!(ids, expected);
    }

    // -----------------------------------------------------------------------
    // update_target_temperature
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn update_recomputes_status_and_refreshes_timestamp() {
        let (repo, service) = setup();
        let created = service.create(request(22.0, 24.0)).await.unwrap();

        let updated = service
            .update_target_temperature(created.id, 25.0)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.target_temperature, 25.0);
        assert_eq!(updated.current_temperature, 22.0);
        assert_eq!(updated.status, determine_status(22.0, 25.0));
        assert_eq!(updated.create_time, created.create_time);
        assert!(updated.last_updated > created.last_updated);
        assert_eq!(repo.updates.load(Ordering::SeqCst), 1);

        let stored = repo.store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn update_can_move_building_into_maintaining() {
        let (_, service) = setup();
        let created = service.create(request(22.0, 24.0)).await.unwrap();

        let updated = service
            .update_target_temperature(created.id, 22.5)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, HvacStatus::Maintaining);
    }

    #[tokio::test]
    async fn update_unknown_returns_none_without_writing() {
        let (repo, service) = setup();

        let result = service
            .update_target_temperature(Uuid::new_v4(), 25.0)
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn update_of_concurrently_deleted_building_returns_none() {
        let service = BuildingService::new(Arc::new(VanishingRepository::default()));
        let created = service.create(request(22.0, 24.0)).await.unwrap();

        let result = service
            .update_target_temperature(created.id, 25.0)
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_rejects_non_finite_target() {
        let (repo, service) = setup();
        let created = service.create(request(22.0, 24.0)).await.unwrap();

        assert_validation(
            service
                .update_target_temperature(created.id, f64::NAN)
                .await
                .unwrap_err(),
            "Target temperature must be a finite number",
        );
        assert_eq!(repo.updates.load(Ordering::SeqCst), 0);
    }

    // -----------------------------------------------------------------------
    // delete
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn delete_removes_building() {
        let (repo, service) = setup();
        let created = service.create(request(22.0, 24.0)).await.unwrap();

        service.delete(created.id).await.unwrap();

        assert!(service.get(created.id).await.unwrap().is_none());
        assert_eq!(repo.deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn delete_unknown_is_ok() {
        let (repo, service) = setup();

        service.delete(Uuid::new_v4()).await.unwrap();

        assert_eq!(repo.deletes.load(Ordering::SeqCst), 1);
    }

    // -----------------------------------------------------------------------
    // store failures
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn store_errors_propagate() {
        let service = BuildingService::new(Arc::new(FailingRepository));

        assert!(matches!(
            service.create(request(22.0, 24.0)).await,
            Err(BuildingError::Store(_))
        ));
        assert!(matches!(
            service.get(Uuid::new_v4()).await,
            Err(BuildingError::Store(_))
        ));
        assert!(matches!(service.list_all().await, Err(BuildingError::Store(_))));
        assert!(matches!(
            service.update_target_temperature(Uuid::new_v4(), 20.0).await,
            Err(BuildingError::Store(_))
        ));
        assert!(matches!(
            service.delete(Uuid::new_v4()).await,
            Err(BuildingError::Store(_))
        ));
    }

    // -----------------------------------------------------------------------
    // timestamps
    // -----------------------------------------------------------------------

    #[test]
    fn refreshed_is_strictly_later_even_for_future_previous() {
        let ahead = Utc::now() + Duration::seconds(60);
        assert!(refreshed(ahead) > ahead);
    }

    #[test]
    fn now_has_microsecond_precision() {
        assert_eq!(now().timestamp_subsec_nanos() % 1_000, 0);
    }
}
