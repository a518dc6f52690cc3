use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    models::{Building, NewBuilding},
    repository::{BuildingRepository, StoreError},
};

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::new(e)
    }
}

/// `BuildingRepository` backed by the `buildings` table.
#[derive(Debug, Clone)]
pub struct PgBuildingRepository {
    pool: PgPool,
}

impl PgBuildingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BuildingRepository for PgBuildingRepository {
    async fn insert(&self, building: &NewBuilding) -> Result<Uuid, StoreError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO buildings
                (name, location, current_temperature, target_temperature,
                 status, last_updated, create_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&building.name)
        .bind(&building.location)
        .bind(building.current_temperature)
        .bind(building.target_temperature)
        .bind(building.status)
        .bind(building.last_updated)
        .bind(building.create_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Building>, StoreError> {
        let row = sqlx::query_as::<_, Building>(
            r#"
            SELECT id, name, location,
                   current_temperature, target_temperature,
                   status, last_updated, create_time
            FROM buildings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_all(&self) -> Result<Vec<Building>, StoreError> {
        let rows = sqlx::query_as::<_, Building>(
            r#"
            SELECT id, name, location,
                   current_temperature, target_temperature,
                   status, last_updated, create_time
            FROM buildings
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn update(&self, building: &Building) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE buildings
            SET current_temperature = $2,
                target_temperature  = $3,
                status              = $4,
                last_updated        = $5
            WHERE id = $1
            "#,
        )
        .bind(building.id)
        .bind(building.current_temperature)
        .bind(building.target_temperature)
        .bind(building.status)
        .bind(building.last_updated)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM buildings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
