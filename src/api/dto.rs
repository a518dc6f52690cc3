use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::buildings::{CreateBuilding, HvacStatus};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildingDto {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    /// Degrees Celsius
    pub current_temperature: f64,
    /// Degrees Celsius
    pub target_temperature: f64,
    pub status: HvacStatus,
    pub last_updated: DateTime<Utc>,
    pub create_time: DateTime<Utc>,
}

impl From<crate::db::models::Building> for BuildingDto {
    fn from(b: crate::db::models::Building) -> Self {
        Self {
            id: b.id,
            name: b.name,
            location: b.location,
            current_temperature: b.current_temperature,
            target_temperature: b.target_temperature,
            status: b.status,
            last_updated: b.last_updated,
            create_time: b.create_time,
        }
    }
}

/// Request body for `POST /api/buildings`.
///
/// Every field is optional on the wire so that omissions and nulls come back
/// as readable validation messages.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBuildingRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Degrees Celsius
    pub current_temperature: Option<f64>,
    /// Degrees Celsius
    pub target_temperature: Option<f64>,
}

impl From<CreateBuildingRequest> for CreateBuilding {
    fn from(r: CreateBuildingRequest) -> Self {
        Self {
            name: r.name,
            location: r.location,
            current_temperature: r.current_temperature,
            target_temperature: r.target_temperature,
        }
    }
}

/// Query string for `PUT /api/buildings/{id}/temperature`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemperatureParams {
    pub target_temperature: f64,
}
