use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use utoipa::OpenApi;
use uuid::Uuid;

use super::{
    dto::{BuildingDto, CreateBuildingRequest, UpdateTemperatureParams},
    errors::AppError,
};
use crate::buildings::{BuildingError, BuildingService, HvacStatus};

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Register a building. Its HVAC status is derived from the two temperatures.
#[utoipa::path(
    post,
    path = "/api/buildings",
    request_body = CreateBuildingRequest,
    responses(
        (status = 200, description = "Building created", body = BuildingDto),
        (status = 400, description = "Missing or invalid field"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "buildings"
)]
pub async fn create_building(
    State(service): State<BuildingService>,
    body: Result<Json<CreateBuildingRequest>, JsonRejection>,
) -> Result<Json<BuildingDto>, AppError> {
    let Json(request) = body.map_err(|e| AppError::rejected(e.body_text()))?;
    let building = service.create(request.into()).await?;
    Ok(Json(building.into()))
}

/// Fetch a single building.
#[utoipa::path(
    get,
    path = "/api/buildings/{id}",
    params(
        ("id" = Uuid, Path, description = "Building ID"),
    ),
    responses(
        (status = 200, description = "Building", body = BuildingDto),
        (status = 400, description = "Malformed building ID"),
        (status = 404, description = "No building with this ID"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "buildings"
)]
pub async fn get_building(
    State(service): State<BuildingService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<BuildingDto>, AppError> {
    let Path(id) = path.map_err(|e| AppError::rejected(e.body_text()))?;
    let building = service
        .get(id)
        .await?
        .ok_or(BuildingError::NotFound(id))?;
    Ok(Json(building.into()))
}

/// Fetch every building. No particular order is guaranteed.
#[utoipa::path(
    get,
    path = "/api/buildings",
    responses(
        (status = 200, description = "All buildings", body = Vec<BuildingDto>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "buildings"
)]
pub async fn list_buildings(
    State(service): State<BuildingService>,
) -> Result<Json<Vec<BuildingDto>>, AppError> {
    let buildings = service.list_all().await?;
    Ok(Json(buildings.into_iter().map(Into::into).collect()))
}

/// Change a building's target temperature. The status is recomputed against
/// the stored current temperature.
#[utoipa::path(
    put,
    path = "/api/buildings/{id}/temperature",
    params(
        ("id" = Uuid, Path, description = "Building ID"),
        ("targetTemperature" = f64, Query, description = "New target temperature (°C)"),
    ),
    responses(
        (status = 200, description = "Updated building", body = BuildingDto),
        (status = 400, description = "Malformed building ID or target temperature"),
        (status = 404, description = "No building with this ID"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "buildings"
)]
pub async fn update_temperature(
    State(service): State<BuildingService>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<UpdateTemperatureParams>, QueryRejection>,
) -> Result<Json<BuildingDto>, AppError> {
    let Path(id) = path.map_err(|e| AppError::rejected(e.body_text()))?;
    let Query(params) = query.map_err(|e| AppError::rejected(e.body_text()))?;
    let building = service
        .update_target_temperature(id, params.target_temperature)
        .await?
        .ok_or(BuildingError::NotFound(id))?;
    Ok(Json(building.into()))
}

/// Delete a building. Deleting an unknown ID also succeeds.
#[utoipa::path(
    delete,
    path = "/api/buildings/{id}",
    params(
        ("id" = Uuid, Path, description = "Building ID"),
    ),
    responses(
        (status = 200, description = "Building deleted (or already absent)"),
        (status = 400, description = "Malformed building ID"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "buildings"
)]
pub async fn delete_building(
    State(service): State<BuildingService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<(), AppError> {
    let Path(id) = path.map_err(|e| AppError::rejected(e.body_text()))?;
    service.delete(id).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(
        create_building,
        get_building,
        list_buildings,
        update_temperature,
        delete_building,
        health
    ),
    components(schemas(BuildingDto, CreateBuildingRequest, HvacStatus)),
    tags(
        (name = "buildings", description = "Building temperature control endpoints"),
        (name = "system",    description = "System endpoints"),
    ),
    info(
        title = "Building Temperature Control API",
        version = "0.1.0",
        description = "REST API for managing buildings and their HVAC status"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
