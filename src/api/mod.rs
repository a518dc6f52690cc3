pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{
    routing::{get, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::buildings::BuildingService;
use handlers::ApiDoc;

pub fn router(service: BuildingService) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route(
            "/api/buildings",
            get(handlers::list_buildings).post(handlers::create_building),
        )
        .route(
            "/api/buildings/{id}",
            get(handlers::get_building).delete(handlers::delete_building),
        )
        .route(
            "/api/buildings/{id}/temperature",
            put(handlers::update_temperature),
        )
        .with_state(service)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
