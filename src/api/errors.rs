use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::buildings::BuildingError;

#[derive(Debug)]
pub struct AppError(pub BuildingError);

impl AppError {
    /// Reports a request the extractors could not decode (bad JSON, query or
    /// path) with the same 400 body as any other validation failure.
    pub fn rejected(message: String) -> Self {
        Self(BuildingError::Validation(message))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BuildingError::Validation(_) => StatusCode::BAD_REQUEST,
            BuildingError::NotFound(_) => StatusCode::NOT_FOUND,
            BuildingError::Store(e) => {
                error!(error = %e, "Store failure while handling request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl<E: Into<BuildingError>> From<E> for AppError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}
