use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Mensaje genérico que ve el cliente ante cualquier falla del almacén.
pub const STORE_FAILURE_MESSAGE: &str = "Failed to process request";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("mongodb: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("bson: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),
    #[error("upsert on {0} returned no document")]
    MissingAfterUpsert(&'static str),
    #[error("store unavailable: {0}")]
    Unavailable(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum PlantError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    InvalidRequest(String),
}

impl IntoResponse for PlantError {
    fn into_response(self) -> Response {
        match self {
            PlantError::Store(err) => {
                error!(error = %err, "plant store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": STORE_FAILURE_MESSAGE })),
                )
                    .into_response()
            }
            PlantError::InvalidRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}
