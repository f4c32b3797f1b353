use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{AppState, SIGNIN_PATH};
use crate::auth::Identity;
use crate::client::{is_watered_at, status_at, water_action_available, WaterStatus};
use crate::error::PlantError;
use crate::format::{display_name, format_watered};
use crate::models::{PlantRecord, WaterRequest};

pub(crate) async fn read_plant_handler(
    State(state): State<AppState>,
) -> Result<Json<PlantRecord>, PlantError> {
    Ok(Json(state.service.read().await?))
}

pub(crate) async fn water_plant_handler(
    State(state): State<AppState>,
    payload: Result<Json<WaterRequest>, JsonRejection>,
) -> Result<Json<PlantRecord>, PlantError> {
    let Json(request) = payload.map_err(|e| PlantError::InvalidRequest(e.body_text()))?;
    Ok(Json(state.service.update(request).await?))
}

pub(crate) async fn method_not_allowed(method: Method) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET, POST")],
        format!("Method {method} Not Allowed"),
    )
        .into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlantView {
    identity: String,
    display_name: String,
    status: WaterStatus,
    status_label: &'static str,
    status_color: &'static str,
    last_watered_label: String,
    watered: bool,
    can_water: bool,
    plant: PlantRecord,
}

pub(crate) async fn view_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<PlantView>, PlantError> {
    let plant = state.service.read().await?;
    let now = Utc::now();
    let status = status_at(plant.last_watered, now);
    Ok(Json(PlantView {
        display_name: display_name(&identity.email),
        identity: identity.email,
        status,
        status_label: status.label(),
        status_color: status.color(),
        last_watered_label: format_watered(plant.last_watered),
        watered: is_watered_at(&plant, now),
        can_water: water_action_available(&plant, now),
        plant,
    }))
}

pub(crate) async fn healthz_handler() -> &'static str {
    "ok"
}

pub(crate) async fn signin_handler() -> Html<&'static str> {
    Html(
        "<!doctype html><title>Sign in</title>\
         <h1>Office Plants</h1>\
         <p>Sign in with your organization account to continue.</p>",
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthErrorQuery {
    error: Option<String>,
}

pub(crate) async fn auth_error_handler(Query(query): Query<AuthErrorQuery>) -> Response {
    let reason = match query.error.as_deref() {
        Some("AccessDenied") => "This app is restricted to organization accounts.",
        _ => "Sign-in could not be completed.",
    };
    (
        StatusCode::FORBIDDEN,
        Html(format!(
            "<!doctype html><title>Access restricted</title>\
             <h1>Access restricted</h1><p>{reason}</p>\
             <p><a href=\"{SIGNIN_PATH}\">Try again</a></p>"
        )),
    )
        .into_response()
}

pub(crate) async fn not_found_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not found", "home": "/" })),
    )
        .into_response()
}
