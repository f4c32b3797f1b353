use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, warn, Instrument};

use super::{AppState, AUTH_ERROR_PATH, SIGNIN_PATH};
use crate::auth::AuthError;

pub(crate) async fn request_tracing(request: Request<Body>, next: Next) -> Response {
    let span = tracing::info_span!(
        "http.request",
        method = %request.method(),
        route = %request.uri().path(),
    );
    async move {
        let response = next.run(request).await;
        debug!(status = response.status().as_u16(), "request finished");
        response
    }
    .instrument(span)
    .await
}

/// Lets a request through only with an identity from the allowed domain.
/// Page routes are redirected; API routes get a JSON error.
pub(crate) async fn require_identity(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let is_api = request.uri().path().starts_with("/api/");
    match state
        .policy
        .authorize_headers(request.headers(), &state.identity_header)
    {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(AuthError::Unauthenticated) if is_api => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "authentication required" })),
        )
            .into_response(),
        Err(AuthError::Unauthenticated) => Redirect::to(SIGNIN_PATH).into_response(),
        Err(AuthError::AccessDenied(email)) => {
            warn!(%email, domain = state.policy.domain(), "access denied");
            if is_api {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "access restricted to organization accounts" })),
                )
                    .into_response()
            } else {
                Redirect::to(&format!("{AUTH_ERROR_PATH}?error=AccessDenied")).into_response()
            }
        }
    }
}
