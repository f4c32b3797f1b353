use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::auth::DomainPolicy;
use crate::config::ServerConfig;
use crate::service::PlantService;

mod handlers;
mod middleware;

pub const SIGNIN_PATH: &str = "/auth/signin";
pub const AUTH_ERROR_PATH: &str = "/auth/error";

#[derive(Clone)]
pub struct AppState {
    pub service: PlantService,
    pub policy: Arc<DomainPolicy>,
    pub identity_header: Arc<str>,
}

impl AppState {
    /// Fails when `config` does not validate, so an empty domain never
    /// reaches the identity gate.
    pub fn new(service: PlantService, config: &ServerConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self {
            service,
            policy: Arc::new(DomainPolicy::new(&config.allowed_domain)),
            identity_header: Arc::from(config.identity_header.to_ascii_lowercase()),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let gated = Router::new()
        .route("/", get(handlers::view_handler))
        .route(
            "/api/plant",
            // `get` would also answer HEAD, and a read creates the record.
            get(handlers::read_plant_handler)
                .post(handlers::water_plant_handler)
                .head(handlers::method_not_allowed)
                .fallback(handlers::method_not_allowed),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::require_identity,
        ));

    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route(SIGNIN_PATH, get(handlers::signin_handler))
        .route(AUTH_ERROR_PATH, get(handlers::auth_error_handler))
        .merge(gated)
        .fallback(handlers::not_found_handler)
        .layer(from_fn(middleware::request_tracing))
        .with_state(state)
}
