#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod models;
pub mod sanitize;
pub mod service;
pub mod store;

pub use auth::{AuthError, DomainPolicy, Identity};
pub use config::{ServerConfig, StoreKind};
pub use error::{PlantError, StoreError};
pub use http::{build_router, AppState};
pub use models::{PlantRecord, WaterRequest, WateringEvent, HISTORY_LIMIT};
pub use service::PlantService;
pub use store::{MemoryPlantStore, MongoPlantStore, PlantStore};
