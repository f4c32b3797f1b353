use clap::ValueEnum;
use serde::Serialize;
use std::net::SocketAddr;

pub const DEFAULT_ALLOWED_DOMAIN: &str = "identos.ca";
pub const DEFAULT_IDENTITY_HEADER: &str = "x-auth-request-email";
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/arbolitos";
pub const DEFAULT_DATABASE: &str = "office_plant";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub store: StoreKind,
    #[serde(skip_serializing)]
    pub mongo_uri: String,
    pub database: String,
    pub allowed_domain: String,
    pub identity_header: String,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            store: StoreKind::Mongo,
            mongo_uri: DEFAULT_MONGO_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            allowed_domain: DEFAULT_ALLOWED_DOMAIN.to_string(),
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
            log_json: false,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.allowed_domain.trim().trim_start_matches('@').is_empty() {
            return Err("allowed domain must not be empty".to_string());
        }
        if axum::http::HeaderName::from_bytes(self.identity_header.as_bytes()).is_err() {
            return Err(format!(
                "invalid identity header name: {}",
                self.identity_header
            ));
        }
        if self.store == StoreKind::Mongo && self.database.trim().is_empty() {
            return Err("mongo database name must not be empty".to_string());
        }
        Ok(())
    }
}
