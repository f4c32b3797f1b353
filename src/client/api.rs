use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::error::PlantError;
use crate::models::{PlantRecord, WaterRequest};
use crate::service::PlantService;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("{0}")]
    Service(#[from] PlantError),
}

/// What the view-model needs from the record update service.
#[async_trait]
pub trait PlantApi: Send + Sync {
    async fn fetch(&self) -> Result<PlantRecord, ClientError>;
    async fn water(&self, request: WaterRequest) -> Result<PlantRecord, ClientError>;
}

#[async_trait]
impl PlantApi for PlantService {
    async fn fetch(&self) -> Result<PlantRecord, ClientError> {
        Ok(self.read().await?)
    }

    async fn water(&self, request: WaterRequest) -> Result<PlantRecord, ClientError> {
        Ok(self.update(request).await?)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Talks to `/api/plant` over HTTP, forwarding the identity header the way
/// the authenticating proxy would.
#[derive(Clone)]
pub struct HttpPlantApi {
    http: reqwest::Client,
    endpoint: String,
    identity_header: String,
    identity: String,
}

impl HttpPlantApi {
    pub fn new(base_url: &str, identity_header: &str, identity: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/api/plant", base_url.trim_end_matches('/')),
            identity_header: identity_header.to_string(),
            identity: identity.to_string(),
        })
    }

    async fn decode(response: reqwest::Response) -> Result<PlantRecord, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<PlantRecord>().await?);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        };
        Err(ClientError::Server { status, message })
    }
}

#[async_trait]
impl PlantApi for HttpPlantApi {
    async fn fetch(&self) -> Result<PlantRecord, ClientError> {
        let response = self
            .http
            .get(&self.endpoint)
            .header(self.identity_header.as_str(), self.identity.as_str())
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn water(&self, request: WaterRequest) -> Result<PlantRecord, ClientError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(self.identity_header.as_str(), self.identity.as_str())
            .json(&request)
            .send()
            .await?;
        Self::decode(response).await
    }
}
