use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{BulletRequest, ScoredBullet},
    protocol::{BulletResponse, HealthResponse, BULLET_PATH, HEALTH_PATH},
};
use tracing::{debug, info};
use url::Url;

use crate::error::{ClientError, Result};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// The remote suggestion service.
#[async_trait]
pub trait BulletApi: Send + Sync {
    /// Issues exactly one generation request. No retries.
    async fn generate(&self, request: &BulletRequest) -> Result<Vec<ScoredBullet>>;
    async fn health(&self) -> Result<HealthResponse>;
}

pub struct HttpBulletApi {
    http: Client,
    base_url: String,
}

impl HttpBulletApi {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;
        Self::with_client(base_url, http)
    }

    pub fn with_client(base_url: &str, http: Client) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Remote { status })
    }
}

#[async_trait]
impl BulletApi for HttpBulletApi {
    async fn generate(&self, request: &BulletRequest) -> Result<Vec<ScoredBullet>> {
        let url = self.endpoint(BULLET_PATH);
        debug!(%url, has_keyword = request.keyword.is_some(), "requesting bullet suggestions");
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(ClientError::from_request)?;
        let body: BulletResponse = check_status(response)?
            .json()
            .await
            .map_err(ClientError::from_request)?;
        info!(count = body.bullet_list.len(), "received bullet suggestions");
        Ok(body.bullet_list)
    }

    async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .http
            .get(self.endpoint(HEALTH_PATH))
            .send()
            .await
            .map_err(ClientError::from_request)?;
        check_status(response)?
            .json()
            .await
            .map_err(ClientError::from_request)
    }
}
