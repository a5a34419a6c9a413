use std::time::Duration;

use futures_util::StreamExt;
use ghostwriter_core::{
    Action, ArticleRequest, ArticleResponse, ContentDetail, ListKind, ListQuery, ListResult,
    Metrics,
};
use ghostwriter_logging::{gw_debug, gw_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

use crate::decode::{decode_json, decode_list};
use crate::routes::{action_route, article_route, detail_route, list_route, metrics_route, Route};
use crate::{FailureKind, FetchError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// The dashboard's view of the Ghostwriter REST API.
///
/// Every call is a single attempt. Failures come back as [`FetchError`]
/// values and never panic.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn fetch_list(&self, kind: ListKind, query: &ListQuery)
        -> Result<ListResult, FetchError>;

    async fn fetch_detail(&self, id: &str) -> Result<ContentDetail, FetchError>;

    async fn fetch_metrics(&self) -> Result<Metrics, FetchError>;

    /// Returns once the backend acknowledged the action with a 2xx status.
    async fn dispatch(&self, action: Action, target_id: &str) -> Result<(), FetchError>;

    async fn generate_article(
        &self,
        request: &ArticleRequest,
    ) -> Result<ArticleResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    base_url: Url,
    client: reqwest::Client,
    max_bytes: u64,
}

impl ReqwestBackend {
    pub fn new(settings: ApiSettings) -> Result<Self, FetchError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidRequest, err.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(FetchError::new(
                FailureKind::InvalidRequest,
                format!("unsupported scheme {}", base_url.scheme()),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            base_url,
            client,
            max_bytes: settings.max_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get(&self, route: &Route) -> Result<Vec<u8>, FetchError> {
        let url = route.to_url(&self.base_url)?;
        gw_debug!("GET {}", url);
        let request = self.client.get(url).header(ACCEPT, "application/json");
        self.send(request).await
    }

    async fn post(&self, route: &Route, body: Option<Vec<u8>>) -> Result<Vec<u8>, FetchError> {
        let url = route.to_url(&self.base_url)?;
        gw_debug!("POST {}", url);
        let mut request = self.client.post(url).header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }
        self.send(request).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, FetchError> {
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            gw_warn!("{} answered {}", response.url(), status);
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(self.too_large(Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(self.too_large(Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    fn too_large(&self, actual: Option<u64>) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.max_bytes,
                actual,
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn fetch_list(
        &self,
        kind: ListKind,
        query: &ListQuery,
    ) -> Result<ListResult, FetchError> {
        let bytes = self.get(&list_route(kind, query)).await?;
        Ok(decode_list(kind, query, &bytes)?)
    }

    async fn fetch_detail(&self, id: &str) -> Result<ContentDetail, FetchError> {
        let bytes = self.get(&detail_route(id)).await?;
        Ok(decode_json(&bytes)?)
    }

    async fn fetch_metrics(&self) -> Result<Metrics, FetchError> {
        let bytes = self.get(&metrics_route()).await?;
        Ok(decode_json(&bytes)?)
    }

    async fn dispatch(&self, action: Action, target_id: &str) -> Result<(), FetchError> {
        let (route, body) = action_route(action, target_id);
        let body = body.map(|body| serialize(&body)).transpose()?;
        self.post(&route, body).await.map(|_| ())
    }

    async fn generate_article(
        &self,
        request: &ArticleRequest,
    ) -> Result<ArticleResponse, FetchError> {
        let body = serialize(request)?;
        let bytes = self.post(&article_route(), Some(body)).await?;
        Ok(decode_json(&bytes)?)
    }
}

fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, FetchError> {
    serde_json::to_vec(value)
        .map_err(|err| FetchError::new(FailureKind::InvalidRequest, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
