use std::time::Duration;

use async_trait::async_trait;

use catalog_core::Resource;

use super::peer::{PeerCall, PeerClient, PeerError, PeerMethod};

/// Root URL of every peer service, e.g. `http://localhost:8001`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerUrls {
    pub products: String,
    pub suppliers: String,
    pub categories: String,
    pub images: String,
}

impl PeerUrls {
    pub fn base_url(&self, resource: Resource) -> &str {
        let raw = match resource {
            Resource::Products => &self.products,
            Resource::Suppliers => &self.suppliers,
            Resource::Categories => &self.categories,
            Resource::Images => &self.images,
        };
        raw.trim_end_matches('/')
    }
}

/// Peer client speaking HTTP/JSON through a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpPeerClient {
    http: reqwest::Client,
    urls: PeerUrls,
}

impl HttpPeerClient {
    /// Every call is bounded by `timeout` (connect + response).
    pub fn new(urls: PeerUrls, timeout: Duration) -> Result<Self, PeerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PeerError::Transport(format!("failed to build http client: {e}")))?;
        Ok(Self { http, urls })
    }

    pub fn url(&self, call: &PeerCall) -> String {
        format!("{}/{}", self.urls.base_url(call.target()), call.path())
    }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
    async fn send(&self, call: &PeerCall) -> Result<(), PeerError> {
        let url = self.url(call);
        let request = match call.method() {
            PeerMethod::Post => self.http.post(&url),
            PeerMethod::Delete => self.http.delete(&url),
            PeerMethod::Patch => self.http.patch(&url),
        };
        let request = match call.body() {
            Some(body) => request.json(&body),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| PeerError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(PeerError::Status {
            status: status.as_u16(),
            body,
        })
    }

    fn locate(&self, call: &PeerCall) -> String {
        self.url(call)
    }
}
