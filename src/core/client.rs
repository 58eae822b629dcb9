//! HTTP client for the jukebox server

use crate::error::{JukeboxError, Result};
use crate::types::{AddRequest, AddResponse, Command, Snapshot};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

const CLIENT_AGENT: &str = concat!("jukebox-remote/", env!("CARGO_PKG_VERSION"));

/// Thin typed wrapper over the server's JSON endpoints
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(JukeboxError::InvalidConfig(format!(
                "server URL must start with http:// or https://, got {:?}",
                base_url
            )));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// `GET /queue`: the full snapshot, no caching
    pub async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let url = self.url("/queue");
        let response = self
            .http
            .get(&url)
            .header(USER_AGENT, CLIENT_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(JukeboxError::Network(format!(
                "HTTP {}: {}",
                response.status(),
                url
            )));
        }

        let body = response.text().await?;
        parse_body("/queue", &body)
    }

    /// `POST /add`
    ///
    /// Failure statuses still carry a JSON body, so the body decides.
    pub async fn add(&self, request: &AddRequest) -> Result<AddResponse> {
        self.post("/add", Some(request)).await
    }

    /// `POST` one of the playback commands; the answer only has to be JSON
    pub async fn send(&self, command: &Command) -> Result<serde_json::Value> {
        self.post(command.endpoint(), command.payload().as_ref()).await
    }

    async fn post<B, R>(&self, endpoint: &str, body: Option<&B>) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let mut request = self
            .http
            .post(self.url(endpoint))
            .header(USER_AGENT, CLIENT_AGENT)
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(endpoint, %status, "command answered");

        parse_body(endpoint, &text)
    }
}

/// Decode a response body, naming the endpoint on failure
fn parse_body<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| JukeboxError::MalformedResponse {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}
