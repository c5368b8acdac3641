use crate::error::{Result, SyncError};
#[cfg(test)]
use reqwest::header::HeaderMap;
use reqwest::{header::RETRY_AFTER, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://api.figma.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub enum FigmaAuth {
    PersonalAccessToken(String),
    OAuthToken(String),
}

impl FigmaAuth {
    pub fn from_env() -> Option<Self> {
        if let Ok(token) = std::env::var("FIGMA_TOKEN") {
            if !token.is_empty() {
                return Some(Self::PersonalAccessToken(token));
            }
        }

        if let Ok(token) = std::env::var("FIGMA_OAUTH_TOKEN") {
            if !token.is_empty() {
                return Some(Self::OAuthToken(token));
            }
        }

        None
    }

    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            FigmaAuth::PersonalAccessToken(token) => builder.header("X-FIGMA-TOKEN", token),
            FigmaAuth::OAuthToken(token) => builder.bearer_auth(token),
        }
    }

    #[cfg(test)]
    fn apply_to_header_map(&self, headers: &mut HeaderMap) {
        match self {
            FigmaAuth::PersonalAccessToken(token) => {
                headers.insert("X-FIGMA-TOKEN", token.parse().unwrap());
            }
            FigmaAuth::OAuthToken(token) => {
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    format!("Bearer {token}").parse().unwrap(),
                );
            }
        }
    }
}

/// Read-only Figma REST client used to snapshot nodes for export.
#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: Client,
    auth: FigmaAuth,
    base_url: Url,
}

impl FigmaClient {
    pub fn new(auth: FigmaAuth) -> Result<Self> {
        Self::with_base_url_and_timeout(auth, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url(auth: FigmaAuth, base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_base_url_and_timeout(auth, base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url_and_timeout(
        auth: FigmaAuth,
        base_url: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SyncError::Network)?;

        Ok(Self {
            http,
            auth,
            base_url,
        })
    }

    pub async fn fetch_nodes(
        &self,
        file_key: &str,
        node_ids: &[String],
    ) -> Result<FigmaNodesResponse> {
        validate_node_ids(node_ids)?;

        let mut url = self.endpoint(&format!("/v1/files/{file_key}/nodes"))?;
        url.query_pairs_mut().append_pair("ids", &node_ids.join(","));
        tracing::debug!(file_key, ids = node_ids.len(), "fetching figma nodes");
        let req = self.auth.apply(self.http.get(url));
        self.send_json(req).await
    }

    /// Node documents for `node_ids`, in request order.
    pub async fn fetch_selection(&self, file_key: &str, node_ids: &[String]) -> Result<Vec<Value>> {
        let mut response = self.fetch_nodes(file_key, node_ids).await?;
        node_ids
            .iter()
            .map(|id| {
                response
                    .nodes
                    .remove(id)
                    .flatten()
                    .map(|container| container.document)
                    .ok_or_else(|| SyncError::figma_api(None, format!("node {id} not found")))
            })
            .collect()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(SyncError::InvalidUrl)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(SyncError::Network)?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            return serde_json::from_str(&body).map_err(SyncError::Serialization);
        }

        Err(SyncError::figma_api(
            Some(status),
            error_message(status, &body, retry_after.as_deref()),
        ))
    }
}

fn validate_node_ids(node_ids: &[String]) -> Result<()> {
    if node_ids.is_empty() {
        return Err(SyncError::Config(
            "node_ids cannot be empty when fetching nodes from Figma".into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct FigmaNodesResponse {
    #[serde(default)]
    pub name: Option<String>,
    /// Unknown ids map to `null`.
    #[serde(default)]
    pub nodes: HashMap<String, Option<FigmaNodeContainer>>,
}

#[derive(Debug, Deserialize)]
pub struct FigmaNodeContainer {
    pub document: Value,
    #[serde(default)]
    pub components: Option<Value>,
    #[serde(default)]
    pub styles: Option<Value>,
}

fn error_message(status: StatusCode, body: &str, retry_after: Option<&str>) -> String {
    let fallback = format!("Figma API returned status {}", status.as_u16());
    let parsed = serde_json::from_str::<Value>(body).ok();
    let from_body = parsed
        .as_ref()
        .and_then(|value| value.get("err").or_else(|| value.get("error")))
        .and_then(Value::as_str)
        .map(str::to_owned);

    match (status, retry_after, from_body) {
        (StatusCode::TOO_MANY_REQUESTS, Some(retry), Some(msg)) => {
            format!("{msg} (rate limited, retry after {retry}s)")
        }
        (StatusCode::TOO_MANY_REQUESTS, Some(retry), None) => {
            format!("rate limited by Figma API, retry after {retry}s")
        }
        (_, _, Some(msg)) => msg,
        _ => fallback,
    }
}
