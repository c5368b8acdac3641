//! HTTP client for the local sync server.
//!
//! Endpoints (all relative to the configured API base URL):
//! - `POST /api/figma/export` - write generated markup into the project
//! - `GET /api/figma/import?page=<name>` - read one page's markup
//! - `GET /api/figma/import-all` - read every known page
//! - `POST /api/figma/sync-config` - persist sync settings
//! - `GET /api/health` - liveness probe

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::error::{Result, SyncError};
use crate::types::DesignData;

/// Current time as RFC 3339 UTC with millisecond precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub target_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_css: Option<String>,
    #[serde(default)]
    pub overwrite: bool,
    pub design_data: DesignData,
    pub timestamp: String,
}

impl ExportRequest {
    pub fn new(
        target_file: impl Into<String>,
        target_css: Option<String>,
        overwrite: bool,
        design_data: DesignData,
    ) -> Self {
        Self {
            target_file: target_file.into(),
            target_css,
            overwrite,
            design_data,
            timestamp: timestamp_now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub files: Option<ExportedFiles>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedFiles {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub css: Option<String>,
}

/// One page's markup as served by the sync server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedPage {
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub design_tokens: Value,
    #[serde(default)]
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportResponse {
    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    css: Option<String>,
    #[serde(default)]
    design_tokens: Value,
    #[serde(default)]
    page: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportAllResponse {
    #[serde(default)]
    pub pages: BTreeMap<String, PageSource>,
    #[serde(default)]
    pub design_tokens: Value,
    #[serde(default)]
    pub total_pages: usize,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSource {
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub file: Option<String>,
}

/// Sync settings as exchanged with the plugin UI and the sync server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    pub localhost_url: String,
    pub api_url: String,
    pub auto_sync: bool,
    pub watch_mode: bool,
    pub sync_colors: bool,
    pub sync_typography: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SyncConfig {
    fn from(config: &Config) -> Self {
        Self {
            localhost_url: config.localhost_url.clone(),
            api_url: config.api_url.clone(),
            auto_sync: config.auto_sync,
            watch_mode: config.watch_mode,
            sync_colors: config.sync_colors,
            sync_typography: config.sync_typography,
            last_sync: None,
        }
    }
}

/// Partial settings update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localhost_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_sync: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_colors: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_typography: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
}

impl SyncConfig {
    pub fn merge(&mut self, patch: SyncConfigPatch) {
        if let Some(v) = patch.localhost_url {
            self.localhost_url = v;
        }
        if let Some(v) = patch.api_url {
            self.api_url = v;
        }
        if let Some(v) = patch.auto_sync {
            self.auto_sync = v;
        }
        if let Some(v) = patch.watch_mode {
            self.watch_mode = v;
        }
        if let Some(v) = patch.sync_colors {
            self.sync_colors = v;
        }
        if let Some(v) = patch.sync_typography {
            self.sync_typography = v;
        }
        if patch.last_sync.is_some() {
            self.last_sync = patch.last_sync;
        }
    }
}

#[derive(Debug, Serialize)]
struct SaveConfigRequest<'a> {
    config: &'a SyncConfig,
    timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

#[derive(Debug, Clone)]
pub struct LocalhostClient {
    http: Client,
    base_url: Url,
}

impl LocalhostClient {
    /// Client without a request timeout.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Endpoints resolve below any path on `base_url` (`http://h/sync` -> `http://h/sync/api/...`).
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Option<Duration>) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(SyncError::Network)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn export_design(&self, request: &ExportRequest) -> Result<ExportResponse> {
        let url = self.endpoint("api/figma/export")?;
        tracing::info!(
            target_file = %request.target_file,
            nodes = request.design_data.nodes.len(),
            "sending export"
        );
        self.send_json(self.http.post(url).json(request)).await
    }

    pub async fn import_page(&self, page: &str) -> Result<ImportedPage> {
        let mut url = self.endpoint("api/figma/import")?;
        url.query_pairs_mut().append_pair("page", page);
        tracing::info!(page, "fetching page");

        let raw: ImportResponse = self.send_json(self.http.get(url)).await?;
        let html = raw
            .html
            .filter(|html| !html.is_empty())
            .ok_or_else(|| SyncError::malformed("No HTML content to import"))?;
        Ok(ImportedPage {
            html,
            css: raw.css.unwrap_or_default(),
            design_tokens: raw.design_tokens,
            page: raw.page.or_else(|| Some(page.to_string())),
        })
    }

    pub async fn import_all(&self) -> Result<ImportAllResponse> {
        let url = self.endpoint("api/figma/import-all")?;
        let response: ImportAllResponse = self.send_json(self.http.get(url)).await?;
        tracing::info!(pages = response.pages.len(), "fetched all pages");
        Ok(response)
    }

    pub async fn save_config(&self, config: &SyncConfig) -> Result<()> {
        let url = self.endpoint("api/figma/sync-config")?;
        let body = SaveConfigRequest {
            config,
            timestamp: timestamp_now(),
        };
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(SyncError::Network)?;
        check_status(&response)?;
        tracing::debug!("sync config saved");
        Ok(())
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let url = self.endpoint("api/health")?;
        self.send_json(self.http.get(url)).await
    }

    /// `path` must be relative so the base path is kept.
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(SyncError::InvalidUrl)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(SyncError::Network)?;
        check_status(&response)?;

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false);
        if !is_json {
            return Err(SyncError::malformed(
                "Expected a JSON response from the sync server",
            ));
        }

        let body = response.text().await.map_err(SyncError::Network)?;
        serde_json::from_str(&body)
            .map_err(|e| SyncError::malformed(format!("Unexpected response body: {e}")))
    }
}

fn check_status(response: &Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        tracing::warn!(status = status.as_u16(), url = %response.url(), "request failed");
        Err(SyncError::http(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::design_tokens;

    #[test]
    fn timestamp_is_rfc3339_utc_with_millis() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'), "{ts}");
        let parsed = chrono::DateTime::parse_from_rfc3339(&ts).unwrap();
        assert_eq!(parsed.timestamp_subsec_nanos() % 1_000_000, 0);
        assert_eq!(ts.split('.').nth(1).map(str::len), Some(4));
    }

    #[test]
    fn export_request_uses_wire_field_names() {
        let request = ExportRequest::new(
            "pages/home.html",
            Some("pages/home.css".into()),
            true,
            DesignData {
                html: "<p></p>".into(),
                css: String::new(),
                nodes: Vec::new(),
                design_tokens: design_tokens(),
            },
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["targetFile"], "pages/home.html");
        assert_eq!(json["targetCss"], "pages/home.css");
        assert_eq!(json["overwrite"], true);
        assert_eq!(json["designData"]["html"], "<p></p>");
        assert!(json["designData"]["designTokens"]["colors"].is_object());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn sync_config_round_trips_camel_case() {
        let config = SyncConfig::default();
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["localhostUrl"], "http://localhost:8000");
        assert_eq!(json["apiUrl"], "http://localhost:8001");
        assert_eq!(json["syncTypography"], true);
        assert!(json.get("lastSync").is_none());
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut config = SyncConfig::default();
        let patch: SyncConfigPatch =
            serde_json::from_value(serde_json::json!({ "autoSync": true, "apiUrl": "http://x:1" }))
                .unwrap();
        config.merge(patch);

        assert!(config.auto_sync);
        assert_eq!(config.api_url, "http://x:1");
        assert!(config.sync_colors);
        assert_eq!(config.localhost_url, "http://localhost:8000");
    }

    #[test]
    fn endpoints_keep_base_path() {
        let client = LocalhostClient::new("http://localhost:8001/sync").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8001/sync/");
        assert_eq!(
            client.endpoint("api/figma/export").unwrap().as_str(),
            "http://localhost:8001/sync/api/figma/export"
        );

        let root = LocalhostClient::new("http://localhost:8001").unwrap();
        assert_eq!(
            root.endpoint("api/health").unwrap().as_str(),
            "http://localhost:8001/api/health"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            LocalhostClient::new("not a url"),
            Err(SyncError::InvalidUrl(_))
        ));
    }
}
