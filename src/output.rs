use crate::error::ErrorPayload;
use crate::import::SceneNode;
use crate::localhost_client::{ExportedFiles, SyncConfig};
use crate::tokens::DesignTokens;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Schema version for output payloads.
pub const SYNC_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum SyncOutput {
    Generate(GenerateOutput),
    Export(ExportOutput),
    Import(ImportOutput),
    Tokens(TokensOutput),
    Health(HealthOutput),
    SaveConfig(ConfigOutput),
    Watch(WatchOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutput {
    pub version: String,
    /// Snapshot path or Figma URL the nodes were read from
    pub source: String,
    pub nodes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutput {
    pub version: String,
    pub source: String,
    pub target_file: String,
    pub nodes: usize,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<ExportedFiles>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutput {
    pub version: String,
    pub pages: Vec<ImportedPageSummary>,
    pub total_elements: usize,
    /// Every node of the resulting document, in creation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scene: Vec<SceneNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedPageSummary {
    pub page: String,
    pub frame: String,
    pub elements: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensOutput {
    pub version: String,
    pub tokens: DesignTokens,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthOutput {
    pub version: String,
    pub api_url: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOutput {
    pub version: String,
    pub api_url: String,
    pub config: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchOutput {
    pub version: String,
    pub target_file: String,
    pub cycles: u64,
    pub failures: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}
