use std::path::Path;
use std::time::Duration;

use figsync_lib::export::extract_selection;
use figsync_lib::{
    parse_nodes_source, DesignNode, FigmaAuth, FigmaClient, NodesSource, SceneNode, SyncError,
};
use serde_json::Value;

/// Read a node snapshot: a JSON array of nodes or a single node object.
pub fn read_snapshot(path: &Path) -> Result<Vec<Value>, SyncError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        SyncError::Config(format!("Local file not found: {} ({e})", path.display()))
    })?;
    match serde_json::from_str::<Value>(&raw)? {
        Value::Array(nodes) => Ok(nodes),
        node @ Value::Object(_) => Ok(vec![node]),
        other => Err(SyncError::Config(format!(
            "Node snapshot {} must be a JSON array or object, found {}",
            path.display(),
            json_kind(&other)
        ))),
    }
}

/// Snapshot nodes as documents for the in-memory canvas.
pub fn read_scene(path: &Path) -> Result<Vec<SceneNode>, SyncError> {
    read_snapshot(path)?
        .into_iter()
        .map(|node| serde_json::from_value(node).map_err(SyncError::Serialization))
        .collect()
}

/// Resolve `--nodes` (snapshot file or Figma URL) into extracted node records.
/// `timeout` overrides the Figma client default when set.
pub async fn load_selection(
    value: &str,
    timeout: Option<Duration>,
) -> Result<Vec<DesignNode>, SyncError> {
    let source = parse_nodes_source(value).map_err(|e| SyncError::Config(e.to_string()))?;
    let raw = match source {
        NodesSource::File(path) => {
            tracing::debug!(path = %path.display(), "reading node snapshot");
            read_snapshot(&path)?
        }
        NodesSource::Figma(info) => {
            let auth = FigmaAuth::from_env().ok_or_else(|| {
                SyncError::Config(
                    "FIGMA_TOKEN environment variable is required for Figma inputs".into(),
                )
            })?;
            tracing::info!(file_key = %info.file_key, nodes = info.node_ids.len(), "fetching nodes from Figma");
            let client = match timeout {
                Some(timeout) => {
                    FigmaClient::with_base_url_and_timeout(auth, "https://api.figma.com", timeout)?
                }
                None => FigmaClient::new(auth)?,
            };
            client.fetch_selection(&info.file_key, &info.node_ids).await?
        }
    };
    Ok(extract_selection(&raw))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
