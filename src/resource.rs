use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Where the nodes to export come from.
#[derive(Debug, Clone, PartialEq)]
pub enum NodesSource {
    /// JSON array (or single object) of design-tool nodes on disk
    File(PathBuf),
    /// Nodes fetched through the Figma REST API
    Figma(FigmaInfo),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FigmaInfo {
    pub file_key: String,
    pub node_ids: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ResourceParseError {
    #[error("Invalid URL '{value}': {message}. Hint: include http(s):// and ensure the URL is well-formed.")]
    InvalidUrl { value: String, message: String },
    #[error("Not a Figma URL: '{url}'. Hint: pass a Figma link or a local .json snapshot.")]
    NotFigma { url: String },
    #[error("Figma URL missing file key in '{url}'. Hint: use https://www.figma.com/file/<FILE_KEY>/...?node-id=1-2.")]
    FigmaMissingFileKey { url: String },
    #[error("Figma URL missing node-id in '{url}'.")]
    FigmaMissingNodeId { url: String },
    #[error("Local file not found: {path}. Hint: check the path relative to the current working directory or use an absolute path.")]
    FileNotFound { path: String },
    #[error("Unsupported file extension '{extension}'. Node snapshots must be .json files.")]
    UnsupportedExtension { extension: String },
}

pub fn parse_nodes_source(value: &str) -> Result<NodesSource, ResourceParseError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        parse_figma_url(value).map(NodesSource::Figma)
    } else {
        parse_local_snapshot(value)
    }
}

fn parse_figma_url(value: &str) -> Result<FigmaInfo, ResourceParseError> {
    let url = Url::parse(value).map_err(|e| ResourceParseError::InvalidUrl {
        value: value.to_string(),
        message: e.to_string(),
    })?;

    let host = url.host_str().unwrap_or("");
    if !host.contains("figma.com") {
        return Err(ResourceParseError::NotFigma {
            url: value.to_string(),
        });
    }

    let path_segments: Vec<&str> = url.path_segments().map(|c| c.collect()).unwrap_or_default();

    let file_key = path_segments
        .iter()
        .position(|&s| s == "file" || s == "design")
        .and_then(|i| path_segments.get(i + 1))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| ResourceParseError::FigmaMissingFileKey {
            url: value.to_string(),
        })?;

    let node_ids: Vec<String> = url
        .query_pairs()
        .filter(|(k, _)| k == "node-id")
        .flat_map(|(_, v)| {
            v.split(',')
                .map(|id| id.trim().replace('-', ":"))
                .filter(|id| !id.is_empty())
                .collect::<Vec<_>>()
        })
        .collect();
    if node_ids.is_empty() {
        return Err(ResourceParseError::FigmaMissingNodeId {
            url: value.to_string(),
        });
    }

    Ok(FigmaInfo { file_key, node_ids })
}

fn parse_local_snapshot(value: &str) -> Result<NodesSource, ResourceParseError> {
    let path = Path::new(value);

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if extension != "json" {
        return Err(ResourceParseError::UnsupportedExtension {
            extension: if extension.is_empty() {
                "no extension".to_string()
            } else {
                extension
            },
        });
    }

    let is_file = fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
    if !is_file {
        return Err(ResourceParseError::FileNotFound {
            path: path.to_string_lossy().into_owned(),
        });
    }

    Ok(NodesSource::File(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::Builder;

    fn temp_file_with_extension(ext: &str) -> tempfile::NamedTempFile {
        Builder::new()
            .suffix(&format!(".{}", ext))
            .tempfile()
            .expect("create temp file")
    }

    #[test]
    fn test_parse_figma_url() {
        let url = "https://www.figma.com/file/ABC123/My-Design?node-id=12-34";
        let NodesSource::Figma(info) = parse_nodes_source(url).unwrap() else {
            panic!("expected figma source");
        };
        assert_eq!(info.file_key, "ABC123");
        assert_eq!(info.node_ids, vec!["12:34".to_string()]);
    }

    #[test]
    fn test_parse_figma_design_url_with_several_nodes() {
        let url = "https://www.figma.com/design/XYZ789/Another?node-id=5-10,6-1";
        let NodesSource::Figma(info) = parse_nodes_source(url).unwrap() else {
            panic!("expected figma source");
        };
        assert_eq!(info.file_key, "XYZ789");
        assert_eq!(info.node_ids, vec!["5:10".to_string(), "6:1".to_string()]);
    }

    #[test]
    fn test_parse_figma_url_no_node_id() {
        let res = parse_nodes_source("https://www.figma.com/file/ABC123/My-Design");
        assert!(matches!(res, Err(ResourceParseError::FigmaMissingNodeId { .. })));
    }

    #[test]
    fn test_parse_figma_url_no_file_key() {
        let res = parse_nodes_source("https://www.figma.com/community?node-id=1-2");
        assert!(matches!(res, Err(ResourceParseError::FigmaMissingFileKey { .. })));
    }

    #[test]
    fn test_non_figma_url_is_rejected() {
        let res = parse_nodes_source("http://localhost:3000/dashboard");
        assert!(matches!(res, Err(ResourceParseError::NotFigma { .. })));
    }

    #[test]
    fn test_parse_local_json() {
        let file = temp_file_with_extension("json");
        let res = parse_nodes_source(file.path().to_str().unwrap()).unwrap();
        assert_eq!(res, NodesSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_parse_unsupported_extension() {
        let file = temp_file_with_extension("png");
        let res = parse_nodes_source(file.path().to_str().unwrap());
        assert!(matches!(
            res,
            Err(ResourceParseError::UnsupportedExtension { extension })
                if extension == "png"
        ));
    }

    #[test]
    fn test_missing_local_snapshot_errors() {
        let res = parse_nodes_source("/tmp/does-not-exist.json");
        assert!(matches!(res, Err(ResourceParseError::FileNotFound { .. })));
    }
}
