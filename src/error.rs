use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No nodes selected")]
    EmptySelection,

    #[error("Export rejected: {0}")]
    ExportRejected(String),

    #[error("Figma API error (status: {status:?}): {message}")]
    FigmaApi {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    pub fn figma_api(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        SyncError::FigmaApi {
            status,
            message: message.into(),
        }
    }

    pub fn http(status: StatusCode) -> Self {
        SyncError::Http {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        SyncError::MalformedResponse(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            SyncError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            SyncError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Make sure the sync server is running (default http://localhost:8001) and reachable.",
            ),
            SyncError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify URL/format (e.g., http://localhost:8001).",
            ),
            SyncError::Http { status, message } => ErrorPayload::new(
                ErrorCategory::Api,
                format!("HTTP {}: {}", status, message),
                if *status == 404 {
                    "Check the page name and that the sync server exposes /api/figma/*."
                } else {
                    "Check the sync server logs; retry once it responds with 2xx."
                },
            ),
            SyncError::MalformedResponse(msg) => ErrorPayload::new(
                ErrorCategory::Response,
                msg.to_string(),
                "The server answered with an unexpected body; check its version and content type.",
            ),
            SyncError::EmptySelection => ErrorPayload::new(
                ErrorCategory::Selection,
                self.to_string(),
                "Select at least one node (or pass a non-empty --nodes snapshot) before exporting.",
            ),
            SyncError::ExportRejected(msg) => ErrorPayload::new(
                ErrorCategory::Api,
                msg.to_string(),
                "Check the target file path and pass --overwrite if it already exists.",
            ),
            SyncError::FigmaApi { status, message } => ErrorPayload::new(
                ErrorCategory::Figma,
                format!("Figma API error (status {:?}): {}", status, message),
                "Check FIGMA_TOKEN/URL and rate limits; retry after waiting.",
            ),
            SyncError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check JSON inputs; run with --verbose for details.",
            ),
            SyncError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("figma_token") || lower.contains("figma token") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Set FIGMA_TOKEN (or FIGMA_OAUTH_TOKEN) before reading nodes from Figma.",
                    )
                } else if lower.contains("node-id") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Include a Figma node-id in the URL (e.g., ?node-id=1-2).",
                    )
                } else if lower.contains("file key") && lower.contains("figma") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use a Figma URL with a file key: https://www.figma.com/file/<FILE_KEY>/...?node-id=1-2",
                    )
                } else if lower.contains("file not found") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Verify the file exists; use an absolute path or run from the working directory.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths (e.g., --frame WIDTHxHEIGHT) and the config file.",
                    )
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    Api,
    Selection,
    Response,
    Figma,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_carries_status_text() {
        let err = SyncError::http(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Api);
        assert!(payload.remediation.unwrap_or_default().contains("page name"));
    }

    #[test]
    fn empty_selection_is_its_own_category() {
        let payload = SyncError::EmptySelection.to_payload();
        assert_eq!(payload.category, ErrorCategory::Selection);
        assert_eq!(payload.message, "No nodes selected");
    }

    #[test]
    fn malformed_response_maps_to_response_category() {
        let payload = SyncError::malformed("missing html").to_payload();
        assert_eq!(payload.category, ErrorCategory::Response);
    }

    #[test]
    fn config_payload_uses_default_remediation_for_other_messages() {
        let err = SyncError::Config("Some other config issue".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("Check flags/paths"),
            "expected default remediation for generic config errors"
        );
    }

    #[test]
    fn config_payload_includes_figma_token_remediation() {
        let err = SyncError::Config("FIGMA_TOKEN environment variable is required".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("FIGMA_TOKEN"),
            "expected FIGMA token remediation, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_includes_node_id_hint() {
        let err = SyncError::Config("Figma URL missing node-id in query".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.to_ascii_lowercase().contains("node-id"),
            "expected node-id remediation, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_includes_file_not_found_hint() {
        let err = SyncError::Config("Local file not found: nodes.json".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.to_ascii_lowercase().contains("absolute path"),
            "expected file path remediation, got: {remediation}"
        );
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&ErrorCategory::Selection).unwrap();
        assert_eq!(json, "\"selection\"");
    }
}
