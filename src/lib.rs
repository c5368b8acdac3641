//! Figma Localhost Sync Library
//!
//! Two-way translation between design-tool node trees and flat HTML/CSS,
//! plus the plumbing that moves the result to and from a local sync server.
//!
//! # Module Overview
//!
//! - [`export`] - Node extraction and HTML/CSS generation
//! - [`import`] - HTML/CSS parsing and node creation on a [`Canvas`]
//! - [`tokens`] - The fixed design-token bundle shipped with every export
//! - [`localhost_client`] - HTTP client for the sync server
//! - [`host`] - Plugin message dispatcher
//! - [`figma_client`] - Figma REST access for node snapshots
//! - [`config`] - Configuration file support
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use figsync_lib::{create_nodes_from_code, ImportOptions, MemoryCanvas};
//!
//! # async fn example() {
//! let mut canvas = MemoryCanvas::new();
//! let created = create_nodes_from_code(
//!     &mut canvas,
//!     r#"<div class="box"></div>"#,
//!     ".box { left: 10px; top: 20px; width: 30px; height: 40px; }",
//!     None,
//!     &ImportOptions::default(),
//! )
//! .await;
//! assert_eq!(created.len(), 1);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod figma_client;
pub mod frame_size;
pub mod host;
pub mod import;
pub mod localhost_client;
pub mod output;
pub mod resource;
pub mod tokens;
pub mod types;

pub use config::Config;
pub use error::{ErrorCategory, ErrorPayload, Result, SyncError};
pub use export::{
    class_name, color_to_css, extract_node_data, extract_selection, generate_css,
    generate_design_data, generate_html, NodeSource,
};
pub use figma_client::{FigmaAuth, FigmaClient, FigmaNodesResponse};
pub use frame_size::FrameSize;
pub use host::{HostMessage, Notifier, PluginHost, PluginMessage};
pub use import::{
    apply_styles, create_nodes_from_code, css_color_to_figma, parse_css_styles,
    parse_html_structure, Canvas, CanvasError, CanvasNode, ImportOptions, MemoryCanvas,
    SceneNode,
};
pub use localhost_client::{
    ExportRequest, ExportResponse, ImportAllResponse, ImportedPage, LocalhostClient, SyncConfig,
};
pub use output::{ErrorOutput, SyncOutput, SYNC_OUTPUT_VERSION};
pub use resource::{parse_nodes_source, FigmaInfo, NodesSource};
pub use tokens::{design_tokens, DesignTokens};
pub use types::{DesignData, DesignNode, NodeKind, Paint, ParsedElement, RgbaColor, StyleMap};
