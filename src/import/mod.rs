//! Markup-to-design import path.
//!
//! - [`html`] / [`css`] - Scan the fragment and stylesheet
//! - [`color`] - CSS color strings to normalized channels
//! - [`canvas`] - Traits the target document implements
//! - [`memory`] - In-process document used by the CLI and tests
//! - [`builder`] - Creates nodes and applies styles

pub mod builder;
pub mod canvas;
pub mod color;
pub mod css;
pub mod html;
pub mod memory;

pub use builder::{apply_styles, create_nodes_from_code, ImportOptions};
pub use canvas::{Canvas, CanvasError, CanvasNode, FontName};
pub use color::css_color_to_figma;
pub use css::{parse_css_int, parse_css_styles};
pub use html::parse_html_structure;
pub use memory::{MemoryCanvas, NodeId, SceneNode};
