//! Core data types shared by the export and import paths.

pub mod design;
pub mod markup;

pub use design::{DesignNode, LayoutMode, NodeKind, Paint, PaintType, RgbaColor};
pub use markup::{DesignData, ParsedElement, StyleMap};
pub use crate::tokens::{DesignTokens, TextStyle};
pub use crate::frame_size::FrameSize;
