//! Design-tool node records captured on export.
//!
//! This module contains:
//! - [`DesignNode`] - One visual element copied out of the design tool
//! - [`NodeKind`] - Element kind (frame, text, rectangle, ...)
//! - [`Paint`] / [`RgbaColor`] - Fill and stroke descriptions
//! - [`LayoutMode`] - Auto-layout direction

use serde::{Deserialize, Serialize};
use std::fmt;

/// One visual element captured from the design tool.
///
/// Serialized with the same field names the export payload uses for `nodes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignNode {
    /// Identifier, unique within one export batch (e.g. "1:2")
    pub id: String,
    /// Display name shown in the design tool's layer list
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<Vec<Paint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strokes: Option<Vec<Paint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_mode: Option<LayoutMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_spacing: Option<f64>,
}

impl DesignNode {
    /// A bare record with only identity, kind and zeroed geometry.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            fills: None,
            strokes: None,
            corner_radius: None,
            text: None,
            font_size: None,
            font_family: None,
            font_weight: None,
            layout_mode: None,
            padding_top: None,
            padding_right: None,
            padding_bottom: None,
            padding_left: None,
            item_spacing: None,
        }
    }
}

/// Element kind, serialized as the design tool's upper-case type string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Frame,
    Group,
    Component,
    Text,
    Rectangle,
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Frame => "FRAME",
            NodeKind::Group => "GROUP",
            NodeKind::Component => "COMPONENT",
            NodeKind::Text => "TEXT",
            NodeKind::Rectangle => "RECTANGLE",
            NodeKind::Other(other) => other,
        }
    }

    /// Frames, groups and components render as `<div>` wrappers.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Frame | NodeKind::Group | NodeKind::Component)
    }
}

impl From<&str> for NodeKind {
    fn from(value: &str) -> Self {
        match value {
            "FRAME" => NodeKind::Frame,
            "GROUP" => NodeKind::Group,
            "COMPONENT" => NodeKind::Component,
            "TEXT" => NodeKind::Text,
            "RECTANGLE" => NodeKind::Rectangle,
            other => NodeKind::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        NodeKind::from(value.as_str())
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fill or stroke paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: PaintType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<RgbaColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Stroke weight in pixels (strokes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Paint {
    pub fn solid(color: RgbaColor) -> Self {
        Self {
            paint_type: PaintType::Solid,
            color: Some(color),
            opacity: None,
            weight: None,
        }
    }

    pub fn is_solid_with_color(&self) -> bool {
        self.paint_type == PaintType::Solid && self.color.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    Solid,
    #[serde(alias = "GRADIENT_LINEAR", alias = "GRADIENT_RADIAL", alias = "GRADIENT_ANGULAR", alias = "GRADIENT_DIAMOND")]
    Gradient,
    Image,
}

impl PaintType {
    /// Maps a design-tool paint type string; unknown kinds are treated as images.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "SOLID" => PaintType::Solid,
            v if v.starts_with("GRADIENT") => PaintType::Gradient,
            _ => PaintType::Image,
        }
    }
}

/// RGBA color with channels in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbaColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
}

impl RgbaColor {
    pub const BLACK: RgbaColor = RgbaColor::rgb(0.0, 0.0, 0.0);
    pub const WHITE: RgbaColor = RgbaColor::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: None }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a: Some(a) }
    }

    /// Same channels without alpha.
    pub fn opaque(self) -> Self {
        Self { a: None, ..self }
    }
}

/// Auto-layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    Horizontal,
    Vertical,
    None,
}

impl LayoutMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "HORIZONTAL" => Some(LayoutMode::Horizontal),
            "VERTICAL" => Some(LayoutMode::Vertical),
            "NONE" => Some(LayoutMode::None),
            _ => None,
        }
    }
}
