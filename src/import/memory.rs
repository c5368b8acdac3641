//! In-process [`Canvas`] adapter backed by an arena of [`SceneNode`]s.
//!
//! Used by the CLI to preview imports as JSON and by the plugin host when no
//! live design tool is attached.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::canvas::{Canvas, CanvasError, CanvasNode, FontName};
use crate::export::NodeSource;
use crate::types::{LayoutMode, NodeKind, Paint};

/// Smallest width/height a node may be resized to.
const MIN_SIZE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One node of the in-memory document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
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
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<FontName>,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Whether `font_name` was loaded when this node was last borrowed mutably.
    #[serde(skip)]
    font_ready: bool,
}

impl SceneNode {
    fn blank(id: String, kind: NodeKind) -> Self {
        Self {
            id,
            name: String::new(),
            kind,
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            fills: Vec::new(),
            strokes: Vec::new(),
            stroke_weight: None,
            corner_radius: None,
            characters: None,
            font_size: None,
            font_name: None,
            font_weight: None,
            layout_mode: None,
            padding_top: None,
            padding_right: None,
            padding_bottom: None,
            padding_left: None,
            item_spacing: None,
            parent_id: None,
            font_ready: false,
        }
    }

    fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Text properties may only change once the node's font is loaded.
    fn require_font(&self) -> Result<(), CanvasError> {
        match &self.font_name {
            Some(font) if !self.font_ready => Err(CanvasError::FontUnavailable(font.clone())),
            _ => Ok(()),
        }
    }
}

fn finite(property: &'static str, value: f64) -> Result<f64, CanvasError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CanvasError::InvalidValue {
            property,
            value: value.to_string(),
        })
    }
}

impl CanvasNode for SceneNode {
    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn resize(&mut self, width: f64, height: f64) -> Result<(), CanvasError> {
        let width = finite("width", width)?;
        let height = finite("height", height)?;
        if width < MIN_SIZE {
            return Err(CanvasError::InvalidValue {
                property: "width",
                value: width.to_string(),
            });
        }
        if height < MIN_SIZE {
            return Err(CanvasError::InvalidValue {
                property: "height",
                value: height.to_string(),
            });
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<(), CanvasError> {
        self.x = finite("x", x)?;
        self.y = finite("y", y)?;
        Ok(())
    }

    fn set_fills(&mut self, fills: Vec<Paint>) {
        self.fills = fills;
    }

    fn set_strokes(&mut self, strokes: Vec<Paint>) {
        self.stroke_weight = strokes.first().and_then(|s| s.weight);
        self.strokes = strokes;
    }

    fn set_corner_radius(&mut self, radius: f64) {
        self.corner_radius = Some(radius);
    }

    fn set_characters(&mut self, text: &str) -> Result<(), CanvasError> {
        if !self.is_text() {
            return Err(CanvasError::Unsupported("characters"));
        }
        self.require_font()?;
        self.characters = Some(text.to_string());
        Ok(())
    }

    // Frames carry no typography; assignments on them are dropped.
    fn set_font_size(&mut self, size: f64) -> Result<(), CanvasError> {
        let size = finite("fontSize", size)?;
        if self.is_text() {
            self.require_font()?;
            self.font_size = Some(size);
        }
        Ok(())
    }

    fn set_font_weight(&mut self, weight: f64) -> Result<(), CanvasError> {
        let weight = finite("fontWeight", weight)?;
        if self.is_text() {
            self.require_font()?;
            self.font_weight = Some(weight);
        }
        Ok(())
    }
}

impl NodeSource for SceneNode {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn node_type(&self) -> String {
        self.kind.to_string()
    }

    fn x(&self) -> Option<f64> {
        Some(self.x)
    }

    fn y(&self) -> Option<f64> {
        Some(self.y)
    }

    fn width(&self) -> Option<f64> {
        Some(self.width)
    }

    fn height(&self) -> Option<f64> {
        Some(self.height)
    }

    fn fills(&self) -> Vec<Paint> {
        self.fills.clone()
    }

    fn strokes(&self) -> Vec<Paint> {
        self.strokes.clone()
    }

    fn stroke_weight(&self) -> Option<f64> {
        self.stroke_weight
    }

    fn corner_radius(&self) -> Option<f64> {
        self.corner_radius
    }

    fn characters(&self) -> Option<String> {
        self.characters.clone()
    }

    fn font_size(&self) -> Option<f64> {
        self.font_size
    }

    fn font_family(&self) -> Option<String> {
        self.font_name.as_ref().map(|f| f.family.clone())
    }

    fn font_weight(&self) -> Option<f64> {
        self.font_weight
    }

    fn layout_mode(&self) -> Option<LayoutMode> {
        self.layout_mode
    }

    fn padding(&self) -> [Option<f64>; 4] {
        [
            self.padding_top,
            self.padding_right,
            self.padding_bottom,
            self.padding_left,
        ]
    }

    fn item_spacing(&self) -> Option<f64> {
        self.item_spacing
    }
}

/// Arena-backed document with a single page.
#[derive(Debug, Default)]
pub struct MemoryCanvas {
    nodes: Vec<SceneNode>,
    parents: Vec<Option<NodeId>>,
    children: Vec<Vec<NodeId>>,
    page: Vec<NodeId>,
    selection: Vec<NodeId>,
    loaded_fonts: Vec<FontName>,
    missing_fonts: HashSet<FontName>,
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// A canvas whose page holds `nodes`, all of them selected.
    pub fn with_selection(nodes: Vec<SceneNode>) -> Self {
        let mut canvas = Self::new();
        let handles: Vec<NodeId> = nodes.into_iter().map(|n| canvas.insert(n)).collect();
        canvas.selection = handles;
        canvas
    }

    /// Make `font` fail to load, as when it is not installed on the host.
    pub fn without_font(mut self, font: FontName) -> Self {
        self.missing_fonts.insert(font);
        self
    }

    pub fn loaded_fonts(&self) -> &[FontName] {
        &self.loaded_fonts
    }

    /// Top-level nodes of the page, in z-order.
    pub fn page_roots(&self) -> &[NodeId] {
        &self.page
    }

    pub fn children_of(&self, handle: NodeId) -> &[NodeId] {
        self.children
            .get(handle.0)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every node in creation order.
    pub fn snapshot(&self) -> Vec<SceneNode> {
        self.nodes.clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn insert(&mut self, mut node: SceneNode) -> NodeId {
        let handle = NodeId(self.nodes.len());
        if node.id.is_empty() {
            node.id = format!("1:{}", handle.0 + 1);
        }
        node.parent_id = None;
        self.nodes.push(node);
        self.parents.push(None);
        self.children.push(Vec::new());
        self.page.push(handle);
        handle
    }

    fn create(&mut self, kind: NodeKind) -> NodeId {
        let handle = self.insert(SceneNode::blank(String::new(), kind));
        tracing::debug!(node = %handle, "created node");
        handle
    }

    fn check(&self, handle: NodeId) -> Result<(), CanvasError> {
        if handle.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(CanvasError::UnknownNode(handle.to_string()))
        }
    }

    fn detach(&mut self, handle: NodeId) {
        match self.parents[handle.0].take() {
            Some(parent) => self.children[parent.0].retain(|c| *c != handle),
            None => self.page.retain(|c| *c != handle),
        }
        self.nodes[handle.0].parent_id = None;
    }

    fn is_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut current = Some(of);
        while let Some(node) = current {
            if node == candidate {
                return true;
            }
            current = self.parents[node.0];
        }
        false
    }
}

#[async_trait]
impl Canvas for MemoryCanvas {
    type Handle = NodeId;
    type Node = SceneNode;

    fn create_frame(&mut self) -> NodeId {
        self.create(NodeKind::Frame)
    }

    fn create_text(&mut self) -> NodeId {
        let handle = self.create(NodeKind::Text);
        let node = &mut self.nodes[handle.0];
        node.characters = Some(String::new());
        node.font_name = Some(FontName::new("Inter", "Regular"));
        node.font_size = Some(12.0);
        handle
    }

    fn node_mut(&mut self, handle: NodeId) -> Result<&mut SceneNode, CanvasError> {
        self.check(handle)?;
        let node = &mut self.nodes[handle.0];
        node.font_ready = node
            .font_name
            .as_ref()
            .is_some_and(|font| self.loaded_fonts.contains(font));
        Ok(node)
    }

    fn node(&self, handle: NodeId) -> Result<&SceneNode, CanvasError> {
        self.check(handle)?;
        Ok(&self.nodes[handle.0])
    }

    async fn load_font(&mut self, font: &FontName) -> Result<(), CanvasError> {
        tokio::task::yield_now().await;
        if self.missing_fonts.contains(font) {
            return Err(CanvasError::FontUnavailable(font.clone()));
        }
        if !self.loaded_fonts.contains(font) {
            self.loaded_fonts.push(font.clone());
        }
        Ok(())
    }

    fn set_font_name(&mut self, handle: NodeId, font: &FontName) -> Result<(), CanvasError> {
        self.check(handle)?;
        if !self.loaded_fonts.contains(font) {
            return Err(CanvasError::FontUnavailable(font.clone()));
        }
        let node = &mut self.nodes[handle.0];
        if !node.is_text() {
            return Err(CanvasError::Unsupported("fontName"));
        }
        node.font_name = Some(font.clone());
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), CanvasError> {
        self.check(parent)?;
        self.check(child)?;
        if self.is_ancestor(child, parent) {
            return Err(CanvasError::InvalidValue {
                property: "parent",
                value: format!("{child} cannot contain its ancestor {parent}"),
            });
        }
        self.detach(child);
        self.parents[child.0] = Some(parent);
        self.children[parent.0].push(child);
        self.nodes[child.0].parent_id = Some(self.nodes[parent.0].id.clone());
        Ok(())
    }

    fn append_to_page(&mut self, handle: NodeId) -> Result<(), CanvasError> {
        self.check(handle)?;
        self.detach(handle);
        self.page.push(handle);
        Ok(())
    }

    fn focus(&mut self, handles: &[NodeId]) {
        self.selection = handles
            .iter()
            .copied()
            .filter(|h| h.0 < self.nodes.len())
            .collect();
    }

    fn selection(&self) -> Vec<NodeId> {
        self.selection.clone()
    }
}
