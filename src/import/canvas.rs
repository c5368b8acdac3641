//! Capability traits for the document the importer writes into.
//!
//! The importer never touches host types directly; a host adapter implements
//! [`Canvas`] and exposes its nodes through [`CanvasNode`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::export::NodeSource;
use crate::types::Paint;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CanvasError {
    #[error("invalid {property} value: {value}")]
    InvalidValue { property: &'static str, value: String },
    #[error("node {0} does not exist")]
    UnknownNode(String),
    #[error("{0} is not supported on this node type")]
    Unsupported(&'static str),
    #[error("font {0} is not available")]
    FontUnavailable(FontName),
}

/// Font family plus style, e.g. Inter / Bold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }
}

impl fmt::Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

/// Mutable view of one node in the host document.
pub trait CanvasNode {
    fn set_name(&mut self, name: &str);
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn resize(&mut self, width: f64, height: f64) -> Result<(), CanvasError>;
    fn move_to(&mut self, x: f64, y: f64) -> Result<(), CanvasError>;
    fn set_fills(&mut self, fills: Vec<Paint>);
    fn set_strokes(&mut self, strokes: Vec<Paint>);
    fn set_corner_radius(&mut self, radius: f64);
    fn set_characters(&mut self, text: &str) -> Result<(), CanvasError>;
    fn set_font_size(&mut self, size: f64) -> Result<(), CanvasError>;
    fn set_font_weight(&mut self, weight: f64) -> Result<(), CanvasError>;
}

/// The host document: node creation, tree edits, fonts and selection.
///
/// Created nodes land on the current page immediately; `append_child`
/// re-parents them.
#[async_trait]
pub trait Canvas: Send {
    type Handle: Copy + Eq + fmt::Debug + Send + Sync;
    type Node: CanvasNode + NodeSource;

    fn create_frame(&mut self) -> Self::Handle;
    fn create_text(&mut self) -> Self::Handle;
    fn node_mut(&mut self, handle: Self::Handle) -> Result<&mut Self::Node, CanvasError>;
    fn node(&self, handle: Self::Handle) -> Result<&Self::Node, CanvasError>;

    /// Must complete before any text property of a node using `font` is set.
    async fn load_font(&mut self, font: &FontName) -> Result<(), CanvasError>;

    /// Switch a text node to `font`, which must already be loaded.
    fn set_font_name(&mut self, handle: Self::Handle, font: &FontName)
        -> Result<(), CanvasError>;

    fn append_child(&mut self, parent: Self::Handle, child: Self::Handle)
        -> Result<(), CanvasError>;
    fn append_to_page(&mut self, handle: Self::Handle) -> Result<(), CanvasError>;

    /// Select the nodes and scroll them into view.
    fn focus(&mut self, handles: &[Self::Handle]);
    fn selection(&self) -> Vec<Self::Handle>;
}
