//! HTML/CSS side of the translator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::design::DesignNode;
use crate::tokens::DesignTokens;

/// Parsed CSS declarations keyed by class name, values kept as raw strings.
pub type StyleMap = BTreeMap<String, BTreeMap<String, String>>;

/// One class-bearing element found in an HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedElement {
    /// Lower-case tag name (e.g., "div", "h2")
    pub tag: String,
    pub class_name: String,
    /// Direct text content, whitespace-trimmed
    pub content: String,
    /// Sequential identifier ("element-0", "element-1", ...)
    pub id: String,
}

/// Everything one export produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignData {
    pub html: String,
    pub css: String,
    pub nodes: Vec<DesignNode>,
    pub design_tokens: DesignTokens,
}
