//! Stylesheet scanning into a [`StyleMap`].
//!
//! Supported grammar: class selectors followed by a flat declaration block,
//! e.g. `.card { width: 10px; color: #fff }`. At-rules, nested blocks and
//! non-class selectors are not interpreted. Values stay raw strings.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::types::StyleMap;

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));
static CLASS_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.([a-z0-9_-]+)\s*\{([^}]*)\}").expect("valid regex"));
static DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([a-z-]+)\s*:\s*([^;]+?)\s*(?:;|$)").expect("valid regex"));
static LEADING_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid regex"));

/// Parse a stylesheet into class → property → raw value.
///
/// A class that appears in several blocks merges its declarations; later
/// declarations win.
pub fn parse_css_styles(css: &str) -> StyleMap {
    let css = COMMENT.replace_all(css, "");
    let mut styles = StyleMap::new();

    for block in CLASS_BLOCK.captures_iter(&css) {
        let class_name = block[1].to_string();
        let declarations = styles.entry(class_name).or_insert_with(BTreeMap::new);

        for decl in DECLARATION.captures_iter(&block[2]) {
            let value = decl[2].trim();
            if value.is_empty() {
                continue;
            }
            declarations.insert(decl[1].trim().to_ascii_lowercase(), value.to_string());
        }
    }

    tracing::debug!(classes = styles.len(), "parsed css classes");
    styles
}

/// Leading integer of a CSS value (`"10px"` → 10, `"12.7px"` → 12, `"auto"` → none).
pub fn parse_css_int(value: &str) -> Option<i64> {
    LEADING_INT
        .captures(value)
        .and_then(|caps| caps[1].parse().ok())
}
