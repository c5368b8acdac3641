//! Builds design nodes from an HTML fragment and its stylesheet.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;

use super::canvas::{Canvas, CanvasError, CanvasNode, FontName};
use super::color::css_color_to_figma;
use super::css::{parse_css_int, parse_css_styles};
use super::html::parse_html_structure;
use crate::export::NodeSource;
use crate::frame_size::FrameSize;
use crate::tokens::DesignTokens;
use crate::types::{Paint, ParsedElement, RgbaColor, StyleMap};

static BORDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)px\s+solid\s+(.+)").expect("valid regex"));

const HEADING_WEIGHT: f64 = 700.0;

/// Where imported elements are placed.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    /// Name of the top-level frame hosting every imported element
    pub frame_name: String,
    pub frame_size: FrameSize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            frame_name: "Imported from Localhost".to_string(),
            frame_size: FrameSize::default(),
        }
    }
}

impl ImportOptions {
    pub fn named(frame_name: impl Into<String>) -> Self {
        Self {
            frame_name: frame_name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
enum ImportError {
    #[error("failed to read html: {0}")]
    Html(#[from] std::io::Error),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// Create canvas nodes for every recognized element of `html`.
///
/// Returns the created element nodes (not the hosting frame). Any failure
/// aborts the import and yields an empty list; nodes created before the
/// failure stay in the canvas. `tokens` is accepted to mirror the
/// export payload and is not consulted.
pub async fn create_nodes_from_code<C: Canvas>(
    canvas: &mut C,
    html: &str,
    css: &str,
    _tokens: Option<&DesignTokens>,
    options: &ImportOptions,
) -> Vec<C::Handle> {
    match try_create_nodes_from_code(canvas, html, css, options).await {
        Ok(created) => {
            tracing::info!(
                count = created.len(),
                frame = %options.frame_name,
                "imported elements"
            );
            created
        }
        Err(err) => {
            tracing::error!(error = %err, "error creating nodes from code");
            Vec::new()
        }
    }
}

async fn try_create_nodes_from_code<C: Canvas>(
    canvas: &mut C,
    html: &str,
    css: &str,
    options: &ImportOptions,
) -> Result<Vec<C::Handle>, ImportError> {
    let elements = parse_html_structure(html)?;
    let styles = parse_css_styles(css);

    let main_frame = canvas.create_frame();
    {
        let frame = canvas.node_mut(main_frame)?;
        frame.set_name(&options.frame_name);
        frame.resize(
            f64::from(options.frame_size.width),
            f64::from(options.frame_size.height),
        )?;
        frame.set_fills(vec![Paint::solid(RgbaColor::WHITE)]);
    }

    let mut created = Vec::new();
    for element in &elements {
        let element_styles = styles_for(&styles, &element.class_name);
        let handle = match element.tag.as_str() {
            "div" => create_container(canvas, element, &element_styles)?,
            "p" | "span" => create_text(canvas, element, &element_styles).await?,
            "h1" | "h2" | "h3" => create_heading(canvas, element, &element_styles).await?,
            other => {
                tracing::debug!(tag = other, class = %element.class_name, "skipping element");
                continue;
            }
        };
        canvas.append_child(main_frame, handle)?;
        created.push(handle);
    }

    canvas.append_to_page(main_frame)?;
    canvas.focus(&[main_frame]);
    Ok(created)
}

/// Styles for a class attribute: the exact class if known, else the merge of
/// each whitespace-separated class in order.
fn styles_for(styles: &StyleMap, class_attr: &str) -> BTreeMap<String, String> {
    if let Some(exact) = styles.get(class_attr) {
        return exact.clone();
    }
    let mut merged = BTreeMap::new();
    for class in class_attr.split_whitespace() {
        if let Some(rule) = styles.get(class) {
            merged.extend(rule.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }
    merged
}

fn int_value(property: &'static str, raw: &str) -> Result<f64, CanvasError> {
    parse_css_int(raw)
        .map(|v| v as f64)
        .ok_or_else(|| CanvasError::InvalidValue {
            property,
            value: raw.to_string(),
        })
}

fn int_or(
    styles: &BTreeMap<String, String>,
    property: &'static str,
    default: &str,
) -> Result<f64, CanvasError> {
    int_value(
        property,
        styles.get(property).map(String::as_str).unwrap_or(default),
    )
}

fn create_container<C: Canvas>(
    canvas: &mut C,
    element: &ParsedElement,
    styles: &BTreeMap<String, String>,
) -> Result<C::Handle, CanvasError> {
    let handle = canvas.create_frame();
    let node = canvas.node_mut(handle)?;
    node.set_name(non_empty_or(&element.class_name, "Container"));
    node.move_to(int_or(styles, "left", "0")?, int_or(styles, "top", "0")?)?;
    node.resize(int_or(styles, "width", "100")?, int_or(styles, "height", "50")?)?;
    apply_styles(node, styles)?;
    Ok(handle)
}

async fn create_text<C: Canvas>(
    canvas: &mut C,
    element: &ParsedElement,
    styles: &BTreeMap<String, String>,
) -> Result<C::Handle, CanvasError> {
    let handle = canvas.create_text();
    canvas
        .load_font(&FontName::new("Inter", "Regular"))
        .await?;

    let node = canvas.node_mut(handle)?;
    node.set_name(non_empty_or(&element.class_name, "Text"));
    node.set_characters(non_empty_or(&element.content, "Text content"))?;
    node.move_to(int_or(styles, "left", "0")?, int_or(styles, "top", "0")?)?;
    apply_styles(node, styles)?;
    Ok(handle)
}

async fn create_heading<C: Canvas>(
    canvas: &mut C,
    element: &ParsedElement,
    styles: &BTreeMap<String, String>,
) -> Result<C::Handle, CanvasError> {
    let handle = canvas.create_text();
    let bold = FontName::new("Inter", "Bold");
    canvas.load_font(&bold).await?;
    canvas.set_font_name(handle, &bold)?;

    let node = canvas.node_mut(handle)?;
    node.set_name(&format!("Heading ({})", element.tag));
    node.set_characters(non_empty_or(&element.content, &element.tag))?;
    node.move_to(int_or(styles, "left", "0")?, int_or(styles, "top", "0")?)?;
    node.set_font_size(int_or(styles, "font-size", "24")?)?;
    apply_styles(node, styles)?;
    node.set_font_weight(HEADING_WEIGHT)?;
    Ok(handle)
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Apply the supported CSS properties to `node`. Each property is optional;
/// an unparseable geometry or font value is an error, an unparseable radius
/// is skipped.
pub fn apply_styles<N>(node: &mut N, styles: &BTreeMap<String, String>) -> Result<(), CanvasError>
where
    N: CanvasNode + NodeSource + ?Sized,
{
    if let Some(background) = styles.get("background-color") {
        let mut fill = Paint::solid(css_color_to_figma(background));
        fill.opacity = Some(1.0);
        node.set_fills(vec![fill]);
    }

    if let Some(caps) = styles.get("border").and_then(|b| BORDER.captures(b)) {
        let mut stroke = Paint::solid(css_color_to_figma(&caps[2]));
        stroke.weight = int_value("border", &caps[1]).ok();
        node.set_strokes(vec![stroke]);
    }

    if let Some(radius) = styles.get("border-radius").and_then(|r| parse_css_int(r)) {
        node.set_corner_radius(radius as f64);
    }

    if let Some(width) = styles.get("width") {
        let height = CanvasNode::height(&*node);
        node.resize(int_value("width", width)?, height)?;
    }
    if let Some(height) = styles.get("height") {
        let width = CanvasNode::width(&*node);
        node.resize(width, int_value("height", height)?)?;
    }

    if let Some(left) = styles.get("left") {
        let y = NodeSource::y(&*node).unwrap_or(0.0);
        node.move_to(int_value("left", left)?, y)?;
    }
    if let Some(top) = styles.get("top") {
        let x = NodeSource::x(&*node).unwrap_or(0.0);
        node.move_to(x, int_value("top", top)?)?;
    }

    if let Some(size) = styles.get("font-size") {
        node.set_font_size(int_value("font-size", size)?)?;
    }
    if let Some(weight) = styles.get("font-weight") {
        node.set_font_weight(int_value("font-weight", weight)?)?;
    }

    if let Some(color) = styles.get("color") {
        node.set_fills(vec![Paint::solid(css_color_to_figma(color))]);
    }

    Ok(())
}
