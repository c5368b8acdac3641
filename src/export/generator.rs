//! Design-to-markup generation: flat HTML plus one CSS rule per node.

use palette::Srgb;
use std::fmt::Write as FmtWrite;

use crate::tokens::design_tokens;
use crate::types::{DesignData, DesignNode, LayoutMode, NodeKind, RgbaColor};

const CLASS_PREFIX: &str = "figma-";
const MAX_CLASS_LEN: usize = 50;

/// Derive the CSS class name for a node identifier.
///
/// Everything outside `[a-zA-Z0-9-]` becomes `-`, the result is lower-cased
/// and the whole name (prefix included) is cut to 50 characters.
pub fn class_name(id: &str) -> String {
    let mut name = String::with_capacity(CLASS_PREFIX.len() + id.len());
    name.push_str(CLASS_PREFIX);
    name.extend(id.chars().map(|c| {
        if c.is_ascii_alphanumeric() || c == '-' {
            c.to_ascii_lowercase()
        } else {
            '-'
        }
    }));
    name.truncate(MAX_CLASS_LEN);
    name
}

/// Serialize a color as `rgb(r, g, b)` or, when alpha is below 1, `rgba(r, g, b, a)`.
pub fn color_to_css(color: &RgbaColor) -> String {
    let rgb: Srgb<u8> = Srgb::new(color.r, color.g, color.b).into_format();
    match color.a {
        Some(a) if a < 1.0 => format!("rgba({}, {}, {}, {})", rgb.red, rgb.green, rgb.blue, a),
        _ => format!("rgb({}, {}, {})", rgb.red, rgb.green, rgb.blue),
    }
}

/// One HTML block per node, in input order, without nesting.
pub fn generate_html(nodes: &[DesignNode]) -> String {
    let mut html = String::new();

    for node in nodes {
        let class = class_name(&node.id);
        match &node.kind {
            kind if kind.is_container() => {
                writeln!(html, "<div class=\"{class}\">").ok();
                if !node.name.is_empty() {
                    writeln!(html, "  <!-- {} -->", comment_safe(&node.name)).ok();
                }
                writeln!(html, "</div>").ok();
            }
            NodeKind::Text => {
                let tag = if node.name.starts_with("Heading") {
                    "h2"
                } else {
                    "p"
                };
                let content = node
                    .text
                    .as_deref()
                    .filter(|text| !text.is_empty())
                    .unwrap_or(&node.name);
                writeln!(
                    html,
                    "<{tag} class=\"{class}\">{}</{tag}>",
                    escape_text(content)
                )
                .ok();
            }
            NodeKind::Rectangle => {
                writeln!(html, "<div class=\"{class}\"></div>").ok();
            }
            _ => {}
        }
    }

    html
}

/// One rule block per node, keyed by its synthesized class name.
pub fn generate_css(nodes: &[DesignNode]) -> String {
    let mut css = String::new();

    for node in nodes {
        writeln!(css, ".{} {{", class_name(&node.id)).ok();

        if node.width != 0.0 {
            writeln!(css, "  width: {}px;", node.width).ok();
        }
        if node.height != 0.0 {
            writeln!(css, "  height: {}px;", node.height).ok();
        }
        writeln!(css, "  left: {}px;", node.x).ok();
        writeln!(css, "  top: {}px;", node.y).ok();
        writeln!(css, "  position: absolute;").ok();

        if let Some(color) = node
            .fills
            .as_ref()
            .and_then(|fills| fills.first())
            .filter(|fill| fill.is_solid_with_color())
            .and_then(|fill| fill.color.as_ref())
        {
            writeln!(css, "  background-color: {};", color_to_css(color)).ok();
        }

        if let Some(stroke) = node
            .strokes
            .as_ref()
            .and_then(|strokes| strokes.first())
            .filter(|stroke| stroke.is_solid_with_color())
        {
            let weight = stroke.weight.filter(|w| *w != 0.0).unwrap_or(1.0);
            if let Some(color) = &stroke.color {
                writeln!(css, "  border: {weight}px solid {};", color_to_css(color)).ok();
            }
        }

        if let Some(radius) = node.corner_radius.filter(|r| *r != 0.0) {
            writeln!(css, "  border-radius: {radius}px;").ok();
        }

        if node.kind == NodeKind::Text {
            if let Some(size) = node.font_size.filter(|s| *s != 0.0) {
                writeln!(css, "  font-size: {size}px;").ok();
            }
            if let Some(family) = node.font_family.as_deref().filter(|f| !f.is_empty()) {
                writeln!(css, "  font-family: \"{family}\", sans-serif;").ok();
            }
            if let Some(weight) = node.font_weight.filter(|w| *w != 0.0) {
                writeln!(css, "  font-weight: {weight};").ok();
            }
            writeln!(css, "  color: #000000;").ok();
        }

        css.push_str(&layout_to_css(node));
        css.push_str("}\n\n");
    }

    css
}

/// Flexbox declarations for an auto-layout node.
fn layout_to_css(node: &DesignNode) -> String {
    let mut css = String::new();
    let Some(mode) = node.layout_mode.filter(|m| *m != LayoutMode::None) else {
        return css;
    };

    writeln!(css, "  display: flex;").ok();
    match mode {
        LayoutMode::Horizontal => writeln!(css, "  flex-direction: row;").ok(),
        LayoutMode::Vertical => writeln!(css, "  flex-direction: column;").ok(),
        LayoutMode::None => None,
    };

    if let Some(spacing) = node.item_spacing.filter(|s| *s != 0.0) {
        writeln!(css, "  gap: {spacing}px;").ok();
    }

    let padding = [
        node.padding_top,
        node.padding_right,
        node.padding_bottom,
        node.padding_left,
    ]
    .map(|p| p.unwrap_or(0.0));
    if padding.iter().any(|p| *p != 0.0) {
        let [top, right, bottom, left] = padding;
        writeln!(css, "  padding: {top}px {right}px {bottom}px {left}px;").ok();
    }

    css
}

/// HTML, CSS, the source nodes and the token registry in one bundle.
pub fn generate_design_data(nodes: Vec<DesignNode>) -> DesignData {
    let html = generate_html(&nodes);
    let css = generate_css(&nodes);
    tracing::info!(
        nodes = nodes.len(),
        html_bytes = html.len(),
        css_bytes = css.len(),
        "generated markup"
    );

    DesignData {
        html,
        css,
        nodes,
        design_tokens: design_tokens(),
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn comment_safe(text: &str) -> String {
    let mut out = text.to_string();
    while out.contains("--") {
        out = out.replace("--", "- -");
    }
    out
}
