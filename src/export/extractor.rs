//! Copies observable attributes of a design-tool node into a [`DesignNode`].

use serde_json::Value;

use crate::types::{DesignNode, LayoutMode, NodeKind, Paint, PaintType, RgbaColor};

/// Read-only view of a live design-tool node.
///
/// Every accessor returns `None` (or an empty list) when the attribute does
/// not exist on that node type, so a partially populated node still yields a
/// valid record.
pub trait NodeSource {
    fn id(&self) -> String;
    fn name(&self) -> String;
    fn node_type(&self) -> String;
    fn x(&self) -> Option<f64>;
    fn y(&self) -> Option<f64>;
    fn width(&self) -> Option<f64>;
    fn height(&self) -> Option<f64>;
    fn fills(&self) -> Vec<Paint>;
    fn strokes(&self) -> Vec<Paint>;
    fn stroke_weight(&self) -> Option<f64>;
    fn corner_radius(&self) -> Option<f64>;
    fn characters(&self) -> Option<String>;
    fn font_size(&self) -> Option<f64>;
    fn font_family(&self) -> Option<String>;
    fn font_weight(&self) -> Option<f64>;
    fn layout_mode(&self) -> Option<LayoutMode>;
    /// Padding as (top, right, bottom, left).
    fn padding(&self) -> [Option<f64>; 4];
    fn item_spacing(&self) -> Option<f64>;
}

/// Build a [`DesignNode`] from one source node. Never fails.
pub fn extract_node_data(node: &impl NodeSource) -> DesignNode {
    let kind = NodeKind::from(node.node_type());
    let mut data = DesignNode::new(node.id(), node.name(), kind.clone());
    data.x = or_zero(node.x());
    data.y = or_zero(node.y());
    data.width = or_zero(node.width());
    data.height = or_zero(node.height());

    let fills = node.fills();
    if !fills.is_empty() {
        data.fills = Some(fills);
    }

    let strokes = node.strokes();
    if !strokes.is_empty() {
        let weight = node.stroke_weight();
        data.strokes = Some(
            strokes
                .into_iter()
                .map(|stroke| Paint {
                    color: stroke.color.map(RgbaColor::opaque),
                    weight,
                    ..stroke
                })
                .collect(),
        );
    }

    data.corner_radius = node.corner_radius().filter(|r| *r != 0.0 && r.is_finite());

    if kind == NodeKind::Text {
        data.text = node.characters();
        data.font_size = node.font_size();
        data.font_family = node.font_family();
        data.font_weight = node.font_weight();
    }

    if let Some(mode) = node.layout_mode() {
        data.layout_mode = Some(mode);
        let [top, right, bottom, left] = node.padding();
        data.padding_top = top;
        data.padding_right = right;
        data.padding_bottom = bottom;
        data.padding_left = left;
        data.item_spacing = node.item_spacing();
    }

    tracing::debug!(id = %data.id, kind = %data.kind, "extracted node");
    data
}

/// Extract every node of a selection, preserving order.
pub fn extract_selection<'a, S: NodeSource + 'a>(
    selection: impl IntoIterator<Item = &'a S>,
) -> Vec<DesignNode> {
    selection.into_iter().map(|node| extract_node_data(node)).collect()
}

/// Non-finite and missing values become 0; -0 is folded into 0.
fn or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v != 0.0 => v,
        _ => 0.0,
    }
}

/// JSON node snapshots.
///
/// Accepts both the plugin shape (`x`, `fontSize`, `fontName.family`) and the
/// REST API shape (`absoluteBoundingBox`, `style.fontSize`).
impl NodeSource for Value {
    fn id(&self) -> String {
        str_field(self, "id").unwrap_or_default()
    }

    fn name(&self) -> String {
        str_field(self, "name").unwrap_or_default()
    }

    fn node_type(&self) -> String {
        str_field(self, "type").unwrap_or_default()
    }

    fn x(&self) -> Option<f64> {
        num_field(self, "x").or_else(|| bounding_box(self, "x"))
    }

    fn y(&self) -> Option<f64> {
        num_field(self, "y").or_else(|| bounding_box(self, "y"))
    }

    fn width(&self) -> Option<f64> {
        num_field(self, "width").or_else(|| bounding_box(self, "width"))
    }

    fn height(&self) -> Option<f64> {
        num_field(self, "height").or_else(|| bounding_box(self, "height"))
    }

    fn fills(&self) -> Vec<Paint> {
        paints(self.get("fills"))
    }

    fn strokes(&self) -> Vec<Paint> {
        paints(self.get("strokes"))
    }

    fn stroke_weight(&self) -> Option<f64> {
        num_field(self, "strokeWeight")
    }

    fn corner_radius(&self) -> Option<f64> {
        num_field(self, "cornerRadius")
    }

    fn characters(&self) -> Option<String> {
        str_field(self, "characters")
    }

    fn font_size(&self) -> Option<f64> {
        num_field(self, "fontSize").or_else(|| style_field(self, "fontSize")?.as_f64())
    }

    fn font_family(&self) -> Option<String> {
        str_field(self, "fontFamily")
            .or_else(|| {
                self.get("fontName")
                    .and_then(|f| f.get("family"))
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            })
            .or_else(|| style_field(self, "fontFamily")?.as_str().map(str::to_owned))
    }

    fn font_weight(&self) -> Option<f64> {
        num_field(self, "fontWeight").or_else(|| style_field(self, "fontWeight")?.as_f64())
    }

    fn layout_mode(&self) -> Option<LayoutMode> {
        str_field(self, "layoutMode").and_then(|mode| LayoutMode::parse(&mode))
    }

    fn padding(&self) -> [Option<f64>; 4] {
        [
            num_field(self, "paddingTop"),
            num_field(self, "paddingRight"),
            num_field(self, "paddingBottom"),
            num_field(self, "paddingLeft"),
        ]
    }

    fn item_spacing(&self) -> Option<f64> {
        num_field(self, "itemSpacing")
    }
}

fn str_field(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn num_field(node: &Value, key: &str) -> Option<f64> {
    node.get(key).and_then(Value::as_f64)
}

fn bounding_box(node: &Value, key: &str) -> Option<f64> {
    node.get("absoluteBoundingBox")?.get(key)?.as_f64()
}

fn style_field<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    node.get("style")?.get(key)
}

fn paints(value: Option<&Value>) -> Vec<Paint> {
    let Some(list) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    list.iter()
        .filter_map(|paint| {
            let paint_type = PaintType::parse(paint.get("type")?.as_str()?);
            let color = paint.get("color").and_then(|c| {
                Some(RgbaColor {
                    r: c.get("r")?.as_f64()?,
                    g: c.get("g")?.as_f64()?,
                    b: c.get("b")?.as_f64()?,
                    a: c.get("a").and_then(Value::as_f64),
                })
            });
            Some(Paint {
                paint_type,
                color,
                opacity: paint.get("opacity").and_then(Value::as_f64),
                weight: None,
            })
        })
        .collect()
}
