//! Design-token registry shipped with every export.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed vocabulary of colors, type scales, spacing and radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignTokens {
    pub colors: BTreeMap<String, String>,
    pub typography: BTreeMap<String, TextStyle>,
    pub spacing: BTreeMap<String, u32>,
    pub border_radius: BTreeMap<String, u32>,
}

/// One typography role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: u32,
    pub font_family: String,
    pub font_weight: u32,
    pub line_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
}

const COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#FFFFFF"),
    ("gray-900", "#111827"),
    ("gray-800", "#1F2937"),
    ("gray-700", "#374151"),
    ("gray-600", "#4B5563"),
    ("success", "#10B981"),
    ("warning", "#F59E0B"),
    ("error", "#EF4444"),
    ("info", "#3B82F6"),
    ("light-gray", "#F3F4F6"),
    ("border", "#E5E7EB"),
];

// (role, size, weight, line height); every role uses Inter.
const TYPOGRAPHY: &[(&str, u32, u32, f64)] = &[
    ("display", 32, 700, 1.2),
    ("heading-1", 24, 600, 1.3),
    ("heading-2", 20, 600, 1.3),
    ("body", 14, 400, 1.5),
    ("small", 12, 400, 1.4),
];

const SPACING: &[(&str, u32)] = &[
    ("xs", 4),
    ("sm", 8),
    ("md", 12),
    ("lg", 16),
    ("xl", 24),
    ("2xl", 32),
    ("3xl", 48),
];

const BORDER_RADIUS: &[(&str, u32)] = &[
    ("sm", 4),
    ("md", 8),
    ("lg", 12),
    ("xl", 16),
    ("full", 9999),
];

const FONT_FAMILY: &str = "Inter";

/// Returns the constant token bundle.
pub fn design_tokens() -> DesignTokens {
    DesignTokens {
        colors: COLORS
            .iter()
            .map(|(name, hex)| (name.to_string(), hex.to_string()))
            .collect(),
        typography: TYPOGRAPHY
            .iter()
            .map(|&(role, size, weight, line_height)| {
                (
                    role.to_string(),
                    TextStyle {
                        font_size: size,
                        font_family: FONT_FAMILY.to_string(),
                        font_weight: weight,
                        line_height,
                        letter_spacing: None,
                    },
                )
            })
            .collect(),
        spacing: SPACING
            .iter()
            .map(|&(name, px)| (name.to_string(), px))
            .collect(),
        border_radius: BORDER_RADIUS
            .iter()
            .map(|&(name, px)| (name.to_string(), px))
            .collect(),
    }
}
