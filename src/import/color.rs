//! CSS color strings to design-tool colors.

use once_cell::sync::Lazy;
use palette::Srgb;
use regex::Regex;

use crate::types::RgbaColor;

static RGB_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"rgba?\((\d+),\s*(\d+),\s*(\d+)(?:,\s*([0-9]*\.?[0-9]+))?").expect("valid regex")
});
static HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)#([0-9a-f]{6})").expect("valid regex"));

/// Parse `rgb()`/`rgba()` or 6-digit hex; anything else is black.
pub fn css_color_to_figma(value: &str) -> RgbaColor {
    if let Some(caps) = RGB_FUNCTION.captures(value) {
        let channel = |i: usize| caps[i].parse::<u32>().map(|c| c.min(255) as u8).unwrap_or(255);
        let rgb: Srgb<f64> = Srgb::<u8>::new(channel(1), channel(2), channel(3)).into_format();
        let alpha = caps.get(4).and_then(|a| a.as_str().parse::<f64>().ok());
        return RgbaColor {
            r: rgb.red,
            g: rgb.green,
            b: rgb.blue,
            a: alpha,
        };
    }

    if let Some(caps) = HEX.captures(value) {
        let hex = &caps[1];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        let rgb: Srgb<f64> = Srgb::<u8>::new(channel(0), channel(2), channel(4)).into_format();
        return RgbaColor::rgb(rgb.red, rgb.green, rgb.blue);
    }

    RgbaColor::BLACK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::color_to_css;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1.0 / 255.0
    }

    #[test]
    fn rgb_function_channels_divide_by_255() {
        let color = css_color_to_figma("rgb(255, 0, 0)");
        assert!(close(color.r, 1.0) && close(color.g, 0.0) && close(color.b, 0.0));
        assert_eq!(color.a, None);
    }

    #[test]
    fn rgba_keeps_alpha() {
        let color = css_color_to_figma("rgba(0, 0, 255, 0.5)");
        assert!(close(color.r, 0.0) && close(color.g, 0.0) && close(color.b, 1.0));
        assert_eq!(color.a, Some(0.5));
    }

    #[test]
    fn hex_is_case_insensitive() {
        let color = css_color_to_figma("#3B82f6");
        assert!(close(color.r, 59.0 / 255.0));
        assert!(close(color.g, 130.0 / 255.0));
        assert!(close(color.b, 246.0 / 255.0));
    }

    #[test]
    fn unknown_formats_fall_back_to_black() {
        assert_eq!(css_color_to_figma("red"), RgbaColor::BLACK);
        assert_eq!(css_color_to_figma("#fff"), RgbaColor::BLACK);
        assert_eq!(css_color_to_figma("hsl(0, 100%, 50%)"), RgbaColor::BLACK);
    }

    #[test]
    fn serialization_round_trip_within_rounding() {
        for original in [
            RgbaColor::rgba(1.0, 0.0, 0.0, 1.0),
            RgbaColor::rgba(0.0, 0.0, 1.0, 0.5),
            RgbaColor::rgb(0.2, 0.4, 0.6),
        ] {
            let parsed = css_color_to_figma(&color_to_css(&original));
            assert!(close(parsed.r, original.r), "{original:?} -> {parsed:?}");
            assert!(close(parsed.g, original.g), "{original:?} -> {parsed:?}");
            assert!(close(parsed.b, original.b), "{original:?} -> {parsed:?}");
        }
    }
}
