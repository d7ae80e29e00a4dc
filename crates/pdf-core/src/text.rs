//! Text rendering utilities

use crate::document::Color;
use crate::font::StandardFont;
use crate::Align;

/// Context for rendering text
pub struct TextRenderContext {
    /// Standard font used for the run
    pub font: StandardFont,
    /// Font size in points
    pub font_size: f64,
    /// Text width in points (for alignment)
    pub text_width: f64,
    /// Rotation in degrees, counter-clockwise
    pub angle: f64,
    /// Text color (RGB)
    pub color: Color,
}

/// Format a number for a content stream, trimmed to three decimals
pub(crate) fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// Hex string operand for WinAnsi bytes, e.g. `<414243>`
pub fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 2);
    out.push('<');
    for b in bytes {
        out.push_str(&format!("{b:02X}"));
    }
    out.push('>');
    out
}

/// Generate PDF operators for text insertion
///
/// The anchor `(x, y)` is the baseline point in PDF space. Alignment shifts
/// the run along its own (possibly rotated) baseline, so centred rotated
/// text stays centred on the anchor.
///
/// # Arguments
/// * `text_hex` - Hex-encoded text (e.g., "<414243>")
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Y coordinate in points (PDF coordinates, from bottom)
/// * `align` - Text alignment
/// * `ctx` - Text rendering context
pub fn generate_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let shift = match align {
        Align::Left => 0.0,
        Align::Center => -ctx.text_width / 2.0,
        Align::Right => -ctx.text_width,
    };

    let radians = ctx.angle.to_radians();
    let (sin, cos) = radians.sin_cos();
    let origin_x = x + shift * cos;
    let origin_y = y + shift * sin;

    let mut ops = String::new();
    ops.push_str("BT\n");
    ops.push_str(&format!(
        "{} {} {} rg\n",
        fmt_num(ctx.color.r as f64),
        fmt_num(ctx.color.g as f64),
        fmt_num(ctx.color.b as f64)
    ));
    ops.push_str(&format!(
        "/{} {} Tf\n",
        ctx.font.resource_name(),
        fmt_num(ctx.font_size)
    ));

    if ctx.angle == 0.0 {
        ops.push_str(&format!(
            "1 0 0 1 {} {} Tm\n",
            fmt_num(origin_x),
            fmt_num(origin_y)
        ));
    } else {
        ops.push_str(&format!(
            "{} {} {} {} {} {} Tm\n",
            fmt_num(cos),
            fmt_num(sin),
            fmt_num(-sin),
            fmt_num(cos),
            fmt_num(origin_x),
            fmt_num(origin_y)
        ));
    }

    ops.push_str(&format!("{text_hex} Tj\n"));
    ops.push_str("ET\n");
    ops.into_bytes()
}
