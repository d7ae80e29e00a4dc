//! Customer details box

use super::{fit, section_title, set_text};
use crate::layout::{CONTENT_WIDTH, MARGIN, SECTION_GAP};
use crate::renderer::RenderContext;
use crate::Result;
use pdf_core::{Canvas, Paint, Rect, StandardFont, TextOptions};

pub const BOX_HEIGHT: f64 = 22.0;
const LABEL_WIDTH: f64 = 17.0;

/// Name/Phone on the first row, Email/Address on the second
///
/// Values that do not fit their column are shortened with "...".
pub fn render_customer<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    cursor: f64,
) -> Result<f64> {
    let theme = &ctx.theme;
    let data = ctx.data;
    let top = section_title(canvas, ctx, "CUSTOMER DETAILS", cursor)?;

    canvas.set_fill_color(theme.panel);
    canvas.set_stroke_color(theme.border);
    canvas.set_line_width(0.3);
    canvas.rounded_rect(
        Rect::new(MARGIN, top, CONTENT_WIDTH, BOX_HEIGHT),
        2.0,
        Paint::FillStroke,
    )?;

    let column_width = CONTENT_WIDTH / 2.0;
    let value_width = column_width - LABEL_WIDTH - 8.0;
    let address = data.customer_address.as_deref().unwrap_or("-");
    let cells = [
        ("Name:", data.customer_name.as_str()),
        ("Phone:", data.customer_phone.as_str()),
        ("Email:", data.customer_email.as_str()),
        ("Address:", address),
    ];

    for (i, (label, value)) in cells.iter().enumerate() {
        let x = MARGIN + 4.0 + (i % 2) as f64 * column_width;
        let y = top + 8.0 + (i / 2) as f64 * 8.0;
        let value = if value.trim().is_empty() { "-" } else { *value };

        set_text(canvas, StandardFont::HelveticaBold, 9.0, theme.muted);
        canvas.text(label, x, y, TextOptions::default())?;
        set_text(canvas, StandardFont::Helvetica, 9.0, theme.text);
        let value = fit(canvas, value, value_width);
        canvas.text(&value, x + LABEL_WIDTH, y, TextOptions::default())?;
    }

    Ok(top + BOX_HEIGHT + SECTION_GAP)
}
