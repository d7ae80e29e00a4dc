//! Stage renderers
//!
//! Each flowing stage takes the incoming cursor (mm from the page top),
//! draws at or below it and returns the next cursor. Overlays and the
//! footer use fixed page anchors instead.

pub mod closing;
pub mod customer;
pub mod footer;
pub mod header;
pub mod items;
pub mod overlays;
pub mod summary;
pub mod watermark;

pub use closing::render_closing;
pub use customer::render_customer;
pub use footer::render_footers;
pub use header::render_header;
pub use items::render_items;
pub use overlays::render_overlays;
pub use summary::{render_summary, summary_height};
pub use watermark::{ResolvedWatermark, Watermark, WatermarkMode};

use crate::layout::{pt, MARGIN};
use crate::renderer::RenderContext;
use crate::Result;
use pdf_core::{Canvas, Color, Paint, Rect, StandardFont, TextOptions};

/// Height taken by [`section_title`]
pub const SECTION_TITLE_HEIGHT: f64 = 9.0;

/// Select font, size and text colour in one call
pub(crate) fn set_text<C: Canvas + ?Sized>(
    canvas: &mut C,
    font: StandardFont,
    size: f64,
    color: Color,
) {
    canvas.set_font(font, size);
    canvas.set_text_color(color);
}

/// Shorten `text` to `max_width` mm with the canvas's current font
pub(crate) fn fit<C: Canvas + ?Sized>(canvas: &C, text: &str, max_width: f64) -> String {
    quote_text::ellipsize(text, max_width, |s| canvas.text_width(s))
}

/// Baseline that vertically centres text of `size` points in a band
pub(crate) fn centered_baseline(top: f64, height: f64, size: f64) -> f64 {
    top + height / 2.0 + pt(size) * 0.35
}

/// Bold section title with a brand accent bar on the left
pub(crate) fn section_title<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    title: &str,
    cursor: f64,
) -> Result<f64> {
    canvas.set_fill_color(ctx.theme.brand);
    canvas.rect(Rect::new(MARGIN, cursor, 1.5, 6.0), Paint::Fill)?;
    set_text(canvas, StandardFont::HelveticaBold, 11.0, ctx.theme.text);
    canvas.text(title, MARGIN + 4.0, cursor + 4.6, TextOptions::default())?;
    Ok(cursor + SECTION_TITLE_HEIGHT)
}
