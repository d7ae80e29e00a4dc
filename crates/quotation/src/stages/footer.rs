//! Footer band stamped on every page once the page count is known

use super::{fit, set_text};
use crate::layout::{MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
use crate::renderer::RenderContext;
use crate::Result;
use pdf_core::{Align, Canvas, Paint, Rect, StandardFont, TextOptions};

pub const FOOTER_HEIGHT: f64 = 18.0;

/// "Page 2 of 3"
pub fn page_label(page: usize, total: usize) -> String {
    format!("Page {page} of {total}")
}

pub fn render_footers<C: Canvas + ?Sized>(canvas: &mut C, ctx: &RenderContext) -> Result<()> {
    let total = canvas.page_count();
    let top = PAGE_HEIGHT - FOOTER_HEIGHT;
    let right = PAGE_WIDTH - MARGIN;

    let contact = ctx.options.contact_line();
    let company_line = match ctx.options.address() {
        Some(address) => format!("{}  |  {address}", ctx.options.company_name()),
        None => ctx.options.company_name().to_string(),
    };
    let generated = format!(
        "Generated on {}",
        quote_text::format_timestamp(ctx.generated_at)
    );

    for page in 1..=total {
        canvas.set_page(page)?;

        canvas.set_fill_color(ctx.theme.panel);
        canvas.rect(Rect::new(0.0, top, PAGE_WIDTH, FOOTER_HEIGHT), Paint::Fill)?;
        canvas.set_stroke_color(ctx.theme.brand);
        canvas.set_line_width(0.6);
        canvas.line(0.0, top, PAGE_WIDTH, top)?;

        set_text(canvas, StandardFont::HelveticaBold, 8.0, ctx.theme.text);
        let line = fit(canvas, &company_line, 130.0);
        canvas.text(&line, MARGIN, top + 6.0, TextOptions::default())?;
        canvas.text(
            &page_label(page, total),
            right,
            top + 6.0,
            TextOptions::align(Align::Right),
        )?;

        set_text(canvas, StandardFont::Helvetica, 7.0, ctx.theme.muted);
        if !contact.is_empty() {
            let contact = fit(canvas, &contact, 130.0);
            canvas.text(&contact, MARGIN, top + 10.5, TextOptions::default())?;
        }
        canvas.text(&generated, MARGIN, top + 14.5, TextOptions::default())?;
        let attribution = fit(canvas, &ctx.options.layout.attribution, 70.0);
        canvas.text(
            &attribution,
            right,
            top + 14.5,
            TextOptions::align(Align::Right),
        )?;
    }

    log::debug!("Footers stamped on {total} pages");
    Ok(())
}
