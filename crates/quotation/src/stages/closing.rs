//! Notes, payment strip, terms, verification badge and signature boxes
//!
//! Blocks without source data are skipped and take no space.

use super::{centered_baseline, fit, section_title, set_text, SECTION_TITLE_HEIGHT};
use crate::layout::{Pager, CONTENT_WIDTH, CONTINUATION_TOP, MARGIN, PAGE_HEIGHT, FOOTER_RESERVE};
use crate::renderer::RenderContext;
use crate::Result;
use pdf_core::{Align, Canvas, Paint, Rect, StandardFont, TextOptions};

pub const BADGE_HEIGHT: f64 = 12.0;
pub const STRIP_HEIGHT: f64 = 11.0;
pub const SIGNATURE_HEIGHT: f64 = 26.0;
pub const SIGNATURE_WIDTH: f64 = 85.0;
const BLOCK_GAP: f64 = 6.0;
const BODY_FONT_SIZE: f64 = 8.5;
const LINE_HEIGHT: f64 = 4.5;
const TEXT_INDENT: f64 = 4.0;
const TEXT_WIDTH: f64 = CONTENT_WIDTH - 2.0 * TEXT_INDENT;
/// Indent of wrapped continuation lines in a numbered term
const HANGING_INDENT: f64 = 4.0;

/// Validity sentence appended to every quotation's notes
pub fn validity_disclaimer(ctx: &RenderContext) -> String {
    format!(
        "Rates valid for {} and subject to revision thereafter. Final measurements are confirmed on site before fabrication.",
        quote_text::format_month_year(ctx.generated_at.date())
    )
}

fn measure(s: &str) -> f64 {
    StandardFont::Helvetica.text_width_mm(s, BODY_FONT_SIZE)
}

/// Lines of the notes block, caller notes first
pub fn notes_lines(ctx: &RenderContext) -> Vec<(String, f64)> {
    let mut lines = Vec::new();
    if let Some(notes) = ctx.data.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        lines.extend(
            quote_text::wrap_text(notes.trim(), TEXT_WIDTH, measure)
                .into_iter()
                .map(|line| (line, 0.0)),
        );
    }
    lines.extend(
        quote_text::wrap_text(&validity_disclaimer(ctx), TEXT_WIDTH, measure)
            .into_iter()
            .map(|line| (line, 0.0)),
    );
    lines
}

/// Numbered, wrapped terms; continuation lines hang under the text
pub fn terms_lines(ctx: &RenderContext) -> Vec<(String, f64)> {
    let Some(terms) = ctx.data.terms_and_conditions.as_deref() else {
        return Vec::new();
    };
    let mut lines = Vec::new();
    for term in quote_text::number_lines(terms) {
        let wrapped = quote_text::wrap_text(&term, TEXT_WIDTH - HANGING_INDENT, measure);
        for (i, line) in wrapped.into_iter().enumerate() {
            lines.push((line, if i == 0 { 0.0 } else { HANGING_INDENT }));
        }
    }
    lines
}

/// Draw a titled block of text lines, flowing onto new pages as needed
///
/// A block that fits on an empty page is moved whole; a longer one keeps
/// its title with the first two lines and flows line by line.
fn render_text_block<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    pager: &Pager,
    title: &str,
    lines: &[(String, f64)],
    cursor: f64,
) -> Result<f64> {
    if lines.is_empty() {
        return Ok(cursor);
    }
    let height = SECTION_TITLE_HEIGHT + lines.len() as f64 * LINE_HEIGHT + BLOCK_GAP;
    let page_capacity = PAGE_HEIGHT - FOOTER_RESERVE - CONTINUATION_TOP;
    let needed = if height <= page_capacity {
        height
    } else {
        SECTION_TITLE_HEIGHT + 2.0 * LINE_HEIGHT
    };

    let cursor = pager.ensure_space(canvas, cursor, needed)?;
    let mut y = section_title(canvas, ctx, title, cursor)?;
    for (line, indent) in lines {
        if !pager.fits(canvas, y, LINE_HEIGHT) {
            y = pager.new_page(canvas)?;
        }
        set_text(canvas, StandardFont::Helvetica, BODY_FONT_SIZE, ctx.theme.text);
        canvas.text(
            line,
            MARGIN + TEXT_INDENT + indent,
            y + LINE_HEIGHT - 1.2,
            TextOptions::default(),
        )?;
        y += LINE_HEIGHT;
    }
    Ok(y + BLOCK_GAP)
}

fn render_payment_strip<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    pager: &Pager,
    cursor: f64,
) -> Result<f64> {
    let Some(advance) = ctx.data.advance_paid else {
        return Ok(cursor);
    };
    let y = pager.ensure_space(canvas, cursor, STRIP_HEIGHT + BLOCK_GAP)?;
    let currency = &ctx.options.currency;

    canvas.set_fill_color(ctx.theme.success.tint(0.88));
    canvas.rounded_rect(
        Rect::new(MARGIN, y, CONTENT_WIDTH, STRIP_HEIGHT),
        2.0,
        Paint::Fill,
    )?;
    let baseline = centered_baseline(y, STRIP_HEIGHT, 9.0);
    set_text(canvas, StandardFont::HelveticaBold, 9.0, ctx.theme.success);
    canvas.text(
        &format!("Advance received: {}", currency.format(advance)),
        MARGIN + TEXT_INDENT,
        baseline,
        TextOptions::default(),
    )?;
    if let Some(balance) = ctx.data.balance_due() {
        canvas.set_text_color(ctx.theme.alert);
        canvas.text(
            &format!("Balance payable: {}", currency.format(balance)),
            MARGIN + CONTENT_WIDTH - TEXT_INDENT,
            baseline,
            TextOptions::align(Align::Right),
        )?;
    }
    Ok(y + STRIP_HEIGHT + BLOCK_GAP)
}

fn render_badge<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    pager: &Pager,
    cursor: f64,
) -> Result<f64> {
    let y = pager.ensure_space(canvas, cursor, BADGE_HEIGHT + BLOCK_GAP)?;
    let theme = &ctx.theme;

    canvas.set_fill_color(theme.success.tint(0.9));
    canvas.set_stroke_color(theme.success);
    canvas.set_line_width(0.4);
    canvas.rounded_rect(
        Rect::new(MARGIN, y, CONTENT_WIDTH, BADGE_HEIGHT),
        2.0,
        Paint::FillStroke,
    )?;
    canvas.set_fill_color(theme.success);
    canvas.circle(MARGIN + 7.0, y + BADGE_HEIGHT / 2.0, 3.0, Paint::Fill)?;

    set_text(canvas, StandardFont::HelveticaBold, 10.0, theme.success);
    canvas.text(
        "DIGITALLY VERIFIED",
        MARGIN + 13.0,
        y + 5.2,
        TextOptions::default(),
    )?;
    set_text(canvas, StandardFont::Helvetica, 7.5, theme.muted);
    let detail = format!(
        "Quotation {} generated electronically on {}",
        ctx.data.invoice_number,
        quote_text::format_timestamp(ctx.generated_at)
    );
    let detail = fit(canvas, &detail, CONTENT_WIDTH - 17.0);
    canvas.text(&detail, MARGIN + 13.0, y + 9.5, TextOptions::default())?;
    Ok(y + BADGE_HEIGHT + BLOCK_GAP)
}

fn render_signature_box<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    x: f64,
    top: f64,
    heading: &str,
    caption: &str,
) -> Result<()> {
    let theme = &ctx.theme;
    canvas.set_stroke_color(theme.border);
    canvas.set_line_width(0.3);
    canvas.rounded_rect(
        Rect::new(x, top, SIGNATURE_WIDTH, SIGNATURE_HEIGHT),
        2.0,
        Paint::Stroke,
    )?;

    set_text(canvas, StandardFont::HelveticaBold, 9.0, theme.text);
    let heading = fit(canvas, heading, SIGNATURE_WIDTH - 8.0);
    canvas.text(&heading, x + 4.0, top + 6.0, TextOptions::default())?;

    let line_y = top + SIGNATURE_HEIGHT - 8.0;
    canvas.set_stroke_color(theme.muted);
    canvas.line(x + 4.0, line_y, x + SIGNATURE_WIDTH - 4.0, line_y)?;

    set_text(canvas, StandardFont::Helvetica, 8.0, theme.muted);
    let caption = fit(canvas, caption, SIGNATURE_WIDTH - 8.0);
    canvas.text(
        &caption,
        x + SIGNATURE_WIDTH / 2.0,
        line_y + 4.5,
        TextOptions::align(Align::Center),
    )?;
    Ok(())
}

fn render_signatures<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    pager: &Pager,
    cursor: f64,
) -> Result<f64> {
    let y = pager.ensure_space(canvas, cursor, SIGNATURE_HEIGHT + BLOCK_GAP)?;
    render_signature_box(
        canvas,
        ctx,
        MARGIN,
        y,
        &format!("For {}", ctx.options.company_name()),
        "Authorized Signatory",
    )?;
    render_signature_box(
        canvas,
        ctx,
        MARGIN + CONTENT_WIDTH - SIGNATURE_WIDTH,
        y,
        "Customer Acceptance",
        &ctx.data.customer_name,
    )?;
    Ok(y + SIGNATURE_HEIGHT + BLOCK_GAP)
}

pub fn render_closing<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    pager: &Pager,
    cursor: f64,
) -> Result<f64> {
    let mut y = render_text_block(canvas, ctx, pager, "NOTES", &notes_lines(ctx), cursor)?;
    y = render_payment_strip(canvas, ctx, pager, y)?;
    y = render_text_block(
        canvas,
        ctx,
        pager,
        "TERMS & CONDITIONS",
        &terms_lines(ctx),
        y,
    )?;
    y = render_badge(canvas, ctx, pager, y)?;
    y = render_signatures(canvas, ctx, pager, y)?;
    log::debug!(
        "Closing blocks end at {y:.1} on page {}",
        canvas.current_page()
    );
    Ok(y)
}
