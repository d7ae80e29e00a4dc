//! Material and payment summary boxes with the Grand Total bar

use super::{centered_baseline, set_text};
use crate::layout::{pt, CONTENT_WIDTH, MARGIN, SECTION_GAP};
use crate::renderer::RenderContext;
use crate::Result;
use pdf_core::{Align, Canvas, Color, Paint, Rect, StandardFont, TextOptions};

pub const BOX_WIDTH: f64 = 85.0;
pub const LEFT_X: f64 = MARGIN;
pub const RIGHT_X: f64 = MARGIN + CONTENT_WIDTH - BOX_WIDTH;
const TITLE_HEIGHT: f64 = 9.0;
const ROW_HEIGHT: f64 = 6.5;
const PADDING: f64 = 4.0;
const GRAND_BAR_HEIGHT: f64 = 11.0;
const GRAND_LABEL: &str = "Grand Total";
const GRAND_LABEL_SIZE: f64 = 11.0;
const GRAND_TOTAL_SIZE: f64 = 14.0;
const NOTE_FONT_SIZE: f64 = 7.5;
const NOTE_LINE_HEIGHT: f64 = 3.5;
const WORDS_FONT_SIZE: f64 = 8.5;
const WORDS_LINE_HEIGHT: f64 = 4.5;

/// Colour role of a summary value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Success,
    Alert,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
    pub tone: Tone,
}

fn row(label: &str, value: String, tone: Tone) -> SummaryRow {
    SummaryRow {
        label: label.to_string(),
        value,
        tone,
    }
}

/// Rows of the material box
pub fn material_rows(ctx: &RenderContext) -> Vec<SummaryRow> {
    let layout = &ctx.options.layout;
    let currency = &ctx.options.currency;
    let area = ctx.data.total_area();
    vec![
        row(
            "Total Area",
            format!("{} {}", currency.number(area, 2), layout.area_unit),
            Tone::Normal,
        ),
        row(
            "Frame Weight",
            format!(
                "{} kg",
                currency.number(area * layout.summary_weight_density, 2)
            ),
            Tone::Normal,
        ),
        row("Items", ctx.data.items.len().to_string(), Tone::Normal),
    ]
}

/// Rows of the payment box, above the Grand Total bar
///
/// Discount, advance and round-off appear only when supplied. Balance Due
/// appears when a discount or an advance is present.
pub fn payment_rows(ctx: &RenderContext) -> Vec<SummaryRow> {
    let data = ctx.data;
    let currency = &ctx.options.currency;

    let mut rows = vec![
        row("Subtotal", currency.format(data.subtotal), Tone::Normal),
        row("Tax", currency.format(data.tax), Tone::Normal),
    ];
    if let Some(discount) = data.discount {
        rows.push(row(
            "Discount",
            format!("- {}", currency.format(discount)),
            Tone::Normal,
        ));
    }
    if let Some(advance) = data.advance_paid {
        rows.push(row("Advance Paid", currency.format(advance), Tone::Success));
    }
    if let Some(round_off) = data.round_off {
        rows.push(row("Round Off", currency.format(round_off), Tone::Normal));
    }
    if let Some(balance) = data.balance_due() {
        rows.push(row("Balance Due", currency.format(balance), Tone::Alert));
    }
    rows
}

/// Font size for the Grand Total value so it fits `available` mm
///
/// Width grows linearly with size, so one measurement at full size is
/// enough to scale down.
pub fn grand_total_font_size(value: &str, available: f64) -> f64 {
    let width = StandardFont::HelveticaBold.text_width_mm(value, GRAND_TOTAL_SIZE);
    if width <= available {
        GRAND_TOTAL_SIZE
    } else {
        GRAND_TOTAL_SIZE * available / width
    }
}

/// Room for the amount between the label and the bar's right edge
fn grand_total_width() -> f64 {
    let label = StandardFont::HelveticaBold.text_width_mm(GRAND_LABEL, GRAND_LABEL_SIZE);
    BOX_WIDTH - 2.0 * PADDING - label - 3.0
}

fn rate_note_lines(ctx: &RenderContext) -> Vec<String> {
    let note = ctx.options.layout.rate_note.trim();
    if note.is_empty() {
        return Vec::new();
    }
    quote_text::wrap_text(note, BOX_WIDTH - 2.0 * PADDING, |s| {
        StandardFont::HelveticaOblique.text_width_mm(s, NOTE_FONT_SIZE)
    })
}

fn words_lines(ctx: &RenderContext) -> Vec<String> {
    if !ctx.options.layout.amount_in_words {
        return Vec::new();
    }
    let words = format!(
        "Amount in words: {}",
        ctx.options.currency.in_words(ctx.data.grand_total)
    );
    quote_text::wrap_text(&words, CONTENT_WIDTH, |s| {
        StandardFont::HelveticaOblique.text_width_mm(s, WORDS_FONT_SIZE)
    })
}

fn box_height(ctx: &RenderContext) -> f64 {
    let material = TITLE_HEIGHT
        + material_rows(ctx).len() as f64 * ROW_HEIGHT
        + rate_note_lines(ctx).len() as f64 * NOTE_LINE_HEIGHT
        + PADDING;
    let payment = TITLE_HEIGHT
        + payment_rows(ctx).len() as f64 * ROW_HEIGHT
        + GRAND_BAR_HEIGHT
        + PADDING;
    material.max(payment)
}

fn words_height(ctx: &RenderContext) -> f64 {
    match words_lines(ctx).len() {
        0 => 0.0,
        n => 2.0 + n as f64 * WORDS_LINE_HEIGHT,
    }
}

/// Vertical space the summary needs, including the gap after it
///
/// Measured before drawing so the whole summary moves to a new page
/// instead of splitting.
pub fn summary_height(ctx: &RenderContext) -> f64 {
    box_height(ctx) + words_height(ctx) + SECTION_GAP
}

fn tone_color(ctx: &RenderContext, tone: Tone) -> Color {
    match tone {
        Tone::Normal => ctx.theme.text,
        Tone::Success => ctx.theme.success,
        Tone::Alert => ctx.theme.alert,
    }
}

fn draw_box<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    x: f64,
    top: f64,
    height: f64,
    title: &str,
) -> Result<()> {
    canvas.set_fill_color(ctx.theme.panel);
    canvas.set_stroke_color(ctx.theme.border);
    canvas.set_line_width(0.3);
    canvas.rounded_rect(Rect::new(x, top, BOX_WIDTH, height), 2.0, Paint::FillStroke)?;
    set_text(canvas, StandardFont::HelveticaBold, 10.0, ctx.theme.brand);
    canvas.text(title, x + PADDING, top + 6.0, TextOptions::default())?;
    Ok(())
}

fn draw_rows<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    x: f64,
    top: f64,
    rows: &[SummaryRow],
) -> Result<f64> {
    let mut y = top;
    for row in rows {
        let baseline = y + 4.5;
        set_text(canvas, StandardFont::Helvetica, 9.0, ctx.theme.muted);
        canvas.text(&row.label, x + PADDING, baseline, TextOptions::default())?;
        let font = if row.tone == Tone::Normal {
            StandardFont::Helvetica
        } else {
            StandardFont::HelveticaBold
        };
        set_text(canvas, font, 9.0, tone_color(ctx, row.tone));
        canvas.text(
            &row.value,
            x + BOX_WIDTH - PADDING,
            baseline,
            TextOptions::align(Align::Right),
        )?;
        y += ROW_HEIGHT;
    }
    Ok(y)
}

pub fn render_summary<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    cursor: f64,
) -> Result<f64> {
    let height = box_height(ctx);

    // material
    draw_box(canvas, ctx, LEFT_X, cursor, height, "MATERIAL SUMMARY")?;
    let y = draw_rows(canvas, ctx, LEFT_X, cursor + TITLE_HEIGHT, &material_rows(ctx))?;
    set_text(
        canvas,
        StandardFont::HelveticaOblique,
        NOTE_FONT_SIZE,
        ctx.theme.muted,
    );
    for (i, line) in rate_note_lines(ctx).iter().enumerate() {
        let baseline = y + 2.5 + i as f64 * NOTE_LINE_HEIGHT;
        canvas.text(line, LEFT_X + PADDING, baseline, TextOptions::default())?;
    }

    // payment
    draw_box(canvas, ctx, RIGHT_X, cursor, height, "PAYMENT SUMMARY")?;
    let y = draw_rows(canvas, ctx, RIGHT_X, cursor + TITLE_HEIGHT, &payment_rows(ctx))?;
    let bar = Rect::new(RIGHT_X, y + 1.0, BOX_WIDTH, GRAND_BAR_HEIGHT);
    canvas.set_fill_color(ctx.theme.brand);
    canvas.rect(bar, Paint::Fill)?;
    set_text(
        canvas,
        StandardFont::HelveticaBold,
        GRAND_LABEL_SIZE,
        Color::white(),
    );
    canvas.text(
        GRAND_LABEL,
        bar.x + PADDING,
        centered_baseline(bar.y, bar.height, GRAND_LABEL_SIZE),
        TextOptions::default(),
    )?;
    let total = ctx.options.currency.format(ctx.data.grand_total);
    let size = grand_total_font_size(&total, grand_total_width());
    canvas.set_font(StandardFont::HelveticaBold, size);
    canvas.text(
        &total,
        bar.right() - PADDING,
        centered_baseline(bar.y, bar.height, size),
        TextOptions::align(Align::Right),
    )?;

    let mut y = cursor + height;
    let lines = words_lines(ctx);
    if !lines.is_empty() {
        set_text(
            canvas,
            StandardFont::HelveticaOblique,
            WORDS_FONT_SIZE,
            ctx.theme.text,
        );
        y += 2.0;
        for line in &lines {
            y += WORDS_LINE_HEIGHT;
            canvas.text(line, MARGIN, y - pt(WORDS_FONT_SIZE) * 0.25, TextOptions::default())?;
        }
    }

    Ok(y + SECTION_GAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::*;
    use crate::PdfOptions;
    use pdf_core::{DrawCommand, RecordingCanvas};
    use pretty_assertions::assert_eq;

    fn labels(rows: &[SummaryRow]) -> Vec<&str> {
        rows.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn test_basic_payment_rows() {
        let data = sample_data(2);
        let options = PdfOptions::default();
        let ctx = context(&data, &options);
        let rows = payment_rows(&ctx);
        assert_eq!(labels(&rows), vec!["Subtotal", "Tax"]);
        assert_eq!(rows[0].value, "Rs. 18,000.00");
    }

    #[test]
    fn test_advance_adds_balance_due() {
        let mut data = sample_data(2);
        data.advance_paid = Some(5000.0);
        let options = PdfOptions::default();
        let ctx = context(&data, &options);

        let rows = payment_rows(&ctx);
        assert_eq!(
            labels(&rows),
            vec!["Subtotal", "Tax", "Advance Paid", "Balance Due"]
        );
        assert_eq!(rows[2].tone, Tone::Success);
        assert_eq!(rows[3].value, "Rs. 15,000.00");
        assert_eq!(rows[3].tone, Tone::Alert);
    }

    #[test]
    fn test_all_adjustments() {
        let mut data = sample_data(2);
        data.discount = Some(1000.0);
        data.advance_paid = Some(5000.0);
        data.round_off = Some(-0.5);
        let options = PdfOptions::default();
        let ctx = context(&data, &options);

        let rows = payment_rows(&ctx);
        assert_eq!(
            labels(&rows),
            vec![
                "Subtotal",
                "Tax",
                "Discount",
                "Advance Paid",
                "Round Off",
                "Balance Due"
            ]
        );
        assert_eq!(rows[2].value, "- Rs. 1,000.00");
        assert_eq!(rows[5].value, "Rs. 14,000.00");
    }

    #[test]
    fn test_material_rows_use_summary_density() {
        let data = sample_data(2);
        let mut options = PdfOptions::default();
        options.layout.summary_weight_density = 2.0;
        let ctx = context(&data, &options);

        let rows = material_rows(&ctx);
        assert_eq!(rows[0].value, "40.00 sq.ft");
        assert_eq!(rows[1].value, "80.00 kg");
        assert_eq!(rows[2].value, "2");
    }

    #[test]
    fn test_grand_total_font_size() {
        assert_eq!(grand_total_font_size("Rs. 20,000.00", grand_total_width()), 14.0);

        let long = "Rs. 1,23,45,67,89,012.00";
        let size = grand_total_font_size(long, 40.0);
        assert!(size < 14.0);
        assert!(StandardFont::HelveticaBold.text_width_mm(long, size) <= 40.0 + 1e-9);
    }

    #[test]
    fn test_huge_grand_total_clears_label() {
        let mut data = sample_data(1);
        data.grand_total = 1e15;
        let options = PdfOptions::default();
        let ctx = context(&data, &options);

        let total = options.currency.format(data.grand_total);
        let size = grand_total_font_size(&total, grand_total_width());
        let label = StandardFont::HelveticaBold.text_width_mm(GRAND_LABEL, GRAND_LABEL_SIZE);
        let value = StandardFont::HelveticaBold.text_width_mm(&total, size);
        assert!(PADDING + label + value <= BOX_WIDTH - PADDING + 1e-9);

        let mut canvas = RecordingCanvas::new();
        render_summary(&mut canvas, &ctx, 120.0).unwrap();
        assert!(canvas.texts_on(1).contains(&total.as_str()));
    }

    #[test]
    fn test_render_summary_matches_measured_height() {
        let mut data = sample_data(2);
        data.advance_paid = Some(5000.0);
        let options = PdfOptions::default();
        let ctx = context(&data, &options);
        let mut canvas = RecordingCanvas::new();

        let next = render_summary(&mut canvas, &ctx, 120.0).unwrap();
        assert!((next - (120.0 + summary_height(&ctx))).abs() < 1e-9);

        let texts = canvas.texts_on(1);
        assert!(texts.contains(&"Grand Total"));
        assert!(texts.contains(&"Rs. 20,000.00"));
        assert!(texts.contains(&"Amount in words: Rupees Twenty Thousand Only"));

        match canvas.find_text("Rs. 15,000.00") {
            Some(DrawCommand::Text { color, .. }) => assert_eq!(*color, ctx.theme.alert),
            other => panic!("unexpected {other:?}"),
        }
        match canvas.find_text("Rs. 5,000.00") {
            Some(DrawCommand::Text { color, .. }) => assert_eq!(*color, ctx.theme.success),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_amount_in_words_can_be_disabled() {
        let data = sample_data(1);
        let mut options = PdfOptions::default();
        options.layout.amount_in_words = false;
        let ctx = context(&data, &options);
        let mut canvas = RecordingCanvas::new();

        render_summary(&mut canvas, &ctx, 120.0).unwrap();
        assert!(!canvas
            .all_texts()
            .iter()
            .any(|t| t.starts_with("Amount in words")));
    }
}
