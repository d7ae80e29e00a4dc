//! Items table
//!
//! Rows flow across pages; every continuation page repeats the header row.

use super::{centered_baseline, fit, section_title, set_text, SECTION_TITLE_HEIGHT};
use crate::layout::{Pager, CONTENT_WIDTH, MARGIN, SECTION_GAP};
use crate::renderer::RenderContext;
use crate::{QuotationItem, Result};
use pdf_core::{Align, Canvas, Color, Paint, Rect, StandardFont, TextOptions};

pub const HEADER_HEIGHT: f64 = 9.0;
pub const ROW_HEIGHT: f64 = 8.0;
const CELL_PADDING: f64 = 1.5;
const HEADER_FONT_SIZE: f64 = 8.5;
const ROW_FONT_SIZE: f64 = 8.0;

/// A table column: title, width in mm and alignment
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    pub width: f64,
    pub align: Align,
}

const fn column(title: &'static str, width: f64, align: Align) -> Column {
    Column {
        title,
        width,
        align,
    }
}

pub const COLUMNS: [Column; 9] = [
    column("Item", 34.0, Align::Left),
    column("Width", 16.0, Align::Center),
    column("Height", 16.0, Align::Center),
    column("Qty", 10.0, Align::Center),
    column("Glass", 22.0, Align::Center),
    column("Profile", 22.0, Align::Center),
    column("Weight", 18.0, Align::Center),
    column("Rate", 20.0, Align::Right),
    column("Total", 22.0, Align::Right),
];

/// Estimated item weight in kg
pub fn item_weight(item: &QuotationItem, density: f64) -> f64 {
    item.area * density
}

/// Cell strings for one item, in column order
pub fn item_cells(item: &QuotationItem, ctx: &RenderContext) -> [String; 9] {
    let currency = &ctx.options.currency;
    let or_dash = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("-")
            .to_string()
    };
    let name = if item.name.trim().is_empty() {
        item.item_type.label().to_string()
    } else {
        item.name.clone()
    };
    let weight = item_weight(item, ctx.options.layout.table_weight_density);

    [
        name,
        currency.number(item.width, 2),
        currency.number(item.height, 2),
        item.display_quantity().to_string(),
        or_dash(&item.glass_type),
        or_dash(&item.profile_type),
        format!("{} kg", currency.number(weight, 2)),
        currency.number(item.rate, 2),
        currency.number(item.total, 2),
    ]
}

/// Anchor x for text in a column at `left` with the column's alignment
fn anchor(left: f64, column: &Column) -> f64 {
    match column.align {
        Align::Left => left + CELL_PADDING,
        Align::Center => left + column.width / 2.0,
        Align::Right => left + column.width - CELL_PADDING,
    }
}

fn draw_cells<C: Canvas + ?Sized>(canvas: &mut C, cells: &[&str], baseline: f64) -> Result<()> {
    let mut left = MARGIN;
    for (column, cell) in COLUMNS.iter().zip(cells) {
        let cell = fit(canvas, cell, column.width - 2.0 * CELL_PADDING);
        canvas.text(
            &cell,
            anchor(left, column),
            baseline,
            TextOptions::align(column.align),
        )?;
        left += column.width;
    }
    Ok(())
}

fn draw_header_row<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    top: f64,
) -> Result<f64> {
    canvas.set_fill_color(ctx.theme.brand);
    canvas.rect(Rect::new(MARGIN, top, CONTENT_WIDTH, HEADER_HEIGHT), Paint::Fill)?;
    set_text(canvas, StandardFont::HelveticaBold, HEADER_FONT_SIZE, Color::white());
    let titles: Vec<&str> = COLUMNS.iter().map(|c| c.title).collect();
    draw_cells(
        canvas,
        &titles,
        centered_baseline(top, HEADER_HEIGHT, HEADER_FONT_SIZE),
    )?;
    Ok(top + HEADER_HEIGHT)
}

pub fn render_items<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    pager: &Pager,
    cursor: f64,
) -> Result<f64> {
    let theme = &ctx.theme;

    // keep the title with the header row and the first item
    let lead = SECTION_TITLE_HEIGHT + HEADER_HEIGHT + ROW_HEIGHT;
    let cursor = pager.ensure_space(canvas, cursor, lead)?;
    let top = section_title(canvas, ctx, "ITEMS & PRICING", cursor)?;
    let mut y = draw_header_row(canvas, ctx, top)?;

    for (i, item) in ctx.data.items.iter().enumerate() {
        if !pager.fits(canvas, y, ROW_HEIGHT) {
            let top = pager.new_page(canvas)?;
            y = draw_header_row(canvas, ctx, top)?;
        }

        if i % 2 == 1 {
            canvas.set_fill_color(theme.brand_tint);
            canvas.rect(Rect::new(MARGIN, y, CONTENT_WIDTH, ROW_HEIGHT), Paint::Fill)?;
        }
        canvas.set_stroke_color(theme.border);
        canvas.set_line_width(0.2);
        canvas.line(MARGIN, y + ROW_HEIGHT, MARGIN + CONTENT_WIDTH, y + ROW_HEIGHT)?;

        let cells = item_cells(item, ctx);
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        set_text(canvas, StandardFont::Helvetica, ROW_FONT_SIZE, theme.text);
        draw_cells(
            canvas,
            &cells,
            centered_baseline(y, ROW_HEIGHT, ROW_FONT_SIZE),
        )?;
        y += ROW_HEIGHT;
    }

    log::debug!(
        "Items table: {} rows, ends on page {}",
        ctx.data.items.len(),
        canvas.current_page()
    );
    Ok(y + SECTION_GAP)
}
