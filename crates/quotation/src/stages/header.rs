//! Brand band and quotation meta box

use super::{fit, set_text};
use crate::layout::{MARGIN, PAGE_WIDTH};
use crate::renderer::RenderContext;
use crate::Result;
use pdf_core::{
    fit_within, with_opacity, Align, Canvas, Color, Paint, RasterImage, Rect, StandardFont,
    TextOptions,
};

pub const BAND_HEIGHT: f64 = 40.0;
/// Cursor handed to the next stage
pub const HEADER_BOTTOM: f64 = 50.0;
pub const META_BOX: Rect = Rect {
    x: 135.0,
    y: 8.0,
    width: 60.0,
    height: 26.0,
};
const LOGO_SIZE: f64 = 24.0;

pub fn render_header<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    logo: Option<&RasterImage>,
) -> Result<f64> {
    let theme = &ctx.theme;

    canvas.set_fill_color(theme.brand);
    canvas.rect(Rect::new(0.0, 0.0, PAGE_WIDTH, BAND_HEIGHT), Paint::Fill)?;
    // frosted highlight in the band corner
    with_opacity(canvas, 0.12, |c| {
        c.set_fill_color(Color::white());
        c.circle(PAGE_WIDTH - 20.0, 4.0, 26.0, Paint::Fill)
    })?;

    let mut text_x = MARGIN;
    if let Some(image) = logo {
        let (w, h) = fit_within(image.width, image.height, LOGO_SIZE, LOGO_SIZE);
        let top = (BAND_HEIGHT - h) / 2.0;
        canvas.image(image, Rect::new(MARGIN, top, w, h))?;
        text_x = MARGIN + w + 4.0;
    }
    let text_width = META_BOX.x - text_x - 4.0;

    set_text(canvas, StandardFont::HelveticaBold, 20.0, Color::white());
    let name = fit(canvas, ctx.options.company_name(), text_width);
    canvas.text(&name, text_x, 16.0, TextOptions::default())?;

    set_text(canvas, StandardFont::Helvetica, 9.0, theme.brand_tint);
    let tagline = fit(canvas, ctx.options.tagline(), text_width);
    canvas.text(&tagline, text_x, 23.0, TextOptions::default())?;

    set_text(canvas, StandardFont::Helvetica, 8.0, Color::white());
    let contact = ctx.options.contact_line();
    if !contact.is_empty() {
        let contact = fit(canvas, &contact, text_width);
        canvas.text(&contact, text_x, 29.5, TextOptions::default())?;
    }
    if let Some(address) = ctx.options.address() {
        let address = fit(canvas, address, text_width);
        canvas.text(&address, text_x, 34.0, TextOptions::default())?;
    }

    render_meta_box(canvas, ctx)?;
    log::debug!("Header rendered");
    Ok(HEADER_BOTTOM)
}

fn render_meta_box<C: Canvas + ?Sized>(canvas: &mut C, ctx: &RenderContext) -> Result<()> {
    let theme = &ctx.theme;
    let inner_x = META_BOX.x + 4.0;
    let inner_width = META_BOX.width - 8.0;

    canvas.set_fill_color(Color::white());
    canvas.rounded_rect(META_BOX, 3.0, Paint::Fill)?;

    set_text(canvas, StandardFont::HelveticaBold, 12.0, theme.brand);
    canvas.text(
        "QUOTATION",
        META_BOX.x + META_BOX.width / 2.0,
        META_BOX.y + 7.0,
        TextOptions::align(Align::Center),
    )?;

    set_text(canvas, StandardFont::Helvetica, 8.5, theme.text);
    let rows = [
        format!("No: {}", ctx.data.invoice_number),
        format!("Date: {}", quote_text::format_date(ctx.issue_date())),
        format!("Valid Until: {}", quote_text::format_date(ctx.valid_until()?)),
    ];
    for (i, row) in rows.iter().enumerate() {
        let row = fit(canvas, row, inner_width);
        canvas.text(
            &row,
            inner_x,
            META_BOX.y + 13.0 + i as f64 * 4.8,
            TextOptions::default(),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::*;
    use crate::{Branding, PdfOptions};
    use pdf_core::{DrawCommand, RecordingCanvas};

    #[test]
    fn test_header_texts() {
        let data = sample_data(1);
        let options = PdfOptions::default();
        let ctx = context(&data, &options);
        let mut canvas = RecordingCanvas::new();

        let cursor = render_header(&mut canvas, &ctx, None).unwrap();
        assert_eq!(cursor, HEADER_BOTTOM);

        let texts = canvas.texts_on(1);
        assert!(texts.contains(&"Aluminium & Glass Works"));
        assert!(texts.contains(&"QUOTATION"));
        assert!(texts.contains(&"No: QT-2024-001"));
        assert!(texts.contains(&"Date: 15/01/2024"));
        assert!(texts.contains(&"Valid Until: 14/02/2024"));
    }

    #[test]
    fn test_header_branding_and_logo() {
        let data = sample_data(1);
        let options = PdfOptions {
            branding: Some(Branding {
                company_name: Some("Crystal Glass Co.".to_string()),
                phone: Some("+91 98765 43210".to_string()),
                address: Some("12 MG Road, Pune".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let ctx = context(&data, &options);
        let logo = RasterImage::from_rgba(4, 2, &[255; 32]);
        let mut canvas = RecordingCanvas::new();

        render_header(&mut canvas, &ctx, Some(&logo)).unwrap();

        match canvas.find_text("Crystal Glass Co.") {
            Some(DrawCommand::Text { x, .. }) => assert!((x - (MARGIN + LOGO_SIZE + 4.0)).abs() < 1e-9),
            other => panic!("unexpected {other:?}"),
        }
        assert!(canvas.find_text("+91 98765 43210").is_some());
        assert!(canvas.find_text("12 MG Road, Pune").is_some());
        assert!(canvas
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Image { width: 4, height: 2, .. })));
    }
}
