//! QR code and digital signature overlays on the first page
//!
//! Both sit in the strip above the footer at fixed anchors and ignore the
//! flowing cursor. Encoding and decoding failures only drop the overlay.

use super::{fit, set_text};
use crate::assets::decode_image;
use crate::layout::{FOOTER_RESERVE, MARGIN, OVERLAY_STRIP, PAGE_HEIGHT, PAGE_WIDTH};
use crate::renderer::RenderContext;
use crate::{DigitalSignature, QrCodeOptions, QuotationError, Result};
use image::{DynamicImage, Luma};
use pdf_core::{fit_within, Align, Canvas, RasterImage, Rect, StandardFont, TextOptions};
use qrcode::{EcLevel, QrCode};

pub const QR_SIZE: f64 = 22.0;
const SIGNATURE_IMAGE_WIDTH: f64 = 45.0;
const SIGNATURE_IMAGE_HEIGHT: f64 = 12.0;
const DEFAULT_QR_LABEL: &str = "Scan to view online";
/// Room for the label and URL between the QR code and the signature block
const QR_TEXT_WIDTH: f64 = 60.0;

/// Top of the overlay strip on page 1
pub fn strip_top() -> f64 {
    PAGE_HEIGHT - FOOTER_RESERVE - OVERLAY_STRIP + 3.0
}

/// Encode `data` as a QR code image
pub fn generate_qr_image(data: &str) -> Result<RasterImage> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
        .map_err(|e| QuotationError::QrCodeError(e.to_string()))?;
    let image = code.render::<Luma<u8>>().min_dimensions(200, 200).build();
    Ok(RasterImage::from_dynamic(&DynamicImage::ImageLuma8(image)))
}

/// Stamp the configured overlays on page 1
///
/// Only a page switch failure is returned; overlay failures are logged.
pub fn render_overlays<C: Canvas + ?Sized>(canvas: &mut C, ctx: &RenderContext) -> Result<()> {
    if !ctx.options.has_overlays() {
        return Ok(());
    }
    canvas.set_page(1)?;

    if let Some(qr) = &ctx.options.qr_code {
        if let Err(e) = render_qr(canvas, ctx, qr) {
            log::warn!("QR code overlay skipped: {e}");
        }
    }
    if let Some(signature) = &ctx.options.digital_signature {
        if let Err(e) = render_signature(canvas, ctx, signature) {
            log::warn!("Signature overlay skipped: {e}");
        }
    }
    Ok(())
}

fn render_qr<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    qr: &QrCodeOptions,
) -> Result<()> {
    let image = generate_qr_image(&qr.url)?;
    let top = strip_top();
    canvas.image(&image, Rect::new(MARGIN, top, QR_SIZE, QR_SIZE))?;

    let text_x = MARGIN + QR_SIZE + 3.0;
    let label = qr
        .label
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(DEFAULT_QR_LABEL);
    set_text(canvas, StandardFont::HelveticaBold, 8.5, ctx.theme.text);
    let label = fit(canvas, label, QR_TEXT_WIDTH);
    canvas.text(&label, text_x, top + 9.0, TextOptions::default())?;
    set_text(canvas, StandardFont::Helvetica, 7.0, ctx.theme.muted);
    let url = fit(canvas, &qr.url, QR_TEXT_WIDTH);
    canvas.text(&url, text_x, top + 14.0, TextOptions::default())?;
    Ok(())
}

fn render_signature<C: Canvas + ?Sized>(
    canvas: &mut C,
    ctx: &RenderContext,
    signature: &DigitalSignature,
) -> Result<()> {
    let right = PAGE_WIDTH - MARGIN;
    let top = strip_top();

    if let Some(data) = signature.signature_image.as_deref() {
        match decode_image(data) {
            Ok(image) => {
                let (w, h) = fit_within(
                    image.width,
                    image.height,
                    SIGNATURE_IMAGE_WIDTH,
                    SIGNATURE_IMAGE_HEIGHT,
                );
                let rect = Rect::new(right - w, top + SIGNATURE_IMAGE_HEIGHT - h, w, h);
                canvas.image(&image, rect)?;
            }
            Err(e) => log::warn!("Signature image skipped: {e}"),
        }
    }

    let right_aligned = TextOptions::align(Align::Right);
    set_text(canvas, StandardFont::HelveticaBold, 9.0, ctx.theme.text);
    let name = fit(canvas, &signature.signer_name, 70.0);
    canvas.text(&name, right, top + 17.0, right_aligned)?;

    set_text(canvas, StandardFont::Helvetica, 7.5, ctx.theme.muted);
    if let Some(title) = signature.signer_title.as_deref() {
        let title = fit(canvas, title, 70.0);
        canvas.text(&title, right, top + 21.0, right_aligned)?;
    }
    if let Some(date) = signature.date.as_deref() {
        // unparseable dates are shown as given
        let date = quote_text::parse_date(date)
            .map(|d| quote_text::format_date(d.date()))
            .unwrap_or_else(|_| date.to_string());
        canvas.text(&format!("Signed: {date}"), right, top + 25.0, right_aligned)?;
    }
    Ok(())
}
