//! Quotation renderer
//!
//! Runs the stages in order on one canvas, threading the vertical cursor
//! from stage to stage. Footers are stamped last, once the page count is
//! final.

use crate::assets::{BundledLogo, DataUrlLogo, LogoSource};
use crate::layout::{Pager, Theme};
use crate::stages::{self, Watermark};
use crate::{PdfOptions, QuotationData, QuotationError, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use pdf_core::{Canvas, DocumentInfo, PdfDocument, RasterImage};

/// Everything a stage needs to draw
pub struct RenderContext<'a> {
    pub data: &'a QuotationData,
    pub options: &'a PdfOptions,
    pub theme: Theme,
    /// When the document is generated; drives the footer and disclaimer
    pub generated_at: NaiveDateTime,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        data: &'a QuotationData,
        options: &'a PdfOptions,
        generated_at: NaiveDateTime,
    ) -> Result<Self> {
        Ok(Self {
            data,
            options,
            theme: Theme::from_config(&options.layout)?,
            generated_at,
        })
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.data.date.date()
    }

    /// Issue date plus the configured validity period
    pub fn valid_until(&self) -> Result<NaiveDate> {
        Ok(quote_text::add_days(
            self.issue_date(),
            self.options.layout.validity_days,
        )?)
    }
}

/// Quotation renderer
///
/// # Example
///
/// ```ignore
/// let bytes = QuotationRenderer::new(&data, &options)
///     .with_generated_at(generated_at)
///     .render_to_bytes()?;
/// ```
pub struct QuotationRenderer<'a> {
    data: &'a QuotationData,
    options: &'a PdfOptions,
    logo_source: Option<Box<dyn LogoSource + 'a>>,
    generated_at: Option<NaiveDateTime>,
}

impl<'a> QuotationRenderer<'a> {
    pub fn new(data: &'a QuotationData, options: &'a PdfOptions) -> Self {
        Self {
            data,
            options,
            logo_source: None,
            generated_at: None,
        }
    }

    /// Override where the brand watermark logo comes from
    ///
    /// By default the branding logo is used, or the bundled logo when
    /// branding has none.
    pub fn with_logo_source(mut self, source: impl LogoSource + 'a) -> Self {
        self.logo_source = Some(Box::new(source));
        self
    }

    /// Fix the generation timestamp instead of reading the clock
    pub fn with_generated_at(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    fn generated_at(&self) -> NaiveDateTime {
        self.generated_at
            .unwrap_or_else(|| Local::now().naive_local())
    }

    fn load_watermark_logo(&self, branding_logo: Option<&Result<RasterImage>>) -> Result<RasterImage> {
        if let Some(source) = &self.logo_source {
            return source.load();
        }
        match branding_logo {
            Some(Ok(image)) => Ok(image.clone()),
            Some(Err(e)) => Err(QuotationError::AssetError(e.to_string())),
            None => BundledLogo.load(),
        }
    }

    /// Render into any canvas that starts with a single empty page
    pub fn render_into<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<()> {
        self.render_with(canvas, self.generated_at())
    }

    fn render_with<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        generated_at: NaiveDateTime,
    ) -> Result<()> {
        let ctx = RenderContext::new(self.data, self.options, generated_at)?;

        // decoded once; used by the header and, by default, the watermark
        let branding_logo = self.options.logo().map(|logo| DataUrlLogo(logo.to_string()).load());
        let header_logo = match &branding_logo {
            Some(Ok(image)) => Some(image),
            Some(Err(e)) => {
                log::warn!("Branding logo unavailable, header drawn without it: {e}");
                None
            }
            None => None,
        };

        let watermark = Watermark::prepare(self.options, &ctx.theme, || {
            self.load_watermark_logo(branding_logo.as_ref())
        })?;
        let pager = Pager::new(&watermark, self.options.has_overlays());

        watermark.paint(canvas)?;
        let mut cursor = stages::render_header(canvas, &ctx, header_logo)?;
        cursor = stages::render_customer(canvas, &ctx, cursor)?;
        cursor = stages::render_items(canvas, &ctx, &pager, cursor)?;
        log::debug!("Table done at {cursor:.1} on page {}", canvas.current_page());

        // the summary never splits
        cursor = pager.ensure_space(canvas, cursor, stages::summary_height(&ctx))?;
        cursor = stages::render_summary(canvas, &ctx, cursor)?;
        stages::render_closing(canvas, &ctx, &pager, cursor)?;

        stages::render_overlays(canvas, &ctx)?;
        stages::render_footers(canvas, &ctx)?;
        Ok(())
    }

    /// Render to PDF bytes
    pub fn render_to_bytes(&self) -> Result<Vec<u8>> {
        let generated_at = self.generated_at();
        let mut doc = PdfDocument::new();
        doc.set_info(DocumentInfo {
            title: Some(format!("Quotation {}", self.data.invoice_number)),
            author: Some(self.options.company_name().to_string()),
            subject: Some(format!("Quotation for {}", self.data.customer_name)),
            creator: Some(self.options.layout.attribution.clone()),
            creation_date: Some(generated_at.format("D:%Y%m%d%H%M%S").to_string()),
        });

        self.render_with(&mut doc, generated_at)?;
        let bytes = doc.to_bytes()?;
        log::info!(
            "Generated quotation {}: {} pages, {} bytes",
            self.data.invoice_number,
            doc.page_count(),
            bytes.len()
        );
        Ok(bytes)
    }
}

/// Generate a quotation PDF
///
/// Logo, QR code and signature problems are absorbed; any other failure
/// is reported as [`QuotationError::GenerationFailed`] with the cause as
/// its source.
pub fn generate_quotation_pdf(data: &QuotationData, options: &PdfOptions) -> Result<Vec<u8>> {
    QuotationRenderer::new(data, options)
        .render_to_bytes()
        .map_err(|e| {
            log::error!("Quotation generation failed: {e}");
            QuotationError::GenerationFailed(Box::new(e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::sample_data;
    use crate::stages::watermark::LOGO_SIZE;
    use pdf_core::{DrawCommand, RecordingCanvas};

    struct FailingLogo;

    impl LogoSource for FailingLogo {
        fn load(&self) -> Result<RasterImage> {
            Err(QuotationError::AssetError("network unreachable".to_string()))
        }
    }

    struct CountingLogo<'a>(&'a std::cell::Cell<usize>);

    impl LogoSource for CountingLogo<'_> {
        fn load(&self) -> Result<RasterImage> {
            self.0.set(self.0.get() + 1);
            Ok(RasterImage::from_rgba(1, 1, &[0, 0, 0, 255]))
        }
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 16)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap()
    }

    fn render(data: &QuotationData, options: &PdfOptions) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new();
        QuotationRenderer::new(data, options)
            .with_logo_source(FailingLogo)
            .with_generated_at(generated_at())
            .render_into(&mut canvas)
            .unwrap();
        canvas
    }

    fn page_of(canvas: &RecordingCanvas, text: &str) -> Option<usize> {
        canvas.find_text(text).and_then(DrawCommand::page)
    }

    #[test]
    fn test_valid_until() {
        let data = sample_data(1);
        let options = PdfOptions::default();
        let ctx = RenderContext::new(&data, &options, generated_at()).unwrap();
        assert_eq!(ctx.valid_until().unwrap(), NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
    }

    #[test]
    fn test_few_items_single_page() {
        let data = sample_data(2);
        let canvas = render(&data, &PdfOptions::default());
        assert_eq!(canvas.page_count(), 1);
        assert_eq!(page_of(&canvas, "PAYMENT SUMMARY"), Some(1));
        assert_eq!(page_of(&canvas, "Page 1 of 1"), Some(1));
    }

    #[test]
    fn test_summary_moves_to_second_page() {
        let data = sample_data(15);
        let options = PdfOptions {
            draft: true,
            ..Default::default()
        };
        let canvas = render(&data, &options);

        assert_eq!(canvas.page_count(), 2);
        assert_eq!(page_of(&canvas, "Sliding Window 15"), Some(1));
        assert_eq!(page_of(&canvas, "PAYMENT SUMMARY"), Some(2));
        assert_eq!(canvas.texts_on(2)[0], "DRAFT");
        assert!(canvas.texts_on(2).contains(&"Page 2 of 2"));
        assert!(canvas.texts_on(1).contains(&"Page 1 of 2"));
    }

    #[test]
    fn test_failing_logo_falls_back() {
        let data = sample_data(1);
        let canvas = render(&data, &PdfOptions::default());
        assert!(canvas.commands().iter().any(
            |c| matches!(c, DrawCommand::Circle { radius, .. } if *radius == LOGO_SIZE / 2.0)
        ));
        assert!(canvas.texts_on(1).contains(&"A"));
    }

    #[test]
    fn test_logo_loaded_once_and_not_for_draft() {
        let data = sample_data(20);
        let calls = std::cell::Cell::new(0);

        let mut canvas = RecordingCanvas::new();
        QuotationRenderer::new(&data, &PdfOptions::default())
            .with_logo_source(CountingLogo(&calls))
            .with_generated_at(generated_at())
            .render_into(&mut canvas)
            .unwrap();
        assert!(canvas.page_count() > 1);
        assert_eq!(calls.get(), 1);

        let draft = PdfOptions {
            draft: true,
            ..Default::default()
        };
        let mut canvas = RecordingCanvas::new();
        QuotationRenderer::new(&data, &draft)
            .with_logo_source(CountingLogo(&calls))
            .render_into(&mut canvas)
            .unwrap();
        assert_eq!(calls.get(), 1);
        assert!(!canvas
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Image { .. })));
    }

    #[test]
    fn test_broken_branding_logo_is_absorbed() {
        let data = sample_data(1);
        let options = PdfOptions {
            branding: Some(crate::Branding {
                logo: Some("data:image/png;base64,AAAA".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut canvas = RecordingCanvas::new();
        QuotationRenderer::new(&data, &options)
            .with_generated_at(generated_at())
            .render_into(&mut canvas)
            .unwrap();
        // fallback mark instead of any image
        assert!(!canvas
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Image { .. })));
        assert!(canvas.commands().iter().any(
            |c| matches!(c, DrawCommand::Circle { radius, .. } if *radius == LOGO_SIZE / 2.0)
        ));
    }

    #[test]
    fn test_invalid_brand_colour_fails_generation() {
        let data = sample_data(1);
        let mut options = PdfOptions::default();
        options.layout.brand_color = "#12".to_string();
        let err = generate_quotation_pdf(&data, &options).unwrap_err();
        assert!(matches!(err, QuotationError::GenerationFailed(_)));
    }
}
