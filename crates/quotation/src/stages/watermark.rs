//! Page watermark
//!
//! Exactly one watermark mode applies to a document. The explicit
//! watermark wins over confidential, confidential over draft, and draft
//! over the brand watermark. Only the brand watermark carries the logo.

use crate::layout::{pt, Theme, FOOTER_RESERVE, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
use crate::{PdfOptions, Result};
use pdf_core::{
    fit_within, with_opacity, Align, Canvas, Color, Paint, RasterImage, Rect, StandardFont,
    TextOptions,
};

/// Side of the square the logo is fitted into
pub const LOGO_SIZE: f64 = 60.0 * 0.8;
/// Widest the diagonal text may run, in mm
const MAX_TEXT_WIDTH: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatermarkMode {
    Explicit,
    Confidential,
    Draft,
    Brand,
}

/// The watermark chosen for a render
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedWatermark {
    pub text: String,
    pub opacity: f64,
    pub color: Color,
    /// Text rotation in degrees
    pub angle: f64,
    pub mode: WatermarkMode,
}

impl ResolvedWatermark {
    pub fn resolve(options: &PdfOptions, theme: &Theme) -> Result<Self> {
        let gray = Color::from_rgb(128, 128, 128);

        if let Some(watermark) = &options.watermark {
            let color = match &watermark.color {
                Some(hex) => {
                    let (r, g, b) = quote_text::parse_hex_color(hex)?;
                    Color::from_rgb(r, g, b)
                }
                None => gray,
            };
            return Ok(Self {
                text: watermark.text.clone(),
                opacity: watermark.opacity.clamp(0.0, 1.0),
                color,
                angle: 15.0,
                mode: WatermarkMode::Explicit,
            });
        }

        let resolved = if options.confidential {
            Self {
                text: "CONFIDENTIAL".to_string(),
                opacity: 0.08,
                color: theme.alert,
                angle: 15.0,
                mode: WatermarkMode::Confidential,
            }
        } else if options.draft {
            Self {
                text: "DRAFT".to_string(),
                opacity: 0.10,
                color: gray,
                angle: 15.0,
                mode: WatermarkMode::Draft,
            }
        } else {
            Self {
                text: options.company_name().to_uppercase(),
                opacity: 0.05,
                color: theme.brand,
                angle: 45.0,
                mode: WatermarkMode::Brand,
            }
        };
        Ok(resolved)
    }

    pub fn shows_logo(&self) -> bool {
        self.mode == WatermarkMode::Brand
    }
}

/// Logo drawn with the brand watermark
#[derive(Debug, Clone, PartialEq)]
pub enum LogoMark {
    Image(RasterImage),
    /// Drawn when the logo cannot be loaded: a ring with the company initial
    Fallback { initial: String },
}

/// A resolved watermark plus its logo, painted on every page
#[derive(Debug, Clone)]
pub struct Watermark {
    resolved: ResolvedWatermark,
    logo: Option<LogoMark>,
}

fn initial_of(company: &str) -> String {
    company
        .chars()
        .find(|c| c.is_alphanumeric())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "Q".to_string())
}

impl Watermark {
    pub fn new(resolved: ResolvedWatermark, logo: Option<LogoMark>) -> Self {
        Self { resolved, logo }
    }

    /// Resolve the mode and, for the brand watermark only, load the logo
    ///
    /// A failing logo load is logged and replaced by the fallback mark.
    pub fn prepare<F>(options: &PdfOptions, theme: &Theme, load_logo: F) -> Result<Self>
    where
        F: FnOnce() -> Result<RasterImage>,
    {
        let resolved = ResolvedWatermark::resolve(options, theme)?;
        let logo = if resolved.shows_logo() {
            Some(match load_logo() {
                Ok(image) => LogoMark::Image(image),
                Err(e) => {
                    log::warn!("Watermark logo unavailable, drawing fallback mark: {e}");
                    LogoMark::Fallback {
                        initial: initial_of(options.company_name()),
                    }
                }
            })
        } else {
            None
        };
        log::debug!("Watermark mode {:?}", resolved.mode);
        Ok(Self::new(resolved, logo))
    }

    pub fn logo(&self) -> Option<&LogoMark> {
        self.logo.as_ref()
    }

    /// Paint on the current page at the watermark's opacity
    pub fn paint<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<()> {
        with_opacity(canvas, self.resolved.opacity, |c| {
            if let Some(logo) = &self.logo {
                paint_logo(c, logo, self.resolved.color)?;
            }
            paint_text(c, &self.resolved)
        })?;
        Ok(())
    }
}

/// Square the logo occupies, anchored above the footer on the right
fn logo_box() -> Rect {
    Rect::new(
        PAGE_WIDTH - MARGIN - LOGO_SIZE,
        PAGE_HEIGHT - FOOTER_RESERVE - LOGO_SIZE - 5.0,
        LOGO_SIZE,
        LOGO_SIZE,
    )
}

fn paint_logo<C: Canvas + ?Sized>(
    canvas: &mut C,
    logo: &LogoMark,
    color: Color,
) -> pdf_core::Result<()> {
    let area = logo_box();
    match logo {
        LogoMark::Image(image) => {
            let (w, h) = fit_within(image.width, image.height, area.width, area.height);
            let rect = Rect::new(area.right() - w, area.bottom() - h, w, h);
            canvas.image(image, rect)
        }
        LogoMark::Fallback { initial } => {
            let (cx, cy) = (area.x + area.width / 2.0, area.y + area.height / 2.0);
            canvas.set_stroke_color(color);
            canvas.set_line_width(1.5);
            canvas.circle(cx, cy, area.width / 2.0, Paint::Stroke)?;
            canvas.set_font(StandardFont::HelveticaBold, 72.0);
            canvas.set_text_color(color);
            canvas.text(
                initial,
                cx,
                cy + pt(72.0) * 0.35,
                TextOptions::align(Align::Center),
            )
        }
    }
}

fn paint_text<C: Canvas + ?Sized>(
    canvas: &mut C,
    resolved: &ResolvedWatermark,
) -> pdf_core::Result<()> {
    if resolved.text.trim().is_empty() {
        return Ok(());
    }
    let base = match resolved.mode {
        WatermarkMode::Brand => 54.0,
        _ => 72.0,
    };
    let width = StandardFont::HelveticaBold.text_width_mm(&resolved.text, base);
    let size = if width > MAX_TEXT_WIDTH {
        base * MAX_TEXT_WIDTH / width
    } else {
        base
    };

    canvas.set_font(StandardFont::HelveticaBold, size);
    canvas.set_text_color(resolved.color);
    canvas.text(
        &resolved.text,
        PAGE_WIDTH / 2.0,
        PAGE_HEIGHT / 2.0,
        TextOptions::rotated(Align::Center, resolved.angle),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QuotationError, WatermarkOptions};
    use pdf_core::{DrawCommand, RecordingCanvas};
    use pretty_assertions::assert_eq;

    fn resolve(options: &PdfOptions) -> ResolvedWatermark {
        ResolvedWatermark::resolve(options, &Theme::default()).unwrap()
    }

    fn logo() -> RasterImage {
        RasterImage::from_rgba(2, 2, &[0; 16])
    }

    #[test]
    fn test_brand_watermark_by_default() {
        let resolved = resolve(&PdfOptions::default());
        assert_eq!(resolved.mode, WatermarkMode::Brand);
        assert_eq!(resolved.text, "ALUMINIUM & GLASS WORKS");
        assert_eq!(resolved.opacity, 0.05);
        assert_eq!(resolved.angle, 45.0);
        assert!(resolved.shows_logo());
    }

    #[test]
    fn test_precedence() {
        let mut options = PdfOptions {
            draft: true,
            ..Default::default()
        };
        assert_eq!(resolve(&options).mode, WatermarkMode::Draft);

        options.confidential = true;
        let resolved = resolve(&options);
        assert_eq!(resolved.mode, WatermarkMode::Confidential);
        assert_eq!(resolved.text, "CONFIDENTIAL");
        assert_eq!(resolved.color, Theme::default().alert);

        options.watermark = Some(WatermarkOptions {
            text: "SAMPLE".to_string(),
            opacity: 0.3,
            color: Some("#00ff00".to_string()),
        });
        let resolved = resolve(&options);
        assert_eq!(resolved.mode, WatermarkMode::Explicit);
        assert_eq!(resolved.text, "SAMPLE");
        assert_eq!(resolved.color, Color::from_rgb(0, 255, 0));
        assert!(!resolved.shows_logo());
    }

    #[test]
    fn test_explicit_watermark_bad_colour() {
        let options = PdfOptions {
            watermark: Some(WatermarkOptions {
                text: "X".to_string(),
                opacity: 0.1,
                color: Some("oops".to_string()),
            }),
            ..Default::default()
        };
        assert!(matches!(
            ResolvedWatermark::resolve(&options, &Theme::default()),
            Err(QuotationError::TextError(_))
        ));
    }

    #[test]
    fn test_logo_not_loaded_for_draft() {
        let options = PdfOptions {
            draft: true,
            ..Default::default()
        };
        let watermark = Watermark::prepare(&options, &Theme::default(), || {
            panic!("logo must not be loaded")
        })
        .unwrap();
        assert_eq!(watermark.logo(), None);
    }

    #[test]
    fn test_failed_logo_uses_fallback() {
        let watermark = Watermark::prepare(&PdfOptions::default(), &Theme::default(), || {
            Err(QuotationError::AssetError("offline".to_string()))
        })
        .unwrap();
        assert_eq!(
            watermark.logo(),
            Some(&LogoMark::Fallback {
                initial: "A".to_string()
            })
        );

        let mut canvas = RecordingCanvas::new();
        watermark.paint(&mut canvas).unwrap();
        assert!(canvas
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Circle { radius, .. } if *radius == LOGO_SIZE / 2.0)));
        assert_eq!(canvas.texts_on(1), vec!["A", "ALUMINIUM & GLASS WORKS"]);
    }

    #[test]
    fn test_paint_brackets_opacity() {
        let watermark = Watermark::prepare(&PdfOptions::default(), &Theme::default(), || {
            Ok(logo())
        })
        .unwrap();
        let mut canvas = RecordingCanvas::new();
        watermark.paint(&mut canvas).unwrap();

        let commands = canvas.commands();
        assert_eq!(commands.first(), Some(&DrawCommand::Save));
        assert_eq!(commands.get(1), Some(&DrawCommand::Opacity(0.05)));
        assert_eq!(commands.last(), Some(&DrawCommand::Restore));
        assert_eq!(canvas.opacity(), 1.0);

        match commands.iter().find(|c| matches!(c, DrawCommand::Image { .. })) {
            Some(DrawCommand::Image { rect, opacity, .. }) => {
                assert_eq!(*opacity, 0.05);
                assert!((rect.right() - (PAGE_WIDTH - MARGIN)).abs() < 1e-9);
                assert!((rect.width - LOGO_SIZE).abs() < 1e-9);
            }
            other => panic!("expected logo image, got {other:?}"),
        }
    }

    #[test]
    fn test_long_text_shrinks() {
        let watermark = Watermark::new(
            ResolvedWatermark {
                text: "THIS IS A VERY LONG WATERMARK TEXT FOR A PAGE".to_string(),
                opacity: 0.1,
                color: Color::black(),
                angle: 15.0,
                mode: WatermarkMode::Explicit,
            },
            None,
        );
        let mut canvas = RecordingCanvas::new();
        watermark.paint(&mut canvas).unwrap();

        match canvas.find_text("THIS IS A VERY LONG WATERMARK TEXT FOR A PAGE") {
            Some(DrawCommand::Text {
                size, angle, align, ..
            }) => {
                assert!(*size < 72.0);
                assert_eq!(*angle, 15.0);
                assert_eq!(*align, Align::Center);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
