//! Page geometry, colours and page breaking
//!
//! All measurements are millimetres on an A4 page with the origin at the
//! top-left corner.

use crate::stages::watermark::Watermark;
use crate::{LayoutConfig, Result};
use pdf_core::{Canvas, Color};

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 15.0;
pub const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

/// Space kept free at the bottom of every page for the footer band
pub const FOOTER_RESERVE: f64 = 25.0;
/// Extra space kept free on page 1 for QR / signature overlays
pub const OVERLAY_STRIP: f64 = 30.0;
/// Cursor on a continuation page
pub const CONTINUATION_TOP: f64 = 20.0;
/// Gap after each section
pub const SECTION_GAP: f64 = 8.0;

/// Convert a font size in points to millimetres
pub fn pt(size: f64) -> f64 {
    pdf_core::pt_to_mm(size)
}

/// Colour palette shared by all stages
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub brand: Color,
    /// Light brand tint for alternating rows and boxes
    pub brand_tint: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub panel: Color,
    pub success: Color,
    pub alert: Color,
}

impl Theme {
    pub fn from_config(config: &LayoutConfig) -> Result<Self> {
        let (r, g, b) = quote_text::parse_hex_color(&config.brand_color)?;
        let brand = Color::from_rgb(r, g, b);
        Ok(Self {
            brand,
            brand_tint: brand.tint(0.92),
            ..Self::default()
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        let brand = Color::from_rgb(30, 64, 175);
        Self {
            brand,
            brand_tint: brand.tint(0.92),
            text: Color::from_rgb(31, 41, 55),
            muted: Color::from_rgb(107, 114, 128),
            border: Color::from_rgb(209, 213, 219),
            panel: Color::from_rgb(248, 250, 252),
            success: Color::from_rgb(22, 163, 74),
            alert: Color::from_rgb(220, 38, 38),
        }
    }
}

/// Owns page breaks for one render
///
/// A new page always gets its watermark before any foreground content.
pub struct Pager<'a> {
    watermark: &'a Watermark,
    reserve_overlays: bool,
}

impl<'a> Pager<'a> {
    pub fn new(watermark: &'a Watermark, reserve_overlays: bool) -> Self {
        Self {
            watermark,
            reserve_overlays,
        }
    }

    /// Lowest y a flowing block may reach on `page`
    pub fn content_bottom(&self, page: usize) -> f64 {
        let bottom = PAGE_HEIGHT - FOOTER_RESERVE;
        if page == 1 && self.reserve_overlays {
            bottom - OVERLAY_STRIP
        } else {
            bottom
        }
    }

    pub fn fits<C: Canvas + ?Sized>(&self, canvas: &C, cursor: f64, height: f64) -> bool {
        cursor + height <= self.content_bottom(canvas.current_page())
    }

    /// Start a new page, paint its watermark and return the new cursor
    pub fn new_page<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<f64> {
        let page = canvas.add_page();
        self.watermark.paint(canvas)?;
        log::debug!("Page break: started page {page}");
        Ok(CONTINUATION_TOP)
    }

    /// Keep `cursor` when `height` fits, otherwise break the page
    pub fn ensure_space<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        cursor: f64,
        height: f64,
    ) -> Result<f64> {
        if self.fits(canvas, cursor, height) {
            Ok(cursor)
        } else {
            self.new_page(canvas)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::watermark::{ResolvedWatermark, WatermarkMode};
    use pdf_core::{DrawCommand, RecordingCanvas};

    fn draft_watermark() -> Watermark {
        Watermark::new(
            ResolvedWatermark {
                text: "DRAFT".to_string(),
                opacity: 0.1,
                color: Color::from_rgb(128, 128, 128),
                angle: 15.0,
                mode: WatermarkMode::Draft,
            },
            None,
        )
    }

    #[test]
    fn test_content_width() {
        assert_eq!(CONTENT_WIDTH, 180.0);
    }

    #[test]
    fn test_content_bottom_reserves_overlay_strip_on_first_page() {
        let watermark = draft_watermark();
        let pager = Pager::new(&watermark, true);
        assert_eq!(pager.content_bottom(1), 242.0);
        assert_eq!(pager.content_bottom(2), 272.0);

        let pager = Pager::new(&watermark, false);
        assert_eq!(pager.content_bottom(1), 272.0);
    }

    #[test]
    fn test_ensure_space_keeps_cursor_when_fitting() {
        let watermark = draft_watermark();
        let pager = Pager::new(&watermark, false);
        let mut canvas = RecordingCanvas::new();

        assert_eq!(pager.ensure_space(&mut canvas, 100.0, 50.0).unwrap(), 100.0);
        assert_eq!(canvas.page_count(), 1);
    }

    #[test]
    fn test_ensure_space_breaks_and_repaints_watermark() {
        let watermark = draft_watermark();
        let pager = Pager::new(&watermark, false);
        let mut canvas = RecordingCanvas::new();

        let cursor = pager.ensure_space(&mut canvas, 250.0, 40.0).unwrap();
        assert_eq!(cursor, CONTINUATION_TOP);
        assert_eq!(canvas.page_count(), 2);
        assert_eq!(canvas.texts_on(2), vec!["DRAFT"]);
        assert!(matches!(canvas.commands()[0], DrawCommand::AddPage(2)));
    }

    #[test]
    fn test_theme_from_config() {
        let theme = Theme::from_config(&LayoutConfig {
            brand_color: "#ff0000".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(theme.brand, Color::red());
        assert!(Theme::from_config(&LayoutConfig {
            brand_color: "nope".to_string(),
            ..Default::default()
        })
        .is_err());
    }
}
