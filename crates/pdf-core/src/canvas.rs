//! Drawing surface abstraction
//!
//! All coordinates are millimetres with the origin at the top-left corner
//! of the page and y growing downwards. Text positions name the baseline.

use crate::document::Color;
use crate::font::StandardFont;
use crate::{Align, PdfError, Result};

/// Physical page size in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// ISO A4 portrait
    pub const A4: PageSize = PageSize {
        width: 210.0,
        height: 297.0,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// How a closed shape is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Paint {
    #[default]
    Fill,
    Stroke,
    FillStroke,
}

/// Axis-aligned rectangle in millimetres, top-left anchored
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check every component is finite and the size is non-negative
    pub fn validate(&self) -> Result<()> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.width < 0.0 || self.height < 0.0 {
            return Err(PdfError::InvalidGeometry(format!("{self:?}")));
        }
        Ok(())
    }
}

/// Options for a single text run
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextOptions {
    pub align: Align,
    /// Rotation in degrees, counter-clockwise around the anchor
    pub angle: f64,
}

impl TextOptions {
    pub fn align(align: Align) -> Self {
        Self { align, angle: 0.0 }
    }

    pub fn rotated(align: Align, angle: f64) -> Self {
        Self { align, angle }
    }
}

pub(crate) fn check_finite(what: &str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(PdfError::InvalidGeometry(format!("{what}: {values:?}")))
    }
}

/// A page-oriented drawing surface
///
/// Colours, line width and font are sticky state. `save_state` and
/// `restore_state` bracket changes, including opacity.
pub trait Canvas {
    fn page_size(&self) -> PageSize;

    /// Number of pages created so far
    fn page_count(&self) -> usize;

    /// 1-based index of the page receiving drawing operations
    fn current_page(&self) -> usize;

    /// Append a page and make it current; returns its 1-based index
    fn add_page(&mut self) -> usize;

    /// Redirect drawing to an existing page
    fn set_page(&mut self, page: usize) -> Result<()>;

    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_text_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn set_font(&mut self, font: StandardFont, size: f64);

    /// Current font and size in points
    fn font(&self) -> (StandardFont, f64);

    /// Width of `text` in millimetres with the current font
    fn text_width(&self, text: &str) -> f64 {
        let (font, size) = self.font();
        font.text_width_mm(text, size)
    }

    fn rect(&mut self, rect: Rect, paint: Paint) -> Result<()>;
    fn rounded_rect(&mut self, rect: Rect, radius: f64, paint: Paint) -> Result<()>;
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()>;
    fn circle(&mut self, cx: f64, cy: f64, radius: f64, paint: Paint) -> Result<()>;
    fn text(&mut self, text: &str, x: f64, y: f64, options: TextOptions) -> Result<()>;
    fn image(&mut self, image: &crate::RasterImage, rect: Rect) -> Result<()>;

    fn save_state(&mut self);
    fn restore_state(&mut self) -> Result<()>;

    /// Set fill and stroke alpha for subsequent drawing
    fn set_opacity(&mut self, opacity: f64) -> Result<()>;
}

/// Run `draw` with `opacity` applied, restoring the previous state afterwards
///
/// The state is restored even when `draw` fails; the drawing error wins
/// over a restore error.
pub fn with_opacity<C, F, T>(canvas: &mut C, opacity: f64, draw: F) -> Result<T>
where
    C: Canvas + ?Sized,
    F: FnOnce(&mut C) -> Result<T>,
{
    if !opacity.is_finite() {
        return Err(PdfError::InvalidGeometry(format!("opacity {opacity}")));
    }
    canvas.save_state();
    let result = canvas
        .set_opacity(opacity.clamp(0.0, 1.0))
        .and_then(|_| draw(canvas));
    let restored = canvas.restore_state();
    let value = result?;
    restored?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingCanvas};

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
    }

    #[test]
    fn test_rect_validate() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).validate().is_ok());
        assert!(Rect::new(0.0, 0.0, -1.0, 1.0).validate().is_err());
        assert!(Rect::new(f64::NAN, 0.0, 1.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_a4_default() {
        assert_eq!(PageSize::default(), PageSize::A4);
    }

    #[test]
    fn test_with_opacity_brackets_state() {
        let mut canvas = RecordingCanvas::new();
        with_opacity(&mut canvas, 0.3, |c| c.rect(Rect::new(0.0, 0.0, 5.0, 5.0), Paint::Fill))
            .unwrap();

        let cmds = canvas.commands();
        assert!(matches!(cmds[0], DrawCommand::Save));
        assert!(matches!(cmds[1], DrawCommand::Opacity(o) if (o - 0.3).abs() < 1e-9));
        assert!(matches!(cmds[2], DrawCommand::Rect { .. }));
        assert!(matches!(cmds[3], DrawCommand::Restore));
        assert_eq!(canvas.opacity(), 1.0);
    }

    #[test]
    fn test_with_opacity_restores_on_error() {
        let mut canvas = RecordingCanvas::new();
        let result: Result<()> = with_opacity(&mut canvas, 0.5, |c| {
            c.rect(Rect::new(0.0, 0.0, -5.0, 5.0), Paint::Fill)
        });

        assert!(result.is_err());
        assert!(matches!(canvas.commands().last(), Some(DrawCommand::Restore)));
        assert_eq!(canvas.opacity(), 1.0);
    }

    #[test]
    fn test_with_opacity_clamps() {
        let mut canvas = RecordingCanvas::new();
        with_opacity(&mut canvas, 4.0, |_| Ok(())).unwrap();
        assert!(matches!(canvas.commands()[1], DrawCommand::Opacity(o) if o == 1.0));
        assert!(with_opacity(&mut canvas, f64::NAN, |_| Ok(())).is_err());
    }
}
