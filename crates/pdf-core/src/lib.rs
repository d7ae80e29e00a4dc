//! PDF Core - Low-level drawing surface for generated documents
//!
//! This crate provides:
//! - A millimetre-based, top-left-origin [`Canvas`] trait (rectangles,
//!   rounded rectangles, lines, circles, rotated/aligned text, images)
//! - [`PdfDocument`], a `Canvas` that serialises to PDF bytes via `lopdf`
//! - [`RecordingCanvas`], a `Canvas` that records drawing commands so
//!   layouts can be tested without a PDF backend
//! - The PDF standard Helvetica fonts with built-in width metrics
//! - Scoped transparency through [`with_opacity`]
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Canvas, Color, PdfDocument, Rect, Paint, StandardFont, TextOptions};
//!
//! let mut doc = PdfDocument::new();
//! doc.set_fill_color(Color::from_rgb(37, 99, 235));
//! doc.rect(Rect::new(0.0, 0.0, 210.0, 40.0), Paint::Fill)?;
//! doc.set_font(StandardFont::HelveticaBold, 20.0);
//! doc.set_text_color(Color::white());
//! doc.text("ACME Glass", 15.0, 16.0, TextOptions::default())?;
//! let bytes = doc.to_bytes()?;
//! ```

mod canvas;
mod document;
mod font;
mod image;
mod recording;
mod text;

pub use canvas::{with_opacity, Canvas, PageSize, Paint, Rect, TextOptions};
pub use document::{Color, DocumentInfo, PdfDocument};
pub use font::{encode_win_ansi, StandardFont};
pub use image::{fit_within, RasterImage};
pub use recording::{DrawCommand, RecordingCanvas};
pub use text::{generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Graphics state stack is empty")]
    StateUnderflow,

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Millimetres to PDF points
pub const MM_TO_PT: f64 = 72.0 / 25.4;

/// Convert millimetres to points
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * MM_TO_PT
}

/// Convert points to millimetres
pub fn pt_to_mm(pt: f64) -> f64 {
    pt / MM_TO_PT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_pt_round_trip_a4() {
        assert!((mm_to_pt(210.0) - 595.2756).abs() < 0.001);
        assert!((mm_to_pt(297.0) - 841.8898).abs() < 0.001);
        assert!((pt_to_mm(mm_to_pt(42.5)) - 42.5).abs() < 1e-9);
    }

    #[test]
    fn test_align_default() {
        assert_eq!(Align::default(), Align::Left);
    }
}
