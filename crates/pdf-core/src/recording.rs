//! In-memory canvas that records drawing commands
//!
//! Layout code is written against [`Canvas`], so tests can render into a
//! `RecordingCanvas` and assert on what was drawn, where, and on which page.

use crate::canvas::{check_finite, Canvas, PageSize, Paint, Rect, TextOptions};
use crate::document::Color;
use crate::font::StandardFont;
use crate::image::RasterImage;
use crate::{Align, PdfError, Result};

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    AddPage(usize),
    SetPage(usize),
    Rect {
        page: usize,
        rect: Rect,
        paint: Paint,
        fill: Color,
        opacity: f64,
    },
    RoundedRect {
        page: usize,
        rect: Rect,
        radius: f64,
        paint: Paint,
        fill: Color,
        opacity: f64,
    },
    Line {
        page: usize,
        from: (f64, f64),
        to: (f64, f64),
    },
    Circle {
        page: usize,
        center: (f64, f64),
        radius: f64,
        paint: Paint,
    },
    Text {
        page: usize,
        text: String,
        x: f64,
        y: f64,
        align: Align,
        angle: f64,
        font: StandardFont,
        size: f64,
        color: Color,
        opacity: f64,
    },
    Image {
        page: usize,
        rect: Rect,
        width: u32,
        height: u32,
        opacity: f64,
    },
    Opacity(f64),
    Save,
    Restore,
}

impl DrawCommand {
    /// Page the command drew on, if it is a drawing operation
    pub fn page(&self) -> Option<usize> {
        match self {
            DrawCommand::Rect { page, .. }
            | DrawCommand::RoundedRect { page, .. }
            | DrawCommand::Line { page, .. }
            | DrawCommand::Circle { page, .. }
            | DrawCommand::Text { page, .. }
            | DrawCommand::Image { page, .. } => Some(*page),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct State {
    fill: Color,
    stroke: Color,
    text: Color,
    line_width: f64,
    font: StandardFont,
    font_size: f64,
    opacity: f64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            fill: Color::black(),
            stroke: Color::black(),
            text: Color::black(),
            line_width: 0.2,
            font: StandardFont::Helvetica,
            font_size: 10.0,
            opacity: 1.0,
        }
    }
}

/// A [`Canvas`] that keeps every operation in a list
#[derive(Debug)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    pages: usize,
    current: usize,
    state: State,
    stack: Vec<State>,
    page_size: PageSize,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingCanvas {
    /// Create a canvas with one A4 page
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            pages: 1,
            current: 1,
            state: State::default(),
            stack: Vec::new(),
            page_size: PageSize::A4,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text strings drawn on `page`, in drawing order
    pub fn texts_on(&self, page: usize) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { page: p, text, .. } if *p == page => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All text strings on every page
    pub fn all_texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// First text command whose string equals `needle`
    pub fn find_text(&self, needle: &str) -> Option<&DrawCommand> {
        self.commands
            .iter()
            .find(|cmd| matches!(cmd, DrawCommand::Text { text, .. } if text == needle))
    }

    /// Current opacity
    pub fn opacity(&self) -> f64 {
        self.state.opacity
    }

    /// Depth of the saved-state stack
    pub fn state_depth(&self) -> usize {
        self.stack.len()
    }
}

impl Canvas for RecordingCanvas {
    fn page_size(&self) -> PageSize {
        self.page_size
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn current_page(&self) -> usize {
        self.current
    }

    fn add_page(&mut self) -> usize {
        self.pages += 1;
        self.current = self.pages;
        self.commands.push(DrawCommand::AddPage(self.pages));
        self.pages
    }

    fn set_page(&mut self, page: usize) -> Result<()> {
        if page == 0 || page > self.pages {
            return Err(PdfError::InvalidPage(page, self.pages));
        }
        self.current = page;
        self.commands.push(DrawCommand::SetPage(page));
        Ok(())
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke = color;
    }

    fn set_text_color(&mut self, color: Color) {
        self.state.text = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    fn set_font(&mut self, font: StandardFont, size: f64) {
        self.state.font = font;
        self.state.font_size = size;
    }

    fn font(&self) -> (StandardFont, f64) {
        (self.state.font, self.state.font_size)
    }

    fn rect(&mut self, rect: Rect, paint: Paint) -> Result<()> {
        rect.validate()?;
        self.commands.push(DrawCommand::Rect {
            page: self.current,
            rect,
            paint,
            fill: self.state.fill,
            opacity: self.state.opacity,
        });
        Ok(())
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f64, paint: Paint) -> Result<()> {
        rect.validate()?;
        check_finite("radius", &[radius])?;
        self.commands.push(DrawCommand::RoundedRect {
            page: self.current,
            rect,
            radius,
            paint,
            fill: self.state.fill,
            opacity: self.state.opacity,
        });
        Ok(())
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        check_finite("line", &[x1, y1, x2, y2])?;
        self.commands.push(DrawCommand::Line {
            page: self.current,
            from: (x1, y1),
            to: (x2, y2),
        });
        Ok(())
    }

    fn circle(&mut self, cx: f64, cy: f64, radius: f64, paint: Paint) -> Result<()> {
        check_finite("circle", &[cx, cy, radius])?;
        if radius < 0.0 {
            return Err(PdfError::InvalidGeometry(format!("circle radius {radius}")));
        }
        self.commands.push(DrawCommand::Circle {
            page: self.current,
            center: (cx, cy),
            radius,
            paint,
        });
        Ok(())
    }

    fn text(&mut self, text: &str, x: f64, y: f64, options: TextOptions) -> Result<()> {
        check_finite("text", &[x, y, options.angle])?;
        self.commands.push(DrawCommand::Text {
            page: self.current,
            text: text.to_string(),
            x,
            y,
            align: options.align,
            angle: options.angle,
            font: self.state.font,
            size: self.state.font_size,
            color: self.state.text,
            opacity: self.state.opacity,
        });
        Ok(())
    }

    fn image(&mut self, image: &RasterImage, rect: Rect) -> Result<()> {
        rect.validate()?;
        self.commands.push(DrawCommand::Image {
            page: self.current,
            rect,
            width: image.width,
            height: image.height,
            opacity: self.state.opacity,
        });
        Ok(())
    }

    fn save_state(&mut self) {
        self.stack.push(self.state);
        self.commands.push(DrawCommand::Save);
    }

    fn restore_state(&mut self) -> Result<()> {
        self.state = self.stack.pop().ok_or(PdfError::StateUnderflow)?;
        self.commands.push(DrawCommand::Restore);
        Ok(())
    }

    fn set_opacity(&mut self, opacity: f64) -> Result<()> {
        check_finite("opacity", &[opacity])?;
        let opacity = opacity.clamp(0.0, 1.0);
        self.state.opacity = opacity;
        self.commands.push(DrawCommand::Opacity(opacity));
        Ok(())
    }
}
