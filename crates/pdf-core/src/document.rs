//! PDF Document builder

use crate::canvas::{check_finite, Canvas, PageSize, Paint, Rect, TextOptions};
use crate::font::{encode_win_ansi, StandardFont};
use crate::image::{generate_image_operators, ImageXObject, RasterImage};
use crate::text::{fmt_num, generate_text_operators, hex_string, TextRenderContext};
use crate::{mm_to_pt, PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

/// Bezier control distance for quarter circles
const KAPPA: f64 = 0.552_284_749_8;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Blend towards white; `amount` 0.0 keeps the colour, 1.0 gives white
    pub fn tint(&self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: f32| c + (1.0 - c) * amount;
        Self::rgb(mix(self.r), mix(self.g), mix(self.b))
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Red color
    pub fn red() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }

    fn operands(&self) -> String {
        format!(
            "{} {} {}",
            fmt_num(self.r as f64),
            fmt_num(self.g as f64),
            fmt_num(self.b as f64)
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Document information dictionary entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    /// PDF date string, e.g. `D:20240115103000Z`
    pub creation_date: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    fill: Color,
    stroke: Color,
    text: Color,
    line_width: f64,
    font: StandardFont,
    font_size: f64,
    opacity: f64,
}

impl Default for GraphicsState {
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

/// Buffered content and resources of one page
#[derive(Debug, Default)]
struct PageBuffer {
    content: Vec<u8>,
    fonts: BTreeSet<StandardFont>,
    /// Resource name -> index into `PdfDocument::images`
    images: BTreeMap<String, usize>,
    /// Resource name -> opacity
    ext_states: BTreeMap<String, f64>,
}

/// An in-memory PDF that implements [`Canvas`]
///
/// Drawing is buffered per page; the `lopdf` object graph is only built by
/// [`PdfDocument::to_bytes`] or [`PdfDocument::save`]. Every primitive is
/// wrapped in its own `q`/`Q` pair, so pages never depend on each other's
/// graphics state.
pub struct PdfDocument {
    page_size: PageSize,
    pages: Vec<PageBuffer>,
    current: usize,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    /// Embedded images, deduplicated by content hash
    images: Vec<RasterImage>,
    image_index: HashMap<u64, usize>,
    info: DocumentInfo,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    /// Create an A4 document with one blank page
    pub fn new() -> Self {
        Self::with_page_size(PageSize::A4)
    }

    pub fn with_page_size(page_size: PageSize) -> Self {
        Self {
            page_size,
            pages: vec![PageBuffer::default()],
            current: 1,
            state: GraphicsState::default(),
            stack: Vec::new(),
            images: Vec::new(),
            image_index: HashMap::new(),
            info: DocumentInfo::default(),
        }
    }

    /// Set the document information dictionary
    pub fn set_info(&mut self, info: DocumentInfo) {
        self.info = info;
    }

    /// Number of distinct images embedded so far
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    fn page_mut(&mut self) -> &mut PageBuffer {
        // `current` is always within 1..=pages.len()
        let index = self.current - 1;
        &mut self.pages[index]
    }

    fn x(&self, mm: f64) -> f64 {
        mm_to_pt(mm)
    }

    fn y(&self, mm: f64) -> f64 {
        mm_to_pt(self.page_size.height - mm)
    }

    fn point(&self, x: f64, y: f64) -> String {
        format!("{} {}", fmt_num(self.x(x)), fmt_num(self.y(y)))
    }

    /// Register the current opacity on this page and return its `gs` operator
    fn opacity_operator(&mut self) -> Option<String> {
        let opacity = self.state.opacity;
        if opacity >= 1.0 {
            return None;
        }
        let name = format!("GS{}", (opacity * 1000.0).round() as u32);
        self.page_mut().ext_states.insert(name.clone(), opacity);
        Some(format!("/{name} gs\n"))
    }

    /// Wrap path operators with colours, line width and opacity
    fn emit_path(&mut self, path: String, paint: Paint) {
        let mut ops = String::from("q\n");
        if let Some(gs) = self.opacity_operator() {
            ops.push_str(&gs);
        }
        match paint {
            Paint::Fill => {
                ops.push_str(&format!("{} rg\n", self.state.fill.operands()));
            }
            Paint::Stroke => {
                ops.push_str(&format!("{} RG\n", self.state.stroke.operands()));
                ops.push_str(&format!("{} w\n", fmt_num(mm_to_pt(self.state.line_width))));
            }
            Paint::FillStroke => {
                ops.push_str(&format!("{} rg\n", self.state.fill.operands()));
                ops.push_str(&format!("{} RG\n", self.state.stroke.operands()));
                ops.push_str(&format!("{} w\n", fmt_num(mm_to_pt(self.state.line_width))));
            }
        }
        ops.push_str(&path);
        ops.push_str(match paint {
            Paint::Fill => "f\n",
            Paint::Stroke => "S\n",
            Paint::FillStroke => "B\n",
        });
        ops.push_str("Q\n");
        self.page_mut().content.extend_from_slice(ops.as_bytes());
    }

    fn curve(&self, c1: (f64, f64), c2: (f64, f64), end: (f64, f64)) -> String {
        format!(
            "{} {} {} c\n",
            self.point(c1.0, c1.1),
            self.point(c2.0, c2.1),
            self.point(end.0, end.1)
        )
    }

    /// Index of an image, embedding it on first use
    fn get_or_create_image(&mut self, image: &RasterImage) -> usize {
        let hash = image.content_hash();
        if let Some(&index) = self.image_index.get(&hash) {
            return index;
        }
        self.images.push(image.clone());
        let index = self.images.len() - 1;
        self.image_index.insert(hash, index);
        log::debug!(
            "Embedding image {}x{} as Im{}",
            image.width,
            image.height,
            index + 1
        );
        index
    }

    /// Save the document to a file
    ///
    /// # Arguments
    /// * `path` - Output file path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Serialise the document to PDF bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = self.build()?;
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        log::debug!(
            "Serialised {} page(s), {} image(s), {} bytes",
            self.pages.len(),
            self.images.len(),
            buffer.len()
        );
        Ok(buffer)
    }

    fn build(&self) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut font_ids: BTreeMap<StandardFont, ObjectId> = BTreeMap::new();
        for font in self.pages.iter().flat_map(|p| p.fonts.iter()) {
            if font_ids.contains_key(font) {
                continue;
            }
            let id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            font_ids.insert(*font, id);
        }

        let mut image_ids = Vec::with_capacity(self.images.len());
        for image in &self.images {
            let xobject = ImageXObject::from_raster(image)?;
            let mut stream = xobject.to_pdf_stream();
            if let Some(mask) = xobject.smask_stream() {
                let mask_id = doc.add_object(mask);
                stream.dict.set("SMask", mask_id);
            }
            image_ids.push(doc.add_object(stream));
        }

        let media_box = vec![
            0.into(),
            0.into(),
            Object::Real(mm_to_pt(self.page_size.width) as f32),
            Object::Real(mm_to_pt(self.page_size.height) as f32),
        ];

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let contents_id = doc.add_object(Stream::new(dictionary! {}, page.content.clone()));

            let mut resources = Dictionary::new();
            if !page.fonts.is_empty() {
                let mut fonts = Dictionary::new();
                for font in &page.fonts {
                    if let Some(&id) = font_ids.get(font) {
                        fonts.set(font.resource_name(), id);
                    }
                }
                resources.set("Font", fonts);
            }
            if !page.images.is_empty() {
                let mut xobjects = Dictionary::new();
                for (name, &index) in &page.images {
                    xobjects.set(name.as_str(), image_ids[index]);
                }
                resources.set("XObject", xobjects);
            }
            if !page.ext_states.is_empty() {
                let mut states = Dictionary::new();
                for (name, &opacity) in &page.ext_states {
                    states.set(
                        name.as_str(),
                        dictionary! {
                            "Type" => "ExtGState",
                            "ca" => Object::Real(opacity as f32),
                            "CA" => Object::Real(opacity as f32),
                        },
                    );
                }
                resources.set("ExtGState", states);
            }

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box.clone(),
                "Resources" => resources,
                "Contents" => contents_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut info = Dictionary::new();
        let entries = [
            ("Title", &self.info.title),
            ("Author", &self.info.author),
            ("Subject", &self.info.subject),
            ("Creator", &self.info.creator),
            ("CreationDate", &self.info.creation_date),
        ];
        let has_info = entries.iter().any(|(_, value)| value.is_some());
        for (key, value) in entries {
            if let Some(value) = value {
                info.set(key, Object::string_literal(encode_win_ansi(value)));
            }
        }
        if has_info {
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", info_id);
        }

        Ok(doc)
    }
}

impl Canvas for PdfDocument {
    fn page_size(&self) -> PageSize {
        self.page_size
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_page(&self) -> usize {
        self.current
    }

    fn add_page(&mut self) -> usize {
        self.pages.push(PageBuffer::default());
        self.current = self.pages.len();
        self.current
    }

    fn set_page(&mut self, page: usize) -> Result<()> {
        if page == 0 || page > self.pages.len() {
            return Err(PdfError::InvalidPage(page, self.pages.len()));
        }
        self.current = page;
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
        let path = format!(
            "{} {} {} {} re\n",
            fmt_num(self.x(rect.x)),
            fmt_num(self.y(rect.bottom())),
            fmt_num(mm_to_pt(rect.width)),
            fmt_num(mm_to_pt(rect.height))
        );
        self.emit_path(path, paint);
        Ok(())
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f64, paint: Paint) -> Result<()> {
        rect.validate()?;
        check_finite("radius", &[radius])?;
        let r = radius.max(0.0).min(rect.width / 2.0).min(rect.height / 2.0);
        if r == 0.0 {
            return self.rect(rect, paint);
        }

        let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
        let k = r * KAPPA;
        let mut path = format!("{} m\n", self.point(x + r, y));
        path.push_str(&format!("{} l\n", self.point(x + w - r, y)));
        path.push_str(&self.curve((x + w - r + k, y), (x + w, y + r - k), (x + w, y + r)));
        path.push_str(&format!("{} l\n", self.point(x + w, y + h - r)));
        path.push_str(&self.curve(
            (x + w, y + h - r + k),
            (x + w - r + k, y + h),
            (x + w - r, y + h),
        ));
        path.push_str(&format!("{} l\n", self.point(x + r, y + h)));
        path.push_str(&self.curve((x + r - k, y + h), (x, y + h - r + k), (x, y + h - r)));
        path.push_str(&format!("{} l\n", self.point(x, y + r)));
        path.push_str(&self.curve((x, y + r - k), (x + r - k, y), (x + r, y)));
        path.push_str("h\n");
        self.emit_path(path, paint);
        Ok(())
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        check_finite("line", &[x1, y1, x2, y2])?;
        let path = format!("{} m\n{} l\n", self.point(x1, y1), self.point(x2, y2));
        self.emit_path(path, Paint::Stroke);
        Ok(())
    }

    fn circle(&mut self, cx: f64, cy: f64, radius: f64, paint: Paint) -> Result<()> {
        check_finite("circle", &[cx, cy, radius])?;
        if radius < 0.0 {
            return Err(PdfError::InvalidGeometry(format!("circle radius {radius}")));
        }
        let r = radius;
        let k = r * KAPPA;
        let mut path = format!("{} m\n", self.point(cx + r, cy));
        path.push_str(&self.curve((cx + r, cy + k), (cx + k, cy + r), (cx, cy + r)));
        path.push_str(&self.curve((cx - k, cy + r), (cx - r, cy + k), (cx - r, cy)));
        path.push_str(&self.curve((cx - r, cy - k), (cx - k, cy - r), (cx, cy - r)));
        path.push_str(&self.curve((cx + k, cy - r), (cx + r, cy - k), (cx + r, cy)));
        path.push_str("h\n");
        self.emit_path(path, paint);
        Ok(())
    }

    fn text(&mut self, text: &str, x: f64, y: f64, options: TextOptions) -> Result<()> {
        check_finite("text", &[x, y, options.angle])?;
        if text.is_empty() {
            return Ok(());
        }

        let font = self.state.font;
        let size = self.state.font_size;
        let ctx = TextRenderContext {
            font,
            font_size: size,
            text_width: font.text_width_points(text, size),
            angle: options.angle,
            color: self.state.text,
        };
        let text_ops = generate_text_operators(
            &hex_string(&encode_win_ansi(text)),
            self.x(x),
            self.y(y),
            options.align,
            &ctx,
        );

        let gs = self.opacity_operator();
        let page = self.page_mut();
        page.fonts.insert(font);
        page.content.extend_from_slice(b"q\n");
        if let Some(gs) = gs {
            page.content.extend_from_slice(gs.as_bytes());
        }
        page.content.extend_from_slice(&text_ops);
        page.content.extend_from_slice(b"Q\n");
        Ok(())
    }

    fn image(&mut self, image: &RasterImage, rect: Rect) -> Result<()> {
        rect.validate()?;
        if image.width == 0 || image.height == 0 {
            return Err(PdfError::ImageError("Image has no pixels".to_string()));
        }

        let index = self.get_or_create_image(image);
        let name = format!("Im{}", index + 1);
        let ops = generate_image_operators(
            &name,
            self.x(rect.x),
            self.y(rect.bottom()),
            mm_to_pt(rect.width),
            mm_to_pt(rect.height),
        );

        let gs = self.opacity_operator();
        let page = self.page_mut();
        page.images.insert(name, index);
        if let Some(gs) = gs {
            page.content.extend_from_slice(b"q\n");
            page.content.extend_from_slice(gs.as_bytes());
            page.content.extend_from_slice(&ops);
            page.content.extend_from_slice(b"Q\n");
        } else {
            page.content.extend_from_slice(&ops);
        }
        Ok(())
    }

    fn save_state(&mut self) {
        self.stack.push(self.state);
    }

    fn restore_state(&mut self) -> Result<()> {
        self.state = self.stack.pop().ok_or(PdfError::StateUnderflow)?;
        Ok(())
    }

    fn set_opacity(&mut self, opacity: f64) -> Result<()> {
        check_finite("opacity", &[opacity])?;
        self.state.opacity = opacity.clamp(0.0, 1.0);
        Ok(())
    }
}
