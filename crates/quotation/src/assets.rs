//! Logo and image assets
//!
//! Images arrive as data URLs (or bare base64) from the browser app. SVG is
//! rasterized with `resvg`; PNG and JPEG are decoded by `pdf_core`.

use crate::{QuotationError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pdf_core::RasterImage;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, Tree};

/// Logo shipped with the engine, used when branding has none
pub const BUNDLED_LOGO_SVG: &str = include_str!("../assets/logo.svg");

/// Longest side, in pixels, of rasterized SVG logos
pub const LOGO_RASTER_SIZE: u32 = 512;

/// Something that can produce the watermark logo
///
/// Loading happens once per render; failures are absorbed by the caller.
pub trait LogoSource {
    fn load(&self) -> Result<RasterImage>;
}

/// The bundled SVG logo
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledLogo;

impl LogoSource for BundledLogo {
    fn load(&self) -> Result<RasterImage> {
        rasterize_svg(BUNDLED_LOGO_SVG.as_bytes(), LOGO_RASTER_SIZE)
    }
}

/// A logo supplied as a data URL or base64 string
#[derive(Debug, Clone)]
pub struct DataUrlLogo(pub String);

impl LogoSource for DataUrlLogo {
    fn load(&self) -> Result<RasterImage> {
        decode_image(&self.0)
    }
}

/// Decode a `data:<mime>;base64,<payload>` URL or a bare base64 string
///
/// Returns the MIME type, when the URL names one, and the payload bytes.
pub fn decode_data_url(value: &str) -> Result<(Option<String>, Vec<u8>)> {
    let value = value.trim();
    let (mime, payload) = match value.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest.split_once(',').ok_or_else(|| {
                QuotationError::AssetError("data URL has no payload".to_string())
            })?;
            if !header.ends_with(";base64") {
                return Err(QuotationError::AssetError(
                    "only base64 data URLs are supported".to_string(),
                ));
            }
            let mime = header.trim_end_matches(";base64");
            let mime = (!mime.is_empty()).then(|| mime.to_ascii_lowercase());
            (mime, payload)
        }
        None => (None, value),
    };

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| QuotationError::AssetError(format!("invalid base64: {e}")))?;
    Ok((mime, bytes))
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

/// Decode a data URL into pixels, rasterizing SVG when needed
pub fn decode_image(value: &str) -> Result<RasterImage> {
    let (mime, bytes) = decode_data_url(value)?;
    let is_svg = mime.as_deref() == Some("image/svg+xml") || looks_like_svg(&bytes);
    if is_svg {
        rasterize_svg(&bytes, LOGO_RASTER_SIZE)
    } else {
        RasterImage::from_bytes(&bytes)
            .map_err(|e| QuotationError::AssetError(format!("cannot decode image: {e}")))
    }
}

/// Rasterize SVG so its longest side is `max_side` pixels
pub fn rasterize_svg(svg: &[u8], max_side: u32) -> Result<RasterImage> {
    let options = usvg::Options::default();
    let fontdb = usvg::fontdb::Database::new();
    let tree = Tree::from_data(svg, &options, &fontdb)
        .map_err(|e| QuotationError::AssetError(format!("Failed to parse SVG: {e}")))?;

    let size = tree.size();
    let longest = size.width().max(size.height());
    if longest <= 0.0 {
        return Err(QuotationError::AssetError("SVG has no size".to_string()));
    }
    let scale = max_side as f32 / longest;
    let width = ((size.width() * scale).round() as u32).max(1);
    let height = ((size.height() * scale).round() as u32).max(1);

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| QuotationError::AssetError("Failed to create pixmap".to_string()))?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied RGBA
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    log::debug!("Rasterized SVG logo to {width}x{height}");
    Ok(RasterImage::from_rgba(width, height, &rgba))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="20"><rect width="10" height="20" fill="#ff0000"/></svg>"##;

    #[test]
    fn test_decode_data_url() {
        let url = format!("data:image/svg+xml;base64,{}", STANDARD.encode(SQUARE_SVG));
        let (mime, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(mime.as_deref(), Some("image/svg+xml"));
        assert_eq!(bytes, SQUARE_SVG.as_bytes());
    }

    #[test]
    fn test_decode_bare_base64() {
        let (mime, bytes) = decode_data_url(&STANDARD.encode(b"hello")).unwrap();
        assert_eq!(mime, None);
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_decode_data_url_errors() {
        assert!(decode_data_url("data:image/png;base64").is_err());
        assert!(decode_data_url("data:text/plain,hello").is_err());
        assert!(decode_data_url("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_rasterize_svg_keeps_aspect() {
        let image = rasterize_svg(SQUARE_SVG.as_bytes(), 64).unwrap();
        assert_eq!(image.height, 64);
        assert_eq!(image.width, 32);
        // opaque red fill
        assert_eq!(&image.rgb[..3], &[255, 0, 0]);
    }

    #[test]
    fn test_bundled_logo_rasterizes() {
        let image = BundledLogo.load().unwrap();
        assert_eq!(image.width, LOGO_RASTER_SIZE);
        assert!(image.alpha.is_some());
    }

    #[test]
    fn test_decode_image_sniffs_svg_without_mime() {
        let image = decode_image(&STANDARD.encode(SQUARE_SVG)).unwrap();
        assert_eq!(image.width * 2, image.height);
    }

    #[test]
    fn test_data_url_logo_rejects_garbage() {
        let logo = DataUrlLogo(format!("data:image/png;base64,{}", STANDARD.encode(b"nope")));
        assert!(matches!(logo.load(), Err(QuotationError::AssetError(_))));
    }
}
