//! Image handling for PDF documents

use crate::{PdfError, Result};
use image::{DynamicImage, ImageReader};
use lopdf::{dictionary, Dictionary, Stream};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::{Cursor, Write};

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::ImageError(err.to_string())
    }
}

/// Detected image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// Largest size with the image's aspect ratio that fits a box
///
/// Returns (width, height) in the box's unit. An image with no pixels
/// takes the whole box.
pub fn fit_within(
    original_width: u32,
    original_height: u32,
    box_width: f64,
    box_height: f64,
) -> (f64, f64) {
    if original_width == 0 || original_height == 0 {
        return (box_width, box_height);
    }

    let width_ratio = box_width / original_width as f64;
    let height_ratio = box_height / original_height as f64;
    let scale = width_ratio.min(height_ratio);
    (
        original_width as f64 * scale,
        original_height as f64 * scale,
    )
}

/// Detect image format from magic bytes
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() < 8 {
        return Err(PdfError::ImageError("Image data too short".to_string()));
    }

    // JPEG starts with FF D8 FF
    if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return Ok(ImageFormat::Jpeg);
    }

    // PNG starts with 89 50 4E 47 0D 0A 1A 0A
    if data[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        return Ok(ImageFormat::Png);
    }

    Err(PdfError::ImageError("Unknown image format".to_string()))
}

/// A decoded raster image, ready to be placed on a canvas
///
/// Pixels are 8-bit RGB with an optional separate 8-bit alpha plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

impl RasterImage {
    /// Decode PNG or JPEG bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect_format(data)?;
        let image = ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .decode()?;
        Ok(Self::from_dynamic(&image))
    }

    /// Convert a decoded `image` buffer, keeping alpha only when present
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            let (width, height) = rgba.dimensions();
            Self::from_rgba(width, height, rgba.as_raw())
        } else {
            let rgb = image.to_rgb8();
            let (width, height) = rgb.dimensions();
            Self {
                width,
                height,
                rgb: rgb.into_raw(),
                alpha: None,
            }
        }
    }

    /// Build from straight (non-premultiplied) RGBA pixels
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let mut rgb = Vec::with_capacity(pixels * 3);
        let mut alpha = Vec::with_capacity(pixels);
        for chunk in rgba.chunks_exact(4) {
            rgb.extend_from_slice(&chunk[..3]);
            alpha.push(chunk[3]);
        }
        let opaque = alpha.iter().all(|&a| a == 255);
        Self {
            width,
            height,
            rgb,
            alpha: if opaque { None } else { Some(alpha) },
        }
    }

    /// Content hash used to embed identical images once
    pub(crate) fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.width.hash(&mut hasher);
        self.height.hash(&mut hasher);
        self.rgb.hash(&mut hasher);
        self.alpha.hash(&mut hasher);
        hasher.finish()
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Image XObject for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Image width
    pub width: u32,
    /// Image height
    pub height: u32,
    /// Flate-compressed RGB samples
    pub data: Vec<u8>,
    /// Flate-compressed alpha samples, written as a soft mask
    pub smask: Option<Vec<u8>>,
}

impl ImageXObject {
    /// Compress a raster image for embedding
    pub fn from_raster(image: &RasterImage) -> Result<Self> {
        let expected = (image.width as usize) * (image.height as usize);
        if image.rgb.len() != expected * 3 {
            return Err(PdfError::ImageError(format!(
                "RGB buffer has {} bytes, expected {}",
                image.rgb.len(),
                expected * 3
            )));
        }

        let smask = match &image.alpha {
            Some(alpha) if alpha.len() == expected => Some(deflate(alpha)?),
            Some(alpha) => {
                return Err(PdfError::ImageError(format!(
                    "Alpha buffer has {} bytes, expected {}",
                    alpha.len(),
                    expected
                )))
            }
            None => None,
        };

        Ok(Self {
            width: image.width,
            height: image.height,
            data: deflate(&image.rgb)?,
            smask,
        })
    }

    fn base_dict(&self, color_space: &str) -> Dictionary {
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => color_space,
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        }
    }

    /// Soft mask stream, if the image carries alpha
    pub fn smask_stream(&self) -> Option<Stream> {
        self.smask
            .as_ref()
            .map(|data| Stream::new(self.base_dict("DeviceGray"), data.clone()))
    }

    /// Convert to lopdf Stream object
    ///
    /// The `/SMask` reference is set by the caller once the mask is added.
    pub fn to_pdf_stream(&self) -> Stream {
        Stream::new(self.base_dict("DeviceRGB"), self.data.clone())
    }
}

/// Generate operators to draw image at position
///
/// # Arguments
/// * `image_name` - Image resource name (e.g., "Im1")
/// * `x` - X coordinate in points
/// * `y` - Y coordinate in points (from bottom, PDF coordinates)
/// * `width` - Image width in points
/// * `height` - Image height in points
pub fn generate_image_operators(
    image_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    use crate::text::fmt_num;
    format!(
        "q\n{} 0 0 {} {} {} cm\n/{image_name} Do\nQ\n",
        fmt_num(width),
        fmt_num(height),
        fmt_num(x),
        fmt_num(y)
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_detect_jpeg() {
        let jpeg_header = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(detect_format(&jpeg_header).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_png() {
        let png_header = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(detect_format(&png_header).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_unknown() {
        let unknown = vec![0x00; 8];
        assert!(detect_format(&unknown).is_err());
        assert!(detect_format(&[0xFF, 0xD8]).is_err());
    }

    #[test]
    fn test_decode_opaque_png() {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(4, 2, Rgb([10, 20, 30]));
        let raster = RasterImage::from_bytes(&png_bytes(DynamicImage::ImageRgb8(img))).unwrap();

        assert_eq!(raster.width, 4);
        assert_eq!(raster.height, 2);
        assert_eq!(raster.rgb.len(), 4 * 2 * 3);
        assert_eq!(&raster.rgb[..3], &[10, 20, 30]);
        assert!(raster.alpha.is_none());
    }

    #[test]
    fn test_decode_transparent_png_keeps_alpha() {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(3, 3, Rgba([255, 0, 0, 128]));
        let raster = RasterImage::from_bytes(&png_bytes(DynamicImage::ImageRgba8(img))).unwrap();

        assert_eq!(raster.alpha.as_deref(), Some(&[128u8; 9][..]));
    }

    #[test]
    fn test_from_rgba_drops_opaque_alpha() {
        let raster = RasterImage::from_rgba(1, 1, &[1, 2, 3, 255]);
        assert_eq!(raster.rgb, vec![1, 2, 3]);
        assert!(raster.alpha.is_none());
    }

    #[test]
    fn test_content_hash_differs_by_pixels() {
        let a = RasterImage::from_rgba(1, 1, &[1, 2, 3, 255]);
        let b = RasterImage::from_rgba(1, 1, &[1, 2, 4, 255]);
        assert_ne!(a.content_hash(), b.content_hash());
        assert_eq!(a.content_hash(), a.clone().content_hash());
    }

    #[test]
    fn test_xobject_rejects_short_buffer() {
        let raster = RasterImage {
            width: 2,
            height: 2,
            rgb: vec![0; 3],
            alpha: None,
        };
        assert!(ImageXObject::from_raster(&raster).is_err());
    }

    #[test]
    fn test_xobject_stream_dict() {
        let raster = RasterImage::from_rgba(2, 1, &[0, 0, 0, 0, 255, 255, 255, 255]);
        let xobject = ImageXObject::from_raster(&raster).unwrap();
        let dict = xobject.to_pdf_stream().dict;

        assert_eq!(dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Image");
        assert_eq!(dict.get(b"Width").unwrap().as_i64().unwrap(), 2);
        assert_eq!(
            dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceRGB"
        );
        let mask = xobject.smask_stream().unwrap();
        assert_eq!(
            mask.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceGray"
        );
    }

    #[test]
    fn test_generate_image_operators() {
        let ops = generate_image_operators("Im1", 100.0, 200.0, 50.0, 75.0);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("50 0 0 75 100 200 cm"));
        assert!(ops_str.contains("/Im1 Do"));
    }

    #[test]
    fn test_fit_within_keeps_aspect() {
        assert_eq!(fit_within(800, 600, 100.0, 200.0), (100.0, 75.0));
        assert_eq!(fit_within(600, 800, 200.0, 100.0), (75.0, 100.0));
    }

    #[test]
    fn test_fit_within_empty_image() {
        assert_eq!(fit_within(0, 0, 10.0, 20.0), (10.0, 20.0));
    }
}
