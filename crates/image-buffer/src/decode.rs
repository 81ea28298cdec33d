//! Base64 and container decoding.

use std::io::Cursor;
use std::path::Path;

use base64::Engine as _;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use slidetrack_challenge_model::ImageDimensions;
use slidetrack_common::SlidetrackError;

/// Errors raised while turning a transport payload into pixels.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("image payload is empty")]
    Empty,

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("undecodable image: {0}")]
    Image(#[from] image::ImageError),

    #[error("image has zero size ({width}x{height})")]
    ZeroSized { width: u32, height: u32 },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<DecodeError> for SlidetrackError {
    fn from(err: DecodeError) -> Self {
        SlidetrackError::decode_from(err)
    }
}

/// A decoded image as an intensity plane plus optional opacity plane.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    gray: GrayImage,
    alpha: Option<GrayImage>,
}

impl DecodedImage {
    /// Split a decoded image into luma and (when present) alpha planes.
    ///
    /// Luma uses the Rec.601 weights.
    pub fn from_dynamic(img: &DynamicImage) -> Result<Self, DecodeError> {
        let (width, height) = (img.width(), img.height());
        if width == 0 || height == 0 {
            return Err(DecodeError::ZeroSized { width, height });
        }

        let rgba = img.to_rgba8();
        let gray = GrayImage::from_fn(width, height, |x, y| {
            let p = rgba.get_pixel(x, y);
            Luma([luma601(p[0], p[1], p[2])])
        });
        let alpha = img
            .color()
            .has_alpha()
            .then(|| GrayImage::from_fn(width, height, |x, y| Luma([rgba.get_pixel(x, y)[3]])));

        Ok(Self { gray, alpha })
    }

    /// Build from planes that are already separated.
    ///
    /// `alpha` must match `gray` in size; a mismatched plane is dropped.
    pub fn from_planes(gray: GrayImage, alpha: Option<GrayImage>) -> Self {
        let alpha = alpha.filter(|a| a.dimensions() == gray.dimensions());
        Self { gray, alpha }
    }

    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }

    pub fn alpha(&self) -> Option<&GrayImage> {
        self.alpha.as_ref()
    }

    pub fn width(&self) -> u32 {
        self.gray.width()
    }

    pub fn height(&self) -> u32 {
        self.gray.height()
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.gray.width(), self.gray.height())
    }
}

fn luma601(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
    y.round().clamp(0.0, 255.0) as u8
}

/// Strip whitespace and an optional `data:<mime>;base64,` prefix.
fn strip_transport_prefix(payload: &str) -> &str {
    let trimmed = payload.trim();
    match trimmed.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, data)| data),
        None => trimmed,
    }
}

/// Decode a base64 payload (plain or data URL) into an image.
pub fn decode_base64(payload: &str) -> Result<DecodedImage, DecodeError> {
    let data = strip_transport_prefix(payload);
    if data.is_empty() {
        return Err(DecodeError::Empty);
    }
    let bytes = base64::engine::general_purpose::STANDARD.decode(data.as_bytes())?;
    decode_bytes(&bytes)
}

/// Decode raw container bytes (PNG, JPEG, ...), sniffing the format.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    let img = image::load_from_memory(bytes)?;
    let decoded = DecodedImage::from_dynamic(&img)?;
    tracing::debug!(
        width = decoded.width(),
        height = decoded.height(),
        alpha = decoded.alpha.is_some(),
        "Decoded image"
    );
    Ok(decoded)
}

/// Read and decode an image file.
pub fn decode_file(path: &Path) -> Result<DecodedImage, DecodeError> {
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Read {
        path: path.display().to_string(),
        source,
    })?;
    decode_bytes(&bytes)
}

/// Encode an image as base64 PNG, the inverse of [`decode_base64`].
pub fn encode_png_base64(img: &DynamicImage) -> Result<String, DecodeError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_rgb_png_has_no_alpha_plane() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([255, 0, 0])));
        let payload = encode_png_base64(&img).unwrap();
        let decoded = decode_base64(&payload).unwrap();
        assert_eq!(decoded.dimensions(), ImageDimensions::new(4, 3));
        assert!(decoded.alpha().is_none());
        assert_eq!(decoded.gray().get_pixel(0, 0)[0], 76);
    }

    #[test]
    fn test_rgba_png_keeps_alpha_plane() {
        let mut rgba = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        rgba.put_pixel(1, 1, Rgba([0, 0, 0, 0]));
        let payload = encode_png_base64(&DynamicImage::ImageRgba8(rgba)).unwrap();

        let decoded = decode_base64(&format!("data:image/png;base64,{payload}")).unwrap();
        let alpha = decoded.alpha().unwrap();
        assert_eq!(alpha.get_pixel(0, 0)[0], 255);
        assert_eq!(alpha.get_pixel(1, 1)[0], 0);
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(decode_base64("***"), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_empty_payload() {
        assert!(matches!(decode_base64("  "), Err(DecodeError::Empty)));
        assert!(matches!(decode_base64("data:image/png;base64,"), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_not_an_image() {
        let payload = base64::engine::general_purpose::STANDARD.encode(b"plain text, not pixels");
        let err = decode_base64(&payload).unwrap_err();
        assert!(matches!(err, DecodeError::Image(_)));
        let top: SlidetrackError = err.into();
        assert!(matches!(top, SlidetrackError::Decode { .. }));
        assert!(matches!(top.cause::<DecodeError>(), Some(DecodeError::Image(_))));
    }

    #[test]
    fn test_from_planes_drops_mismatched_alpha() {
        let gray = GrayImage::new(3, 3);
        let decoded = DecodedImage::from_planes(gray, Some(GrayImage::new(2, 2)));
        assert!(decoded.alpha().is_none());
    }
}
