//! # Logo Normalization
//!
//! Whatever the profile points at (PNG with alpha, JPEG, ...) is decoded,
//! flattened onto white and re-encoded as baseline JPEG, the one image
//! format both output writers can embed as-is.
//!
//! A missing or undecodable logo never fails a render: the document is
//! produced without it.

use std::fs;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, Rgb, RgbImage};
use tracing::{debug, warn};

/// JPEG quality used when re-encoding logos.
pub const JPEG_QUALITY: u8 = 85;

/// An embeddable logo: opaque RGB JPEG bytes plus pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Logo {
    /// Height in the same unit as `width_units`, keeping the aspect ratio.
    pub fn scaled_height(&self, width_units: f64) -> f64 {
        width_units * self.height as f64 / self.width as f64
    }
}

/// Loads the logo at `path`, or `None` when it is absent or unusable.
pub fn load_logo(path: Option<&str>) -> Option<Logo> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    let path = Path::new(path);

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Logo not readable, rendering without it");
            return None;
        }
    };

    let logo = normalize(&bytes);
    if logo.is_none() {
        warn!(path = %path.display(), "Logo could not be decoded, rendering without it");
    }
    logo
}

/// Decodes any supported image and re-encodes it as opaque JPEG.
pub fn normalize(bytes: &[u8]) -> Option<Logo> {
    let decoded = image::load_from_memory(bytes).ok()?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let flattened = RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    });

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode(flattened.as_raw(), width, height, ColorType::Rgb8)
        .ok()?;

    debug!(width, height, bytes = jpeg.len(), "Normalized logo to JPEG");
    Some(Logo { jpeg, width, height })
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let c = channel as u32;
    let a = alpha as u32;
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn test_png() -> Vec<u8> {
        let img = RgbaImage::from_fn(8, 4, |x, _| {
            if x < 4 {
                Rgba([200, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageOutputFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_png_becomes_jpeg() {
        let logo = normalize(&test_png()).unwrap();
        assert_eq!((logo.width, logo.height), (8, 4));
        assert_eq!(&logo.jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(logo.scaled_height(40.0), 20.0);
    }

    #[test]
    fn test_normalize_is_deterministic() {
        assert_eq!(normalize(&test_png()), normalize(&test_png()));
    }

    #[test]
    fn test_transparency_flattens_to_white() {
        assert_eq!(over_white(0, 0), 255);
        assert_eq!(over_white(200, 255), 200);
    }

    #[test]
    fn test_missing_or_garbage_logo_is_none() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.png");
        assert!(load_logo(Some(missing.to_str().unwrap())).is_none());

        let garbage = dir.path().join("bad.png");
        fs::write(&garbage, b"not an image").unwrap();
        assert!(load_logo(Some(garbage.to_str().unwrap())).is_none());

        assert!(load_logo(None).is_none());
        assert!(load_logo(Some("  ")).is_none());
    }

    #[test]
    fn test_load_logo_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logo.png");
        fs::write(&path, test_png()).unwrap();
        assert!(load_logo(Some(path.to_str().unwrap())).is_some());
    }
}
