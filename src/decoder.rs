//! Image decoding and the re-decoding filter passes used by the edge and
//! frequency analyzers.

use image::GrayImage;

use crate::config::EdgeConfig;
use crate::error::{Error, FilterError, Result};
use crate::metadata::{self, ContainerFormat, ContainerMetadata};
use crate::raster::Raster;

/// Output of [`decode`].
#[derive(Debug, Clone)]
pub struct Decoded {
    /// Pixel grid.
    pub raster: Raster,
    /// Container metadata.
    pub metadata: ContainerMetadata,
}

/// Decode raw bytes into a raster and its container metadata.
///
/// # Errors
///
/// Returns [`Error::InputTooLarge`] above `max_input_bytes`, [`Error::DecodeFailed`]
/// for malformed input, [`Error::UnsupportedFormat`] for containers other than
/// JPEG, PNG, WebP, TIFF and GIF, and [`Error::EmptyRaster`] for zero-area images.
pub fn decode(bytes: &[u8], max_input_bytes: u64) -> Result<Decoded> {
    let size = bytes.len() as u64;
    if size > max_input_bytes {
        return Err(Error::InputTooLarge {
            size,
            limit: max_input_bytes,
        });
    }

    let format = image::guess_format(bytes).map_err(Error::DecodeFailed)?;
    let container = ContainerFormat::from(format);
    if container == ContainerFormat::Other {
        let name = format.extensions_str().first().copied().unwrap_or("unknown");
        return Err(Error::UnsupportedFormat(name.to_string()));
    }
    let img = image::load_from_memory_with_format(bytes, format).map_err(Error::DecodeFailed)?;

    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(Error::EmptyRaster { width, height });
    }

    let exif = metadata::parse_exif(bytes);
    let metadata = ContainerMetadata {
        format: container,
        width,
        height,
        has_alpha: img.color().has_alpha(),
        density: exif.as_ref().and_then(metadata::density),
        exif_tags: exif.as_ref().map(metadata::exif_tags).unwrap_or_default(),
        raw_byte_length: size,
    };

    Ok(Decoded {
        raster: Raster::from_image(&img),
        metadata,
    })
}

fn decode_gray(bytes: &[u8]) -> std::result::Result<GrayImage, FilterError> {
    let gray = image::load_from_memory(bytes)?.to_luma8();
    if gray.width() == 0 || gray.height() == 0 {
        return Err(FilterError::EmptyImage);
    }
    Ok(gray)
}

/// Stretch contrast so the `low` and `high` percentiles map to 0 and 255.
///
/// Images whose percentile range collapses to a single value are left unchanged.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn normalize(gray: &mut GrayImage, low: f32, high: f32) {
    let mut histogram = [0_usize; 256];
    for p in gray.pixels() {
        histogram[usize::from(p[0])] += 1;
    }

    let total = gray.as_raw().len();
    let rank = |fraction: f32| ((total as f32 * fraction) as usize).min(total - 1);
    let value_at = |target: usize| -> u8 {
        let mut seen = 0;
        for (value, &count) in histogram.iter().enumerate() {
            seen += count;
            if seen > target {
                return value as u8;
            }
        }
        u8::MAX
    };

    let lo = value_at(rank(low));
    let hi = value_at(rank(high));
    if hi <= lo {
        return;
    }

    let scale = 255.0 / f32::from(hi - lo);
    for p in gray.pixels_mut() {
        let v = f32::from(p[0].clamp(lo, hi) - lo) * scale;
        p[0] = v.round().clamp(0.0, 255.0) as u8;
    }
}

/// Grayscale, normalize and convolve the image with the configured 3x3 kernel.
///
/// # Errors
///
/// Returns a [`FilterError`] if the bytes cannot be re-decoded.
pub fn edge_map(bytes: &[u8], config: &EdgeConfig) -> std::result::Result<Vec<u8>, FilterError> {
    let mut gray = decode_gray(bytes)?;
    normalize(
        &mut gray,
        config.normalize_low_percentile,
        config.normalize_high_percentile,
    );
    let filtered: GrayImage = image::imageops::filter3x3(&gray, &config.kernel);
    Ok(filtered.into_raw())
}

/// Grayscale samples, paired with the same samples after a Gaussian blur.
///
/// # Errors
///
/// Returns a [`FilterError`] if the bytes cannot be re-decoded.
pub fn high_frequency_pair(
    bytes: &[u8],
    sigma: f32,
) -> std::result::Result<(Vec<u8>, Vec<u8>), FilterError> {
    let gray = decode_gray(bytes)?;
    let blurred = image::imageops::blur(&gray, sigma);
    Ok((gray.into_raw(), blurred.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Luma, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    #[test]
    fn decode_reads_png_metadata() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(12, 7, Rgb([10, 20, 30])));
        let bytes = encode(&img, ImageFormat::Png);

        let decoded = decode(&bytes, u64::MAX).unwrap();
        assert_eq!(decoded.metadata.format, ContainerFormat::Png);
        assert_eq!((decoded.metadata.width, decoded.metadata.height), (12, 7));
        assert!(!decoded.metadata.has_alpha);
        assert!(decoded.metadata.exif_tags.is_empty());
        assert_eq!(decoded.metadata.raw_byte_length, bytes.len() as u64);
        assert_eq!(decoded.raster.channels(), 3);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode(b"definitely not an image", u64::MAX),
            Err(Error::DecodeFailed(_))
        ));
    }

    #[test]
    fn decode_rejects_unadvertised_formats() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, Rgb([90, 90, 90])));
        let bytes = encode(&img, ImageFormat::Bmp);
        match decode(&bytes, u64::MAX) {
            Err(Error::UnsupportedFormat(name)) => assert_eq!(name, "bmp"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn decode_accepts_gif() {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            8,
            8,
            image::Rgba([40, 80, 120, 255]),
        ));
        let bytes = encode(&img, ImageFormat::Gif);
        let decoded = decode(&bytes, u64::MAX).unwrap();
        assert_eq!(decoded.metadata.format, ContainerFormat::Gif);
    }

    #[test]
    fn decode_rejects_oversized_input() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let bytes = encode(&img, ImageFormat::Png);
        assert!(matches!(
            decode(&bytes, 8),
            Err(Error::InputTooLarge { limit: 8, .. })
        ));
    }

    #[test]
    fn normalize_stretches_to_full_range() {
        let mut gray = GrayImage::from_fn(10, 10, |x, _| Luma([100 + x as u8 * 5]));
        normalize(&mut gray, 0.0, 1.0);
        let min = gray.pixels().map(|p| p[0]).min().unwrap();
        let max = gray.pixels().map(|p| p[0]).max().unwrap();
        assert_eq!((min, max), (0, 255));
    }

    #[test]
    fn normalize_leaves_flat_image_alone() {
        let mut gray = GrayImage::from_pixel(6, 6, Luma([42]));
        normalize(&mut gray, 0.01, 0.99);
        assert!(gray.pixels().all(|p| p[0] == 42));
    }

    #[test]
    fn edge_map_of_flat_image_has_no_edges() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([90, 90, 90])));
        let edges = edge_map(&encode(&img, ImageFormat::Png), &EdgeConfig::default()).unwrap();
        assert_eq!(edges.len(), 16 * 16);
        assert!(edges.iter().all(|&v| v < 50));
    }

    #[test]
    fn filters_fail_on_garbage() {
        assert!(edge_map(b"junk", &EdgeConfig::default()).is_err());
        assert!(high_frequency_pair(b"junk", 5.0).is_err());
    }

    #[test]
    fn high_frequency_pair_has_matching_lengths() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(20, 10, |x, y| {
            Rgb([(x * 12) as u8, (y * 20) as u8, 0])
        }));
        let (orig, blurred) = high_frequency_pair(&encode(&img, ImageFormat::Png), 5.0).unwrap();
        assert_eq!(orig.len(), 200);
        assert_eq!(blurred.len(), 200);
    }
}
