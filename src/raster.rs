//! Decoded pixel grid and per-channel statistics.

use image::DynamicImage;

/// Immutable row-major, channel-interleaved 8-bit pixel grid.
///
/// Invariant: `samples.len() == width * height * channels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    channels: u8,
    samples: Vec<u8>,
}

/// Mean and population standard deviation of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    /// Mean sample value.
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
}

impl Raster {
    /// Build a raster from raw samples.
    ///
    /// Returns `None` if `channels` is not 1, 3 or 4, or if the sample count does
    /// not match the dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32, channels: u8, samples: Vec<u8>) -> Option<Self> {
        if !matches!(channels, 1 | 3 | 4) {
            return None;
        }
        let expected = width as usize * height as usize * usize::from(channels);
        (samples.len() == expected).then_some(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Convert a decoded image, keeping one channel for opaque grayscale, three for
    /// opaque color and four whenever an alpha channel is present.
    #[must_use]
    pub fn from_image(img: &DynamicImage) -> Self {
        let color = img.color();
        let (channels, samples) = if color.has_alpha() {
            (4, img.to_rgba8().into_raw())
        } else if color.has_color() {
            (3, img.to_rgb8().into_raw())
        } else {
            (1, img.to_luma8().into_raw())
        };
        Self {
            width: img.width(),
            height: img.height(),
            channels,
            samples,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples per pixel.
    #[must_use]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Raw interleaved samples.
    #[must_use]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Index of the first sample of pixel `(x, y)`.
    #[must_use]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * usize::from(self.channels)
    }

    /// Luma of pixel `(x, y)`: the mean of the first three channels, or the raw
    /// sample for single-channel rasters.
    #[must_use]
    pub fn luma(&self, x: u32, y: u32) -> f64 {
        let idx = self.index(x, y);
        if self.channels >= 3 {
            let sum = u32::from(self.samples[idx])
                + u32::from(self.samples[idx + 1])
                + u32::from(self.samples[idx + 2]);
            f64::from(sum) / 3.0
        } else {
            f64::from(self.samples[idx])
        }
    }
}

/// Per-channel mean and standard deviation over the whole raster.
#[must_use]
pub fn statistical_summary(raster: &Raster) -> Vec<ChannelStats> {
    let channels = usize::from(raster.channels());
    let mut sums = vec![0.0_f64; channels];
    let mut squares = vec![0.0_f64; channels];

    for pixel in raster.samples().chunks_exact(channels) {
        for (c, &v) in pixel.iter().enumerate() {
            let v = f64::from(v);
            sums[c] += v;
            squares[c] += v * v;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let n = (raster.width() as usize * raster.height() as usize) as f64;
    if n < 1.0 {
        return vec![ChannelStats { mean: 0.0, std: 0.0 }; channels];
    }

    sums.iter()
        .zip(&squares)
        .map(|(&sum, &sq)| {
            let mean = sum / n;
            let variance = (sq / n - mean * mean).max(0.0);
            ChannelStats {
                mean,
                std: variance.sqrt(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, RgbaImage};

    #[test]
    fn new_rejects_mismatched_lengths() {
        assert!(Raster::new(2, 2, 3, vec![0; 11]).is_none());
        assert!(Raster::new(2, 2, 3, vec![0; 12]).is_some());
    }

    #[test]
    fn new_rejects_two_channel_layout() {
        assert!(Raster::new(1, 1, 2, vec![0; 2]).is_none());
    }

    #[test]
    fn from_image_picks_channel_count() {
        let gray = DynamicImage::ImageLuma8(GrayImage::new(4, 4));
        assert_eq!(Raster::from_image(&gray).channels(), 1);

        let rgb = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        assert_eq!(Raster::from_image(&rgb).channels(), 3);

        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));
        let raster = Raster::from_image(&rgba);
        assert_eq!(raster.channels(), 4);
        assert_eq!(raster.samples().len(), 4 * 4 * 4);
    }

    #[test]
    fn luma_averages_color_channels() {
        let img = RgbImage::from_pixel(1, 1, Rgb([30, 60, 90]));
        let raster = Raster::from_image(&DynamicImage::ImageRgb8(img));
        assert!((raster.luma(0, 0) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn statistical_summary_of_constant_image() {
        let img = GrayImage::from_pixel(8, 8, Luma([77]));
        let stats = statistical_summary(&Raster::from_image(&DynamicImage::ImageLuma8(img)));
        assert_eq!(stats.len(), 1);
        assert!((stats[0].mean - 77.0).abs() < 1e-9);
        assert!(stats[0].std.abs() < 1e-9);
    }

    #[test]
    fn statistical_summary_of_known_values() {
        // 0 and 200 alternating: mean 100, std 100
        let raster = Raster::new(2, 1, 1, vec![0, 200]).unwrap();
        let stats = statistical_summary(&raster);
        assert!((stats[0].mean - 100.0).abs() < 1e-9);
        assert!((stats[0].std - 100.0).abs() < 1e-9);
    }
}
