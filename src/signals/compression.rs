//! Compression ratio: bytes spent per pixel, interpreted per container format.

use rand::RngCore;

use super::{clamp_score, AnalysisInput, Analyzer, SignalName, NEUTRAL};
use crate::config::CompressionConfig;
use crate::metadata::ContainerFormat;

/// Scores bytes-per-pixel against the container format.
#[derive(Debug, Clone)]
pub struct CompressionAnalyzer {
    config: CompressionConfig,
}

impl CompressionAnalyzer {
    /// Create an analyzer with the given thresholds.
    #[must_use]
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }
}

impl Analyzer for CompressionAnalyzer {
    fn name(&self) -> SignalName {
        SignalName::Compression
    }

    fn run(&self, input: &AnalysisInput<'_>, _rng: &mut dyn RngCore) -> f32 {
        let m = input.metadata;
        compression_score(m.raw_byte_length, m.width, m.height, m.format, &self.config)
    }
}

/// Score an encoded size for a `width x height` image.
#[must_use]
pub fn compression_score(
    byte_length: u64,
    width: u32,
    height: u32,
    format: ContainerFormat,
    config: &CompressionConfig,
) -> f32 {
    let mut score = NEUTRAL;
    let pixels = u64::from(width) * u64::from(height);
    if pixels == 0 {
        return score;
    }

    #[allow(clippy::cast_precision_loss)]
    let bytes_per_pixel = byte_length as f64 / pixels as f64;

    match format {
        ContainerFormat::Jpeg => {
            if bytes_per_pixel < config.jpeg_low_bpp {
                score += 15.0;
            }
            if bytes_per_pixel > config.jpeg_high_bpp {
                score -= 10.0;
            }
        }
        ContainerFormat::Png => score += 15.0,
        _ => {}
    }

    clamp_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CompressionConfig {
        CompressionConfig::default()
    }

    #[test]
    fn heavily_compressed_jpeg_is_suspicious() {
        // 0.25 bytes per pixel
        let score = compression_score(2500, 100, 100, ContainerFormat::Jpeg, &config());
        assert!((score - 65.0).abs() < f32::EPSILON);
    }

    #[test]
    fn low_compression_jpeg_looks_like_a_photo() {
        let score = compression_score(40_000, 100, 100, ContainerFormat::Jpeg, &config());
        assert!((score - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn mid_range_jpeg_is_neutral() {
        let score = compression_score(15_000, 100, 100, ContainerFormat::Jpeg, &config());
        assert!((score - NEUTRAL).abs() < f32::EPSILON);
    }

    #[test]
    fn png_gets_flat_penalty() {
        for size in [10, 10_000, 1_000_000] {
            let score = compression_score(size, 100, 100, ContainerFormat::Png, &config());
            assert!((score - 65.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn other_formats_are_neutral() {
        let score = compression_score(100, 100, 100, ContainerFormat::Webp, &config());
        assert!((score - NEUTRAL).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_area_is_neutral() {
        let score = compression_score(100, 0, 100, ContainerFormat::Jpeg, &config());
        assert!((score - NEUTRAL).abs() < f32::EPSILON);
    }
}
