//! Tunable weights and thresholds for every signal analyzer.
//!
//! All values are hand-tuned defaults, not fitted constants. A partial JSON
//! file can override any subset of them:
//!
//! ```
//! use ai_image_detect::DetectorConfig;
//!
//! let config: DetectorConfig = serde_json::from_str(r#"{ "noise": { "samples": 80 } }"#).unwrap();
//! assert_eq!(config.noise.samples, 80);
//! assert_eq!(config.noise.patch_size, 8);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::signals::SignalName;

/// Tolerance when checking that weights sum to one.
const WEIGHT_SUM_EPSILON: f32 = 1e-6;

/// Default upload limit (10 MiB).
const DEFAULT_MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

/// Contribution of each signal to the aggregate probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct WeightTable {
    pub exif: f32,
    pub noise: f32,
    pub compression: f32,
    pub color: f32,
    pub edges: f32,
    pub repetition: f32,
    pub frequency: f32,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            exif: 0.10,
            noise: 0.20,
            compression: 0.15,
            color: 0.15,
            edges: 0.20,
            repetition: 0.10,
            frequency: 0.10,
        }
    }
}

impl WeightTable {
    /// Weight for a single signal.
    #[must_use]
    pub fn weight(&self, name: SignalName) -> f32 {
        match name {
            SignalName::Exif => self.exif,
            SignalName::Noise => self.noise,
            SignalName::Compression => self.compression,
            SignalName::Color => self.color,
            SignalName::Edges => self.edges,
            SignalName::Repetition => self.repetition,
            SignalName::Frequency => self.frequency,
        }
    }

    /// Sum of all weights.
    #[must_use]
    pub fn sum(&self) -> f32 {
        SignalName::ALL.iter().map(|&name| self.weight(name)).sum()
    }
}

/// EXIF provenance thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExifConfig {
    /// Tags whose presence indicates a physical camera.
    pub camera_fields: Vec<String>,
    /// Lowercase substrings in `Software` that indicate a generator.
    pub ai_keywords: Vec<String>,
}

impl Default for ExifConfig {
    fn default() -> Self {
        Self {
            camera_fields: ["Make", "Model", "LensModel", "FocalLength"]
                .map(String::from)
                .to_vec(),
            ai_keywords: ["stable", "diffusion", "midjourney", "dall", "ai", "generated"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Noise-uniformity sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Side length of each square patch.
    pub patch_size: u32,
    /// Number of random patches drawn per image.
    pub samples: usize,
    /// Mean patch variance below this is "no texture noise".
    pub low_variance: f64,
    /// Spread of patch variance below this is "uniform noise".
    pub uniform_spread: f64,
    /// Lower bound of the natural sensor-noise variance band.
    pub natural_variance_min: f64,
    /// Upper bound of the natural sensor-noise variance band.
    pub natural_variance_max: f64,
    /// Spread above which noise counts as natural.
    pub natural_spread: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            patch_size: 8,
            samples: 50,
            low_variance: 50.0,
            uniform_spread: 20.0,
            natural_variance_min: 100.0,
            natural_variance_max: 500.0,
            natural_spread: 50.0,
        }
    }
}

/// Bytes-per-pixel thresholds for container compression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// JPEG bytes-per-pixel below this is aggressive compression.
    pub jpeg_low_bpp: f64,
    /// JPEG bytes-per-pixel above this looks like a detailed photo.
    pub jpeg_high_bpp: f64,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            jpeg_low_bpp: 0.5,
            jpeg_high_bpp: 3.0,
        }
    }
}

/// Per-channel color statistics thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Number of leading channels inspected.
    pub max_channels: usize,
    /// Standard deviation below this is a flat channel.
    pub flat_std: f64,
    /// Standard deviation above this is natural variance.
    pub natural_std: f64,
    /// Channel mean below this is underexposed.
    pub dark_mean: f64,
    /// Channel mean above this is overexposed.
    pub bright_mean: f64,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            max_channels: 3,
            flat_std: 30.0,
            natural_std: 70.0,
            dark_mean: 50.0,
            bright_mean: 200.0,
        }
    }
}

/// High-pass edge density parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// 3x3 convolution kernel, row-major.
    pub kernel: [f32; 9],
    /// Filtered intensity above which a sample is an edge.
    pub intensity_threshold: u8,
    /// Lower percentile mapped to black by the contrast stretch.
    pub normalize_low_percentile: f32,
    /// Upper percentile mapped to white by the contrast stretch.
    pub normalize_high_percentile: f32,
    /// Density below this is over-smooth.
    pub smooth_density: f64,
    /// Density above this is over-sharp.
    pub sharp_density: f64,
    /// Lower bound of the natural-photo band.
    pub natural_min: f64,
    /// Upper bound of the natural-photo band.
    pub natural_max: f64,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            kernel: [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
            intensity_threshold: 50,
            normalize_low_percentile: 0.01,
            normalize_high_percentile: 0.99,
            smooth_density: 0.05,
            sharp_density: 0.25,
            natural_min: 0.08,
            natural_max: 0.18,
        }
    }
}

/// Block-repetition parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepetitionConfig {
    /// Side length of each square block.
    pub block_size: u32,
    /// Maximum number of blocks compared pairwise.
    pub max_blocks: usize,
    /// Mean absolute difference below which two blocks are similar.
    pub similarity_threshold: f64,
    /// Similar-pair ratio above which repetition is suspicious.
    pub moderate_ratio: f64,
    /// Similar-pair ratio above which repetition is strongly suspicious.
    pub high_ratio: f64,
}

impl Default for RepetitionConfig {
    fn default() -> Self {
        Self {
            block_size: 16,
            max_blocks: 20,
            similarity_threshold: 10.0,
            moderate_ratio: 0.3,
            high_ratio: 0.5,
        }
    }
}

/// Blur-subtraction frequency parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyConfig {
    /// Gaussian blur sigma.
    pub blur_sigma: f32,
    /// Energy below this lacks detail.
    pub low_energy: f64,
    /// Energy below this lacks almost all detail.
    pub very_low_energy: f64,
    /// Energy above this has natural detail.
    pub natural_energy: f64,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 5.0,
            low_energy: 10.0,
            very_low_energy: 5.0,
            natural_energy: 20.0,
        }
    }
}

/// Probability bands for the confidence bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Probability above this is high confidence.
    pub high_above: u8,
    /// Probability below this is high confidence.
    pub high_below: u8,
    /// Probability above this is medium confidence.
    pub medium_above: u8,
    /// Probability below this is medium confidence.
    pub medium_below: u8,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            high_above: 70,
            high_below: 30,
            medium_above: 60,
            medium_below: 40,
        }
    }
}

/// Complete detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Signal weights.
    pub weights: WeightTable,
    /// EXIF analyzer settings.
    pub exif: ExifConfig,
    /// Noise analyzer settings.
    pub noise: NoiseConfig,
    /// Compression analyzer settings.
    pub compression: CompressionConfig,
    /// Color analyzer settings.
    pub color: ColorConfig,
    /// Edge analyzer settings.
    pub edges: EdgeConfig,
    /// Repetition analyzer settings.
    pub repetition: RepetitionConfig,
    /// Frequency analyzer settings.
    pub frequency: FrequencyConfig,
    /// Confidence bucket bands.
    pub confidence: ConfidenceConfig,
    /// Raw signal score above which a signal is reported abnormal.
    pub verdict_threshold: f32,
    /// Probability above which the image is reported as likely AI.
    pub likely_ai_threshold: u8,
    /// Inputs larger than this are rejected before decoding.
    pub max_input_bytes: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            weights: WeightTable::default(),
            exif: ExifConfig::default(),
            noise: NoiseConfig::default(),
            compression: CompressionConfig::default(),
            color: ColorConfig::default(),
            edges: EdgeConfig::default(),
            repetition: RepetitionConfig::default(),
            frequency: FrequencyConfig::default(),
            confidence: ConfidenceConfig::default(),
            verdict_threshold: 60.0,
            likely_ai_threshold: 50,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl DetectorConfig {
    /// Load a configuration from a JSON file, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, [`Error::ConfigParse`] if it
    /// is not valid JSON, or [`Error::InvalidConfig`] if validation fails.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = SignalName::ALL
            .iter()
            .find(|&&name| self.weights.weight(name) < 0.0)
        {
            return Err(Error::InvalidConfig(format!(
                "weight for {} is negative",
                name.as_str()
            )));
        }

        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(Error::InvalidConfig(format!(
                "weights sum to {sum}, expected 1.0"
            )));
        }

        if self.noise.patch_size == 0 || self.noise.samples == 0 {
            return Err(Error::InvalidConfig(
                "noise patch size and sample count must be non-zero".to_string(),
            ));
        }

        if self.repetition.block_size == 0 {
            return Err(Error::InvalidConfig(
                "repetition block size must be non-zero".to_string(),
            ));
        }

        let (lo, hi) = (
            self.edges.normalize_low_percentile,
            self.edges.normalize_high_percentile,
        );
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo >= hi {
            return Err(Error::InvalidConfig(format!(
                "normalize percentiles must satisfy 0 <= low < high <= 1, got {lo}..{hi}"
            )));
        }

        if self.frequency.blur_sigma <= 0.0 {
            return Err(Error::InvalidConfig(
                "blur sigma must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let weights = WeightTable::default();
        assert!((weights.sum() - 1.0).abs() < WEIGHT_SUM_EPSILON);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_unbalanced_weights() {
        let mut config = DetectorConfig::default();
        config.weights.noise = 0.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("weights sum"));
    }

    #[test]
    fn validate_rejects_negative_weight() {
        let mut config = DetectorConfig::default();
        config.weights.exif = -0.1;
        config.weights.noise = 0.4;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exif"));
    }

    #[test]
    fn validate_rejects_zero_block_size() {
        let mut config = DetectorConfig::default();
        config.repetition.block_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: DetectorConfig =
            serde_json::from_str(r#"{ "weights": { "exif": 0.3, "noise": 0.0 } }"#).unwrap();
        assert!((config.weights.exif - 0.3).abs() < f32::EPSILON);
        assert!((config.weights.edges - 0.20).abs() < f32::EPSILON);
        assert_eq!(config.repetition.block_size, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_json_file_reads_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detector.json");
        std::fs::write(&path, r#"{ "verdict_threshold": 75.0 }"#).unwrap();

        let config = DetectorConfig::from_json_file(&path).unwrap();
        assert!((config.verdict_threshold - 75.0).abs() < f32::EPSILON);
    }

    #[test]
    fn from_json_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            DetectorConfig::from_json_file(&path),
            Err(Error::ConfigParse(_))
        ));
    }
}
