//! Noise uniformity from randomly placed patches.
//!
//! Generated images tend to have either almost no texture noise or noise that
//! is suspiciously uniform across the frame. Camera sensor noise is moderate
//! and varies from region to region.

use rand::{Rng, RngCore};

use super::{clamp_score, AnalysisInput, Analyzer, SignalName, NEUTRAL};
use crate::config::NoiseConfig;
use crate::raster::Raster;

/// Scores the spread of local luma variance.
#[derive(Debug, Clone)]
pub struct NoiseAnalyzer {
    config: NoiseConfig,
}

impl NoiseAnalyzer {
    /// Create an analyzer with the given patch geometry and thresholds.
    #[must_use]
    pub fn new(config: NoiseConfig) -> Self {
        Self { config }
    }
}

impl Analyzer for NoiseAnalyzer {
    fn name(&self) -> SignalName {
        SignalName::Noise
    }

    fn run(&self, input: &AnalysisInput<'_>, rng: &mut dyn RngCore) -> f32 {
        noise_score(input.raster, &self.config, rng)
    }
}

/// Luma variance of the `size x size` patch at `(x, y)`.
///
/// The patch must lie inside the raster.
#[allow(clippy::cast_precision_loss)]
fn patch_variance(raster: &Raster, x: u32, y: u32, size: u32) -> f64 {
    let mut patch = Vec::with_capacity((size * size) as usize);
    for py in 0..size {
        for px in 0..size {
            patch.push(raster.luma(x + px, y + py));
        }
    }

    let n = patch.len() as f64;
    let mean = patch.iter().sum::<f64>() / n;
    patch.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Mean and population standard deviation of patch variances.
#[allow(clippy::cast_precision_loss)]
fn spread(variances: &[f64]) -> (f64, f64) {
    let n = variances.len() as f64;
    let avg = variances.iter().sum::<f64>() / n;
    let std = (variances.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / n).sqrt();
    (avg, std)
}

/// Sample `config.samples` patches and score their variance distribution.
///
/// Rasters smaller than one patch return [`NEUTRAL`].
pub fn noise_score<R: RngCore + ?Sized>(raster: &Raster, config: &NoiseConfig, rng: &mut R) -> f32 {
    let size = config.patch_size;
    if size == 0 || raster.width() < size || raster.height() < size {
        return NEUTRAL;
    }

    let max_x = raster.width() - size;
    let max_y = raster.height() - size;
    let variances: Vec<f64> = (0..config.samples)
        .map(|_| {
            let x = rng.gen_range(0..=max_x);
            let y = rng.gen_range(0..=max_y);
            patch_variance(raster, x, y, size)
        })
        .collect();

    if variances.is_empty() {
        return NEUTRAL;
    }

    let (avg_var, std_var) = spread(&variances);

    let mut score = NEUTRAL;
    if avg_var < config.low_variance {
        score += 30.0;
    }
    if std_var < config.uniform_spread {
        score += 20.0;
    }
    if avg_var > config.natural_variance_min
        && avg_var < config.natural_variance_max
        && std_var > config.natural_spread
    {
        score -= 20.0;
    }

    clamp_score(score)
}
