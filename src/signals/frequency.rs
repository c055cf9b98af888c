//! High-frequency energy: mean distance between the image and its blur.

use rand::RngCore;
use tracing::warn;

use super::{clamp_score, AnalysisInput, Analyzer, SignalName, NEUTRAL};
use crate::config::FrequencyConfig;
use crate::decoder;

/// Scores missing fine detail.
#[derive(Debug, Clone)]
pub struct FrequencyAnalyzer {
    config: FrequencyConfig,
}

impl FrequencyAnalyzer {
    /// Create an analyzer with the given blur sigma and thresholds.
    #[must_use]
    pub fn new(config: FrequencyConfig) -> Self {
        Self { config }
    }
}

impl Analyzer for FrequencyAnalyzer {
    fn name(&self) -> SignalName {
        SignalName::Frequency
    }

    fn run(&self, input: &AnalysisInput<'_>, _rng: &mut dyn RngCore) -> f32 {
        frequency_score(input.bytes, &self.config)
    }
}

/// `mean(|original[i] - blurred[i]|)` over all samples.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn high_frequency_energy(original: &[u8], blurred: &[u8]) -> f64 {
    debug_assert_eq!(original.len(), blurred.len());
    if original.is_empty() {
        return 0.0;
    }
    let total: u64 = original
        .iter()
        .zip(blurred)
        .map(|(&a, &b)| u64::from(a.abs_diff(b)))
        .sum();
    total as f64 / original.len() as f64
}

/// Score a high-frequency energy value.
#[must_use]
pub fn energy_score(energy: f64, config: &FrequencyConfig) -> f32 {
    let mut score = NEUTRAL;
    if energy < config.low_energy {
        score += 30.0;
    }
    if energy < config.very_low_energy {
        score += 20.0;
    }
    if energy > config.natural_energy {
        score -= 15.0;
    }
    clamp_score(score)
}

/// Re-decode `bytes`, blur a grayscale copy and score the difference.
///
/// Filter failures are logged and yield [`NEUTRAL`].
#[must_use]
pub fn frequency_score(bytes: &[u8], config: &FrequencyConfig) -> f32 {
    match decoder::high_frequency_pair(bytes, config.blur_sigma) {
        Ok((original, blurred)) => {
            energy_score(high_frequency_energy(&original, &blurred), config)
        }
        Err(e) => {
            warn!(error = %e, "frequency analysis degraded to baseline");
            NEUTRAL
        }
    }
}
