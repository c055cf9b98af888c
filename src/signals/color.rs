//! Color distribution from per-channel mean and standard deviation.

use rand::RngCore;

use super::{clamp_score, AnalysisInput, Analyzer, SignalName, NEUTRAL};
use crate::config::ColorConfig;
use crate::raster::ChannelStats;

/// Scores flat or extreme color channels.
#[derive(Debug, Clone)]
pub struct ColorAnalyzer {
    config: ColorConfig,
}

impl ColorAnalyzer {
    /// Create an analyzer with the given thresholds.
    #[must_use]
    pub fn new(config: ColorConfig) -> Self {
        Self { config }
    }
}

impl Analyzer for ColorAnalyzer {
    fn name(&self) -> SignalName {
        SignalName::Color
    }

    fn run(&self, input: &AnalysisInput<'_>, _rng: &mut dyn RngCore) -> f32 {
        color_score(input.stats, &self.config)
    }
}

/// Score the leading channels of a statistical summary.
#[must_use]
pub fn color_score(stats: &[ChannelStats], config: &ColorConfig) -> f32 {
    let mut score = NEUTRAL;

    for channel in stats.iter().take(config.max_channels) {
        if channel.std < config.flat_std {
            score += 10.0;
        }
        if channel.std > config.natural_std {
            score -= 5.0;
        }
        if channel.mean < config.dark_mean || channel.mean > config.bright_mean {
            score += 5.0;
        }
    }

    clamp_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(pairs: &[(f64, f64)]) -> Vec<ChannelStats> {
        pairs
            .iter()
            .map(|&(mean, std)| ChannelStats { mean, std })
            .collect()
    }

    #[test]
    fn flat_channels_raise_score() {
        let s = stats(&[(128.0, 5.0), (128.0, 5.0), (128.0, 5.0)]);
        assert!((color_score(&s, &ColorConfig::default()) - 80.0).abs() < f32::EPSILON);
    }

    #[test]
    fn varied_channels_lower_score() {
        let s = stats(&[(120.0, 80.0), (110.0, 75.0), (100.0, 90.0)]);
        assert!((color_score(&s, &ColorConfig::default()) - 35.0).abs() < f32::EPSILON);
    }

    #[test]
    fn extreme_means_add_weak_signal() {
        let s = stats(&[(20.0, 50.0), (230.0, 50.0), (128.0, 50.0)]);
        assert!((color_score(&s, &ColorConfig::default()) - 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn alpha_channel_is_ignored() {
        let s = stats(&[(128.0, 50.0), (128.0, 50.0), (128.0, 50.0), (255.0, 0.0)]);
        assert!((color_score(&s, &ColorConfig::default()) - NEUTRAL).abs() < f32::EPSILON);
    }

    #[test]
    fn grayscale_uses_single_channel() {
        let s = stats(&[(10.0, 2.0)]);
        assert!((color_score(&s, &ColorConfig::default()) - 65.0).abs() < f32::EPSILON);
    }
}
