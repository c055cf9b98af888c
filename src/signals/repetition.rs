//! Block repetition: pairwise similarity of non-overlapping blocks.

use rand::RngCore;

use super::{clamp_score, AnalysisInput, Analyzer, SignalName, NEUTRAL};
use crate::config::RepetitionConfig;
use crate::raster::Raster;

/// Scores how many sampled blocks look alike.
#[derive(Debug, Clone)]
pub struct RepetitionAnalyzer {
    config: RepetitionConfig,
}

impl RepetitionAnalyzer {
    /// Create an analyzer with the given block geometry and thresholds.
    #[must_use]
    pub fn new(config: RepetitionConfig) -> Self {
        Self { config }
    }
}

impl Analyzer for RepetitionAnalyzer {
    fn name(&self) -> SignalName {
        SignalName::Repetition
    }

    fn run(&self, input: &AnalysisInput<'_>, _rng: &mut dyn RngCore) -> f32 {
        repetition_score(input.raster, &self.config)
    }
}

/// First-channel samples of up to `limit` full blocks, in raster order.
fn collect_blocks(raster: &Raster, size: u32, limit: usize) -> Vec<Vec<u8>> {
    let samples = raster.samples();
    let mut blocks = Vec::with_capacity(limit);
    if size == 0 {
        return blocks;
    }

    let mut y = 0;
    while y + size <= raster.height() && blocks.len() < limit {
        let mut x = 0;
        while x + size <= raster.width() && blocks.len() < limit {
            let mut block = Vec::with_capacity((size * size) as usize);
            for by in 0..size {
                for bx in 0..size {
                    block.push(samples[raster.index(x + bx, y + by)]);
                }
            }
            blocks.push(block);
            x += size;
        }
        y += size;
    }

    blocks
}

/// Mean absolute per-sample difference between two equal-length blocks.
#[allow(clippy::cast_precision_loss)]
fn mean_abs_diff(a: &[u8], b: &[u8]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let total: u64 = a
        .iter()
        .zip(b)
        .map(|(&va, &vb)| u64::from(va.abs_diff(vb)))
        .sum();
    total as f64 / a.len() as f64
}

/// Fraction of sampled block pairs that are similar, or `None` with fewer
/// than two blocks.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn repetition_ratio(raster: &Raster, config: &RepetitionConfig) -> Option<f64> {
    let blocks = collect_blocks(raster, config.block_size, config.max_blocks);
    let n = blocks.len();
    if n < 2 {
        return None;
    }

    let mut similar = 0_usize;
    for (i, a) in blocks.iter().enumerate() {
        for b in &blocks[i + 1..] {
            if mean_abs_diff(a, b) < config.similarity_threshold {
                similar += 1;
            }
        }
    }

    Some(similar as f64 / (n * (n - 1) / 2) as f64)
}

/// Score block repetition. Rasters with fewer than two blocks return [`NEUTRAL`].
#[must_use]
pub fn repetition_score(raster: &Raster, config: &RepetitionConfig) -> f32 {
    let Some(ratio) = repetition_ratio(raster, config) else {
        return NEUTRAL;
    };

    let mut score = NEUTRAL;
    if ratio > config.moderate_ratio {
        score += 20.0;
    }
    if ratio > config.high_ratio {
        score += 30.0;
    }

    clamp_score(score)
}
