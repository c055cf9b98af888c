//! Edge density after a 3x3 high-pass convolution.

use rand::RngCore;
use tracing::warn;

use super::{clamp_score, AnalysisInput, Analyzer, SignalName, NEUTRAL};
use crate::config::EdgeConfig;
use crate::decoder;

/// Scores over-smooth or over-sharp edge maps.
#[derive(Debug, Clone)]
pub struct EdgeAnalyzer {
    config: EdgeConfig,
}

impl EdgeAnalyzer {
    /// Create an analyzer with the given kernel and density bands.
    #[must_use]
    pub fn new(config: EdgeConfig) -> Self {
        Self { config }
    }
}

impl Analyzer for EdgeAnalyzer {
    fn name(&self) -> SignalName {
        SignalName::Edges
    }

    fn run(&self, input: &AnalysisInput<'_>, _rng: &mut dyn RngCore) -> f32 {
        edge_score(input.bytes, &self.config)
    }
}

/// Fraction of filtered samples above the intensity threshold.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn edge_density(edges: &[u8], threshold: u8) -> f64 {
    if edges.is_empty() {
        return 0.0;
    }
    let count = edges.iter().filter(|&&v| v > threshold).count();
    count as f64 / edges.len() as f64
}

/// Score an edge density against the configured bands.
#[must_use]
pub fn density_score(density: f64, config: &EdgeConfig) -> f32 {
    let mut score = NEUTRAL;
    if density < config.smooth_density {
        score += 20.0;
    }
    if density > config.sharp_density {
        score += 15.0;
    }
    if density > config.natural_min && density < config.natural_max {
        score -= 15.0;
    }
    clamp_score(score)
}

/// Re-decode `bytes`, build the edge map and score it.
///
/// Filter failures are logged and yield [`NEUTRAL`].
#[must_use]
pub fn edge_score(bytes: &[u8], config: &EdgeConfig) -> f32 {
    match decoder::edge_map(bytes, config) {
        Ok(edges) => density_score(edge_density(&edges, config.intensity_threshold), config),
        Err(e) => {
            warn!(error = %e, "edge analysis degraded to baseline");
            NEUTRAL
        }
    }
}
