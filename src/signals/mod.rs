//! Independent signal analyzers.
//!
//! Each analyzer maps the decoded raster, the container metadata or the
//! original bytes to a suspicion score in `[0, 100]`, starting from the
//! neutral baseline of 50. Analyzers share no mutable state and can run in
//! any order.

pub mod color;
pub mod compression;
pub mod edges;
pub mod frequency;
pub mod noise;
pub mod provenance;
pub mod repetition;

use rand::RngCore;
use serde::Serialize;

use crate::config::DetectorConfig;
use crate::metadata::ContainerMetadata;
use crate::raster::{ChannelStats, Raster};

/// Score returned when an analyzer has no signal.
pub const NEUTRAL: f32 = 50.0;

/// Clamp a score into `[0, 100]`.
#[must_use]
pub fn clamp_score(score: f32) -> f32 {
    score.clamp(0.0, 100.0)
}

/// Name of a signal analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum SignalName {
    Exif,
    Noise,
    Compression,
    Color,
    Edges,
    Repetition,
    Frequency,
}

impl SignalName {
    /// Every signal, in report order.
    pub const ALL: [Self; 7] = [
        Self::Exif,
        Self::Noise,
        Self::Compression,
        Self::Color,
        Self::Edges,
        Self::Repetition,
        Self::Frequency,
    ];

    /// Lowercase identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exif => "exif",
            Self::Noise => "noise",
            Self::Compression => "compression",
            Self::Color => "color",
            Self::Edges => "edges",
            Self::Repetition => "repetition",
            Self::Frequency => "frequency",
        }
    }

    /// Label used in the qualitative report.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Exif => "exifData",
            Self::Noise => "noisePattern",
            Self::Compression => "compression",
            Self::Color => "colorDistribution",
            Self::Edges => "edges",
            Self::Repetition => "repetition",
            Self::Frequency => "frequency",
        }
    }

    /// Adjectives for `(normal, abnormal)` scores.
    #[must_use]
    pub fn adjectives(self) -> (&'static str, &'static str) {
        match self {
            Self::Exif => ("normal", "suspicious"),
            Self::Noise | Self::Edges => ("natural", "unnatural"),
            Self::Compression | Self::Color | Self::Frequency => ("normal", "unusual"),
            Self::Repetition => ("low", "high"),
        }
    }
}

/// One analyzer's output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalScore {
    /// Which analyzer produced the score.
    pub name: SignalName,
    /// Suspicion in `[0, 100]`.
    pub value: f32,
}

/// Everything an analyzer may inspect for one image.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    /// Decoded pixels.
    pub raster: &'a Raster,
    /// Container metadata.
    pub metadata: &'a ContainerMetadata,
    /// Original encoded bytes.
    pub bytes: &'a [u8],
    /// Per-channel statistics of `raster`.
    pub stats: &'a [ChannelStats],
}

/// A single scoring function.
pub trait Analyzer: Send + Sync {
    /// Signal this analyzer reports.
    fn name(&self) -> SignalName;

    /// Score the input. Implementations never fail; a signal that cannot be
    /// computed yields [`NEUTRAL`].
    fn run(&self, input: &AnalysisInput<'_>, rng: &mut dyn RngCore) -> f32;
}

/// The seven default analyzers, in report order.
#[must_use]
pub fn default_analyzers(config: &DetectorConfig) -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(provenance::ExifAnalyzer::new(config.exif.clone())),
        Box::new(noise::NoiseAnalyzer::new(config.noise.clone())),
        Box::new(compression::CompressionAnalyzer::new(
            config.compression.clone(),
        )),
        Box::new(color::ColorAnalyzer::new(config.color.clone())),
        Box::new(edges::EdgeAnalyzer::new(config.edges.clone())),
        Box::new(repetition::RepetitionAnalyzer::new(config.repetition.clone())),
        Box::new(frequency::FrequencyAnalyzer::new(config.frequency.clone())),
    ]
}
