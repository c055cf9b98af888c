//! Detection engine: decode once, run every analyzer, aggregate.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

use crate::aggregate::{self, Aggregate};
use crate::config::DetectorConfig;
use crate::decoder;
use crate::error::Result;
use crate::metadata::ContainerMetadata;
use crate::raster;
use crate::report::Report;
use crate::signals::{self, AnalysisInput, Analyzer, SignalScore};

/// Outcome of analyzing one image.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Probability, confidence and per-signal scores.
    pub aggregate: Aggregate,
    /// Container metadata of the analyzed image.
    pub metadata: ContainerMetadata,
}

/// Result of analyzing a single image file.
#[derive(Debug)]
pub struct FileReport {
    /// Path of the analyzed file.
    pub path: PathBuf,
    /// The report, if analysis succeeded.
    pub report: Option<Report>,
    /// Human-readable status message.
    pub message: String,
}

impl FileReport {
    /// Whether analysis succeeded.
    #[must_use]
    pub fn success(&self) -> bool {
        self.report.is_some()
    }
}

/// The detector holding configuration and the analyzer registry.
///
/// Create once and reuse across images. The detector itself is immutable;
/// every call owns its raster, metadata and random generator.
pub struct Detector {
    config: DetectorConfig,
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl Default for Detector {
    fn default() -> Self {
        let config = DetectorConfig::default();
        Self {
            analyzers: signals::default_analyzers(&config),
            config,
        }
    }
}

impl Detector {
    /// Create a detector from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfig`] if the configuration is inconsistent.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            analyzers: signals::default_analyzers(&config),
            config,
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Analyze encoded image bytes with a fresh entropy-seeded generator.
    ///
    /// # Errors
    ///
    /// Returns an error only if the whole image cannot be decoded or has no pixels.
    pub fn analyze(&self, bytes: &[u8]) -> Result<AnalysisResult> {
        let mut rng = StdRng::from_entropy();
        self.analyze_with_rng(bytes, &mut rng)
    }

    /// Analyze with a generator seeded from `seed`, for reproducible scores.
    ///
    /// # Errors
    ///
    /// See [`Detector::analyze`].
    pub fn analyze_seeded(&self, bytes: &[u8], seed: u64) -> Result<AnalysisResult> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.analyze_with_rng(bytes, &mut rng)
    }

    /// Analyze using the caller's random generator.
    ///
    /// # Errors
    ///
    /// See [`Detector::analyze`].
    pub fn analyze_with_rng(&self, bytes: &[u8], rng: &mut dyn RngCore) -> Result<AnalysisResult> {
        let decoded = decoder::decode(bytes, self.config.max_input_bytes)?;
        let stats = raster::statistical_summary(&decoded.raster);
        let input = AnalysisInput {
            raster: &decoded.raster,
            metadata: &decoded.metadata,
            bytes,
            stats: &stats,
        };

        let scores: Vec<SignalScore> = self
            .analyzers
            .iter()
            .map(|analyzer| {
                let value = signals::clamp_score(analyzer.run(&input, &mut *rng));
                debug!(signal = analyzer.name().as_str(), score = value, "signal scored");
                SignalScore {
                    name: analyzer.name(),
                    value,
                }
            })
            .collect();

        let aggregate = aggregate::aggregate(scores, &self.config);
        debug!(
            format = decoded.metadata.format.as_str(),
            probability = aggregate.probability,
            confidence = %aggregate.confidence,
            "analysis complete"
        );

        Ok(AnalysisResult {
            aggregate,
            metadata: decoded.metadata,
        })
    }

    /// Shape a result into the JSON response.
    #[must_use]
    pub fn report(&self, result: &AnalysisResult) -> Report {
        Report::new(
            &result.aggregate,
            &result.metadata,
            self.config.verdict_threshold,
        )
    }

    /// Read and analyze a single file.
    ///
    /// `seed` makes the noise sampling reproducible.
    #[must_use]
    pub fn analyze_file(&self, path: &Path, seed: Option<u64>) -> FileReport {
        let mut result = FileReport {
            path: path.to_path_buf(),
            report: None,
            message: String::new(),
        };

        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                result.message = format!("Failed to read: {e}");
                return result;
            }
        };

        let analysis = match seed {
            Some(s) => self.analyze_seeded(&bytes, s),
            None => self.analyze(&bytes),
        };

        match analysis {
            Ok(analysis) => {
                let report = self.report(&analysis);
                result.message.clone_from(&report.message);
                result.report = Some(report);
            }
            Err(e) => {
                result.message = format!("Failed to analyze: {e}");
            }
        }

        result
    }

    /// Analyze all supported images in a directory.
    ///
    /// Uses parallel iteration when the `cli` feature is enabled (via rayon).
    /// Results are sorted by path.
    #[must_use]
    pub fn analyze_directory(&self, dir: &Path, seed: Option<u64>) -> Vec<FileReport> {
        let mut paths: Vec<PathBuf> = match std::fs::read_dir(dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| is_supported_image(p))
                .collect(),
            Err(e) => {
                return vec![FileReport {
                    path: dir.to_path_buf(),
                    report: None,
                    message: format!("Failed to read directory: {e}"),
                }];
            }
        };
        paths.sort();
        info!(count = paths.len(), dir = %dir.display(), "analyzing directory");

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            paths
                .par_iter()
                .map(|p| self.analyze_file(p, seed))
                .collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            paths.iter().map(|p| self.analyze_file(p, seed)).collect()
        }
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "tif" | "tiff" | "gif"
        ),
        None => false,
    }
}
