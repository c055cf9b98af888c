//! EXIF provenance: real cameras almost always embed identifying tags, while
//! generators either strip EXIF or stamp their own `Software` tag.

use std::collections::BTreeMap;

use rand::RngCore;

use super::{clamp_score, AnalysisInput, Analyzer, SignalName, NEUTRAL};
use crate::config::ExifConfig;

/// Scores the EXIF tag dictionary.
#[derive(Debug, Clone)]
pub struct ExifAnalyzer {
    config: ExifConfig,
}

impl ExifAnalyzer {
    /// Create an analyzer with the given camera fields and keywords.
    #[must_use]
    pub fn new(config: ExifConfig) -> Self {
        Self { config }
    }
}

impl Analyzer for ExifAnalyzer {
    fn name(&self) -> SignalName {
        SignalName::Exif
    }

    fn run(&self, input: &AnalysisInput<'_>, _rng: &mut dyn RngCore) -> f32 {
        exif_score(&input.metadata.exif_tags, &self.config)
    }
}

/// Score a tag dictionary.
///
/// Missing tags count as absent. Empty values are treated the same as missing.
#[must_use]
pub fn exif_score(tags: &BTreeMap<String, String>, config: &ExifConfig) -> f32 {
    let mut score = NEUTRAL;

    if tags.is_empty() {
        score += 30.0;
    } else {
        let has_camera = config
            .camera_fields
            .iter()
            .any(|field| tags.get(field).is_some_and(|v| !v.trim().is_empty()));
        if has_camera {
            score -= 20.0;
        } else {
            score += 20.0;
        }
    }

    if let Some(software) = tags.get("Software") {
        let software = software.to_lowercase();
        if config
            .ai_keywords
            .iter()
            .any(|kw| software.contains(kw.as_str()))
        {
            score += 40.0;
        }
    }

    clamp_score(score)
}
