//! JSON response shapes.
//!
//! Both the flattened (`aiProbability`, `scores`, `imageInfo`) and the nested
//! (`analysis.details`) layouts are emitted so older clients keep working.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::{verdict, Aggregate, Confidence};
use crate::metadata::{ContainerFormat, ContainerMetadata};

/// Echo of the container metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Container format.
    pub format: ContainerFormat,
    /// Whether the image has an alpha channel.
    pub has_alpha: bool,
    /// Encoded size in bytes.
    pub size: u64,
    /// Recorded pixel density, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<u32>,
}

impl From<&ContainerMetadata> for ImageInfo {
    fn from(m: &ContainerMetadata) -> Self {
        Self {
            width: m.width,
            height: m.height,
            format: m.format,
            has_alpha: m.has_alpha,
            size: m.raw_byte_length,
            density: m.density,
        }
    }
}

/// One row of `analysis.details`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detail {
    /// Report label of the signal.
    pub label: &'static str,
    /// Qualitative verdict.
    pub verdict: &'static str,
    /// Raw score in `[0, 100]`.
    pub score: f32,
}

/// Nested analysis block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBlock {
    /// Same as [`Report::is_likely_ai`].
    #[serde(rename = "isAIGenerated")]
    pub is_ai_generated: bool,
    /// Same as [`Report::ai_probability`].
    pub ai_probability: u8,
    /// Same as [`Report::confidence`].
    pub confidence: Confidence,
    /// Per-signal verdicts and scores.
    pub details: Vec<Detail>,
}

/// Successful analysis response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Always `true`.
    pub success: bool,
    /// Probability in `[0, 100]`.
    pub ai_probability: u8,
    /// Confidence bucket.
    pub confidence: Confidence,
    /// Whether the probability is above the likely-AI threshold.
    #[serde(rename = "isLikelyAI")]
    pub is_likely_ai: bool,
    /// Nested form of the result.
    pub analysis: AnalysisBlock,
    /// Signal label to verdict.
    pub verdicts: BTreeMap<&'static str, &'static str>,
    /// Signal name to raw score.
    pub scores: BTreeMap<&'static str, f32>,
    /// Container metadata echo.
    pub image_info: ImageInfo,
    /// Human-readable summary.
    pub message: String,
}

impl Report {
    /// Build the response for an aggregate.
    #[must_use]
    pub fn new(
        aggregate: &Aggregate,
        metadata: &ContainerMetadata,
        verdict_threshold: f32,
    ) -> Self {
        let details: Vec<Detail> = aggregate
            .scores
            .iter()
            .map(|s| Detail {
                label: s.name.label(),
                verdict: verdict(s.name, s.value, verdict_threshold),
                score: s.value,
            })
            .collect();

        let verdicts = details.iter().map(|d| (d.label, d.verdict)).collect();
        let scores = aggregate
            .scores
            .iter()
            .map(|s| (s.name.as_str(), s.value))
            .collect();

        Self {
            success: true,
            ai_probability: aggregate.probability,
            confidence: aggregate.confidence,
            is_likely_ai: aggregate.is_likely_ai,
            analysis: AnalysisBlock {
                is_ai_generated: aggregate.is_likely_ai,
                ai_probability: aggregate.probability,
                confidence: aggregate.confidence,
                details,
            },
            verdicts,
            scores,
            image_info: ImageInfo::from(metadata),
            message: summary_message(aggregate.probability, aggregate.is_likely_ai),
        }
    }
}

/// Human-readable one-line summary.
#[must_use]
pub fn summary_message(probability: u8, likely_ai: bool) -> String {
    if likely_ai {
        format!("This image has a {probability}% chance of being AI-generated")
    } else {
        format!("This image has a {probability}% chance of being AI-generated (likely real)")
    }
}

/// Failed analysis response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Always `false`.
    pub success: bool,
    /// Short error category.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
}

impl ErrorReport {
    /// Build an error response.
    #[must_use]
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::config::DetectorConfig;
    use crate::signals::{SignalName, SignalScore};

    fn metadata() -> ContainerMetadata {
        ContainerMetadata {
            format: ContainerFormat::Png,
            width: 64,
            height: 32,
            has_alpha: false,
            density: None,
            exif_tags: BTreeMap::new(),
            raw_byte_length: 1234,
        }
    }

    #[test]
    fn report_has_flat_and_nested_fields() {
        let scores = SignalName::ALL
            .iter()
            .map(|&name| SignalScore { name, value: 90.0 })
            .collect();
        let agg = aggregate(scores, &DetectorConfig::default());
        let report = Report::new(&agg, &metadata(), 60.0);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["aiProbability"], 90);
        assert_eq!(json["confidence"], "high");
        assert_eq!(json["isLikelyAI"], true);
        assert_eq!(json["analysis"]["isAIGenerated"], true);
        assert_eq!(json["analysis"]["details"].as_array().unwrap().len(), 7);
        assert_eq!(json["verdicts"]["noisePattern"], "unnatural");
        assert_eq!(json["scores"].as_object().unwrap().len(), 7);
        assert_eq!(json["imageInfo"]["format"], "png");
        assert_eq!(json["imageInfo"]["hasAlpha"], false);
        assert!(json["imageInfo"].get("density").is_none());
    }

    #[test]
    fn summary_message_marks_likely_real() {
        assert!(summary_message(20, false).ends_with("(likely real)"));
        assert!(!summary_message(80, true).contains("likely real"));
    }

    #[test]
    fn error_report_serializes() {
        let json = serde_json::to_value(ErrorReport::new("DecodeFailed", "bad bytes")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "DecodeFailed");
    }
}
