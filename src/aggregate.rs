//! Weighted aggregation of signal scores into a probability and confidence.

use std::fmt;

use serde::Serialize;

use crate::config::{ConfidenceConfig, DetectorConfig, WeightTable};
use crate::signals::{SignalName, SignalScore};

/// How far the probability sits from the undecided midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Lowercase label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a probability into a confidence bucket.
#[must_use]
pub fn classify(probability: u8, bands: &ConfidenceConfig) -> Confidence {
    if probability > bands.high_above || probability < bands.high_below {
        Confidence::High
    } else if probability > bands.medium_above || probability < bands.medium_below {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// `round(clamp(sum(weight * score), 0, 100))`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn weighted_probability(scores: &[SignalScore], weights: &WeightTable) -> u8 {
    let total: f32 = scores
        .iter()
        .map(|s| weights.weight(s.name) * s.value)
        .sum();
    total.clamp(0.0, 100.0).round() as u8
}

/// Qualitative adjective for one signal's raw score.
#[must_use]
pub fn verdict(name: SignalName, score: f32, threshold: f32) -> &'static str {
    let (normal, abnormal) = name.adjectives();
    if score > threshold {
        abnormal
    } else {
        normal
    }
}

/// Final probability, confidence and per-signal scores for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// Probability in `[0, 100]` that the image is generated.
    pub probability: u8,
    /// Confidence bucket for `probability`.
    pub confidence: Confidence,
    /// Whether `probability` is above the likely-AI threshold.
    pub is_likely_ai: bool,
    /// The individual signal scores, in report order.
    pub scores: Vec<SignalScore>,
}

impl Aggregate {
    /// Score for one signal, if present.
    #[must_use]
    pub fn score(&self, name: SignalName) -> Option<f32> {
        self.scores.iter().find(|s| s.name == name).map(|s| s.value)
    }
}

/// Combine signal scores using the configured weights and bands.
#[must_use]
pub fn aggregate(scores: Vec<SignalScore>, config: &DetectorConfig) -> Aggregate {
    let probability = weighted_probability(&scores, &config.weights);
    Aggregate {
        probability,
        confidence: classify(probability, &config.confidence),
        is_likely_ai: probability > config.likely_ai_threshold,
        scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(value: f32) -> Vec<SignalScore> {
        SignalName::ALL
            .iter()
            .map(|&name| SignalScore { name, value })
            .collect()
    }

    #[test]
    fn confidence_buckets() {
        let bands = ConfidenceConfig::default();
        assert_eq!(classify(85, &bands), Confidence::High);
        assert_eq!(classify(50, &bands), Confidence::Low);
        assert_eq!(classify(65, &bands), Confidence::Medium);
        assert_eq!(classify(35, &bands), Confidence::Medium);
        assert_eq!(classify(25, &bands), Confidence::High);
    }

    #[test]
    fn confidence_band_edges_are_exclusive() {
        let bands = ConfidenceConfig::default();
        assert_eq!(classify(70, &bands), Confidence::Medium);
        assert_eq!(classify(30, &bands), Confidence::Medium);
        assert_eq!(classify(60, &bands), Confidence::Low);
        assert_eq!(classify(40, &bands), Confidence::Low);
    }

    #[test]
    fn uniform_scores_pass_through() {
        let config = DetectorConfig::default();
        for value in [0.0, 37.0, 50.0, 100.0] {
            let result = aggregate(uniform(value), &config);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let expected = value as u8;
            assert_eq!(result.probability, expected);
        }
    }

    #[test]
    fn weighted_sum_rounds() {
        let scores = vec![
            SignalScore { name: SignalName::Exif, value: 80.0 },
            SignalScore { name: SignalName::Noise, value: 100.0 },
            SignalScore { name: SignalName::Compression, value: 65.0 },
            SignalScore { name: SignalName::Color, value: 80.0 },
            SignalScore { name: SignalName::Edges, value: 70.0 },
            SignalScore { name: SignalName::Repetition, value: 100.0 },
            SignalScore { name: SignalName::Frequency, value: 100.0 },
        ];
        // 8 + 20 + 9.75 + 12 + 14 + 10 + 10 = 83.75
        let result = aggregate(scores, &DetectorConfig::default());
        assert_eq!(result.probability, 84);
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.is_likely_ai);
        assert_eq!(result.score(SignalName::Compression), Some(65.0));
    }

    #[test]
    fn fifty_is_not_likely_ai() {
        let result = aggregate(uniform(50.0), &DetectorConfig::default());
        assert!(!result.is_likely_ai);
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn verdict_uses_signal_adjectives() {
        assert_eq!(verdict(SignalName::Exif, 61.0, 60.0), "suspicious");
        assert_eq!(verdict(SignalName::Exif, 60.0, 60.0), "normal");
        assert_eq!(verdict(SignalName::Noise, 90.0, 60.0), "unnatural");
        assert_eq!(verdict(SignalName::Repetition, 10.0, 60.0), "low");
        assert_eq!(verdict(SignalName::Frequency, 70.0, 60.0), "unusual");
    }

    #[test]
    fn confidence_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Confidence::Medium).unwrap(), "\"medium\"");
    }
}
