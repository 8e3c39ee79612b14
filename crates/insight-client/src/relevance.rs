//! Mapping similarity scores and confidence labels to visual categories.

use std::fmt;

use serde::Serialize;

use crate::model::ConfidenceLevel;

/// Qualitative relevance derived from a similarity score.
///
/// Ordered from least to most relevant, so `Minimal < Low < ... < VeryHigh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceTier {
    /// Below the low bound.
    Minimal,
    /// At or above the low bound.
    Low,
    /// At or above the medium bound.
    Medium,
    /// At or above the high bound.
    High,
    /// At or above the optional very-high bound.
    VeryHigh,
}

impl RelevanceTier {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryHigh => "Very high relevance",
            Self::High => "High relevance",
            Self::Medium => "Medium relevance",
            Self::Low => "Low relevance",
            Self::Minimal => "Minimal relevance",
        }
    }

    /// Color used when displaying this tier.
    pub fn swatch(self) -> Swatch {
        match self {
            Self::VeryHigh => Swatch::Green500,
            Self::High => Swatch::Green600,
            Self::Medium => Swatch::Amber500,
            Self::Low => Swatch::Orange500,
            Self::Minimal => Swatch::Red500,
        }
    }
}

impl fmt::Display for RelevanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive lower bounds for each tier.
///
/// Scores below `low` are [`RelevanceTier::Minimal`]. `very_high` is optional; when unset
/// the top tier is [`RelevanceTier::High`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelevanceThresholds {
    /// Lower bound of `VeryHigh`, if that tier is enabled.
    pub very_high: Option<f64>,
    /// Lower bound of `High`.
    pub high: f64,
    /// Lower bound of `Medium`.
    pub medium: f64,
    /// Lower bound of `Low`.
    pub low: f64,
}

impl Default for RelevanceThresholds {
    fn default() -> Self {
        Self {
            very_high: None,
            high: 0.5,
            medium: 0.3,
            low: 0.15,
        }
    }
}

impl RelevanceThresholds {
    /// Classifies a similarity score.
    ///
    /// Monotonic: a higher score never yields a lower tier. Non-finite scores are `Minimal`.
    pub fn classify(&self, score: f64) -> RelevanceTier {
        if !score.is_finite() {
            return RelevanceTier::Minimal;
        }
        if let Some(bound) = self.very_high
            && score >= bound
        {
            return RelevanceTier::VeryHigh;
        }
        if score >= self.high {
            RelevanceTier::High
        } else if score >= self.medium {
            RelevanceTier::Medium
        } else if score >= self.low {
            RelevanceTier::Low
        } else {
            RelevanceTier::Minimal
        }
    }
}

/// Classifies `score` with the default thresholds.
pub fn classify(score: f64) -> RelevanceTier {
    RelevanceThresholds::default().classify(score)
}

/// Display color for a confidence label.
pub fn confidence_color(level: ConfidenceLevel) -> Swatch {
    match level {
        ConfidenceLevel::VeryHigh => Swatch::Green500,
        ConfidenceLevel::High => Swatch::Green600,
        ConfidenceLevel::Medium => Swatch::Amber500,
        ConfidenceLevel::Low => Swatch::Orange500,
        ConfidenceLevel::Unknown => Swatch::Red500,
    }
}

/// Palette entries used for relevance and confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Swatch {
    /// `#22c55e`
    Green500,
    /// `#16a34a`
    Green600,
    /// `#f59e0b`
    Amber500,
    /// `#f97316`
    Orange500,
    /// `#ef4444`
    Red500,
}

impl Swatch {
    /// Color as `0xRRGGBB`.
    pub fn rgb(self) -> u32 {
        match self {
            Self::Green500 => 0x22c55e,
            Self::Green600 => 0x16a34a,
            Self::Amber500 => 0xf59e0b,
            Self::Orange500 => 0xf97316,
            Self::Red500 => 0xef4444,
        }
    }

    /// CSS hex notation, e.g. `#22c55e`.
    pub fn hex(self) -> String {
        format!("#{:06x}", self.rgb())
    }

    /// Paints `text` in this color for a 24-bit terminal.
    pub fn paint(self, text: &str) -> String {
        insight_highlight::rgb(text, self.rgb())
    }
}
