//! Wire types exchanged with the search service.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// One ranked result of a search.
///
/// Produced by the service and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoredMatch {
    /// Identifier of the uploaded document; may include a path.
    pub filename: String,
    /// Short excerpt the service chose to justify the match.
    #[serde(default)]
    pub content_snippet: String,
    /// Similarity in `[0, 1]`, higher is more relevant.
    pub similarity_score: f64,
    /// Path the service recorded for the document.
    #[serde(default)]
    pub file_path: String,
    /// Qualitative confidence label, if the service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<ConfidenceLevel>,
    /// Free-form label describing how the match was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_type: Option<String>,
}

impl ScoredMatch {
    /// Confidence label, `Unknown` when absent.
    pub fn confidence(&self) -> ConfidenceLevel {
        self.confidence_level.unwrap_or_default()
    }
}

/// Full text of one uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FullDocument {
    /// Name the service stored the document under.
    pub filename: String,
    /// Extracted text.
    pub content: String,
}

/// Liveness payload of the status endpoint.
///
/// Known fields are typed; anything else the service reports is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ServiceStatus {
    /// Documents in the current search set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_loaded: Option<u64>,
    /// Whether the embedding model is ready.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_loaded: Option<bool>,
    /// Documents retrievable through the file endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_files: Option<u64>,
    /// Any other reported fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Server-supplied confidence label.
///
/// Parsed leniently: any label other than the four known ones is `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ConfidenceLevel {
    /// "Very High".
    VeryHigh,
    /// "High".
    High,
    /// "Medium".
    Medium,
    /// "Low".
    Low,
    /// Missing or unrecognized label.
    #[default]
    Unknown,
}

impl ConfidenceLevel {
    /// Display label, as the service spells it.
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<&str> for ConfidenceLevel {
    fn from(label: &str) -> Self {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "veryhigh" => Self::VeryHigh,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for ConfidenceLevel {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl From<ConfidenceLevel> for String {
    fn from(level: ConfidenceLevel) -> Self {
        level.label().to_string()
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_minimal_match() {
        let json = r#"{"filename":"a.txt","content_snippet":"hi","similarity_score":0.42,"file_path":"a.txt"}"#;
        let m: ScoredMatch = serde_json::from_str(json).unwrap();
        assert_eq!(m.filename, "a.txt");
        assert_eq!(m.similarity_score, 0.42);
        assert!(m.confidence_level.is_none());
        assert_eq!(m.confidence(), ConfidenceLevel::Unknown);
    }

    #[test]
    fn decodes_optional_labels_and_ignores_extras() {
        let json = r#"{
            "filename": "notes/plan.txt",
            "content_snippet": "plan",
            "similarity_score": 0.9,
            "file_path": "notes/plan.txt",
            "full_path": "notes/plan.txt",
            "confidence_level": "Very High",
            "match_type": "semantic"
        }"#;
        let m: ScoredMatch = serde_json::from_str(json).unwrap();
        assert_eq!(m.confidence(), ConfidenceLevel::VeryHigh);
        assert_eq!(m.match_type.as_deref(), Some("semantic"));
    }

    #[test]
    fn unknown_confidence_label() {
        assert_eq!(ConfidenceLevel::from("Extreme"), ConfidenceLevel::Unknown);
        assert_eq!(ConfidenceLevel::from("very_high"), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::from(" medium "), ConfidenceLevel::Medium);
    }

    #[test]
    fn confidence_serializes_as_label() {
        let json = serde_json::to_string(&ConfidenceLevel::VeryHigh).unwrap();
        assert_eq!(json, "\"Very High\"");
    }

    #[test]
    fn status_keeps_unknown_fields() {
        let json = r#"{"files_loaded":3,"model_loaded":true,"mode":"in-memory"}"#;
        let status: ServiceStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.files_loaded, Some(3));
        assert_eq!(status.model_loaded, Some(true));
        assert!(status.storage_files.is_none());
        assert_eq!(status.extra["mode"], "in-memory");
    }
}
