//! Code-translation data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tuning knobs for a translation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationOptions {
    pub preserve_structure: Option<bool>,
    pub modern_syntax: Option<bool>,
    pub include_types: Option<bool>,
}

/// Request to translate a snippet between frameworks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub code: String,
    pub source_framework: String,
    pub target_framework: String,
    pub options: Option<TranslationOptions>,
}

/// A dependency swap the translation implies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageChange {
    /// Empty when the package is newly introduced.
    pub from: String,
    pub to: String,
    pub version: String,
}

/// One side of a translation (input or output).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationSide {
    pub framework: String,
    pub code: String,
    pub packages: Vec<String>,
}

/// Output side, with the package migration plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationTarget {
    pub framework: String,
    pub code: String,
    pub packages: Vec<String>,
    pub package_changes: Vec<PackageChange>,
}

/// Quality metadata attached to a completed translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationMetadata {
    /// 0–1.
    pub confidence: f64,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    pub manual_changes_required: Vec<String>,
}

/// A completed translation from the remote boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub id: String,
    pub success: bool,
    pub source: TranslationSide,
    pub target: TranslationTarget,
    pub metadata: TranslationMetadata,
    pub created_at: DateTime<Utc>,
}

/// Pre-translation feasibility check request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeAnalysisRequest {
    pub code: String,
    pub source_framework: String,
    pub target_framework: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Moderate => "moderate",
            Complexity::Complex => "complex",
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feasibility estimate for a proposed translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeAnalysis {
    pub feasible: bool,
    pub confidence: f64,
    pub detected_patterns: Vec<String>,
    pub warnings: Vec<String>,
    pub estimated_complexity: Complexity,
}

/// A reusable source→target rewrite rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationPattern {
    pub id: String,
    pub source_pattern: String,
    pub target_pattern: String,
    pub description: String,
    pub usage_count: u32,
    pub success_rate: f64,
    pub examples: Vec<PatternExample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternExample {
    pub before: String,
    pub after: String,
}

/// Entry in the workbench's bounded translation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub id: String,
    pub source_framework: String,
    pub target_framework: String,
    pub timestamp: DateTime<Utc>,
    pub confidence: f64,
}

/// The translated output applied to the workbench in one step.
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    pub target_code: String,
    pub confidence: f64,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}
