//! Technology catalog and translation-route search models.

use serde::{Deserialize, Serialize};

/// A technology known to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    /// Canonical slug, e.g. `nextjs`.
    pub name: String,
    pub display_name: String,
    pub category: String,
    pub description: String,
    /// 0–100.
    pub popularity: u32,
    pub related: Vec<String>,
}

/// A supported source→target translation direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRoute {
    pub from: String,
    pub to: String,
    pub supported: bool,
    pub confidence: f64,
    pub examples_count: u32,
    pub common_use_cases: Vec<String>,
}
