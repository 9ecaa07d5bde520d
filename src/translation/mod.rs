//! Translation workbench store.
//!
//! A small state machine: idle → editing (source present) → translating →
//! translated → back to editing on any source or framework change. Any such
//! change clears the previous output (target code, confidence, warnings,
//! suggestions) in one locked update. A partial clear is a defect.
//!
//! Completed translations land in a bounded history: max 10 entries,
//! most-recent-first, oldest evicted.

pub mod model;

use chrono::Utc;
use std::collections::VecDeque;
use std::sync::RwLock;

use crate::ids;
pub use model::{
    CodeAnalysis, CodeAnalysisRequest, Complexity, PackageChange, PatternExample,
    TranslationMetadata, TranslationOptions, TranslationOutcome, TranslationPattern,
    TranslationRecord, TranslationRequest, TranslationResponse, TranslationSide,
    TranslationTarget,
};

/// Maximum retained history entries.
pub const HISTORY_LIMIT: usize = 10;

/// Observable phase of the workbench.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbenchPhase {
    Idle,
    Editing,
    Translating,
    Translated,
}

#[derive(Default)]
struct TranslationState {
    source_code: String,
    target_code: String,
    source_framework: Option<String>,
    target_framework: Option<String>,
    translating: bool,
    confidence: f64,
    warnings: Vec<String>,
    suggestions: Vec<String>,
    history: VecDeque<TranslationRecord>,
}

impl TranslationState {
    /// Drop every output field of the previous translation in one step.
    fn clear_outputs(&mut self) {
        self.target_code.clear();
        self.confidence = 0.0;
        self.warnings.clear();
        self.suggestions.clear();
    }
}

/// Point-in-time copy of the workbench for rendering and tests.
#[derive(Debug, Clone)]
pub struct WorkbenchSnapshot {
    pub source_code: String,
    pub target_code: String,
    pub source_framework: Option<String>,
    pub target_framework: Option<String>,
    pub translating: bool,
    pub confidence: f64,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Client-side cache of the translation workbench.
#[derive(Default)]
pub struct TranslationStore {
    inner: RwLock<TranslationState>,
}

impl TranslationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the source code. Clears the previous output atomically.
    pub fn set_source_code(&self, code: impl Into<String>) {
        let mut state = self.inner.write().expect("translation store poisoned");
        state.source_code = code.into();
        state.clear_outputs();
    }

    /// Select the framework pair. Clears the previous output atomically.
    pub fn set_frameworks(&self, source: impl Into<String>, target: impl Into<String>) {
        let mut state = self.inner.write().expect("translation store poisoned");
        state.source_framework = Some(source.into());
        state.target_framework = Some(target.into());
        state.clear_outputs();
    }

    pub fn set_translating(&self, translating: bool) {
        self.inner
            .write()
            .expect("translation store poisoned")
            .translating = translating;
    }

    /// Apply a completed translation and leave the translating state.
    pub fn set_result(&self, outcome: TranslationOutcome) {
        let mut state = self.inner.write().expect("translation store poisoned");
        state.target_code = outcome.target_code;
        state.confidence = outcome.confidence;
        state.warnings = outcome.warnings;
        state.suggestions = outcome.suggestions;
        state.translating = false;
    }

    /// Reset the workbench. History and framework selection survive.
    pub fn clear(&self) {
        let mut state = self.inner.write().expect("translation store poisoned");
        state.source_code.clear();
        state.clear_outputs();
    }

    /// Append a completed translation to the history, evicting the oldest
    /// entry past the bound.
    pub fn push_history(&self, source_framework: &str, target_framework: &str, confidence: f64) {
        let mut state = self.inner.write().expect("translation store poisoned");
        state.history.push_front(TranslationRecord {
            id: ids::new_id("hist"),
            source_framework: source_framework.to_string(),
            target_framework: target_framework.to_string(),
            timestamp: Utc::now(),
            confidence,
        });
        state.history.truncate(HISTORY_LIMIT);
    }

    pub fn phase(&self) -> WorkbenchPhase {
        let state = self.inner.read().expect("translation store poisoned");
        if state.translating {
            WorkbenchPhase::Translating
        } else if !state.target_code.is_empty() {
            WorkbenchPhase::Translated
        } else if !state.source_code.is_empty() {
            WorkbenchPhase::Editing
        } else {
            WorkbenchPhase::Idle
        }
    }

    pub fn snapshot(&self) -> WorkbenchSnapshot {
        let state = self.inner.read().expect("translation store poisoned");
        WorkbenchSnapshot {
            source_code: state.source_code.clone(),
            target_code: state.target_code.clone(),
            source_framework: state.source_framework.clone(),
            target_framework: state.target_framework.clone(),
            translating: state.translating,
            confidence: state.confidence,
            warnings: state.warnings.clone(),
            suggestions: state.suggestions.clone(),
        }
    }

    pub fn history(&self) -> Vec<TranslationRecord> {
        self.inner
            .read()
            .expect("translation store poisoned")
            .history
            .iter()
            .cloned()
            .collect()
    }

    pub fn frameworks(&self) -> Option<(String, String)> {
        let state = self.inner.read().expect("translation store poisoned");
        Some((
            state.source_framework.clone()?,
            state.target_framework.clone()?,
        ))
    }
}
