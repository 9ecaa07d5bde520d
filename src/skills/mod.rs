//! Skill-profile data models.
//!
//! The profile has no dedicated client store; it lives in the query cache
//! and is primed directly after an update mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Language,
    Framework,
    Library,
    Tool,
}

/// Observed usage history behind a proficiency estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillExperience {
    pub first_seen: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
    pub project_count: u32,
    pub total_lines: u64,
}

/// One tracked technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub technology: String,
    pub category: SkillCategory,
    /// 1–10.
    pub proficiency: f64,
    pub experience: SkillExperience,
    /// 0–1: how sure the estimator is about the proficiency.
    pub confidence: f64,
}

/// Which technologies the user picks up fast vs. steadily.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningVelocity {
    pub fast_learners: Vec<String>,
    pub steady_progress: Vec<String>,
    pub recent_focus: Vec<String>,
}

/// The user's inferred skill profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillProfile {
    pub id: String,
    pub user_id: String,
    pub skills: Vec<Skill>,
    pub strengths: Vec<String>,
    pub learning_velocity: LearningVelocity,
    pub updated_at: DateTime<Utc>,
}

/// One proficiency override submitted by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillUpdate {
    pub technology: String,
    pub proficiency: f64,
}
