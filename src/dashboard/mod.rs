//! Dashboard overview data models (read-only aggregate).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub repositories_analyzed: u32,
    pub translations_completed: u32,
    pub learning_paths_active: u32,
    pub skills_tracked: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Analysis,
    Translation,
    Learning,
}

/// One row in the recent-activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentActivity {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    /// Free-form per-activity details (confidence, lesson id, ...).
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillProgress {
    pub technology: String,
    pub previous_level: f64,
    pub current_level: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Learning,
    Translation,
    Skill,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub action: String,
    pub link: String,
}

/// Aggregate payload backing the dashboard view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub stats: DashboardStats,
    pub recent_activity: Vec<RecentActivity>,
    pub skill_progress: Vec<SkillProgress>,
    pub recommendations: Vec<Recommendation>,
}
