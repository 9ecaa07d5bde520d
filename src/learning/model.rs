//! Learning path and lesson data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a learning path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStatus {
    Active,
    Completed,
    Paused,
}

impl PathStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathStatus::Active => "active",
            PathStatus::Completed => "completed",
            PathStatus::Paused => "paused",
        }
    }
}

impl std::fmt::Display for PathStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// What kind of work a lesson asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    Concept,
    Practice,
    Project,
}

/// Before/after snippet illustrating a migration step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeExample {
    pub title: String,
    pub before: String,
    pub after: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub title: String,
    pub description: String,
    pub starter_code: Option<String>,
    pub solution: Option<String>,
    pub hints: Vec<String>,
}

/// One ordered step within a learning path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub order: u32,
    pub title: String,
    pub description: String,
    /// Minutes.
    pub estimated_time: u32,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub objectives: Vec<String>,
    /// Markdown body.
    pub content: String,
    pub examples: Vec<CodeExample>,
    pub exercises: Vec<Exercise>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Source or target technology with a proficiency level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyLevel {
    pub technology: String,
    pub proficiency: f64,
}

/// A personalized migration curriculum.
///
/// `progress` is derived state: `round(100 * completed / total)` over the
/// lessons, recomputed on every lesson completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub id: String,
    pub title: String,
    pub from: TechnologyLevel,
    pub to: TechnologyLevel,
    pub estimated_duration: String,
    pub difficulty: Difficulty,
    pub prerequisites: Vec<String>,
    pub lessons: Vec<Lesson>,
    /// 0–100.
    pub progress: u8,
    pub status: PathStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LearningPath {
    /// Progress by the canonical formula over the lessons list.
    pub fn computed_progress(&self) -> u8 {
        if self.lessons.is_empty() {
            return 0;
        }
        let completed = self.lessons.iter().filter(|l| l.completed).count();
        ((completed as f64 / self.lessons.len() as f64) * 100.0).round() as u8
    }
}

/// Weekly effort the learner signed up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeCommitment {
    Light,
    Moderate,
    Intensive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    Practical,
    Theoretical,
    Mixed,
}

/// Request to generate a new learning path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLearningPathRequest {
    pub from_technology: String,
    pub to_technology: String,
    pub proficiency_target: Option<f64>,
    pub time_commitment: Option<TimeCommitment>,
    pub learning_style: Option<LearningStyle>,
}

/// Result of completing a lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonCompletion {
    /// Path progress after the completion, by the canonical formula.
    pub path_progress: u8,
    /// First still-uncompleted lesson, in order. `None` when the path is done.
    pub next_lesson_id: Option<String>,
}
