//! Learning store.
//!
//! Tracks the active learning path, the lesson being viewed, the
//! path-generation flag, and per-lesson progress percentages. Path progress
//! is derived state: `complete_lesson` recomputes it from the lesson list
//! so it always equals `round(100 * completed / total)`.

pub mod model;

use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

pub use model::{
    CodeExample, CreateLearningPathRequest, Difficulty, Exercise, LearningPath, LearningStyle,
    Lesson, LessonCompletion, LessonType, PathStatus, TechnologyLevel, TimeCommitment,
};

#[derive(Default)]
struct LearningState {
    active_path: Option<LearningPath>,
    current_lesson: Option<Lesson>,
    generating_path: bool,
    lesson_progress: HashMap<String, u8>,
}

/// Client-side cache of the learning experience.
#[derive(Default)]
pub struct LearningStore {
    inner: RwLock<LearningState>,
}

impl LearningStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the active path. Clears the current lesson, which belonged to
    /// the previous path.
    pub fn set_active_path(&self, path: Option<LearningPath>) {
        let mut state = self.inner.write().expect("learning store poisoned");
        state.active_path = path;
        state.current_lesson = None;
    }

    pub fn set_current_lesson(&self, lesson: Option<Lesson>) {
        self.inner
            .write()
            .expect("learning store poisoned")
            .current_lesson = lesson;
    }

    pub fn set_generating_path(&self, generating: bool) {
        self.inner
            .write()
            .expect("learning store poisoned")
            .generating_path = generating;
    }

    pub fn update_lesson_progress(&self, lesson_id: &str, progress: u8) {
        self.inner
            .write()
            .expect("learning store poisoned")
            .lesson_progress
            .insert(lesson_id.to_string(), progress);
    }

    /// Mark a lesson of the active path completed and recompute path
    /// progress from the lesson list. Returns the new progress, or `None`
    /// when the lesson is not part of the active path.
    pub fn complete_lesson(&self, lesson_id: &str) -> Option<u8> {
        let mut state = self.inner.write().expect("learning store poisoned");
        state.lesson_progress.insert(lesson_id.to_string(), 100);

        let path = state.active_path.as_mut()?;
        let lesson = path.lessons.iter_mut().find(|l| l.id == lesson_id)?;
        lesson.completed = true;
        lesson.completed_at = Some(Utc::now());

        path.progress = path.computed_progress();
        path.updated_at = Utc::now();
        Some(path.progress)
    }

    /// Overwrite the active path's progress (server-pushed value).
    pub fn set_path_progress(&self, path_id: &str, progress: u8) {
        let mut state = self.inner.write().expect("learning store poisoned");
        if let Some(path) = state.active_path.as_mut() {
            if path.id == path_id {
                path.progress = progress;
            }
        }
    }

    pub fn active_path(&self) -> Option<LearningPath> {
        self.inner
            .read()
            .expect("learning store poisoned")
            .active_path
            .clone()
    }

    pub fn current_lesson(&self) -> Option<Lesson> {
        self.inner
            .read()
            .expect("learning store poisoned")
            .current_lesson
            .clone()
    }

    pub fn is_generating_path(&self) -> bool {
        self.inner
            .read()
            .expect("learning store poisoned")
            .generating_path
    }

    pub fn lesson_progress(&self, lesson_id: &str) -> Option<u8> {
        self.inner
            .read()
            .expect("learning store poisoned")
            .lesson_progress
            .get(lesson_id)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: &str, order: u32, completed: bool) -> Lesson {
        Lesson {
            id: id.to_string(),
            order,
            title: format!("Lesson {order}"),
            description: String::new(),
            estimated_time: 45,
            lesson_type: LessonType::Concept,
            objectives: vec![],
            content: String::new(),
            examples: vec![],
            exercises: vec![],
            completed,
            completed_at: completed.then(Utc::now),
        }
    }

    fn path_with(lessons: Vec<Lesson>) -> LearningPath {
        let mut path = LearningPath {
            id: "lp-1".into(),
            title: "Next.js to Vite".into(),
            from: TechnologyLevel {
                technology: "Next.js".into(),
                proficiency: 7.5,
            },
            to: TechnologyLevel {
                technology: "Vite".into(),
                proficiency: 8.0,
            },
            estimated_duration: "4 weeks".into(),
            difficulty: Difficulty::Intermediate,
            prerequisites: vec![],
            lessons,
            progress: 0,
            status: PathStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        path.progress = path.computed_progress();
        path
    }

    #[test]
    fn complete_lesson_recomputes_progress_by_formula() {
        let store = LearningStore::new();
        store.set_active_path(Some(path_with(vec![
            lesson("l1", 1, false),
            lesson("l2", 2, false),
            lesson("l3", 3, false),
        ])));

        assert_eq!(store.complete_lesson("l1"), Some(33));
        assert_eq!(store.complete_lesson("l2"), Some(67));
        assert_eq!(store.complete_lesson("l3"), Some(100));
    }

    #[test]
    fn progress_matches_formula_for_every_lesson_count() {
        for total in 1usize..=12 {
            let store = LearningStore::new();
            let lessons: Vec<Lesson> = (0..total)
                .map(|i| lesson(&format!("l{i}"), i as u32 + 1, false))
                .collect();
            store.set_active_path(Some(path_with(lessons)));

            for completed in 1..=total {
                let progress = store.complete_lesson(&format!("l{}", completed - 1)).unwrap();
                let expected = ((completed as f64 / total as f64) * 100.0).round() as u8;
                assert_eq!(progress, expected, "{completed}/{total}");
            }
        }
    }

    #[test]
    fn complete_unknown_lesson_returns_none() {
        let store = LearningStore::new();
        store.set_active_path(Some(path_with(vec![lesson("l1", 1, false)])));
        assert_eq!(store.complete_lesson("nope"), None);
        // lesson progress map still records the attempt target
        assert_eq!(store.lesson_progress("nope"), Some(100));
    }

    #[test]
    fn switching_path_clears_current_lesson() {
        let store = LearningStore::new();
        store.set_active_path(Some(path_with(vec![lesson("l1", 1, false)])));
        store.set_current_lesson(Some(lesson("l1", 1, false)));
        store.set_active_path(Some(path_with(vec![lesson("x1", 1, false)])));
        assert!(store.current_lesson().is_none());
    }

    #[test]
    fn set_path_progress_ignores_other_paths() {
        let store = LearningStore::new();
        store.set_active_path(Some(path_with(vec![lesson("l1", 1, false)])));
        store.set_path_progress("lp-other", 50);
        assert_eq!(store.active_path().unwrap().progress, 0);
        store.set_path_progress("lp-1", 50);
        assert_eq!(store.active_path().unwrap().progress, 50);
    }
}
