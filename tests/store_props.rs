//! Property tests for the store invariants.

use chrono::Utc;
use proptest::prelude::*;

use codeshift::learning::{
    Difficulty, LearningPath, LearningStore, Lesson, LessonType, PathStatus, TechnologyLevel,
};
use codeshift::repo::{RepoStatus, Repository, RepositoryStore, RepositoryUpdate, Technologies};
use codeshift::translation::{TranslationStore, HISTORY_LIMIT};

fn lesson(id: usize) -> Lesson {
    Lesson {
        id: format!("l{id}"),
        order: id as u32 + 1,
        title: format!("Lesson {id}"),
        description: String::new(),
        estimated_time: 30,
        lesson_type: LessonType::Concept,
        objectives: vec![],
        content: String::new(),
        examples: vec![],
        exercises: vec![],
        completed: false,
        completed_at: None,
    }
}

fn path(total: usize) -> LearningPath {
    LearningPath {
        id: "lp-prop".into(),
        title: "prop".into(),
        from: TechnologyLevel {
            technology: "a".into(),
            proficiency: 5.0,
        },
        to: TechnologyLevel {
            technology: "b".into(),
            proficiency: 8.0,
        },
        estimated_duration: "4 weeks".into(),
        difficulty: Difficulty::Intermediate,
        prerequisites: vec![],
        lessons: (0..total).map(lesson).collect(),
        progress: 0,
        status: PathStatus::Active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn repository(id: u8) -> Repository {
    Repository {
        id: format!("repo-{id}"),
        name: format!("name-{id}"),
        full_name: format!("owner/name-{id}"),
        github_url: format!("https://github.com/owner/name-{id}"),
        branch: "main".into(),
        status: RepoStatus::Pending,
        created_at: Utc::now(),
        analyzed_at: None,
        technologies: Technologies::default(),
        metrics: None,
    }
}

/// One step of the repository-store exercise.
#[derive(Debug, Clone)]
enum RepoOp {
    Add(u8),
    Replace(Vec<u8>),
    SelectExisting(prop::sample::Index),
    SelectNone,
    Update(prop::sample::Index, u8),
}

fn repo_op() -> impl Strategy<Value = RepoOp> {
    prop_oneof![
        (0u8..6).prop_map(RepoOp::Add),
        prop::collection::vec(0u8..6, 0..5).prop_map(RepoOp::Replace),
        any::<prop::sample::Index>().prop_map(RepoOp::SelectExisting),
        Just(RepoOp::SelectNone),
        (any::<prop::sample::Index>(), 0u8..4).prop_map(|(i, b)| RepoOp::Update(i, b)),
    ]
}

proptest! {
    #[test]
    fn translation_history_is_bounded_and_ordered(count in 0usize..30) {
        let store = TranslationStore::new();
        for i in 0..count {
            store.push_history("src", "dst", i as f64);
        }
        let history = store.history();
        prop_assert_eq!(history.len(), count.min(HISTORY_LIMIT));
        // most-recent-first: confidences strictly descending
        for window in history.windows(2) {
            prop_assert!(window[0].confidence > window[1].confidence);
        }
        if count > HISTORY_LIMIT {
            // exactly the oldest entries were evicted
            prop_assert_eq!(history.last().unwrap().confidence, (count - HISTORY_LIMIT) as f64);
        }
    }

    #[test]
    fn path_progress_always_matches_formula(
        total in 1usize..15,
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..25),
    ) {
        let store = LearningStore::new();
        store.set_active_path(Some(path(total)));

        for pick in picks {
            let lesson_id = format!("l{}", pick.index(total));
            store.complete_lesson(&lesson_id);

            let path = store.active_path().unwrap();
            let completed = path.lessons.iter().filter(|l| l.completed).count();
            let expected = ((completed as f64 / total as f64) * 100.0).round() as u8;
            prop_assert_eq!(path.progress, expected);
        }
    }

    #[test]
    fn selected_projection_never_diverges_from_list(ops in prop::collection::vec(repo_op(), 1..40)) {
        let store = RepositoryStore::new();
        for op in ops {
            match op {
                RepoOp::Add(id) => store.add_repository(repository(id)),
                RepoOp::Replace(ids) => {
                    store.set_repositories(ids.into_iter().map(repository).collect())
                }
                RepoOp::SelectExisting(index) => {
                    let list = store.repositories();
                    if !list.is_empty() {
                        store.set_selected(Some(list[index.index(list.len())].clone()));
                    }
                }
                RepoOp::SelectNone => store.set_selected(None),
                RepoOp::Update(index, branch) => {
                    let list = store.repositories();
                    if !list.is_empty() {
                        let id = list[index.index(list.len())].id.clone();
                        store.update_repository(
                            &id,
                            RepositoryUpdate {
                                branch: Some(format!("branch-{branch}")),
                                status: Some(RepoStatus::Analyzing),
                                ..RepositoryUpdate::default()
                            },
                        );
                    }
                }
            }

            // invariant: a selected repository that is also in the list
            // holds identical field values to its list entry
            if let Some(selected) = store.selected() {
                if let Some(entry) = store.get(&selected.id) {
                    prop_assert_eq!(selected, entry);
                }
            }
        }
    }
}
