//! Repository store.
//!
//! Caches the repository list, the currently viewed repository, and per-id
//! transient analysis flags. The flags live in their own maps so replacing
//! the list never clobbers in-flight UI state.
//!
//! Invariant: when a repository is both the selected projection and a list
//! entry, `update_repository` mutates the two in the same call; they never
//! diverge.

pub mod model;

use std::collections::HashMap;
use std::sync::RwLock;

pub use model::{
    AnalysisJob, ConnectRepositoryRequest, DetectedPackage, JobStatus, LanguageShare, RepoMetrics,
    RepoStatus, Repository, RepositoryPage, RepositoryQuery, RepositoryUpdate, Technologies,
};

#[derive(Default)]
struct RepositoryState {
    repositories: Vec<Repository>,
    selected: Option<Repository>,
    analyzing: HashMap<String, bool>,
    analysis_progress: HashMap<String, f64>,
}

/// Client-side cache of repositories and their analysis state.
#[derive(Default)]
pub struct RepositoryStore {
    inner: RwLock<RepositoryState>,
}

impl RepositoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached list. Transient flags are left untouched.
    pub fn set_repositories(&self, repositories: Vec<Repository>) {
        self.inner.write().expect("repo store poisoned").repositories = repositories;
    }

    /// Insert a newly connected repository at the head of the list.
    pub fn add_repository(&self, repository: Repository) {
        self.inner
            .write()
            .expect("repo store poisoned")
            .repositories
            .insert(0, repository);
    }

    /// Merge `update` into the list entry and, when it is the same
    /// repository, the selected projection.
    pub fn update_repository(&self, id: &str, update: RepositoryUpdate) {
        let mut state = self.inner.write().expect("repo store poisoned");
        if let Some(repo) = state.repositories.iter_mut().find(|r| r.id == id) {
            update.apply(repo);
        }
        if let Some(selected) = state.selected.as_mut() {
            if selected.id == id {
                update.apply(selected);
            }
        }
    }

    pub fn set_selected(&self, repository: Option<Repository>) {
        self.inner.write().expect("repo store poisoned").selected = repository;
    }

    pub fn set_analyzing(&self, id: &str, analyzing: bool) {
        self.inner
            .write()
            .expect("repo store poisoned")
            .analyzing
            .insert(id.to_string(), analyzing);
    }

    pub fn set_analysis_progress(&self, id: &str, progress: f64) {
        self.inner
            .write()
            .expect("repo store poisoned")
            .analysis_progress
            .insert(id.to_string(), progress);
    }

    pub fn repositories(&self) -> Vec<Repository> {
        self.inner
            .read()
            .expect("repo store poisoned")
            .repositories
            .clone()
    }

    pub fn get(&self, id: &str) -> Option<Repository> {
        self.inner
            .read()
            .expect("repo store poisoned")
            .repositories
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn selected(&self) -> Option<Repository> {
        self.inner.read().expect("repo store poisoned").selected.clone()
    }

    pub fn is_analyzing(&self, id: &str) -> bool {
        self.inner
            .read()
            .expect("repo store poisoned")
            .analyzing
            .get(id)
            .copied()
            .unwrap_or(false)
    }

    pub fn analysis_progress(&self, id: &str) -> Option<f64> {
        self.inner
            .read()
            .expect("repo store poisoned")
            .analysis_progress
            .get(id)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn repo(id: &str) -> Repository {
        Repository {
            id: id.to_string(),
            name: format!("repo-{id}"),
            full_name: format!("mira-dev/repo-{id}"),
            github_url: format!("https://github.com/mira-dev/repo-{id}"),
            branch: "main".into(),
            status: RepoStatus::Pending,
            created_at: Utc::now(),
            analyzed_at: None,
            technologies: Technologies::default(),
            metrics: None,
        }
    }

    #[test]
    fn add_repository_inserts_at_head() {
        let store = RepositoryStore::new();
        store.set_repositories(vec![repo("a")]);
        store.add_repository(repo("b"));
        let repos = store.repositories();
        assert_eq!(repos[0].id, "b");
        assert_eq!(repos[1].id, "a");
    }

    #[test]
    fn update_touches_list_and_selected_consistently() {
        let store = RepositoryStore::new();
        let r = repo("a");
        store.set_repositories(vec![r.clone()]);
        store.set_selected(Some(r));

        store.update_repository("a", RepositoryUpdate::status(RepoStatus::Completed));

        assert_eq!(store.get("a").unwrap().status, RepoStatus::Completed);
        assert_eq!(store.selected().unwrap().status, RepoStatus::Completed);
    }

    #[test]
    fn update_merges_only_set_fields() {
        let store = RepositoryStore::new();
        store.set_repositories(vec![repo("a")]);
        store.update_repository(
            "a",
            RepositoryUpdate {
                branch: Some("develop".into()),
                ..RepositoryUpdate::default()
            },
        );
        let updated = store.get("a").unwrap();
        assert_eq!(updated.branch, "develop");
        assert_eq!(updated.status, RepoStatus::Pending);
        assert_eq!(updated.name, "repo-a");
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let store = RepositoryStore::new();
        store.set_repositories(vec![repo("a")]);
        store.update_repository("zzz", RepositoryUpdate::status(RepoStatus::Failed));
        assert_eq!(store.get("a").unwrap().status, RepoStatus::Pending);
    }

    #[test]
    fn list_replacement_keeps_transient_flags() {
        let store = RepositoryStore::new();
        store.set_repositories(vec![repo("a")]);
        store.set_analyzing("a", true);
        store.set_analysis_progress("a", 40.0);

        store.set_repositories(vec![repo("a"), repo("b")]);

        assert!(store.is_analyzing("a"));
        assert_eq!(store.analysis_progress("a"), Some(40.0));
    }
}
