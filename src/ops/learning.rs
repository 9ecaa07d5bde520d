//! Learning operations: path queries, path generation, lesson completion.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::api::RemoteApi;
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::learning::{
    CreateLearningPathRequest, LearningPath, LearningStore, LessonCompletion,
};
use crate::notify::NotificationCenter;
use crate::query::{with_retry, QueryClient, QueryKey};

const STALE_PATHS: Duration = Duration::from_secs(5 * 60);
const STALE_PATH_DETAIL: Duration = Duration::from_secs(10 * 60);

fn paths_key() -> QueryKey {
    QueryKey::new(["learning", "paths"])
}

fn path_key(path_id: &str) -> QueryKey {
    paths_key().push(path_id)
}

pub struct LearningOps {
    api: Arc<dyn RemoteApi>,
    store: Arc<LearningStore>,
    queries: Arc<QueryClient>,
    notify: Arc<NotificationCenter>,
    config: Arc<ClientConfig>,
}

impl LearningOps {
    pub fn new(
        api: Arc<dyn RemoteApi>,
        store: Arc<LearningStore>,
        queries: Arc<QueryClient>,
        notify: Arc<NotificationCenter>,
        config: Arc<ClientConfig>,
    ) -> Self {
        Self {
            api,
            store,
            queries,
            notify,
            config,
        }
    }

    /// Cached list of the user's learning paths.
    pub async fn paths(&self) -> Result<Vec<LearningPath>, CoreError> {
        let api = self.api.clone();
        let paths = self
            .queries
            .fetch(&paths_key(), STALE_PATHS, move || {
                let api = api.clone();
                async move { api.learning_paths().await }
            })
            .await?;
        Ok(paths)
    }

    /// Cached path detail; a fresh value becomes the active path. Disabled
    /// while the id is unknown.
    pub async fn path(&self, path_id: &str) -> Result<Option<LearningPath>, CoreError> {
        if path_id.is_empty() {
            return Ok(None);
        }
        let api = self.api.clone();
        let store = self.store.clone();
        let id_owned = path_id.to_string();
        let path = self
            .queries
            .fetch_with(
                &path_key(path_id),
                STALE_PATH_DETAIL,
                move || {
                    let api = api.clone();
                    let path_id = id_owned.clone();
                    async move { api.learning_path(&path_id).await }
                },
                |path: &LearningPath| store.set_active_path(Some(path.clone())),
            )
            .await?;
        Ok(Some(path))
    }

    /// Generate a new path. The generating flag flips optimistically and is
    /// reverted either way once the request settles.
    pub async fn create(
        &self,
        request: CreateLearningPathRequest,
    ) -> Result<LearningPath, CoreError> {
        self.store.set_generating_path(true);
        match self.api.create_learning_path(request).await {
            Ok(path) => {
                self.store.set_generating_path(false);
                self.store.set_active_path(Some(path.clone()));
                self.queries.invalidate(&paths_key());
                self.notify
                    .success("Learning path ready", path.title.clone());
                Ok(path)
            }
            Err(err) => {
                self.store.set_generating_path(false);
                self.notify
                    .error("Could not create learning path", err.to_string());
                Err(err.into())
            }
        }
    }

    /// Complete a lesson. Idempotent-safe, so a single transport retry
    /// applies. The store recomputes path progress from its lesson list;
    /// the server's figure is cross-checked, not trusted.
    pub async fn complete_lesson(
        &self,
        path_id: &str,
        lesson_id: &str,
    ) -> Result<LessonCompletion, CoreError> {
        let api = self.api.clone();
        let path_owned = path_id.to_string();
        let lesson_owned = lesson_id.to_string();
        let result = with_retry(&self.config.retry, 2, &|| {
            let api = api.clone();
            let path_id = path_owned.clone();
            let lesson_id = lesson_owned.clone();
            async move { api.complete_lesson(&path_id, &lesson_id).await }
        })
        .await;

        match result {
            Ok(completion) => {
                if let Some(progress) = self.store.complete_lesson(lesson_id) {
                    if progress != completion.path_progress {
                        warn!(
                            path_id,
                            lesson_id,
                            local = progress,
                            remote = completion.path_progress,
                            "path progress diverged from server figure"
                        );
                    }
                }
                self.queries.invalidate(&path_key(path_id));
                info!(path_id, lesson_id, progress = completion.path_progress, "lesson completed");
                Ok(completion)
            }
            Err(err) => {
                self.notify
                    .error("Could not complete lesson", err.to_string());
                Err(err.into())
            }
        }
    }
}
