// SPDX-License-Identifier: MIT
//! Repository operations: list/detail queries, connect and analyze
//! mutations, and the analysis polling watcher.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::RemoteApi;
use crate::auth::AuthStore;
use crate::config::ClientConfig;
use crate::error::{ApiError, CoreError, ValidationError};
use crate::notify::NotificationCenter;
use crate::query::{QueryClient, QueryKey};
use crate::repo::{
    AnalysisJob, ConnectRepositoryRequest, JobStatus, RepoStatus, Repository, RepositoryPage,
    RepositoryQuery, RepositoryStore, RepositoryUpdate,
};
use crate::validation::is_valid_github_url;

const STALE_LIST: Duration = Duration::from_secs(2 * 60);
const STALE_DETAIL: Duration = Duration::from_secs(5 * 60);

fn repositories_key() -> QueryKey {
    QueryKey::new(["repositories"])
}

fn list_key(query: &RepositoryQuery) -> QueryKey {
    repositories_key()
        .push("list")
        .push(format!("page={}", query.page.unwrap_or(1)))
        .push(format!("limit={}", query.limit.unwrap_or(20)))
        .push_opt(query.status.map(|s| format!("status={s}")))
}

fn detail_key(id: &str) -> QueryKey {
    repositories_key().push(id)
}

fn status_key(job_id: &str) -> QueryKey {
    QueryKey::new(["analysis-status"]).push(job_id)
}

pub struct RepoOps {
    api: Arc<dyn RemoteApi>,
    store: Arc<RepositoryStore>,
    auth: Arc<AuthStore>,
    queries: Arc<QueryClient>,
    notify: Arc<NotificationCenter>,
    config: Arc<ClientConfig>,
}

/// Handle onto a running analysis poll. Aborting the handle guarantees no
/// further store writes from this poll.
pub struct AnalysisWatch {
    job_id: String,
    handle: JoinHandle<()>,
}

impl AnalysisWatch {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Stop polling. Safe to call after the poll already finished.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait until the poll reaches a terminal state (or is cancelled).
    pub async fn wait(self) {
        let _ = self.handle.await;
    }
}

impl RepoOps {
    pub fn new(
        api: Arc<dyn RemoteApi>,
        store: Arc<RepositoryStore>,
        auth: Arc<AuthStore>,
        queries: Arc<QueryClient>,
        notify: Arc<NotificationCenter>,
        config: Arc<ClientConfig>,
    ) -> Self {
        Self {
            api,
            store,
            auth,
            queries,
            notify,
            config,
        }
    }

    /// Cached repository list; a fresh page replaces the store list.
    pub async fn list(&self, query: RepositoryQuery) -> Result<RepositoryPage, CoreError> {
        let page = Self::fetch_list(&self.api, &self.store, &self.queries, query).await?;
        Ok(page)
    }

    /// Cached repository detail; a fresh value becomes the selected
    /// projection. Disabled while the id is unknown. Not-found is terminal
    /// for the requesting view.
    pub async fn get(&self, id: &str) -> Result<Option<Repository>, CoreError> {
        if id.is_empty() {
            return Ok(None);
        }
        let api = self.api.clone();
        let store = &self.store;
        let id_owned = id.to_string();
        let repository = self
            .queries
            .fetch_with(
                &detail_key(id),
                STALE_DETAIL,
                move || {
                    let api = api.clone();
                    let id = id_owned.clone();
                    async move { api.get_repository(&id).await }
                },
                |repo: &Repository| store.set_selected(Some(repo.clone())),
            )
            .await?;
        Ok(Some(repository))
    }

    /// Register a remote repository. The URL is validated before any
    /// request; on success the new repository lands at the head of the
    /// store list and every repositories query refetches.
    pub async fn connect(
        &self,
        request: ConnectRepositoryRequest,
    ) -> Result<Repository, CoreError> {
        if !is_valid_github_url(&request.github_url) {
            let err = ValidationError::single("Enter a valid GitHub repository URL");
            self.notify
                .warning("Invalid repository URL", err.to_string());
            return Err(err.into());
        }

        match self.api.connect_repository(request).await {
            Ok(repository) => {
                self.store.add_repository(repository.clone());
                self.queries.invalidate(&repositories_key());
                self.notify.success(
                    "Repository connected",
                    format!("{} is ready for analysis", repository.full_name),
                );
                Ok(repository)
            }
            Err(err) => {
                self.notify
                    .error("Could not connect repository", err.to_string());
                Err(err.into())
            }
        }
    }

    /// Kick off analysis. The analyzing flag flips optimistically and is
    /// reverted when the request fails.
    pub async fn analyze(&self, repository_id: &str) -> Result<AnalysisJob, CoreError> {
        self.store.set_analyzing(repository_id, true);
        match self.api.analyze_repository(repository_id).await {
            Ok(job) => {
                self.queries.invalidate(&status_key(&job.job_id));
                Ok(job)
            }
            Err(err) => {
                self.store.set_analyzing(repository_id, false);
                self.notify
                    .error("Could not start analysis", err.to_string());
                Err(err.into())
            }
        }
    }

    /// One status poll. Never cached (zero staleness); progress lands in
    /// the store under the repository id.
    pub async fn analysis_status(
        &self,
        job_id: &str,
        repository_id: &str,
    ) -> Result<AnalysisJob, CoreError> {
        let job =
            Self::poll_status(&self.api, &self.store, &self.queries, job_id, repository_id).await?;
        Ok(job)
    }

    /// Poll an analysis job at the configured cadence until it reaches a
    /// terminal status, then update the repository and stop permanently.
    ///
    /// The poll also stops when the session ends (enabling precondition
    /// false) or when a status request fails after retries. Cancel the
    /// returned watch to stop early; no store writes happen afterwards.
    pub fn watch_analysis(&self, job_id: &str, repository_id: &str) -> AnalysisWatch {
        let api = self.api.clone();
        let store = self.store.clone();
        let auth = self.auth.clone();
        let queries = self.queries.clone();
        let notify = self.notify.clone();
        let cadence = self.config.polling.interval();
        let job_id = job_id.to_string();
        let repository_id = repository_id.to_string();

        let watch_job_id = job_id.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(cadence);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                if !auth.is_authenticated() {
                    debug!(%job_id, "analysis poll stopped: session ended");
                    break;
                }

                match Self::poll_status(&api, &store, &queries, &job_id, &repository_id).await {
                    Ok(job) if job.status.is_terminal() => {
                        Self::apply_terminal(&store, &queries, &notify, &repository_id, &job);
                        break;
                    }
                    Ok(job) => {
                        debug!(
                            %job_id,
                            progress = job.progress,
                            step = %job.current_step,
                            "analysis progress"
                        );
                    }
                    Err(err) => {
                        warn!(%job_id, error = %err, "analysis poll failed");
                        store.set_analyzing(&repository_id, false);
                        notify.error("Analysis status unavailable", err.to_string());
                        break;
                    }
                }
            }
        });

        AnalysisWatch {
            job_id: watch_job_id,
            handle,
        }
    }

    /// Refetch the repository list whenever a repositories key is
    /// invalidated, for as long as the returned task runs.
    pub fn spawn_list_refetcher(&self, query: RepositoryQuery) -> JoinHandle<()> {
        let api = self.api.clone();
        let store = self.store.clone();
        let queries = self.queries.clone();
        tokio::spawn(async move {
            let mut subscription = queries.subscribe(repositories_key());
            while subscription.invalidated().await.is_some() {
                if let Err(err) = Self::fetch_list(&api, &store, &queries, query.clone()).await {
                    warn!(error = %err, "repository list refetch failed");
                }
            }
        })
    }

    async fn fetch_list(
        api: &Arc<dyn RemoteApi>,
        store: &Arc<RepositoryStore>,
        queries: &Arc<QueryClient>,
        query: RepositoryQuery,
    ) -> Result<RepositoryPage, ApiError> {
        let key = list_key(&query);
        let api = api.clone();
        queries
            .fetch_with(
                &key,
                STALE_LIST,
                move || {
                    let api = api.clone();
                    let query = query.clone();
                    async move { api.list_repositories(query).await }
                },
                |page: &RepositoryPage| store.set_repositories(page.items.clone()),
            )
            .await
    }

    async fn poll_status(
        api: &Arc<dyn RemoteApi>,
        store: &Arc<RepositoryStore>,
        queries: &Arc<QueryClient>,
        job_id: &str,
        repository_id: &str,
    ) -> Result<AnalysisJob, ApiError> {
        let api = api.clone();
        let job_owned = job_id.to_string();
        queries
            .fetch_with(
                &status_key(job_id),
                Duration::ZERO,
                move || {
                    let api = api.clone();
                    let job_id = job_owned.clone();
                    async move { api.analysis_status(&job_id).await }
                },
                |job: &AnalysisJob| store.set_analysis_progress(repository_id, job.progress),
            )
            .await
    }

    fn apply_terminal(
        store: &RepositoryStore,
        queries: &QueryClient,
        notify: &NotificationCenter,
        repository_id: &str,
        job: &AnalysisJob,
    ) {
        store.set_analyzing(repository_id, false);
        match job.status {
            JobStatus::Completed => {
                store.update_repository(
                    repository_id,
                    RepositoryUpdate {
                        status: Some(RepoStatus::Completed),
                        analyzed_at: Some(Utc::now()),
                        ..RepositoryUpdate::default()
                    },
                );
                queries.invalidate(&repositories_key());
                notify.success("Analysis completed", format!("Job {} finished", job.job_id));
            }
            JobStatus::Failed => {
                store.update_repository(repository_id, RepositoryUpdate::status(RepoStatus::Failed));
                let reason = job
                    .error
                    .clone()
                    .unwrap_or_else(|| "analysis did not complete".to_string());
                notify.error("Analysis failed", reason);
            }
            JobStatus::Queued | JobStatus::Processing => {}
        }
    }
}
