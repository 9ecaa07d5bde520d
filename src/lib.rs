//! CodeShift client core.
//!
//! The headless state layer of the CodeShift platform client: domain entity
//! stores, a keyed query/mutation cache, a notification queue, and the
//! remote-service boundary (shipped as an in-memory mock). Views render
//! from store state and query results; everything here is presentation-free.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod ids;
pub mod learning;
pub mod notify;
pub mod ops;
pub mod query;
pub mod repo;
pub mod skills;
pub mod storage;
pub mod translation;
pub mod validation;

use std::sync::Arc;

use api::{MockApi, RemoteApi};
use auth::AuthStore;
use config::ClientConfig;
use learning::LearningStore;
use notify::NotificationCenter;
use ops::{AuthOps, DashboardOps, LearningOps, RepoOps, SearchOps, SkillOps, TranslationOps};
use query::QueryClient;
use repo::RepositoryStore;
use storage::RecordStore;
use translation::TranslationStore;

/// Shared application state: every store, the query cache, and the
/// per-domain operation coordinators. Constructed once per process, or
/// once per test, which is the point of not having process-wide singletons.
pub struct AppContext {
    pub config: Arc<ClientConfig>,
    pub api: Arc<dyn RemoteApi>,
    pub queries: Arc<QueryClient>,
    pub notifications: Arc<NotificationCenter>,

    // Stores
    pub auth_store: Arc<AuthStore>,
    pub repository_store: Arc<RepositoryStore>,
    pub learning_store: Arc<LearningStore>,
    pub translation_store: Arc<TranslationStore>,

    // Operation layer
    pub auth: Arc<AuthOps>,
    pub repositories: Arc<RepoOps>,
    pub skills: Arc<SkillOps>,
    pub translation: Arc<TranslationOps>,
    pub learning: Arc<LearningOps>,
    pub dashboard: Arc<DashboardOps>,
    pub search: Arc<SearchOps>,
}

impl AppContext {
    /// Wire stores, cache, and operations around the given remote boundary.
    pub fn new(config: ClientConfig, api: Arc<dyn RemoteApi>) -> Self {
        let config = Arc::new(config);
        let queries = Arc::new(QueryClient::new(config.retry.clone()));
        let notifications = NotificationCenter::new(config.notifications.default_duration_ms);

        let auth_store = Arc::new(AuthStore::load(RecordStore::new(&config.data_dir)));
        let repository_store = Arc::new(RepositoryStore::new());
        let learning_store = Arc::new(LearningStore::new());
        let translation_store = Arc::new(TranslationStore::new());

        let auth = Arc::new(AuthOps::new(
            api.clone(),
            auth_store.clone(),
            queries.clone(),
            notifications.clone(),
            config.clone(),
        ));
        let repositories = Arc::new(RepoOps::new(
            api.clone(),
            repository_store.clone(),
            auth_store.clone(),
            queries.clone(),
            notifications.clone(),
            config.clone(),
        ));
        let skills = Arc::new(SkillOps::new(
            api.clone(),
            queries.clone(),
            notifications.clone(),
            config.clone(),
        ));
        let translation = Arc::new(TranslationOps::new(
            api.clone(),
            translation_store.clone(),
            queries.clone(),
            notifications.clone(),
        ));
        let learning = Arc::new(LearningOps::new(
            api.clone(),
            learning_store.clone(),
            queries.clone(),
            notifications.clone(),
            config.clone(),
        ));
        let dashboard = Arc::new(DashboardOps::new(api.clone(), queries.clone()));
        let search = Arc::new(SearchOps::new(api.clone(), queries.clone()));

        Self {
            config,
            api,
            queries,
            notifications,
            auth_store,
            repository_store,
            learning_store,
            translation_store,
            auth,
            repositories,
            skills,
            translation,
            learning,
            dashboard,
            search,
        }
    }

    /// Context backed by the in-memory mock service.
    pub fn with_mock(config: ClientConfig) -> Self {
        let api = Arc::new(MockApi::new(config.mock.clone()));
        Self::new(config, api)
    }
}
