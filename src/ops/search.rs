//! Technology catalog and translation-route search queries.

use std::sync::Arc;
use std::time::Duration;

use crate::api::RemoteApi;
use crate::catalog::{Technology, TranslationRoute};
use crate::error::CoreError;
use crate::query::{QueryClient, QueryKey};

const STALE_SEARCH: Duration = Duration::from_secs(30 * 60);

fn technologies_key(query: Option<&str>) -> QueryKey {
    QueryKey::new(["search", "technologies"]).push_opt(query)
}

fn routes_key(from: Option<&str>, to: Option<&str>) -> QueryKey {
    QueryKey::new(["search", "translation-paths"])
        .push_opt(from.map(|f| format!("from={f}")))
        .push_opt(to.map(|t| format!("to={t}")))
}

pub struct SearchOps {
    api: Arc<dyn RemoteApi>,
    queries: Arc<QueryClient>,
}

impl SearchOps {
    pub fn new(api: Arc<dyn RemoteApi>, queries: Arc<QueryClient>) -> Self {
        Self { api, queries }
    }

    /// Cached technology search.
    pub async fn technologies(&self, query: Option<&str>) -> Result<Vec<Technology>, CoreError> {
        let api = self.api.clone();
        let query_owned = query.map(str::to_string);
        let technologies = self
            .queries
            .fetch(&technologies_key(query), STALE_SEARCH, move || {
                let api = api.clone();
                let query = query_owned.clone();
                async move { api.search_technologies(query.as_deref()).await }
            })
            .await?;
        Ok(technologies)
    }

    /// Cached translation-route support matrix.
    pub async fn routes(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<TranslationRoute>, CoreError> {
        let api = self.api.clone();
        let from_owned = from.map(str::to_string);
        let to_owned = to.map(str::to_string);
        let routes = self
            .queries
            .fetch(&routes_key(from, to), STALE_SEARCH, move || {
                let api = api.clone();
                let from = from_owned.clone();
                let to = to_owned.clone();
                async move { api.translation_routes(from.as_deref(), to.as_deref()).await }
            })
            .await?;
        Ok(routes)
    }
}
