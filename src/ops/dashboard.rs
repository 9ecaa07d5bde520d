//! Dashboard overview query.

use std::sync::Arc;
use std::time::Duration;

use crate::api::RemoteApi;
use crate::dashboard::DashboardOverview;
use crate::error::CoreError;
use crate::query::{QueryClient, QueryKey};

const STALE_OVERVIEW: Duration = Duration::from_secs(5 * 60);

fn overview_key() -> QueryKey {
    QueryKey::new(["dashboard", "overview"])
}

pub struct DashboardOps {
    api: Arc<dyn RemoteApi>,
    queries: Arc<QueryClient>,
}

impl DashboardOps {
    pub fn new(api: Arc<dyn RemoteApi>, queries: Arc<QueryClient>) -> Self {
        Self { api, queries }
    }

    /// Cached dashboard aggregate.
    pub async fn overview(&self) -> Result<DashboardOverview, CoreError> {
        let api = self.api.clone();
        let overview = self
            .queries
            .fetch(&overview_key(), STALE_OVERVIEW, move || {
                let api = api.clone();
                async move { api.dashboard_overview().await }
            })
            .await?;
        Ok(overview)
    }
}
