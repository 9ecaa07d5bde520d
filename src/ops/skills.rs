//! Skill-profile operations.

use std::sync::Arc;
use std::time::Duration;

use crate::api::RemoteApi;
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::notify::NotificationCenter;
use crate::query::{with_retry, QueryClient, QueryKey};
use crate::skills::{SkillProfile, SkillUpdate};

const STALE_PROFILE: Duration = Duration::from_secs(10 * 60);

fn profile_key() -> QueryKey {
    QueryKey::new(["skills", "profile"])
}

pub struct SkillOps {
    api: Arc<dyn RemoteApi>,
    queries: Arc<QueryClient>,
    notify: Arc<NotificationCenter>,
    config: Arc<ClientConfig>,
}

impl SkillOps {
    pub fn new(
        api: Arc<dyn RemoteApi>,
        queries: Arc<QueryClient>,
        notify: Arc<NotificationCenter>,
        config: Arc<ClientConfig>,
    ) -> Self {
        Self {
            api,
            queries,
            notify,
            config,
        }
    }

    /// Cached skill profile.
    pub async fn profile(&self) -> Result<SkillProfile, CoreError> {
        let api = self.api.clone();
        let profile = self
            .queries
            .fetch(&profile_key(), STALE_PROFILE, move || {
                let api = api.clone();
                async move { api.skill_profile().await }
            })
            .await?;
        Ok(profile)
    }

    /// Submit proficiency overrides. Idempotent-safe (single retry); the
    /// returned profile primes the cache directly instead of refetching.
    pub async fn update(&self, updates: Vec<SkillUpdate>) -> Result<SkillProfile, CoreError> {
        let api = self.api.clone();
        let result = with_retry(&self.config.retry, 2, &|| {
            let api = api.clone();
            let updates = updates.clone();
            async move { api.update_skills(updates).await }
        })
        .await;

        match result {
            Ok(profile) => {
                self.queries.set_query_data(&profile_key(), &profile);
                self.notify
                    .success("Skills updated", "Your profile reflects the new levels");
                Ok(profile)
            }
            Err(err) => {
                self.notify.error("Could not update skills", err.to_string());
                Err(err.into())
            }
        }
    }
}
