//! Auth operations: login, logout, current-user probe.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::api::RemoteApi;
use crate::auth::{AuthStore, User};
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::notify::NotificationCenter;
use crate::query::{with_retry, QueryClient, QueryKey};

const STALE_CURRENT_USER: Duration = Duration::from_secs(5 * 60);

fn current_user_key() -> QueryKey {
    QueryKey::new(["auth", "current-user"])
}

pub struct AuthOps {
    api: Arc<dyn RemoteApi>,
    auth: Arc<AuthStore>,
    queries: Arc<QueryClient>,
    notify: Arc<NotificationCenter>,
    config: Arc<ClientConfig>,
}

impl AuthOps {
    pub fn new(
        api: Arc<dyn RemoteApi>,
        auth: Arc<AuthStore>,
        queries: Arc<QueryClient>,
        notify: Arc<NotificationCenter>,
        config: Arc<ClientConfig>,
    ) -> Self {
        Self {
            api,
            auth,
            queries,
            notify,
            config,
        }
    }

    /// Sign in. On success the session store is updated and the login
    /// response primes the current-user query.
    pub async fn login(&self) -> Result<User, CoreError> {
        self.auth.set_loading(true);
        match self.api.login().await {
            Ok(response) => {
                info!(username = %response.user.username, "signed in");
                self.auth
                    .login(response.user.clone(), response.access_token);
                self.queries
                    .set_query_data(&current_user_key(), &response.user);
                Ok(response.user)
            }
            Err(err) => {
                self.auth.set_loading(false);
                self.notify.error("Sign-in failed", err.to_string());
                Err(err.into())
            }
        }
    }

    /// Sign out and drop every cached query. Idempotent-safe, so a single
    /// transport retry applies.
    pub async fn logout(&self) -> Result<(), CoreError> {
        let api = self.api.clone();
        let result = with_retry(&self.config.retry, 2, &|| {
            let api = api.clone();
            async move { api.logout().await }
        })
        .await;

        match result {
            Ok(()) => {
                self.auth.logout();
                self.queries.clear();
                info!("signed out");
                Ok(())
            }
            Err(err) => {
                self.notify.error("Sign-out failed", err.to_string());
                Err(err.into())
            }
        }
    }

    /// Cached current-user probe. Disabled until a session exists; failures
    /// surface immediately (no retry) so the caller can fall back to login.
    pub async fn current_user(&self) -> Result<Option<User>, CoreError> {
        if !self.auth.is_authenticated() {
            return Ok(None);
        }
        let api = self.api.clone();
        let user = self
            .queries
            .fetch_once_with(
                &current_user_key(),
                STALE_CURRENT_USER,
                move || {
                    let api = api.clone();
                    async move { api.current_user().await }
                },
                |_| {},
            )
            .await?;
        Ok(Some(user))
    }
}
