// SPDX-License-Identifier: MIT
//! Keyed query cache with staleness, retry, and request generations.
//!
//! Every read operation is cached under a [`QueryKey`]. A cached value is
//! served while fresh; once past its staleness duration the next fetch goes
//! to the remote boundary (retried with exponential backoff for transport
//! errors). Each key carries a monotonically increasing request generation:
//! a resolution is committed (cache write plus store side effect) only if
//! no newer request for the same key has started since, so a slow superseded
//! response can never overwrite newer data.
//!
//! Invalidating a prefix marks every matching entry stale and immediately
//! notifies live subscriptions so mounted refetch loops re-issue their
//! queries. Differently-keyed caches are untouched.

pub mod key;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::RetrySettings;
use crate::error::ApiError;
pub use key::QueryKey;

/// Staleness applied when a value is primed directly (`set_query_data`)
/// before any fetch declared one.
const DEFAULT_STALE: Duration = Duration::from_secs(5 * 60);

/// Observable lifecycle of one cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    /// Never fetched.
    Idle,
    /// No cached value, request in flight.
    Pending,
    /// Value cached; `stale` once past the staleness duration or after an
    /// invalidation.
    Success { stale: bool },
    /// Last request failed after retries. A previous value, if any, is
    /// retained.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchStatus {
    Pending,
    Success,
    Error,
}

struct QueryEntry {
    value: Option<serde_json::Value>,
    fetched_at: Option<Instant>,
    stale_after: Duration,
    /// Generation of the most recently started request for this key.
    latest_generation: u64,
    status: FetchStatus,
    last_error: Option<String>,
}

impl QueryEntry {
    fn new(stale_after: Duration) -> Self {
        Self {
            value: None,
            fetched_at: None,
            stale_after,
            latest_generation: 0,
            status: FetchStatus::Pending,
            last_error: None,
        }
    }
}

struct Subscriber {
    prefix: QueryKey,
    tx: mpsc::UnboundedSender<QueryKey>,
}

/// Live handle onto invalidations under one key prefix.
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<QueryKey>,
}

impl Subscription {
    /// Next invalidated prefix, or `None` once the client is gone.
    pub async fn invalidated(&mut self) -> Option<QueryKey> {
        self.rx.recv().await
    }
}

/// Shared cache for every keyed read operation.
pub struct QueryClient {
    entries: RwLock<HashMap<QueryKey, QueryEntry>>,
    subscribers: Mutex<Vec<Subscriber>>,
    retry: RetrySettings,
}

impl QueryClient {
    pub fn new(retry: RetrySettings) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            subscribers: Mutex::new(Vec::new()),
            retry,
        }
    }

    /// Fetch through the cache without a store side effect.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: &QueryKey,
        stale_after: Duration,
        fetch: F,
    ) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.fetch_with(key, stale_after, fetch, |_| {}).await
    }

    /// Fetch through the cache. A fresh cached value is returned without a
    /// request. Otherwise the fetcher runs (with the transport retry
    /// policy) and, if this request is still the newest for the key, the
    /// result is cached and `on_success` applies the declared store side
    /// effect. Superseded responses are returned to their caller but leave
    /// cache and stores untouched.
    pub async fn fetch_with<T, F, Fut, S>(
        &self,
        key: &QueryKey,
        stale_after: Duration,
        fetch: F,
        on_success: S,
    ) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
        S: FnOnce(&T),
    {
        self.fetch_inner(key, stale_after, self.retry.max_attempts, fetch, on_success)
            .await
    }

    /// [`fetch_with`](Self::fetch_with) without retry, for queries whose
    /// failure should surface immediately (the current-user probe).
    pub async fn fetch_once_with<T, F, Fut, S>(
        &self,
        key: &QueryKey,
        stale_after: Duration,
        fetch: F,
        on_success: S,
    ) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
        S: FnOnce(&T),
    {
        self.fetch_inner(key, stale_after, 1, fetch, on_success).await
    }

    async fn fetch_inner<T, F, Fut, S>(
        &self,
        key: &QueryKey,
        stale_after: Duration,
        max_attempts: u32,
        fetch: F,
        on_success: S,
    ) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
        S: FnOnce(&T),
    {
        if let Some(value) = self.fresh_value(key, stale_after) {
            match serde_json::from_value::<T>(value) {
                Ok(decoded) => return Ok(decoded),
                // shape changed under the same key; refetch
                Err(e) => warn!(%key, error = %e, "cached value no longer decodes"),
            }
        }

        let generation = self.begin(key, stale_after);
        match with_retry(&self.retry, max_attempts, &fetch).await {
            Ok(value) => {
                if self.commit(key, generation, &value) {
                    on_success(&value);
                } else {
                    debug!(%key, generation, "discarding superseded response");
                }
                Ok(value)
            }
            Err(err) => {
                self.fail(key, generation, &err);
                Err(err)
            }
        }
    }

    /// Prime the cache directly, superseding any in-flight request for the
    /// key (a login response primes the current-user query, a skills update
    /// primes the profile).
    pub fn set_query_data<T: Serialize>(&self, key: &QueryKey, value: &T) {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(%key, error = %e, "could not serialize primed value");
                return;
            }
        };
        let mut entries = self.entries.write().expect("query cache poisoned");
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| QueryEntry::new(DEFAULT_STALE));
        entry.value = Some(json);
        entry.fetched_at = Some(Instant::now());
        entry.latest_generation += 1;
        entry.status = FetchStatus::Success;
        entry.last_error = None;
    }

    /// Mark every entry under `prefix` stale and wake matching
    /// subscriptions for an immediate refetch. Other keys are untouched.
    pub fn invalidate(&self, prefix: &QueryKey) {
        let mut stale = 0usize;
        {
            let mut entries = self.entries.write().expect("query cache poisoned");
            for (key, entry) in entries.iter_mut() {
                if key.starts_with(prefix) {
                    entry.fetched_at = None;
                    stale += 1;
                }
            }
        }
        debug!(%prefix, stale, "invalidated query keys");

        let mut subscribers = self.subscribers.lock().expect("subscriber list poisoned");
        subscribers.retain(|s| {
            let related = s.prefix.starts_with(prefix) || prefix.starts_with(&s.prefix);
            if related {
                s.tx.send(prefix.clone()).is_ok()
            } else {
                !s.tx.is_closed()
            }
        });
    }

    /// Drop every cached entry (logout).
    pub fn clear(&self) {
        self.entries.write().expect("query cache poisoned").clear();
    }

    /// Subscribe to invalidations under `prefix`.
    pub fn subscribe(&self, prefix: QueryKey) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .expect("subscriber list poisoned")
            .push(Subscriber { prefix, tx });
        Subscription { rx }
    }

    /// Observable state of one key.
    pub fn state(&self, key: &QueryKey) -> QueryState {
        let entries = self.entries.read().expect("query cache poisoned");
        match entries.get(key) {
            None => QueryState::Idle,
            Some(entry) => match entry.status {
                FetchStatus::Pending => QueryState::Pending,
                FetchStatus::Error => QueryState::Error,
                FetchStatus::Success => QueryState::Success {
                    stale: entry
                        .fetched_at
                        .map_or(true, |at| at.elapsed() >= entry.stale_after),
                },
            },
        }
    }

    /// Cached value for `key`, fresh or stale.
    pub fn cached<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.read().expect("query cache poisoned");
        let value = entries.get(key)?.value.clone()?;
        serde_json::from_value(value).ok()
    }

    /// Last error recorded for `key`.
    pub fn last_error(&self, key: &QueryKey) -> Option<String> {
        let entries = self.entries.read().expect("query cache poisoned");
        entries.get(key)?.last_error.clone()
    }

    fn fresh_value(&self, key: &QueryKey, stale_after: Duration) -> Option<serde_json::Value> {
        let entries = self.entries.read().expect("query cache poisoned");
        let entry = entries.get(key)?;
        let fetched_at = entry.fetched_at?;
        if fetched_at.elapsed() < stale_after {
            entry.value.clone()
        } else {
            None
        }
    }

    /// Register the start of a request and return its generation.
    fn begin(&self, key: &QueryKey, stale_after: Duration) -> u64 {
        let mut entries = self.entries.write().expect("query cache poisoned");
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| QueryEntry::new(stale_after));
        entry.stale_after = stale_after;
        entry.latest_generation += 1;
        if entry.value.is_none() {
            entry.status = FetchStatus::Pending;
        }
        entry.latest_generation
    }

    /// Commit a resolution. Returns false (nothing written) when a newer
    /// request for the key has started or the cache was cleared mid-flight.
    fn commit<T: Serialize>(&self, key: &QueryKey, generation: u64, value: &T) -> bool {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(%key, error = %e, "could not serialize fetched value");
                return false;
            }
        };
        let mut entries = self.entries.write().expect("query cache poisoned");
        let Some(entry) = entries.get_mut(key) else {
            return false;
        };
        if entry.latest_generation != generation {
            return false;
        }
        entry.value = Some(json);
        entry.fetched_at = Some(Instant::now());
        entry.status = FetchStatus::Success;
        entry.last_error = None;
        true
    }

    fn fail(&self, key: &QueryKey, generation: u64, error: &ApiError) {
        let mut entries = self.entries.write().expect("query cache poisoned");
        if let Some(entry) = entries.get_mut(key) {
            if entry.latest_generation == generation {
                entry.status = FetchStatus::Error;
                entry.last_error = Some(error.to_string());
            }
        }
    }
}

/// Run `f` up to `max_attempts` times, sleeping with exponential backoff
/// between attempts. Only transport errors are retried.
pub async fn with_retry<T, F, Fut>(
    settings: &RetrySettings,
    max_attempts: u32,
    f: &F,
) -> Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut delay = settings.initial_delay();
    let mut attempt = 1u32;
    loop {
        match f().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "retry succeeded");
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                warn!(
                    attempt,
                    max = max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                let next_ms = (delay.as_millis() as f64 * settings.multiplier) as u128;
                delay = Duration::from_millis(next_ms.min(settings.max_delay().as_millis()) as u64);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn client() -> QueryClient {
        QueryClient::new(RetrySettings::instant())
    }

    fn key(parts: &[&str]) -> QueryKey {
        QueryKey::new(parts.iter().copied())
    }

    #[tokio::test]
    async fn fresh_value_is_served_without_a_request() {
        let client = client();
        let calls = Arc::new(AtomicU32::new(0));
        let k = key(&["dashboard", "overview"]);

        for _ in 0..3 {
            let calls = calls.clone();
            let got: u32 = client
                .fetch(&k, Duration::from_secs(60), move || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::Relaxed);
                        Ok(7u32)
                    }
                })
                .await
                .unwrap();
            assert_eq!(got, 7);
        }
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn zero_staleness_always_refetches() {
        let client = client();
        let calls = Arc::new(AtomicU32::new(0));
        let k = key(&["analysis-status", "job-1"]);

        for _ in 0..2 {
            let calls = calls.clone();
            let _: u32 = client
                .fetch(&k, Duration::ZERO, move || {
                    let calls = calls.clone();
                    async move { Ok(calls.fetch_add(1, Ordering::Relaxed)) }
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn transport_errors_are_retried_to_success() {
        let client = client();
        let calls = Arc::new(AtomicU32::new(0));
        let k = key(&["repositories"]);

        let calls2 = calls.clone();
        let got: u32 = client
            .fetch(&k, Duration::from_secs(60), move || {
                let calls = calls2.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::Relaxed) + 1;
                    if n < 3 {
                        Err(ApiError::Transport(format!("attempt {n}")))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await
            .unwrap();
        assert_eq!(got, 3);
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn not_found_is_never_retried() {
        let client = client();
        let calls = Arc::new(AtomicU32::new(0));
        let k = key(&["repositories", "repo-zzz"]);

        let calls2 = calls.clone();
        let result: Result<u32, _> = client
            .fetch(&k, Duration::from_secs(60), move || {
                let calls = calls2.clone();
                async move {
                    calls.fetch_add(1, Ordering::Relaxed);
                    Err(ApiError::not_found("repository", "repo-zzz"))
                }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(client.state(&k), QueryState::Error);
        assert!(client.last_error(&k).unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn error_keeps_previous_value() {
        let client = client();
        let k = key(&["skills", "profile"]);
        client.set_query_data(&k, &41u32);
        client.invalidate(&k);

        let result: Result<u32, _> = client
            .fetch(&k, Duration::from_secs(60), || async {
                Err(ApiError::Transport("down".into()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(client.cached::<u32>(&k), Some(41));
        assert_eq!(client.state(&k), QueryState::Error);
    }

    #[tokio::test]
    async fn superseded_response_does_not_commit() {
        let client = Arc::new(client());
        let k = key(&["repositories"]);
        let applied = Arc::new(AtomicU32::new(0));

        // Older request: begins first, resolves last.
        let slow = {
            let client = client.clone();
            let k = k.clone();
            let applied = applied.clone();
            async move {
                client
                    .fetch_with(
                        &k,
                        Duration::ZERO,
                        || async {
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok(1u32)
                        },
                        |_| {
                            applied.fetch_add(1, Ordering::Relaxed);
                        },
                    )
                    .await
            }
        };
        let slow = tokio::spawn(slow);
        tokio::time::sleep(Duration::from_millis(5)).await;

        // Newer request for the same key resolves immediately.
        let fast: u32 = client
            .fetch_with(&k, Duration::ZERO, || async { Ok(2u32) }, |_| {
                applied.fetch_add(1, Ordering::Relaxed);
            })
            .await
            .unwrap();
        assert_eq!(fast, 2);

        // The slow caller still gets its own value back...
        assert_eq!(slow.await.unwrap().unwrap(), 1);
        // ...but only the newer response reached cache and side effects.
        assert_eq!(client.cached::<u32>(&k), Some(2));
        assert_eq!(applied.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn invalidate_is_scoped_to_the_prefix() {
        let client = client();
        let repos = key(&["repositories", "repo-1"]);
        let learning = key(&["learning", "paths"]);
        client.set_query_data(&repos, &1u32);
        client.set_query_data(&learning, &2u32);

        client.invalidate(&key(&["repositories"]));

        assert_eq!(client.state(&repos), QueryState::Success { stale: true });
        assert_eq!(client.state(&learning), QueryState::Success { stale: false });
    }

    #[tokio::test]
    async fn invalidate_wakes_subscribers_immediately() {
        let client = client();
        let mut sub = client.subscribe(key(&["repositories"]));
        client.invalidate(&key(&["repositories"]));
        let woken = sub.invalidated().await.unwrap();
        assert_eq!(woken, key(&["repositories"]));
    }

    #[tokio::test]
    async fn unrelated_invalidation_does_not_wake_subscriber() {
        let client = client();
        let mut sub = client.subscribe(key(&["repositories"]));
        client.invalidate(&key(&["learning"]));
        client.invalidate(&key(&["repositories", "repo-1"]));
        // only the second, related invalidation is delivered
        let woken = sub.invalidated().await.unwrap();
        assert_eq!(woken, key(&["repositories", "repo-1"]));
    }

    #[tokio::test]
    async fn clear_drops_in_flight_commits() {
        let client = Arc::new(client());
        let k = key(&["auth", "current-user"]);
        let applied = Arc::new(AtomicU32::new(0));

        let pending = {
            let client = client.clone();
            let k = k.clone();
            let applied = applied.clone();
            tokio::spawn(async move {
                let _: Result<u32, _> = client
                    .fetch_with(
                        &k,
                        Duration::ZERO,
                        || async {
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok(9u32)
                        },
                        |_| {
                            applied.fetch_add(1, Ordering::Relaxed);
                        },
                    )
                    .await;
            })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        client.clear();
        pending.await.unwrap();

        assert_eq!(client.state(&k), QueryState::Idle);
        assert_eq!(applied.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn set_query_data_primes_and_supersedes() {
        let client = client();
        let k = key(&["auth", "current-user"]);
        client.set_query_data(&k, &"mira".to_string());
        assert_eq!(client.cached::<String>(&k), Some("mira".into()));
        assert_eq!(client.state(&k), QueryState::Success { stale: false });
    }
}
