//! Client configuration loaded from `config.toml`.
//!
//! Every section has full serde defaults so a missing or partial file is
//! never an error; unknown keys are ignored.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_INITIAL_MS: u64 = 500;
const DEFAULT_RETRY_MAX_MS: u64 = 30_000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
const DEFAULT_NOTIFICATION_DURATION_MS: u64 = 5_000;

fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".codeshift"))
        .unwrap_or_else(|| PathBuf::from(".codeshift"))
}

// ─── RetrySettings ───────────────────────────────────────────────────────────

/// Retry policy for transport errors (`[retry]` in config.toml).
///
/// Queries retry up to `max_attempts` with exponentially increasing delays;
/// mutations ignore this and run once (or twice when idempotent-safe).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Maximum number of attempts (including the first try). Default: 3.
    pub max_attempts: u32,
    /// Delay before the second attempt, in milliseconds. Default: 500.
    pub initial_delay_ms: u64,
    /// Upper bound on the delay between attempts. Default: 30 000.
    pub max_delay_ms: u64,
    /// Multiplier applied to the previous delay on each retry. Default: 2.0.
    pub multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_ATTEMPTS,
            initial_delay_ms: DEFAULT_RETRY_INITIAL_MS,
            max_delay_ms: DEFAULT_RETRY_MAX_MS,
            multiplier: 2.0,
        }
    }
}

impl RetrySettings {
    /// Config suitable for quick unit tests (no real waiting).
    pub fn instant() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_ATTEMPTS,
            initial_delay_ms: 1,
            max_delay_ms: 10,
            multiplier: 2.0,
        }
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

// ─── PollingSettings ─────────────────────────────────────────────────────────

/// Analysis-job polling cadence (`[polling]` in config.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingSettings {
    /// Interval between status polls, in milliseconds. Default: 2000.
    pub interval_ms: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl PollingSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

// ─── NotificationSettings ────────────────────────────────────────────────────

/// Notification auto-expiry (`[notifications]` in config.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Auto-removal delay for notifications that don't set one. Default: 5000.
    pub default_duration_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            default_duration_ms: DEFAULT_NOTIFICATION_DURATION_MS,
        }
    }
}

// ─── MockSettings ────────────────────────────────────────────────────────────

/// Mock remote-service behavior (`[mock]` in config.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MockSettings {
    /// Simulate per-operation network latency. Default: true.
    pub latency: bool,
    /// Probability (0.0–1.0) that an operation fails with a transport
    /// error. Default: 0.0.
    pub failure_rate: f64,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            latency: true,
            failure_rate: 0.0,
        }
    }
}

// ─── ClientConfig ────────────────────────────────────────────────────────────

/// Top-level client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Directory for durable client state (persisted session).
    pub data_dir: PathBuf,
    /// Log filter, e.g. `info` or `codeshift=debug`.
    pub log_level: String,
    pub retry: RetrySettings,
    pub polling: PollingSettings,
    pub notifications: NotificationSettings,
    pub mock: MockSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            retry: RetrySettings::default(),
            polling: PollingSettings::default(),
            notifications: NotificationSettings::default(),
            mock: MockSettings::default(),
        }
    }
}

impl ClientConfig {
    /// Load from a TOML file, falling back to defaults when the file is
    /// missing or malformed.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Config for test contexts: isolated data dir, instant retries, no
    /// simulated latency.
    pub fn for_tests(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            retry: RetrySettings::instant(),
            mock: MockSettings {
                latency: false,
                failure_rate: 0.0,
            },
            ..Self::default()
        }
    }
}
