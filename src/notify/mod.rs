// SPDX-License-Identifier: MIT
//! Notification queue with auto-expiry.
//!
//! `show` appends and schedules removal after the notification's duration
//! (default 5 s; 0 = sticky). Expiry tasks are keyed by id and cancelled on
//! manual removal, so a late firing is never observable. `remove` is
//! idempotent; `clear` empties the list without touching timers, and a timer
//! firing afterwards is a safe no-op.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

/// How loud a notification renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ephemeral user-facing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub message: Option<String>,
    /// Milliseconds until auto-removal; 0 = never.
    pub duration_ms: u64,
}

/// A notification before the queue assigns its id and duration.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub severity: Severity,
    pub title: String,
    pub message: Option<String>,
    /// `None` = queue default; `Some(0)` = sticky.
    pub duration_ms: Option<u64>,
}

impl NotificationRequest {
    pub fn new(severity: Severity, title: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            message: None,
            duration_ms: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// Queue change events for observers (views, tests).
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    Shown(Notification),
    Removed(String),
    Cleared,
}

struct NotifyState {
    notifications: Vec<Notification>,
    timers: HashMap<String, JoinHandle<()>>,
}

/// Ordered queue of ephemeral notifications.
pub struct NotificationCenter {
    inner: Mutex<NotifyState>,
    events: broadcast::Sender<NotificationEvent>,
    default_duration_ms: u64,
    /// Self-handle for expiry timers; a fired timer on a dropped queue is
    /// a no-op.
    weak: Weak<NotificationCenter>,
}

impl NotificationCenter {
    pub fn new(default_duration_ms: u64) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new_cyclic(|weak| Self {
            inner: Mutex::new(NotifyState {
                notifications: Vec::new(),
                timers: HashMap::new(),
            }),
            events,
            default_duration_ms,
            weak: weak.clone(),
        })
    }

    /// Append a notification and schedule its removal. Returns the
    /// generated id.
    pub fn show(&self, request: NotificationRequest) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let duration_ms = request.duration_ms.unwrap_or(self.default_duration_ms);
        let notification = Notification {
            id: id.clone(),
            severity: request.severity,
            title: request.title,
            message: request.message,
            duration_ms,
        };

        let mut state = self.inner.lock().expect("notification queue poisoned");
        state.notifications.push(notification.clone());

        if duration_ms > 0 {
            let weak = self.weak.clone();
            let timer_id = id.clone();
            let handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(duration_ms)).await;
                if let Some(center) = weak.upgrade() {
                    center.remove(&timer_id);
                }
            });
            state.timers.insert(id.clone(), handle);
        }
        drop(state);

        // Ignore errors: no subscribers is fine
        let _ = self.events.send(NotificationEvent::Shown(notification));
        id
    }

    /// Remove by id and cancel its expiry timer. Removing an id that is
    /// already gone is a no-op.
    pub fn remove(&self, id: &str) {
        let removed = {
            let mut state = self.inner.lock().expect("notification queue poisoned");
            if let Some(timer) = state.timers.remove(id) {
                timer.abort();
            }
            let before = state.notifications.len();
            state.notifications.retain(|n| n.id != id);
            state.notifications.len() != before
        };
        if removed {
            let _ = self.events.send(NotificationEvent::Removed(id.to_string()));
        } else {
            debug!(id, "notification already gone");
        }
    }

    /// Empty the queue immediately. Pending timers are left to fire; their
    /// later `remove` calls hit nothing.
    pub fn clear(&self) {
        self.inner
            .lock()
            .expect("notification queue poisoned")
            .notifications
            .clear();
        let _ = self.events.send(NotificationEvent::Cleared);
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .expect("notification queue poisoned")
            .notifications
            .clone()
    }

    /// Subscribe to queue change events.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }

    // ─── Convenience constructors used by the operation layer ────────────

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) -> String {
        self.show(NotificationRequest::new(Severity::Info, title).message(message))
    }

    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) -> String {
        self.show(NotificationRequest::new(Severity::Success, title).message(message))
    }

    pub fn warning(&self, title: impl Into<String>, message: impl Into<String>) -> String {
        self.show(NotificationRequest::new(Severity::Warning, title).message(message))
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) -> String {
        self.show(NotificationRequest::new(Severity::Error, title).message(message))
    }
}
