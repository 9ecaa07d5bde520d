//! User identity and session data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription tier of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
    Enterprise,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Enterprise => "enterprise",
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in user's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar_url: String,
    pub plan: Plan,
    pub created_at: DateTime<Utc>,
    pub skill_profile_id: Option<String>,
    pub repositories_count: u32,
}

/// Successful login payload from the remote boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

/// Partial user update; unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub plan: Option<Plan>,
    pub repositories_count: Option<u32>,
}

impl UserUpdate {
    /// Merge this update into `user`, field by field.
    pub fn apply(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(avatar_url) = self.avatar_url {
            user.avatar_url = avatar_url;
        }
        if let Some(plan) = self.plan {
            user.plan = plan;
        }
        if let Some(count) = self.repositories_count {
            user.repositories_count = count;
        }
    }
}

/// The durable subset of session state: exactly what survives a restart.
/// The transient loading flag is deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub is_authenticated: bool,
}
