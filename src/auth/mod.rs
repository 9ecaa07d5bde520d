//! Auth session store.
//!
//! Holds the signed-in user, bearer token, and session flags. The
//! {user, token, authenticated} subset is persisted to the data directory
//! under the fixed `auth` key and reloaded at construction; the loading
//! flag is transient. The store never talks to the network; it is driven
//! by query/mutation lifecycle callbacks.

pub mod model;

use std::sync::RwLock;
use tracing::debug;

use crate::storage::RecordStore;
pub use model::{AuthResponse, Plan, SessionSnapshot, User, UserUpdate};

/// Fixed storage key for the persisted session record.
const SESSION_KEY: &str = "auth";

#[derive(Debug)]
struct AuthState {
    user: Option<User>,
    access_token: Option<String>,
    authenticated: bool,
    loading: bool,
}

/// Client-side session store with durable persistence.
pub struct AuthStore {
    inner: RwLock<AuthState>,
    records: RecordStore,
}

impl AuthStore {
    /// Build the store, restoring any persisted session.
    ///
    /// Starts in the loading state; the caller flips it off once the
    /// initial auth check settles.
    pub fn load(records: RecordStore) -> Self {
        let snapshot: Option<SessionSnapshot> = records.load(SESSION_KEY);
        let state = match snapshot {
            Some(s) => {
                debug!(authenticated = s.is_authenticated, "restored persisted session");
                AuthState {
                    user: s.user,
                    access_token: s.access_token,
                    authenticated: s.is_authenticated,
                    loading: true,
                }
            }
            None => AuthState {
                user: None,
                access_token: None,
                authenticated: false,
                loading: true,
            },
        };
        Self {
            inner: RwLock::new(state),
            records,
        }
    }

    /// Record a successful login.
    pub fn login(&self, user: User, access_token: String) {
        {
            let mut state = self.inner.write().expect("auth store poisoned");
            state.user = Some(user);
            state.access_token = Some(access_token);
            state.authenticated = true;
            state.loading = false;
        }
        self.persist();
    }

    /// Reset to unauthenticated defaults.
    pub fn logout(&self) {
        {
            let mut state = self.inner.write().expect("auth store poisoned");
            state.user = None;
            state.access_token = None;
            state.authenticated = false;
        }
        self.persist();
    }

    /// Merge fields into the current user. No-op when signed out.
    pub fn update_user(&self, update: UserUpdate) {
        let changed = {
            let mut state = self.inner.write().expect("auth store poisoned");
            match state.user.as_mut() {
                Some(user) => {
                    update.apply(user);
                    true
                }
                None => false,
            }
        };
        if changed {
            self.persist();
        }
    }

    /// Toggle the loading flag, independent of auth state. Not persisted.
    pub fn set_loading(&self, loading: bool) {
        self.inner.write().expect("auth store poisoned").loading = loading;
    }

    /// Drop the persisted record and reset to unauthenticated defaults.
    pub fn clear_storage_and_logout(&self) {
        self.records.delete(SESSION_KEY);
        let mut state = self.inner.write().expect("auth store poisoned");
        state.user = None;
        state.access_token = None;
        state.authenticated = false;
    }

    pub fn user(&self) -> Option<User> {
        self.inner.read().expect("auth store poisoned").user.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .expect("auth store poisoned")
            .access_token
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().expect("auth store poisoned").authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.inner.read().expect("auth store poisoned").loading
    }

    /// The durable subset of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.read().expect("auth store poisoned");
        SessionSnapshot {
            user: state.user.clone(),
            access_token: state.access_token.clone(),
            is_authenticated: state.authenticated,
        }
    }

    fn persist(&self) {
        self.records.save(SESSION_KEY, &self.snapshot());
    }
}
