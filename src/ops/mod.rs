//! Operation layer: wires the remote boundary, the query cache, and the
//! stores together.
//!
//! Each domain gets a coordinator struct. Read operations go through
//! [`QueryClient`](crate::query::QueryClient) with a per-query staleness
//! duration and an optional store side effect; write operations run the
//! mutation lifecycle inline: optimistic flag, request, then store updates
//! plus invalidation on success or rollback plus an error notification on
//! failure.
//!
//! Queries with a precondition (auth established, id known) return
//! `Ok(None)` without touching the cache while disabled.

pub mod auth;
pub mod dashboard;
pub mod learning;
pub mod repos;
pub mod search;
pub mod skills;
pub mod translation;

pub use auth::AuthOps;
pub use dashboard::DashboardOps;
pub use learning::LearningOps;
pub use repos::{AnalysisWatch, RepoOps};
pub use search::SearchOps;
pub use skills::SkillOps;
pub use translation::TranslationOps;
