//! Remote service boundary.
//!
//! The client core depends on this trait only; the shipped implementation
//! is [`MockApi`], an in-memory service with simulated latency. A real
//! transport would implement the same trait.

pub mod fixtures;
pub mod mock;

use async_trait::async_trait;

use crate::auth::{AuthResponse, User};
use crate::catalog::{Technology, TranslationRoute};
use crate::dashboard::DashboardOverview;
use crate::error::ApiError;
use crate::learning::{CreateLearningPathRequest, LearningPath, LessonCompletion};
use crate::repo::{
    AnalysisJob, ConnectRepositoryRequest, Repository, RepositoryPage, RepositoryQuery,
};
use crate::skills::{SkillProfile, SkillUpdate};
use crate::translation::{
    CodeAnalysis, CodeAnalysisRequest, TranslationPattern, TranslationRequest, TranslationResponse,
};

pub use mock::MockApi;

pub type ApiResult<T> = Result<T, ApiError>;

/// Every operation the client core consumes from the platform.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    // ─── Auth ────────────────────────────────────────────────────────────
    async fn login(&self) -> ApiResult<AuthResponse>;
    async fn logout(&self) -> ApiResult<()>;
    async fn current_user(&self) -> ApiResult<User>;

    // ─── Repositories ────────────────────────────────────────────────────
    async fn list_repositories(&self, query: RepositoryQuery) -> ApiResult<RepositoryPage>;
    async fn get_repository(&self, id: &str) -> ApiResult<Repository>;
    async fn connect_repository(&self, request: ConnectRepositoryRequest) -> ApiResult<Repository>;
    async fn analyze_repository(&self, repository_id: &str) -> ApiResult<AnalysisJob>;
    async fn analysis_status(&self, job_id: &str) -> ApiResult<AnalysisJob>;

    // ─── Skills ──────────────────────────────────────────────────────────
    async fn skill_profile(&self) -> ApiResult<SkillProfile>;
    async fn update_skills(&self, updates: Vec<SkillUpdate>) -> ApiResult<SkillProfile>;

    // ─── Translation ─────────────────────────────────────────────────────
    async fn translate_code(&self, request: TranslationRequest) -> ApiResult<TranslationResponse>;
    async fn analyze_code(&self, request: CodeAnalysisRequest) -> ApiResult<CodeAnalysis>;
    async fn translation_patterns(
        &self,
        source: Option<&str>,
        target: Option<&str>,
    ) -> ApiResult<Vec<TranslationPattern>>;

    // ─── Learning ────────────────────────────────────────────────────────
    async fn learning_paths(&self) -> ApiResult<Vec<LearningPath>>;
    async fn learning_path(&self, path_id: &str) -> ApiResult<LearningPath>;
    async fn create_learning_path(
        &self,
        request: CreateLearningPathRequest,
    ) -> ApiResult<LearningPath>;
    async fn complete_lesson(&self, path_id: &str, lesson_id: &str)
        -> ApiResult<LessonCompletion>;

    // ─── Dashboard & search ──────────────────────────────────────────────
    async fn dashboard_overview(&self) -> ApiResult<DashboardOverview>;
    async fn search_technologies(&self, query: Option<&str>) -> ApiResult<Vec<Technology>>;
    async fn translation_routes(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> ApiResult<Vec<TranslationRoute>>;
}
