// SPDX-License-Identifier: MIT
//! In-memory mock of the platform API.
//!
//! Simulates per-operation network latency and serves a seeded dataset.
//! Translation confidence is banded by code length; analysis jobs advance
//! monotonically to a terminal state across successive status polls.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use super::{fixtures, ApiResult, RemoteApi};
use crate::auth::{AuthResponse, User};
use crate::catalog::{Technology, TranslationRoute};
use crate::config::MockSettings;
use crate::dashboard::DashboardOverview;
use crate::error::ApiError;
use crate::ids;
use crate::learning::{
    CreateLearningPathRequest, Difficulty, LearningPath, Lesson, LessonCompletion, LessonType,
    PathStatus, TechnologyLevel, TimeCommitment,
};
use crate::repo::{
    AnalysisJob, ConnectRepositoryRequest, JobStatus, RepoStatus, Repository, RepositoryPage,
    RepositoryQuery, Technologies,
};
use crate::skills::{SkillProfile, SkillUpdate};
use crate::translation::{
    CodeAnalysis, CodeAnalysisRequest, Complexity, TranslationMetadata, TranslationPattern,
    TranslationRequest, TranslationResponse, TranslationSide, TranslationTarget,
};

const GITHUB_PREFIX: &str = "https://github.com/";

struct MockJob {
    job: AnalysisJob,
    repository_id: String,
}

struct MockState {
    repositories: Vec<Repository>,
    jobs: HashMap<String, MockJob>,
    paths: Vec<LearningPath>,
    profile: SkillProfile,
}

/// Mock implementation of [`RemoteApi`].
pub struct MockApi {
    state: Mutex<MockState>,
    settings: MockSettings,
}

impl MockApi {
    pub fn new(settings: MockSettings) -> Self {
        Self {
            state: Mutex::new(MockState {
                repositories: fixtures::seed_repositories(),
                jobs: HashMap::new(),
                paths: fixtures::seed_learning_paths(),
                profile: fixtures::seed_skill_profile(),
            }),
            settings,
        }
    }

    async fn latency(&self, ms: u64) {
        if self.settings.latency {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn maybe_fail(&self) -> ApiResult<()> {
        if self.settings.failure_rate > 0.0
            && rand::thread_rng().gen::<f64>() < self.settings.failure_rate
        {
            return Err(ApiError::Transport("simulated network error".into()));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }

    /// Confidence band for a translation of `code_length` characters.
    fn confidence_for(code_length: usize) -> f64 {
        let mut rng = rand::thread_rng();
        if code_length < 500 {
            0.95 + rng.gen::<f64>() * 0.04
        } else if code_length < 1500 {
            0.85 + rng.gen::<f64>() * 0.10
        } else {
            0.75 + rng.gen::<f64>() * 0.15
        }
    }

    fn step_for(progress: f64) -> &'static str {
        if progress < 30.0 {
            "Cloning repository..."
        } else if progress < 60.0 {
            "Analyzing code patterns..."
        } else if progress < 90.0 {
            "Detecting frameworks..."
        } else {
            "Finalizing results..."
        }
    }
}

#[async_trait]
impl RemoteApi for MockApi {
    async fn login(&self) -> ApiResult<AuthResponse> {
        self.latency(1_000).await;
        self.maybe_fail()?;
        Ok(AuthResponse {
            access_token: format!("mock_token_{}", Utc::now().timestamp_millis()),
            user: fixtures::seed_user(),
        })
    }

    async fn logout(&self) -> ApiResult<()> {
        self.latency(500).await;
        self.maybe_fail()
    }

    async fn current_user(&self) -> ApiResult<User> {
        self.latency(800).await;
        self.maybe_fail()?;
        Ok(fixtures::seed_user())
    }

    async fn list_repositories(&self, query: RepositoryQuery) -> ApiResult<RepositoryPage> {
        self.latency(1_200).await;
        self.maybe_fail()?;

        let state = self.lock();
        let filtered: Vec<Repository> = state
            .repositories
            .iter()
            .filter(|r| query.status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();

        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(20).max(1);
        let start = ((page - 1) * limit) as usize;
        let items = filtered
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(RepositoryPage {
            items,
            total: filtered.len(),
            page,
            limit,
        })
    }

    async fn get_repository(&self, id: &str) -> ApiResult<Repository> {
        self.latency(800).await;
        self.maybe_fail()?;
        self.lock()
            .repositories
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("repository", id))
    }

    async fn connect_repository(&self, request: ConnectRepositoryRequest) -> ApiResult<Repository> {
        self.latency(2_000).await;
        self.maybe_fail()?;

        let name = request
            .github_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or("unknown")
            .to_string();
        let full_name = request
            .github_url
            .strip_prefix(GITHUB_PREFIX)
            .unwrap_or(&request.github_url)
            .trim_end_matches('/')
            .to_string();

        let repository = Repository {
            id: ids::new_id("repo"),
            name,
            full_name,
            github_url: request.github_url,
            branch: request.branch.unwrap_or_else(|| "main".to_string()),
            status: RepoStatus::Pending,
            created_at: Utc::now(),
            analyzed_at: None,
            technologies: Technologies::default(),
            metrics: None,
        };

        self.lock().repositories.insert(0, repository.clone());
        Ok(repository)
    }

    async fn analyze_repository(&self, repository_id: &str) -> ApiResult<AnalysisJob> {
        self.latency(1_000).await;
        self.maybe_fail()?;

        let mut state = self.lock();
        if !state.repositories.iter().any(|r| r.id == repository_id) {
            return Err(ApiError::not_found("repository", repository_id));
        }
        if let Some(repo) = state.repositories.iter_mut().find(|r| r.id == repository_id) {
            repo.status = RepoStatus::Analyzing;
        }

        let job = AnalysisJob {
            job_id: ids::new_id("job"),
            status: JobStatus::Queued,
            progress: 0.0,
            current_step: "Initializing analysis...".into(),
            error: None,
        };
        state.jobs.insert(
            job.job_id.clone(),
            MockJob {
                job: job.clone(),
                repository_id: repository_id.to_string(),
            },
        );
        debug!(job_id = %job.job_id, repository_id, "analysis job queued");
        Ok(job)
    }

    async fn analysis_status(&self, job_id: &str) -> ApiResult<AnalysisJob> {
        self.latency(500).await;
        self.maybe_fail()?;

        let increment = rand::thread_rng().gen_range(15.0..35.0);
        let mut state = self.lock();
        let entry = state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| ApiError::not_found("analysis job", job_id))?;

        if entry.job.status.is_terminal() {
            return Ok(entry.job.clone());
        }

        entry.job.progress = (entry.job.progress + increment).min(100.0);
        if entry.job.progress >= 100.0 {
            entry.job.status = JobStatus::Completed;
            entry.job.progress = 100.0;
            entry.job.current_step = "Analysis complete".into();
        } else {
            entry.job.status = JobStatus::Processing;
            entry.job.current_step = Self::step_for(entry.job.progress).into();
        }
        let job = entry.job.clone();

        if job.status == JobStatus::Completed {
            let repository_id = entry.repository_id.clone();
            if let Some(repo) = state.repositories.iter_mut().find(|r| r.id == repository_id) {
                repo.status = RepoStatus::Completed;
                repo.analyzed_at = Some(Utc::now());
            }
        }
        Ok(job)
    }

    async fn skill_profile(&self) -> ApiResult<SkillProfile> {
        self.latency(1_000).await;
        self.maybe_fail()?;
        Ok(self.lock().profile.clone())
    }

    async fn update_skills(&self, updates: Vec<SkillUpdate>) -> ApiResult<SkillProfile> {
        self.latency(1_500).await;
        self.maybe_fail()?;

        let mut state = self.lock();
        for update in updates {
            if let Some(skill) = state
                .profile
                .skills
                .iter_mut()
                .find(|s| s.technology == update.technology)
            {
                skill.proficiency = update.proficiency;
            }
        }
        state.profile.updated_at = Utc::now();
        Ok(state.profile.clone())
    }

    async fn translate_code(&self, request: TranslationRequest) -> ApiResult<TranslationResponse> {
        // AI processing is the slowest operation in the mock
        self.latency(3_000).await;
        self.maybe_fail()?;

        let confidence = Self::confidence_for(request.code.len());
        let (target_code, packages, package_changes) = fixtures::sample_translation_target();

        Ok(TranslationResponse {
            id: ids::new_id("tr"),
            success: true,
            source: TranslationSide {
                framework: request.source_framework,
                code: request.code,
                packages: vec!["next".into(), "react".into()],
            },
            target: TranslationTarget {
                framework: request.target_framework,
                code: target_code,
                packages,
                package_changes,
            },
            metadata: TranslationMetadata {
                confidence,
                warnings: vec![
                    "API routes need to be implemented separately".into(),
                    "Environment variables may need updating".into(),
                ],
                suggestions: vec![
                    "Consider adding error boundaries".into(),
                    "Add loading states for better UX".into(),
                    "Implement proper error handling".into(),
                ],
                manual_changes_required: vec![
                    "Set up React Router configuration".into(),
                    "Configure React Query provider".into(),
                    "Update API endpoint URLs".into(),
                ],
            },
            created_at: Utc::now(),
        })
    }

    async fn analyze_code(&self, request: CodeAnalysisRequest) -> ApiResult<CodeAnalysis> {
        self.latency(1_500).await;
        self.maybe_fail()?;

        let complexity = if request.code.len() < 500 {
            Complexity::Simple
        } else if request.code.len() < 1500 {
            Complexity::Moderate
        } else {
            Complexity::Complex
        };

        Ok(CodeAnalysis {
            feasible: true,
            confidence: match complexity {
                Complexity::Simple => 0.95,
                Complexity::Moderate => 0.85,
                Complexity::Complex => 0.75,
            },
            detected_patterns: vec![
                "React components".into(),
                "Hook usage".into(),
                "Event handlers".into(),
            ],
            warnings: if complexity == Complexity::Complex {
                vec![
                    "Complex logic detected".into(),
                    "Manual review recommended".into(),
                ]
            } else {
                vec![]
            },
            estimated_complexity: complexity,
        })
    }

    async fn translation_patterns(
        &self,
        source: Option<&str>,
        target: Option<&str>,
    ) -> ApiResult<Vec<TranslationPattern>> {
        self.latency(800).await;
        self.maybe_fail()?;

        let mut patterns = fixtures::seed_patterns();
        if let (Some(source), Some(target)) = (source, target) {
            let source = source.to_lowercase();
            let target = target.to_lowercase();
            patterns.retain(|p| {
                let description = p.description.to_lowercase();
                description.contains(&source) || description.contains(&target)
            });
        }
        Ok(patterns)
    }

    async fn learning_paths(&self) -> ApiResult<Vec<LearningPath>> {
        self.latency(1_000).await;
        self.maybe_fail()?;
        Ok(self.lock().paths.clone())
    }

    async fn learning_path(&self, path_id: &str) -> ApiResult<LearningPath> {
        self.latency(800).await;
        self.maybe_fail()?;
        self.lock()
            .paths
            .iter()
            .find(|p| p.id == path_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("learning path", path_id))
    }

    async fn create_learning_path(
        &self,
        request: CreateLearningPathRequest,
    ) -> ApiResult<LearningPath> {
        // AI generation time
        self.latency(4_000).await;
        self.maybe_fail()?;

        let estimated_duration = match request.time_commitment {
            Some(TimeCommitment::Intensive) => "2-3 weeks",
            Some(TimeCommitment::Light) => "6-8 weeks",
            _ => "4-5 weeks",
        };

        let now = Utc::now();
        let path = LearningPath {
            id: ids::new_id("lp"),
            title: format!(
                "From {} to {}: A Personalized Journey",
                request.from_technology, request.to_technology
            ),
            from: TechnologyLevel {
                technology: request.from_technology.clone(),
                proficiency: 7.0,
            },
            to: TechnologyLevel {
                technology: request.to_technology.clone(),
                proficiency: request.proficiency_target.unwrap_or(8.0),
            },
            estimated_duration: estimated_duration.into(),
            difficulty: Difficulty::Intermediate,
            prerequisites: vec!["Basic JavaScript".into(), "React fundamentals".into()],
            lessons: vec![Lesson {
                id: ids::new_id("lesson"),
                order: 1,
                title: format!("Introduction to {}", request.to_technology),
                description: format!(
                    "The basics of {} and how it compares to {}",
                    request.to_technology, request.from_technology
                ),
                estimated_time: 45,
                lesson_type: LessonType::Concept,
                objectives: vec![format!("Understand {} fundamentals", request.to_technology)],
                content: format!(
                    "# Introduction to {}\n\nGenerated lesson content...",
                    request.to_technology
                ),
                examples: vec![],
                exercises: vec![],
                completed: false,
                completed_at: None,
            }],
            progress: 0,
            status: PathStatus::Active,
            created_at: now,
            updated_at: now,
        };

        self.lock().paths.push(path.clone());
        Ok(path)
    }

    async fn complete_lesson(
        &self,
        path_id: &str,
        lesson_id: &str,
    ) -> ApiResult<LessonCompletion> {
        self.latency(1_000).await;
        self.maybe_fail()?;

        let mut state = self.lock();
        let path = state
            .paths
            .iter_mut()
            .find(|p| p.id == path_id)
            .ok_or_else(|| ApiError::not_found("learning path", path_id))?;
        let lesson = path
            .lessons
            .iter_mut()
            .find(|l| l.id == lesson_id)
            .ok_or_else(|| ApiError::not_found("lesson", lesson_id))?;

        lesson.completed = true;
        lesson.completed_at = Some(Utc::now());
        path.progress = path.computed_progress();
        path.updated_at = Utc::now();

        let mut remaining: Vec<&Lesson> = path.lessons.iter().filter(|l| !l.completed).collect();
        remaining.sort_by_key(|l| l.order);

        Ok(LessonCompletion {
            path_progress: path.progress,
            next_lesson_id: remaining.first().map(|l| l.id.clone()),
        })
    }

    async fn dashboard_overview(&self) -> ApiResult<DashboardOverview> {
        self.latency(1_200).await;
        self.maybe_fail()?;
        Ok(fixtures::seed_dashboard())
    }

    async fn search_technologies(&self, query: Option<&str>) -> ApiResult<Vec<Technology>> {
        self.latency(600).await;
        self.maybe_fail()?;

        let mut technologies = fixtures::seed_technologies();
        if let Some(query) = query {
            let query = query.to_lowercase();
            technologies.retain(|t| {
                t.name.to_lowercase().contains(&query)
                    || t.display_name.to_lowercase().contains(&query)
            });
        }
        Ok(technologies)
    }

    async fn translation_routes(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> ApiResult<Vec<TranslationRoute>> {
        self.latency(800).await;
        self.maybe_fail()?;

        let mut routes = fixtures::seed_routes();
        if let Some(from) = from {
            let from = from.to_lowercase();
            routes.retain(|r| r.from.to_lowercase().contains(&from));
        }
        if let Some(to) = to {
            let to = to.to_lowercase();
            routes.retain(|r| r.to.to_lowercase().contains(&to));
        }
        Ok(routes)
    }
}
