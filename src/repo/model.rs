//! Repository and analysis-job data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a connected repository.
///
/// `Pending` on connect, `Analyzing` while a job runs, then `Completed`
/// or `Failed`, driven by the polled analysis job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoStatus {
    Pending,
    Analyzing,
    Completed,
    Failed,
}

impl RepoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoStatus::Pending => "pending",
            RepoStatus::Analyzing => "analyzing",
            RepoStatus::Completed => "completed",
            RepoStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RepoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detected language share within a repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub name: String,
    pub percentage: f64,
}

/// A third-party package detected in the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPackage {
    pub name: String,
    pub version: String,
}

/// Technology breakdown produced by analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Technologies {
    pub languages: Vec<LanguageShare>,
    pub frameworks: Vec<String>,
    pub packages: Vec<DetectedPackage>,
}

/// Quality/complexity metrics; only present once analysis completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoMetrics {
    pub complexity: f64,
    pub quality: f64,
    pub last_commit: DateTime<Utc>,
    pub total_commits: u32,
    pub contributors: u32,
}

/// A remote repository registered for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    pub name: String,
    /// `owner/name`, derived from the GitHub URL.
    pub full_name: String,
    pub github_url: String,
    pub branch: String,
    pub status: RepoStatus,
    pub created_at: DateTime<Utc>,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub technologies: Technologies,
    pub metrics: Option<RepoMetrics>,
}

/// Partial repository update; unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct RepositoryUpdate {
    pub name: Option<String>,
    pub branch: Option<String>,
    pub status: Option<RepoStatus>,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub technologies: Option<Technologies>,
    pub metrics: Option<RepoMetrics>,
}

impl RepositoryUpdate {
    pub fn status(status: RepoStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Merge this update into `repo`, field by field.
    pub fn apply(&self, repo: &mut Repository) {
        if let Some(name) = &self.name {
            repo.name = name.clone();
        }
        if let Some(branch) = &self.branch {
            repo.branch = branch.clone();
        }
        if let Some(status) = self.status {
            repo.status = status;
        }
        if let Some(analyzed_at) = self.analyzed_at {
            repo.analyzed_at = Some(analyzed_at);
        }
        if let Some(technologies) = &self.technologies {
            repo.technologies = technologies.clone();
        }
        if let Some(metrics) = &self.metrics {
            repo.metrics = Some(metrics.clone());
        }
    }
}

/// Paging/filter parameters for the repository list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<RepoStatus>,
}

/// One page of the repository list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryPage {
    pub items: Vec<Repository>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}

/// Request to register a remote repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectRepositoryRequest {
    pub github_url: String,
    pub branch: Option<String>,
}

/// Status of a server-side analysis job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Terminal statuses stop the polling loop permanently.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A polled repository-analysis job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisJob {
    pub job_id: String,
    pub status: JobStatus,
    /// 0–100.
    pub progress: f64,
    pub current_step: String,
    pub error: Option<String>,
}
