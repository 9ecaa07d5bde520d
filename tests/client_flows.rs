//! End-to-end flows over a real `AppContext` backed by the mock service.

use codeshift::auth::User;
use codeshift::config::ClientConfig;
use codeshift::error::CoreError;
use codeshift::learning::CreateLearningPathRequest;
use codeshift::notify::Severity;
use codeshift::query::{QueryKey, QueryState};
use codeshift::repo::{ConnectRepositoryRequest, RepoStatus, RepositoryQuery};
use codeshift::translation::{TranslationRequest, WorkbenchPhase};
use codeshift::AppContext;

fn test_ctx(dir: &std::path::Path) -> AppContext {
    AppContext::with_mock(ClientConfig::for_tests(dir))
}

fn current_user_key() -> QueryKey {
    QueryKey::new(["auth", "current-user"])
}

#[tokio::test]
async fn login_primes_session_and_current_user_cache() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    let user = ctx.auth.login().await.unwrap();
    assert_eq!(user.username, "mira-dev");
    assert!(ctx.auth_store.is_authenticated());
    assert!(!ctx.auth_store.is_loading());
    assert!(ctx
        .auth_store
        .access_token()
        .unwrap()
        .starts_with("mock_token_"));

    // the login response primed the current-user query
    let cached: Option<User> = ctx.queries.cached(&current_user_key());
    assert_eq!(cached.unwrap().username, "mira-dev");
}

#[tokio::test]
async fn current_user_is_disabled_until_authenticated() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    assert!(ctx.auth.current_user().await.unwrap().is_none());
    // a disabled query never touched the cache
    assert_eq!(ctx.queries.state(&current_user_key()), QueryState::Idle);
}

#[tokio::test]
async fn session_survives_context_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let ctx = test_ctx(dir.path());
        ctx.auth.login().await.unwrap();
    }
    let restored = test_ctx(dir.path());
    assert!(restored.auth_store.is_authenticated());
    assert_eq!(restored.auth_store.user().unwrap().username, "mira-dev");
}

#[tokio::test]
async fn logout_clears_session_and_cache() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    ctx.auth.login().await.unwrap();
    ctx.repositories
        .list(RepositoryQuery::default())
        .await
        .unwrap();

    ctx.auth.logout().await.unwrap();
    assert!(!ctx.auth_store.is_authenticated());
    assert_eq!(ctx.queries.state(&current_user_key()), QueryState::Idle);
    assert_eq!(
        ctx.queries
            .state(&QueryKey::new(["repositories", "list", "page=1", "limit=20"])),
        QueryState::Idle
    );
}

#[tokio::test]
async fn list_fills_repository_store() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    let page = ctx
        .repositories
        .list(RepositoryQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(ctx.repository_store.repositories().len(), 3);
}

#[tokio::test]
async fn connect_scenario_acme_widget() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    let repo = ctx
        .repositories
        .connect(ConnectRepositoryRequest {
            github_url: "https://github.com/acme/widget".into(),
            branch: None,
        })
        .await
        .unwrap();

    assert_eq!(repo.status, RepoStatus::Pending);
    assert_eq!(repo.branch, "main");
    assert_eq!(repo.full_name, "acme/widget");

    // store got the new repository at the head of the list
    assert_eq!(ctx.repository_store.repositories()[0].id, repo.id);
    // and a success notification was queued
    let notifications = ctx.notifications.notifications();
    assert!(notifications
        .iter()
        .any(|n| n.severity == Severity::Success && n.title == "Repository connected"));
}

#[tokio::test]
async fn connect_rejects_invalid_url_without_request() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    let err = ctx
        .repositories
        .connect(ConnectRepositoryRequest {
            github_url: "https://gitlab.com/x/y".into(),
            branch: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation(_)));
    assert!(ctx.repository_store.repositories().is_empty());
    let notifications = ctx.notifications.notifications();
    assert!(notifications
        .iter()
        .any(|n| n.severity == Severity::Warning && n.title == "Invalid repository URL"));
}

#[tokio::test]
async fn detail_query_sets_selected_projection() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    let repo = ctx.repositories.get("repo-1").await.unwrap().unwrap();
    assert_eq!(ctx.repository_store.selected().unwrap().id, repo.id);

    // disabled while the id is unknown
    assert!(ctx.repositories.get("").await.unwrap().is_none());
}

#[tokio::test]
async fn missing_repository_is_terminal_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    let err = ctx.repositories.get("repo-zzz").await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Api(codeshift::error::ApiError::NotFound { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn analysis_runs_to_completion_and_updates_store() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    ctx.auth.login().await.unwrap();
    let repo = ctx
        .repositories
        .connect(ConnectRepositoryRequest {
            github_url: "https://github.com/acme/widget".into(),
            branch: None,
        })
        .await
        .unwrap();

    let job = ctx.repositories.analyze(&repo.id).await.unwrap();
    assert!(ctx.repository_store.is_analyzing(&repo.id));

    let watch = ctx.repositories.watch_analysis(&job.job_id, &repo.id);
    watch.wait().await;

    assert!(!ctx.repository_store.is_analyzing(&repo.id));
    assert_eq!(ctx.repository_store.analysis_progress(&repo.id), Some(100.0));
    assert_eq!(
        ctx.repository_store.get(&repo.id).unwrap().status,
        RepoStatus::Completed
    );
    let notifications = ctx.notifications.notifications();
    assert!(notifications
        .iter()
        .any(|n| n.severity == Severity::Success && n.title == "Analysis completed"));
}

#[tokio::test]
async fn translate_flow_updates_workbench_and_history() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    ctx.translation_store.set_frameworks("Next.js", "Vite React");
    let code = "export default function Page() { return <div>hello</div>; }".to_string();
    ctx.translation_store.set_source_code(code.clone());

    let response = ctx
        .translation
        .translate(TranslationRequest {
            code,
            source_framework: "Next.js".into(),
            target_framework: "Vite React".into(),
            options: None,
        })
        .await
        .unwrap();

    let snap = ctx.translation_store.snapshot();
    assert_eq!(ctx.translation_store.phase(), WorkbenchPhase::Translated);
    assert!(!snap.target_code.is_empty());
    assert_eq!(snap.confidence, response.metadata.confidence);

    let history = ctx.translation_store.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].source_framework, "Next.js");

    // editing the source clears the output atomically
    ctx.translation_store.set_source_code("const x = 2;");
    let cleared = ctx.translation_store.snapshot();
    assert!(cleared.target_code.is_empty());
    assert_eq!(cleared.confidence, 0.0);
    assert!(cleared.warnings.is_empty());
    assert!(cleared.suggestions.is_empty());
}

#[tokio::test]
async fn translate_rejects_empty_code_before_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    let err = ctx
        .translation
        .translate(TranslationRequest {
            code: "   ".into(),
            source_framework: "Next.js".into(),
            target_framework: "Vite React".into(),
            options: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation(_)));
    // the in-flight flag never flipped
    assert_eq!(ctx.translation_store.phase(), WorkbenchPhase::Idle);
}

#[tokio::test]
async fn learning_flow_keeps_progress_formula_exact() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    let path = ctx.learning.path("lp-1").await.unwrap().unwrap();
    assert_eq!(ctx.learning_store.active_path().unwrap().id, path.id);
    // seeded path: 2 of 3 lessons done
    assert_eq!(path.progress, 67);

    let completion = ctx
        .learning
        .complete_lesson("lp-1", "lesson-3")
        .await
        .unwrap();
    assert_eq!(completion.path_progress, 100);
    assert_eq!(completion.next_lesson_id, None);

    let active = ctx.learning_store.active_path().unwrap();
    assert_eq!(active.progress, 100);
    assert_eq!(active.progress, active.computed_progress());
}

#[tokio::test]
async fn create_learning_path_resets_generating_flag() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    let path = ctx
        .learning
        .create(CreateLearningPathRequest {
            from_technology: "Next.js".into(),
            to_technology: "Vite".into(),
            proficiency_target: None,
            time_commitment: None,
            learning_style: None,
        })
        .await
        .unwrap();

    assert!(!ctx.learning_store.is_generating_path());
    assert_eq!(ctx.learning_store.active_path().unwrap().id, path.id);
    assert!(path.title.contains("Next.js") && path.title.contains("Vite"));
}

#[tokio::test]
async fn skills_update_primes_profile_cache() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    let updated = ctx
        .skills
        .update(vec![codeshift::skills::SkillUpdate {
            technology: "TypeScript".into(),
            proficiency: 9.0,
        }])
        .await
        .unwrap();

    // a subsequent profile query is served from the primed cache
    let profile = ctx.skills.profile().await.unwrap();
    assert_eq!(profile.updated_at, updated.updated_at);
    let ts = profile
        .skills
        .iter()
        .find(|s| s.technology == "TypeScript")
        .unwrap();
    assert_eq!(ts.proficiency, 9.0);
}

#[tokio::test]
async fn dashboard_and_search_queries_resolve() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());

    let overview = ctx.dashboard.overview().await.unwrap();
    assert_eq!(overview.stats.repositories_analyzed, 5);

    let hits = ctx.search.technologies(Some("react")).await.unwrap();
    assert!(hits.iter().any(|t| t.name == "react"));

    let routes = ctx.search.routes(Some("Next.js"), None).await.unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].to, "Vite React");
}
