//! Analysis polling: terminal stop, cancellation, and the enabling
//! precondition. Timer-driven, so every test runs on paused virtual time.

use codeshift::config::ClientConfig;
use codeshift::repo::{ConnectRepositoryRequest, RepoStatus};
use codeshift::AppContext;
use std::time::Duration;

fn test_ctx(dir: &std::path::Path) -> AppContext {
    AppContext::with_mock(ClientConfig::for_tests(dir))
}

async fn connected_repo(ctx: &AppContext) -> codeshift::repo::Repository {
    ctx.auth.login().await.unwrap();
    ctx.repositories
        .connect(ConnectRepositoryRequest {
            github_url: "https://github.com/acme/widget".into(),
            branch: None,
        })
        .await
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn poll_stops_at_terminal_status() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());
    let repo = connected_repo(&ctx).await;

    let job = ctx.repositories.analyze(&repo.id).await.unwrap();
    let watch = ctx.repositories.watch_analysis(&job.job_id, &repo.id);
    watch.wait().await;

    // terminal: progress pinned at 100, repository completed, flag reset
    assert_eq!(ctx.repository_store.analysis_progress(&repo.id), Some(100.0));
    assert!(!ctx.repository_store.is_analyzing(&repo.id));
    assert_eq!(
        ctx.repository_store.get(&repo.id).unwrap().status,
        RepoStatus::Completed
    );

    // well past the cadence, nothing polls the job again: the mock would
    // keep returning completed, but the store must not move either
    let progress_before = ctx.repository_store.analysis_progress(&repo.id);
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(ctx.repository_store.analysis_progress(&repo.id), progress_before);
}

#[tokio::test(start_paused = true)]
async fn cancelled_poll_writes_nothing_further() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());
    let repo = connected_repo(&ctx).await;

    let job = ctx.repositories.analyze(&repo.id).await.unwrap();
    let watch = ctx.repositories.watch_analysis(&job.job_id, &repo.id);

    // let at most the first poll land, then cancel
    tokio::task::yield_now().await;
    watch.cancel();

    let progress_at_cancel = ctx.repository_store.analysis_progress(&repo.id);
    tokio::time::sleep(Duration::from_secs(30)).await;
    tokio::task::yield_now().await;

    assert_eq!(
        ctx.repository_store.analysis_progress(&repo.id),
        progress_at_cancel
    );
}

#[tokio::test(start_paused = true)]
async fn poll_stops_when_session_ends() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(dir.path());
    let repo = connected_repo(&ctx).await;

    let job = ctx.repositories.analyze(&repo.id).await.unwrap();

    // end the session before starting the watch: the precondition is
    // already false, so the first tick exits without a single status poll
    ctx.auth_store.logout();
    let watch = ctx.repositories.watch_analysis(&job.job_id, &repo.id);
    watch.wait().await;

    assert_eq!(ctx.repository_store.analysis_progress(&repo.id), None);
}
