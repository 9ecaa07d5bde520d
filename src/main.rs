//! Headless demo driver for the CodeShift client core.
//!
//! Runs full flows against the mock service so the state layer can be
//! exercised and observed without a UI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use codeshift::config::ClientConfig;
use codeshift::learning::CreateLearningPathRequest;
use codeshift::repo::{ConnectRepositoryRequest, RepositoryQuery};
use codeshift::translation::TranslationRequest;
use codeshift::AppContext;
use tracing::info;

#[derive(Parser)]
#[command(name = "codeshift", about = "CodeShift client core headless demo", version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Data directory for the persisted session
    #[arg(long, env = "CODESHIFT_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Config file path (TOML)
    #[arg(long, env = "CODESHIFT_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CODESHIFT_LOG")]
    log: Option<String>,

    /// Skip simulated network latency
    #[arg(long)]
    fast: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Walk every flow: sign in, repositories, analysis, translation,
    /// learning, dashboard
    Demo,
    /// Translate a file between frameworks
    Translate {
        /// Source file to translate
        file: std::path::PathBuf,
        /// Source framework, e.g. "Next.js"
        #[arg(long)]
        from: String,
        /// Target framework, e.g. "Vite React"
        #[arg(long)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ClientConfig::load_or_default(args.config.as_deref());
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log) = args.log {
        config.log_level = log;
    }
    if args.fast {
        config.mock.latency = false;
    }

    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.clone())
        .compact()
        .init();

    let ctx = AppContext::with_mock(config);

    match args.command.unwrap_or(Command::Demo) {
        Command::Demo => run_demo(&ctx).await,
        Command::Translate { file, from, to } => run_translate(&ctx, &file, from, to).await,
    }
}

async fn run_demo(ctx: &AppContext) -> Result<()> {
    // Sign in and prime the session
    let user = ctx.auth.login().await?;
    println!("signed in as {} ({} plan)", user.username, user.plan);

    // Repository list
    let page = ctx
        .repositories
        .list(RepositoryQuery::default())
        .await?;
    println!("{} repositories:", page.total);
    for repo in &page.items {
        println!("  {:<28} {:<10} {}", repo.full_name, repo.status.to_string(), repo.branch);
    }

    // Connect a new repository and run analysis to completion
    let repo = ctx
        .repositories
        .connect(ConnectRepositoryRequest {
            github_url: "https://github.com/acme/widget".into(),
            branch: None,
        })
        .await?;
    println!("connected {} (status: {})", repo.full_name, repo.status);

    let job = ctx.repositories.analyze(&repo.id).await?;
    info!(job_id = %job.job_id, "analysis started");
    let watch = ctx.repositories.watch_analysis(&job.job_id, &repo.id);
    watch.wait().await;
    let analyzed = ctx.repository_store.get(&repo.id);
    println!(
        "analysis finished: {}",
        analyzed.map_or("unknown".into(), |r| r.status.to_string())
    );

    // Translate a snippet
    ctx.translation_store.set_frameworks("Next.js", "Vite React");
    let source = "export default function Page() { return <div>hello</div>; }".to_string();
    ctx.translation_store.set_source_code(source.clone());
    let response = ctx
        .translation
        .translate(TranslationRequest {
            code: source,
            source_framework: "Next.js".into(),
            target_framework: "Vite React".into(),
            options: None,
        })
        .await?;
    println!(
        "translated with {:.0}% confidence, {} warnings",
        response.metadata.confidence * 100.0,
        response.metadata.warnings.len()
    );

    // Learning: create a path and complete its first lesson
    let path = ctx
        .learning
        .create(CreateLearningPathRequest {
            from_technology: "Next.js".into(),
            to_technology: "Vite".into(),
            proficiency_target: None,
            time_commitment: None,
            learning_style: None,
        })
        .await?;
    let first_lesson = path.lessons[0].id.clone();
    let completion = ctx.learning.complete_lesson(&path.id, &first_lesson).await?;
    println!(
        "learning path \"{}\" at {}%",
        path.title, completion.path_progress
    );

    // Dashboard aggregate
    let overview = ctx.dashboard.overview().await?;
    println!(
        "dashboard: {} repositories analyzed, {} translations completed",
        overview.stats.repositories_analyzed, overview.stats.translations_completed
    );

    // Everything above also produced notifications
    println!("notifications:");
    for n in ctx.notifications.notifications() {
        println!("  [{}] {}", n.severity, n.title);
    }

    ctx.auth.logout().await?;
    Ok(())
}

async fn run_translate(
    ctx: &AppContext,
    file: &std::path::Path,
    from: String,
    to: String,
) -> Result<()> {
    let code = std::fs::read_to_string(file)?;
    ctx.auth.login().await?;

    ctx.translation_store.set_frameworks(from.clone(), to.clone());
    ctx.translation_store.set_source_code(code.clone());

    let response = ctx
        .translation
        .translate(TranslationRequest {
            code,
            source_framework: from,
            target_framework: to,
            options: None,
        })
        .await?;

    println!("// confidence: {:.2}", response.metadata.confidence);
    for warning in &response.metadata.warnings {
        println!("// warning: {warning}");
    }
    println!("{}", response.target.code);
    Ok(())
}
