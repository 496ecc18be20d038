//! CodePraise - appraise who wrote what in a git project
//!
//! # Usage
//! ```bash
//! codepraise serve --port 9090 --repostore ./repostore --db ./db/projects.json
//! codepraise repos list                 # Show local clones
//! codepraise repos wipe                 # Delete every local clone
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codepraise::clone::{spawn_workers, ChannelQueue, CloneWorker, ProgressChannel};
use codepraise::config::{AppConfig, ServeArgs};
use codepraise::git::{GitRepoStore, RepositoryStore};
use codepraise::routes;
use codepraise::state::AppState;
use codepraise::store::{GithubHost, JsonProjectStore, ProjectStore};

/// CodePraise - contribution appraisal for git projects
#[derive(Parser)]
#[command(name = "codepraise")]
#[command(about = "Per-line contribution appraisal for git projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server and clone workers
    Serve(ServeArgs),
    /// Manage the local clone store
    Repos {
        #[command(subcommand)]
        action: ReposAction,

        /// Directory where project clones are kept
        #[arg(long, env = "CODEPRAISE_REPOSTORE", default_value = "repostore")]
        repostore: PathBuf,
    },
}

#[derive(Subcommand)]
enum ReposAction {
    /// List every local clone
    List,
    /// Delete every local clone
    Wipe,
}

fn handle_repos(action: ReposAction, repostore: PathBuf) -> anyhow::Result<()> {
    let store = GitRepoStore::new(repostore);
    match action {
        ReposAction::List => {
            let clones = store.all()?;
            if clones.is_empty() {
                println!("No local clones in {}", store.root().display());
            }
            for path in clones {
                println!("{}", path.display());
            }
        }
        ReposAction::Wipe => {
            let removed = store.wipe()?;
            println!("✓ Removed {} local clone(s) from {}", removed, store.root().display());
        }
    }
    Ok(())
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let config = Arc::new(config);

    let projects: Arc<dyn ProjectStore> = match &config.db_path {
        Some(path) => Arc::new(JsonProjectStore::open(path)?),
        None => Arc::new(JsonProjectStore::in_memory()),
    };
    let host = Arc::new(GithubHost::new(
        config.github_api_url.clone(),
        config.github_token.clone(),
    )?);
    let repos: Arc<dyn RepositoryStore> = Arc::new(GitRepoStore::new(&config.repostore_path));
    let progress = ProgressChannel::new();

    let queue = Arc::new(ChannelQueue::new());
    let jobs = queue.register(&config.clone_queue);
    let worker = Arc::new(CloneWorker::new(repos.clone(), progress.clone(), config.clone()));
    let workers = spawn_workers(worker, jobs, config.clone_workers);

    let state = AppState::new(config.clone(), projects, host, repos, queue, progress);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        addr = %addr,
        repostore = %config.repostore_path.display(),
        workers = workers.len(),
        max_size_kb = config.max_size_kb,
        "CodePraise API listening"
    );

    // Set up graceful shutdown
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
        info!("Shutting down");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve(args) => serve(args.into()).await,
        Commands::Repos { action, repostore } => handle_repos(action, repostore),
    }
}
