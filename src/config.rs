//! Runtime configuration.
//!
//! `ServeArgs` is the clap surface (every flag has an environment fallback);
//! it is converted once into an `AppConfig` that components receive at
//! construction instead of reading globals.

use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Largest project (in KB) that will be cloned and appraised.
pub const DEFAULT_MAX_SIZE_KB: u64 = 1000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Root directory holding one clone per project (`<root>/<owner>/<name>`)
    pub repostore_path: PathBuf,
    /// JSON file backing the project store; in-memory only when unset
    pub db_path: Option<PathBuf>,
    pub max_size_kb: u64,
    pub clone_queue: String,
    pub clone_workers: usize,
    /// How many extra `finished` events a worker publishes for late subscribers
    pub finished_repeat: u32,
    pub finished_interval: Duration,
    /// After this long a pending clone request is considered failed
    pub request_ttl: Duration,
    pub github_api_url: String,
    pub github_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 9090,
            repostore_path: PathBuf::from("repostore"),
            db_path: None,
            max_size_kb: DEFAULT_MAX_SIZE_KB,
            clone_queue: "clone".to_string(),
            clone_workers: 2,
            finished_repeat: 5,
            finished_interval: Duration::from_secs(1),
            request_ttl: Duration::from_secs(600),
            github_api_url: "https://api.github.com".to_string(),
            github_token: None,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Port to run the server on
    #[arg(short, long, env = "CODEPRAISE_PORT", default_value = "9090")]
    pub port: u16,

    /// Directory where project clones are kept
    #[arg(long, env = "CODEPRAISE_REPOSTORE", default_value = "repostore")]
    pub repostore: PathBuf,

    /// JSON file for project records (in-memory when omitted)
    #[arg(long, env = "CODEPRAISE_DB")]
    pub db: Option<PathBuf>,

    /// Maximum project size in KB
    #[arg(long, env = "CODEPRAISE_MAX_SIZE_KB", default_value_t = DEFAULT_MAX_SIZE_KB)]
    pub max_size_kb: u64,

    /// Name of the clone job queue
    #[arg(long, env = "CODEPRAISE_CLONE_QUEUE", default_value = "clone")]
    pub clone_queue: String,

    /// Number of concurrent clone workers
    #[arg(long, env = "CODEPRAISE_CLONE_WORKERS", default_value = "2")]
    pub workers: usize,

    /// Seconds to keep republishing `finished` after a clone completes
    #[arg(long, env = "CODEPRAISE_FINISHED_REPEAT", default_value = "5")]
    pub finished_repeat: u32,

    /// Seconds before an unanswered clone request is dispatched again
    #[arg(long, env = "CODEPRAISE_REQUEST_TTL", default_value = "600")]
    pub request_ttl: u64,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: String,

    /// GitHub token for API requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,
}

impl From<ServeArgs> for AppConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            port: args.port,
            repostore_path: args.repostore,
            db_path: args.db,
            max_size_kb: args.max_size_kb,
            clone_queue: args.clone_queue,
            clone_workers: args.workers.max(1),
            finished_repeat: args.finished_repeat,
            finished_interval: Duration::from_secs(1),
            request_ttl: Duration::from_secs(args.request_ttl),
            github_api_url: args.github_api_url,
            github_token: args.github_token.filter(|t| !t.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        serve: ServeArgs,
    }

    #[test]
    fn test_args_convert_to_config() {
        let cli = TestCli::parse_from([
            "codepraise",
            "--repostore",
            "/tmp/clones",
            "--max-size-kb",
            "500",
            "--workers",
            "0",
            "--github-token",
            "",
        ]);
        let config = AppConfig::from(cli.serve);

        assert_eq!(config.repostore_path, PathBuf::from("/tmp/clones"));
        assert_eq!(config.max_size_kb, 500);
        assert_eq!(config.clone_workers, 1);
        assert_eq!(config.clone_queue, "clone");
        assert!(config.github_token.is_none());
    }
}
