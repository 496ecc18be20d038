//! Clone workers.
//!
//! Each worker takes one serialized `CloneJob` at a time off the clone queue,
//! clones on the blocking pool and reports progress under the job's request
//! id. A job whose project is already cloned is ignored without
//! publishing anything: it is a duplicate dispatch or a lost race.

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::progress::{JobReporter, ProgressChannel};
use crate::config::AppConfig;
use crate::error::CloneError;
use crate::git::RepositoryStore;
use crate::models::{CloneJob, Progress};

pub struct CloneWorker {
    repos: Arc<dyn RepositoryStore>,
    progress: ProgressChannel,
    config: Arc<AppConfig>,
}

impl CloneWorker {
    pub fn new(repos: Arc<dyn RepositoryStore>, progress: ProgressChannel, config: Arc<AppConfig>) -> Self {
        Self {
            repos,
            progress,
            config,
        }
    }

    pub async fn perform(&self, message: &str) -> Result<(), CloneError> {
        let job: CloneJob = serde_json::from_str(message)?;
        let project = job.project.full_name();

        if self.repos.exists(&job.project) {
            info!(project = %project, request_id = %job.request_id, "Clone exists, ignoring request");
            return Ok(());
        }

        let mut reporter = JobReporter::new(self.progress.clone(), job.request_id);
        reporter.report(Progress::Starting);

        let repos = Arc::clone(&self.repos);
        let summary = job.project.clone();
        let (outcome, mut reporter) = tokio::task::spawn_blocking(move || {
            let outcome = repos.clone_repo(&summary, &mut |p| reporter.report_clone(p));
            (outcome, reporter)
        })
        .await?;

        match outcome {
            Ok(path) => {
                info!(project = %project, request_id = %job.request_id, path = %path.display(), "Clone finished");
            }
            Err(CloneError::CannotOverwriteLocalGitRepo(_)) => {
                info!(project = %project, request_id = %job.request_id, "Clone exists, ignoring request");
                self.progress.close(job.request_id);
                return Ok(());
            }
            Err(e) => {
                self.progress.close(job.request_id);
                return Err(e);
            }
        }

        reporter.report(Progress::Finished);
        // Keep sending finished status to any latecoming subscribers
        reporter
            .repeat_finished(self.config.finished_repeat, self.config.finished_interval)
            .await;
        self.progress.close(job.request_id);

        Ok(())
    }
}

/// Start `count` workers sharing one queue receiver.
///
/// Workers exit once the queue is closed and drained.
pub fn spawn_workers(
    worker: Arc<CloneWorker>,
    receiver: mpsc::UnboundedReceiver<String>,
    count: usize,
) -> Vec<JoinHandle<()>> {
    let receiver = Arc::new(Mutex::new(receiver));

    (0..count)
        .map(|worker_id| {
            let worker = Arc::clone(&worker);
            let receiver = Arc::clone(&receiver);

            tokio::spawn(async move {
                info!(worker_id, "Clone worker started");
                loop {
                    let message = receiver.lock().await.recv().await;
                    let Some(message) = message else {
                        info!(worker_id, "Clone queue closed, worker shutting down");
                        break;
                    };

                    if let Err(e) = worker.perform(&message).await {
                        error!(worker_id, error = %e, "Clone job failed");
                    }
                }
            })
        })
        .collect()
}
