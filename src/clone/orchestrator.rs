//! Clone orchestration.
//!
//! ```text
//! NotCloned ──request──▶ Requested ──worker done──▶ Cloned
//!                            │
//!                            └──ttl expired──▶ Failed ──request──▶ Requested
//! ```
//!
//! `Cloned` is simply "the local directory exists". While a request is
//! pending, repeated calls return the same request id and dispatch nothing.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::queue::JobDispatcher;
use crate::config::AppConfig;
use crate::error::CloneError;
use crate::git::RepositoryStore;
use crate::models::{CloneJob, ProjectSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneState {
    Cloned(PathBuf),
    Requested { request_id: Uuid },
}

struct PendingClone {
    request_id: Uuid,
    requested_at: Instant,
}

pub struct CloneOrchestrator {
    repos: Arc<dyn RepositoryStore>,
    dispatcher: Arc<dyn JobDispatcher>,
    config: Arc<AppConfig>,
    pending: Mutex<HashMap<String, PendingClone>>,
}

impl CloneOrchestrator {
    pub fn new(
        repos: Arc<dyn RepositoryStore>,
        dispatcher: Arc<dyn JobDispatcher>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            repos,
            dispatcher,
            config,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Make sure a clone of `project` exists or is on its way.
    pub fn ensure_cloned(&self, project: &ProjectSummary) -> Result<CloneState, CloneError> {
        let key = project.full_name();
        // Held across dispatch so concurrent requests cannot both send a job
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());

        if self.repos.exists(project) {
            pending.remove(&key);
            return Ok(CloneState::Cloned(self.repos.local_path(project)));
        }

        if let Some(request) = pending.get(&key) {
            if request.requested_at.elapsed() < self.config.request_ttl {
                debug!(project = %key, request_id = %request.request_id, "Clone already requested");
                return Ok(CloneState::Requested {
                    request_id: request.request_id,
                });
            }
            warn!(project = %key, request_id = %request.request_id, "Clone request expired, dispatching again");
        }

        let job = CloneJob::new(project.clone());
        let payload = serde_json::to_string(&job)?;
        self.dispatcher.send(&self.config.clone_queue, payload)?;
        info!(project = %key, request_id = %job.request_id, queue = %self.config.clone_queue, "Dispatched clone job");

        pending.insert(
            key,
            PendingClone {
                request_id: job.request_id,
                requested_at: Instant::now(),
            },
        );

        Ok(CloneState::Requested {
            request_id: job.request_id,
        })
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
