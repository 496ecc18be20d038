//! Clone job and progress event messages.
//!
//! - `CloneJob`: queue payload, serialized to JSON by the orchestrator
//! - `Progress`: `starting`, a percentage, or `finished`
//! - `ProgressEvent`: progress keyed by the request (correlation) id

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProjectSummary;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CloneJob {
    pub request_id: Uuid,
    pub project: ProjectSummary,
    pub requested_at: DateTime<Utc>,
}

impl CloneJob {
    pub fn new(project: ProjectSummary) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            project,
            requested_at: Utc::now(),
        }
    }
}

/// Clone progress. Variant order is the order events are published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Progress {
    Starting,
    Percent(u8),
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub request_id: Uuid,
    pub progress: Progress,
}
