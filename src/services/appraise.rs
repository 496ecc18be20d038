//! Appraisal pipeline.
//!
//! find project → check size → ensure local clone → blame + aggregate.
//! Each step either continues or short-circuits; a missing clone is not an
//! error but an `Appraisal::Processing` the caller should retry later.

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::clone::{CloneOrchestrator, CloneState};
use crate::config::AppConfig;
use crate::contributions::{ContributionsMapper, FolderContributions};
use crate::error::{AppError, Result};
use crate::models::Project;
use crate::store::ProjectStore;

#[derive(Debug, Clone)]
pub struct AppraisalRequest {
    pub owner: String,
    pub project: String,
    pub folder: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectFolderContributions {
    pub project: Project,
    pub folder: FolderContributions,
}

#[derive(Debug)]
pub enum Appraisal {
    Ready(ProjectFolderContributions),
    Processing { request_id: Uuid },
}

pub struct AppraiseProject {
    projects: Arc<dyn ProjectStore>,
    orchestrator: Arc<CloneOrchestrator>,
    config: Arc<AppConfig>,
}

impl AppraiseProject {
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        orchestrator: Arc<CloneOrchestrator>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            projects,
            orchestrator,
            config,
        }
    }

    pub fn call(&self, request: &AppraisalRequest) -> Result<Appraisal> {
        let project = self.find_project_details(request)?;
        self.check_project_eligibility(&project)?;

        let local_path = match self.orchestrator.ensure_cloned(&project.summary())? {
            CloneState::Cloned(path) => path,
            CloneState::Requested { request_id } => {
                info!(project = %project.full_name(), request_id = %request_id, "Appraisal waiting on clone");
                return Ok(Appraisal::Processing { request_id });
            }
        };

        let folder = self.appraise_contributions(&project, &local_path, &request.folder)?;
        Ok(Appraisal::Ready(ProjectFolderContributions { project, folder }))
    }

    fn find_project_details(&self, request: &AppraisalRequest) -> Result<Project> {
        self.projects
            .find_by_full_name(&request.owner, &request.project)?
            .ok_or_else(|| AppError::ProjectNotFound(format!("{}/{}", request.owner, request.project)))
    }

    fn check_project_eligibility(&self, project: &Project) -> Result<()> {
        if project.too_large(self.config.max_size_kb) {
            return Err(AppError::ProjectTooLarge {
                size_kb: project.size,
                max_kb: self.config.max_size_kb,
            });
        }
        Ok(())
    }

    fn appraise_contributions(
        &self,
        project: &Project,
        local_path: &Path,
        folder: &str,
    ) -> Result<FolderContributions> {
        ContributionsMapper::open(local_path, project)?.for_folder(folder)
    }
}
