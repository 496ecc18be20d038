//! Shared handler state.

use std::sync::Arc;

use crate::clone::{CloneOrchestrator, JobDispatcher, ProgressChannel};
use crate::config::AppConfig;
use crate::git::RepositoryStore;
use crate::services::{AddProject, AppraiseProject, ListProjects};
use crate::store::{ProjectHost, ProjectStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub appraise: Arc<AppraiseProject>,
    pub add_project: Arc<AddProject>,
    pub list_projects: Arc<ListProjects>,
    pub progress: ProgressChannel,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        projects: Arc<dyn ProjectStore>,
        host: Arc<dyn ProjectHost>,
        repos: Arc<dyn RepositoryStore>,
        dispatcher: Arc<dyn JobDispatcher>,
        progress: ProgressChannel,
    ) -> Self {
        let orchestrator = Arc::new(CloneOrchestrator::new(repos, dispatcher, config.clone()));

        Self {
            appraise: Arc::new(AppraiseProject::new(
                projects.clone(),
                orchestrator,
                config.clone(),
            )),
            add_project: Arc::new(AddProject::new(projects.clone(), host)),
            list_projects: Arc::new(ListProjects::new(projects)),
            progress,
            config,
        }
    }
}
