//! Project records.
//!
//! `JsonProjectStore` keeps projects in memory and, when given a path,
//! rewrites the whole set to a JSON file on every create.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{FullName, Project};

pub trait ProjectStore: Send + Sync {
    fn find_by_full_name(&self, owner: &str, name: &str) -> Result<Option<Project>, StoreError>;

    /// Projects matching `names`, in request order; unknown names are skipped.
    fn find_by_full_names(&self, names: &[FullName]) -> Result<Vec<Project>, StoreError>;

    fn create(&self, project: Project) -> Result<Project, StoreError>;
}

pub struct JsonProjectStore {
    projects: RwLock<Vec<Project>>,
    path: Option<PathBuf>,
}

impl JsonProjectStore {
    pub fn in_memory() -> Self {
        Self {
            projects: RwLock::new(Vec::new()),
            path: None,
        }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let projects: Vec<Project> = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            Vec::new()
        };
        info!(path = %path.display(), count = projects.len(), "Opened project store");

        Ok(Self {
            projects: RwLock::new(projects),
            path: Some(path),
        })
    }

    fn persist(&self, projects: &[Project]) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(projects)?)?;
        Ok(())
    }
}

fn matches(project: &Project, owner: &str, name: &str) -> bool {
    project.owner.username == owner && project.name == name
}

impl ProjectStore for JsonProjectStore {
    fn find_by_full_name(&self, owner: &str, name: &str) -> Result<Option<Project>, StoreError> {
        let projects = self.projects.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(projects.iter().find(|p| matches(p, owner, name)).cloned())
    }

    fn find_by_full_names(&self, names: &[FullName]) -> Result<Vec<Project>, StoreError> {
        let projects = self.projects.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(names
            .iter()
            .filter_map(|n| projects.iter().find(|p| matches(p, &n.owner, &n.name)))
            .cloned()
            .collect())
    }

    fn create(&self, mut project: Project) -> Result<Project, StoreError> {
        let mut projects = self.projects.write().map_err(|_| StoreError::LockPoisoned)?;
        if projects.iter().any(|p| matches(p, &project.owner.username, &project.name)) {
            return Err(StoreError::Duplicate(project.full_name()));
        }

        let next_id = projects.iter().filter_map(|p| p.id).max().unwrap_or(0) + 1;
        project.id = Some(next_id);
        projects.push(project.clone());
        self.persist(&projects)?;

        debug!(project = %project.full_name(), id = next_id, "Stored project");
        Ok(project)
    }
}
