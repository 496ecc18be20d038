//! Local clone store.
//!
//! Every project gets one working copy at `<root>/<owner>/<name>`. Clones are
//! fetched into a hidden staging directory next to it and renamed into place
//! once complete, so a repository with a resolvable HEAD at the final path
//! means "cloned" for both the orchestrator and the worker.

use git2::build::RepoBuilder;
use git2::{FetchOptions, RemoteCallbacks, Repository};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::CloneError;
use crate::models::ProjectSummary;

/// Objects received so far during a clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneProgress {
    pub received_objects: usize,
    pub total_objects: usize,
}

impl CloneProgress {
    pub fn percent(&self) -> u8 {
        if self.total_objects == 0 {
            return 0;
        }
        ((self.received_objects.min(self.total_objects) * 100) / self.total_objects) as u8
    }
}

pub trait RepositoryStore: Send + Sync {
    fn local_path(&self, project: &ProjectSummary) -> PathBuf;

    fn exists(&self, project: &ProjectSummary) -> bool {
        self.local_path(project).exists()
    }

    /// Clone `project` into its local path, reporting transfer progress.
    ///
    /// Fails with `CannotOverwriteLocalGitRepo` if a clone already exists.
    fn clone_repo(
        &self,
        project: &ProjectSummary,
        on_progress: &mut dyn FnMut(CloneProgress),
    ) -> Result<PathBuf, CloneError>;
}

#[derive(Debug, Clone)]
pub struct GitRepoStore {
    root: PathBuf,
}

impl GitRepoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every clone currently in the store.
    pub fn all(&self) -> io::Result<Vec<PathBuf>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut clones = Vec::new();
        for owner in fs::read_dir(&self.root)? {
            let owner = owner?.path();
            if !owner.is_dir() || is_staging(&owner) {
                continue;
            }
            for project in fs::read_dir(&owner)? {
                let project = project?.path();
                if project.is_dir() && !is_staging(&project) {
                    clones.push(project);
                }
            }
        }
        clones.sort();
        Ok(clones)
    }

    /// Delete every clone, returning how many were removed.
    pub fn wipe(&self) -> io::Result<usize> {
        let clones = self.all()?;
        for clone in &clones {
            fs::remove_dir_all(clone)?;
        }
        info!(count = clones.len(), root = %self.root.display(), "Wiped repo store");
        Ok(clones.len())
    }
}

fn is_staging(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// A finished clone opens as a repository and has a HEAD commit.
fn is_complete_clone(path: &Path) -> bool {
    Repository::open(path)
        .and_then(|repo| repo.head().and_then(|head| head.peel_to_commit()).map(|_| ()))
        .is_ok()
}

impl RepositoryStore for GitRepoStore {
    fn local_path(&self, project: &ProjectSummary) -> PathBuf {
        self.root.join(&project.owner).join(&project.name)
    }

    fn exists(&self, project: &ProjectSummary) -> bool {
        is_complete_clone(&self.local_path(project))
    }

    fn clone_repo(
        &self,
        project: &ProjectSummary,
        on_progress: &mut dyn FnMut(CloneProgress),
    ) -> Result<PathBuf, CloneError> {
        let destination = self.local_path(project);
        if self.exists(project) {
            return Err(CloneError::CannotOverwriteLocalGitRepo(destination));
        }
        if destination.exists() {
            // Leftover from an interrupted clone
            warn!(path = %destination.display(), "Removing incomplete clone");
            fs::remove_dir_all(&destination)?;
        }
        let parent = destination
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        fs::create_dir_all(&parent)?;
        let staging = parent.join(format!(".{}.{}", project.name, Uuid::new_v4()));

        info!(project = %project.full_name(), url = %project.http_url, "Starting git clone");

        let mut callbacks = RemoteCallbacks::new();
        callbacks.transfer_progress(|stats| {
            on_progress(CloneProgress {
                received_objects: stats.received_objects(),
                total_objects: stats.total_objects(),
            });
            true
        });

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_options);
        if let Err(e) = builder.clone(&project.http_url, &staging) {
            if staging.exists() {
                fs::remove_dir_all(&staging)?;
            }
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&staging, &destination) {
            fs::remove_dir_all(&staging)?;
            if self.exists(project) {
                return Err(CloneError::CannotOverwriteLocalGitRepo(destination));
            }
            return Err(e.into());
        }

        debug!(project = %project.full_name(), path = %destination.display(), "Git clone completed");
        Ok(destination)
    }
}
