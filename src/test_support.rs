//! Shared fixtures for unit tests: throwaway git repos, project records and
//! in-memory fakes for the clone collaborators.

use async_trait::async_trait;
use git2::{Repository, Signature};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::clone::{JobDispatcher, ProgressChannel};
use crate::config::AppConfig;
use crate::error::{CloneError, DispatchError, HostError};
use crate::git::{CloneProgress, RepositoryStore};
use crate::models::{Member, Project, ProjectSummary};
use crate::state::AppState;
use crate::store::{JsonProjectStore, ProjectHost, ProjectStore};

pub fn init_repo() -> (TempDir, Repository) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let repo = init_repo_at(dir.path());
    (dir, repo)
}

pub fn init_repo_at(path: &Path) -> Repository {
    fs::create_dir_all(path).expect("Failed to create repo dir");
    let repo = Repository::init(path).expect("Failed to init repo");

    let mut config = repo.config().expect("Failed to get config");
    config.set_str("user.name", "Test User").expect("Failed to set name");
    config.set_str("user.email", "test@example.com").expect("Failed to set email");

    repo
}

pub fn commit_file(repo: &Repository, path: &str, content: &str, author: &str, email: &str) {
    commit_files(repo, &[(path, content.as_bytes())], author, email);
}

/// Write files into the working copy and commit them as `author`.
pub fn commit_files(repo: &Repository, files: &[(&str, &[u8])], author: &str, email: &str) {
    let workdir = repo.workdir().expect("Repository has no workdir");

    let tree_id = {
        let mut index = repo.index().expect("Failed to get index");
        for (path, content) in files {
            let full_path = workdir.join(path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).expect("Failed to create dir");
            }
            fs::write(&full_path, content).expect("Failed to write file");
            index.add_path(Path::new(path)).expect("Failed to add file");
        }
        index.write().expect("Failed to write index");
        index.write_tree().expect("Failed to write tree")
    };

    let tree = repo.find_tree(tree_id).expect("Failed to find tree");
    let sig = Signature::now(author, email).expect("Failed to create signature");
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, "Update files", &tree, &parents)
        .expect("Failed to create commit");
}

pub fn member(origin_id: u64, username: &str, email: Option<&str>) -> Member {
    Member {
        origin_id,
        username: username.to_string(),
        email: email.map(str::to_string),
    }
}

pub fn project(owner: &str, name: &str, size: u64) -> Project {
    Project {
        id: None,
        origin_id: 1000,
        name: name.to_string(),
        size,
        ssh_url: format!("git@github.com:{}/{}.git", owner, name),
        http_url: format!("https://github.com/{}/{}.git", owner, name),
        owner: member(1, owner, None),
        contributors: Vec::new(),
    }
}

/// Repository store that tracks clones in memory.
#[derive(Default)]
pub struct FakeRepoStore {
    cloned: Mutex<HashSet<String>>,
    clone_attempts: AtomicUsize,
    fail_with_network_error: bool,
    steps: Vec<CloneProgress>,
}

impl FakeRepoStore {
    pub fn with_progress(steps: Vec<CloneProgress>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_with_network_error: true,
            ..Self::default()
        }
    }

    pub fn mark_cloned(&self, project: &ProjectSummary) {
        self.cloned.lock().unwrap().insert(project.full_name());
    }

    pub fn clone_attempts(&self) -> usize {
        self.clone_attempts.load(Ordering::SeqCst)
    }
}

impl RepositoryStore for FakeRepoStore {
    fn local_path(&self, project: &ProjectSummary) -> PathBuf {
        PathBuf::from("/fake-repostore").join(&project.owner).join(&project.name)
    }

    fn exists(&self, project: &ProjectSummary) -> bool {
        self.cloned.lock().unwrap().contains(&project.full_name())
    }

    fn clone_repo(
        &self,
        project: &ProjectSummary,
        on_progress: &mut dyn FnMut(CloneProgress),
    ) -> Result<PathBuf, CloneError> {
        self.clone_attempts.fetch_add(1, Ordering::SeqCst);
        if self.exists(project) {
            return Err(CloneError::CannotOverwriteLocalGitRepo(self.local_path(project)));
        }
        if self.fail_with_network_error {
            return Err(CloneError::Io(io::Error::other("network unreachable")));
        }
        for step in &self.steps {
            on_progress(*step);
        }
        self.mark_cloned(project);
        Ok(self.local_path(project))
    }
}

/// Dispatcher that records every payload instead of delivering it.
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingDispatcher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl JobDispatcher for RecordingDispatcher {
    fn send(&self, queue: &str, payload: String) -> Result<(), DispatchError> {
        if self.fail {
            return Err(DispatchError::UnknownQueue(queue.to_string()));
        }
        self.sent.lock().unwrap().push((queue.to_string(), payload));
        Ok(())
    }
}

/// Project host that knows every project except ones named `missing`.
#[derive(Default)]
pub struct FakeHost {
    pub lookups: AtomicUsize,
}

#[async_trait]
impl ProjectHost for FakeHost {
    async fn find(&self, owner: &str, name: &str) -> Result<Project, HostError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if name == "missing" {
            return Err(HostError::NotFound(format!("{}/{}", owner, name)));
        }
        Ok(project(owner, name, 42))
    }
}

/// Handler state wired to in-memory fakes.
pub struct TestApp {
    pub state: AppState,
    pub projects: Arc<JsonProjectStore>,
    pub repos: Arc<FakeRepoStore>,
    pub dispatcher: Arc<RecordingDispatcher>,
}

pub fn test_app() -> TestApp {
    let projects = Arc::new(JsonProjectStore::in_memory());
    let repos = Arc::new(FakeRepoStore::default());
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let state = AppState::new(
        Arc::new(AppConfig::default()),
        projects.clone() as Arc<dyn ProjectStore>,
        Arc::new(FakeHost::default()),
        repos.clone(),
        dispatcher.clone(),
        ProgressChannel::new(),
    );

    TestApp {
        state,
        projects,
        repos,
        dispatcher,
    }
}
