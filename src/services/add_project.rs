use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AppError, Result, StoreError};
use crate::models::Project;
use crate::store::{ProjectHost, ProjectStore};

#[derive(Debug)]
pub enum AddedProject {
    Existing(Project),
    Created(Project),
}

impl AddedProject {
    pub fn project(&self) -> &Project {
        match self {
            AddedProject::Existing(p) | AddedProject::Created(p) => p,
        }
    }
}

/// Register a project, fetching it from the host only if it isn't stored yet.
pub struct AddProject {
    projects: Arc<dyn ProjectStore>,
    host: Arc<dyn ProjectHost>,
}

impl AddProject {
    pub fn new(projects: Arc<dyn ProjectStore>, host: Arc<dyn ProjectHost>) -> Self {
        Self { projects, host }
    }

    pub async fn call(&self, owner: &str, name: &str) -> Result<AddedProject> {
        if let Some(existing) = self.projects.find_by_full_name(owner, name)? {
            return Ok(AddedProject::Existing(existing));
        }

        let fetched = self.host.find(owner, name).await?;
        let created = match self.projects.create(fetched) {
            Ok(created) => created,
            // Another request stored it while we were fetching
            Err(StoreError::Duplicate(full_name)) => {
                debug!(project = %full_name, "Project stored concurrently");
                return self
                    .projects
                    .find_by_full_name(owner, name)?
                    .map(AddedProject::Existing)
                    .ok_or(AppError::ProjectNotFound(full_name));
            }
            Err(e) => return Err(e.into()),
        };
        info!(project = %created.full_name(), size_kb = created.size, "Added project");
        Ok(AddedProject::Created(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FullName;
    use crate::store::JsonProjectStore;
    use crate::test_support::{project, FakeHost};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Store that misses the first lookup, as if another request created the
    /// project between our lookup and our create.
    struct RacedStore {
        inner: JsonProjectStore,
        missed: AtomicBool,
    }

    impl ProjectStore for RacedStore {
        fn find_by_full_name(&self, owner: &str, name: &str) -> std::result::Result<Option<Project>, StoreError> {
            if !self.missed.swap(true, Ordering::SeqCst) {
                return Ok(None);
            }
            self.inner.find_by_full_name(owner, name)
        }

        fn find_by_full_names(&self, names: &[FullName]) -> std::result::Result<Vec<Project>, StoreError> {
            self.inner.find_by_full_names(names)
        }

        fn create(&self, project: Project) -> std::result::Result<Project, StoreError> {
            self.inner.create(project)
        }
    }

    #[tokio::test]
    async fn test_creates_then_reuses() {
        let host = Arc::new(FakeHost::default());
        let svc = AddProject::new(Arc::new(JsonProjectStore::in_memory()), host.clone());

        let first = svc.call("acme", "widgets").await.unwrap();
        assert!(matches!(first, AddedProject::Created(ref p) if p.id == Some(1)));

        let second = svc.call("acme", "widgets").await.unwrap();
        assert!(matches!(second, AddedProject::Existing(_)));
        assert_eq!(second.project().size, 42);
        assert_eq!(host.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_on_host() {
        let store = Arc::new(JsonProjectStore::in_memory());
        let svc = AddProject::new(store.clone(), Arc::new(FakeHost::default()));

        let err = svc.call("acme", "missing").await.unwrap_err();
        assert!(matches!(err, AppError::HostProjectNotFound(ref n) if n == "acme/missing"));
        assert!(store.find_by_full_name("acme", "missing").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_create_returns_existing() {
        let inner = JsonProjectStore::in_memory();
        let stored = inner.create(project("acme", "widgets", 7)).unwrap();
        let store = Arc::new(RacedStore {
            inner,
            missed: AtomicBool::new(false),
        });
        let svc = AddProject::new(store, Arc::new(FakeHost::default()));

        let added = svc.call("acme", "widgets").await.unwrap();
        assert!(matches!(added, AddedProject::Existing(ref p) if *p == stored));
    }
}
