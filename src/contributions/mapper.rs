use std::path::Path;
use tracing::{debug, warn};

use super::file::FileContribution;
use super::folder::{build, normalize_path, FolderContributions};
use crate::error::Result;
use crate::git::{BlameExtractor, FileBlame};
use crate::models::Project;

/// Maps the blame of a local clone onto a project's folder tree.
pub struct ContributionsMapper<'a> {
    extractor: BlameExtractor,
    project: &'a Project,
}

impl<'a> ContributionsMapper<'a> {
    pub fn open(repo_path: &Path, project: &'a Project) -> Result<Self> {
        Ok(Self {
            extractor: BlameExtractor::open(repo_path)?,
            project,
        })
    }

    /// Contribution tree for `folder` (`""` is the repository root).
    pub fn for_folder(&self, folder: &str) -> Result<FolderContributions> {
        let folder = normalize_path(folder);
        let paths = self.extractor.files_under(&folder)?;
        debug!(project = %self.project.full_name(), folder = %folder, files = paths.len(), "Appraising folder");

        Ok(self.folder_from_paths(&folder, paths))
    }

    fn folder_from_paths(&self, folder: &str, paths: Vec<String>) -> FolderContributions {
        let files = paths
            .into_iter()
            .map(|path| self.file_contribution(path))
            .collect();

        build(folder, files)
    }

    fn file_contribution(&self, path: String) -> FileContribution {
        match self.extractor.extract(&path) {
            Ok(FileBlame::Text(lines)) => FileContribution::from_attributions(path, &lines, |line| {
                self.project.contributor_id(&line.author, &line.email)
            }),
            Ok(FileBlame::Binary) => {
                debug!(file = %path, "Skipping binary file");
                FileContribution::empty(path)
            }
            Err(e) => {
                warn!(file = %path, error = %e, "Blame failed, counting file as zero lines");
                FileContribution::empty(path)
            }
        }
    }
}
