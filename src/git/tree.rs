use git2::{ObjectType, Tree};
use std::path::Path;

use crate::error::ExtractionError;
use crate::git::blame::BlameExtractor;

impl BlameExtractor {
    /// Paths of every file beneath `folder` at HEAD, in tree order.
    ///
    /// Submodules are skipped. An empty `folder` lists the whole repository.
    pub fn files_under(&self, folder: &str) -> Result<Vec<String>, ExtractionError> {
        let tree = self.head_tree()?;

        let target_tree = if folder.is_empty() {
            tree
        } else {
            let entry = tree
                .get_path(Path::new(folder))
                .map_err(|_| ExtractionError::FolderNotFound(folder.to_string()))?;
            let obj = entry.to_object(&self.repo)?;
            obj.peel_to_tree()
                .map_err(|_| ExtractionError::FolderNotFound(folder.to_string()))?
        };

        let mut files = Vec::new();
        self.collect_files(&target_tree, folder, &mut files)?;
        Ok(files)
    }

    fn collect_files(
        &self,
        tree: &Tree<'_>,
        base_path: &str,
        files: &mut Vec<String>,
    ) -> Result<(), ExtractionError> {
        for entry in tree.iter() {
            let name = entry.name().unwrap_or("").to_string();
            let path = if base_path.is_empty() {
                name
            } else {
                format!("{}/{}", base_path, name)
            };

            match entry.kind() {
                Some(ObjectType::Blob) => files.push(path),
                Some(ObjectType::Tree) => {
                    let obj = entry.to_object(&self.repo)?;
                    if let Some(subtree) = obj.as_tree() {
                        self.collect_files(subtree, &path, files)?;
                    }
                }
                _ => continue,
            }
        }

        Ok(())
    }
}
