//! Line attribution for files in a local clone.
//!
//! `BlameExtractor` runs git blame at HEAD and yields one `LineAttribution`
//! per line, in file order. Binary blobs are flagged instead of blamed.

use git2::{BlameOptions, Repository, Tree};
use std::path::Path;

use crate::error::ExtractionError;

/// Author of a single line (1-indexed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAttribution {
    pub line: u32,
    pub author: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBlame {
    Text(Vec<LineAttribution>),
    Binary,
}

pub struct BlameExtractor {
    pub(crate) repo: Repository,
    pub path: String,
}

impl BlameExtractor {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractionError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let repo = Repository::open(&path)?;

        Ok(Self {
            repo,
            path: path_str,
        })
    }

    pub(crate) fn head_tree(&self) -> Result<Tree<'_>, ExtractionError> {
        let head = self.repo.head()?;
        let commit = head.peel_to_commit()?;
        Ok(commit.tree()?)
    }

    pub fn extract(&self, file_path: &str) -> Result<FileBlame, ExtractionError> {
        let head = self.repo.head()?.peel_to_commit()?;
        let tree = head.tree()?;

        let entry = tree
            .get_path(Path::new(file_path))
            .map_err(|_| ExtractionError::PathNotFound(file_path.to_string()))?;
        let obj = entry.to_object(&self.repo)?;
        let blob = obj
            .as_blob()
            .ok_or_else(|| ExtractionError::NotAFile(file_path.to_string()))?;

        if blob.is_binary() {
            return Ok(FileBlame::Binary);
        }

        let mut opts = BlameOptions::new();
        opts.newest_commit(head.id());
        let blame = self.repo.blame_file(Path::new(file_path), Some(&mut opts))?;

        let mut lines = Vec::new();
        for hunk in blame.iter() {
            let signature = hunk.final_signature();
            let author = signature.name().unwrap_or("Unknown").to_string();
            let email = signature.email().unwrap_or("").to_string();
            let start = hunk.final_start_line() as u32;

            for offset in 0..hunk.lines_in_hunk() as u32 {
                lines.push(LineAttribution {
                    line: start + offset,
                    author: author.clone(),
                    email: email.clone(),
                });
            }
        }

        Ok(FileBlame::Text(lines))
    }
}
