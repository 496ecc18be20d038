//! Folder aggregation.
//!
//! `build` turns the flat list of files beneath a folder into a recursive
//! `FolderContributions` tree. Every node's `line_count` is the sum over its
//! descendants and its `credit_share` is the line-weighted merge of its base
//! files and subfolders.
//!
//! Subfolders keep the order in which they were first encountered among the
//! input files, which mirrors tree traversal order.

use serde::Serialize;
use std::collections::HashMap;

use super::credit::{CreditShare, CreditTally};
use super::file::FileContribution;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderContributions {
    pub path: String,
    pub line_count: usize,
    pub credit_share: CreditShare,
    pub base_files: Vec<FileContribution>,
    pub subfolders: Vec<FolderContributions>,
}

impl FolderContributions {
    /// Last path segment, `""` for the repository root.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("")
    }

    pub fn contributors(&self) -> impl Iterator<Item = &str> {
        self.credit_share.contributors()
    }

    pub fn subfolder(&self, name: &str) -> Option<&FolderContributions> {
        self.subfolders.iter().find(|folder| folder.name() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.base_files.is_empty() && self.subfolders.is_empty()
    }
}

/// Strip leading/trailing separators; the empty path is the root.
pub fn normalize_path(path: &str) -> String {
    path.trim_matches('/').to_string()
}

/// Build the contribution tree for `path` from every file beneath it.
///
/// Files that are not beneath `path` are ignored.
pub fn build(path: &str, files: Vec<FileContribution>) -> FolderContributions {
    let path = normalize_path(path);

    let (base_files, nested): (Vec<_>, Vec<_>) =
        files.into_iter().partition(|file| file.directory() == path);

    let subfolders: Vec<FolderContributions> = group_by_subfolder(&path, nested)
        .into_iter()
        .map(|(subfolder, files)| build(&subfolder, files))
        .collect();

    let line_count = base_files.iter().map(|f| f.line_count).sum::<usize>()
        + subfolders.iter().map(|f| f.line_count).sum::<usize>();

    let mut tally = CreditTally::default();
    for file in &base_files {
        tally.add_weighted(&file.credit_share, file.line_count);
    }
    for folder in &subfolders {
        tally.add_weighted(&folder.credit_share, folder.line_count);
    }

    FolderContributions {
        path,
        line_count,
        credit_share: tally.into_share(line_count),
        base_files,
        subfolders,
    }
}

fn group_by_subfolder(
    path: &str,
    nested: Vec<FileContribution>,
) -> Vec<(String, Vec<FileContribution>)> {
    let mut groups: Vec<(String, Vec<FileContribution>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for file in nested {
        let Some(subfolder) = subfolder_after(path, &file.path) else {
            continue;
        };
        match index.get(&subfolder) {
            Some(&i) => groups[i].1.push(file),
            None => {
                index.insert(subfolder.clone(), groups.len());
                groups.push((subfolder, vec![file]));
            }
        }
    }

    groups
}

/// Full path of the immediate subfolder of `folder` that contains `file_path`.
fn subfolder_after(folder: &str, file_path: &str) -> Option<String> {
    let rest = if folder.is_empty() {
        file_path
    } else {
        file_path.strip_prefix(folder)?.strip_prefix('/')?
    };
    let (segment, _) = rest.split_once('/')?;

    Some(if folder.is_empty() {
        segment.to_string()
    } else {
        format!("{}/{}", folder, segment)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn file(path: &str, counts: &[(&str, usize)]) -> FileContribution {
        FileContribution::from_author_lines(path, counts.iter().map(|(c, n)| (*c, *n)))
    }

    fn sample_files() -> Vec<FileContribution> {
        vec![
            file("README.md", &[("carol", 4)]),
            file("src/a.rb", &[("alice", 10)]),
            file("src/lib/b.rb", &[("bob", 5)]),
            file("src/lib/c.rb", &[("alice", 1), ("bob", 2)]),
            file("spec/a_spec.rb", &[("carol", 6), ("alice", 3)]),
            file("src/util/d.rb", &[]),
            file("assets/logo.png", &[]),
        ]
    }

    fn assert_invariants(node: &FolderContributions) {
        let expected: usize = node.base_files.iter().map(|f| f.line_count).sum::<usize>()
            + node.subfolders.iter().map(|f| f.line_count).sum::<usize>();
        assert_eq!(node.line_count, expected, "line count of {:?}", node.path);

        if node.line_count > 0 {
            assert!((node.credit_share.total() - 1.0).abs() < EPSILON, "share of {:?}", node.path);
        } else {
            assert!(node.credit_share.is_empty(), "share of {:?}", node.path);
        }

        for sub in &node.subfolders {
            assert_invariants(sub);
        }
    }

    #[test]
    fn test_scenario_src_folder() {
        let files = vec![
            file("src/a.rb", &[("alice", 10)]),
            file("src/lib/b.rb", &[("bob", 5)]),
        ];
        let folder = build("src/", files);

        assert_eq!(folder.path, "src");
        assert_eq!(folder.line_count, 15);
        assert!((folder.credit_share.get("alice") - 10.0 / 15.0).abs() < EPSILON);
        assert!((folder.credit_share.get("bob") - 5.0 / 15.0).abs() < EPSILON);

        assert_eq!(folder.base_files.len(), 1);
        assert_eq!(folder.subfolders.len(), 1);
        let lib = folder.subfolder("lib").unwrap();
        assert_eq!(lib.path, "src/lib");
        assert_eq!(lib.line_count, 5);
        assert!((lib.credit_share.get("bob") - 1.0).abs() < EPSILON);
        assert!(!lib.credit_share.contains("alice"));
    }

    #[test]
    fn test_root_tree_invariants() {
        let root = build("", sample_files());

        assert_eq!(root.path, "");
        assert_eq!(root.line_count, 31);
        assert_eq!(root.base_files.len(), 1);
        assert_invariants(&root);
    }

    #[test]
    fn test_empty_folders_have_empty_share() {
        let root = build("", sample_files());

        let assets = root.subfolder("assets").unwrap();
        assert_eq!(assets.line_count, 0);
        assert!(assets.credit_share.is_empty());

        let util = root.subfolder("src").unwrap().subfolder("util").unwrap();
        assert_eq!(util.line_count, 0);
        assert!(util.credit_share.is_empty());
    }

    #[test]
    fn test_no_files_builds_empty_node() {
        let folder = build("docs", Vec::new());
        assert!(folder.is_empty());
        assert_eq!(folder.line_count, 0);
        assert!(folder.credit_share.is_empty());
    }

    #[test]
    fn test_subfolders_keep_first_encounter_order() {
        let root = build("", sample_files());
        let names: Vec<&str> = root.subfolders.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["src", "spec", "assets"]);

        let src = root.subfolder("src").unwrap();
        let names: Vec<&str> = src.subfolders.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["lib", "util"]);
    }

    #[test]
    fn test_contributors_only_from_underlying_files() {
        let root = build("", sample_files());
        let spec = root.subfolder("spec").unwrap();
        let contributors: Vec<&str> = spec.contributors().collect();
        assert_eq!(contributors, vec!["alice", "carol"]);

        let src = root.subfolder("src").unwrap();
        assert!(!src.credit_share.contains("carol"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let first = build("", sample_files());
        let second = build("", sample_files());
        assert_eq!(first, second);
    }

    #[test]
    fn test_files_outside_folder_are_ignored() {
        let folder = build("src", sample_files());
        assert_eq!(folder.line_count, 18);
        assert!(folder.subfolder("spec").is_none());
        assert_invariants(&folder);
    }

    #[test]
    fn test_subfolder_after() {
        assert_eq!(subfolder_after("", "src/a.rb"), Some("src".to_string()));
        assert_eq!(subfolder_after("src", "src/lib/b.rb"), Some("src/lib".to_string()));
        assert_eq!(subfolder_after("src", "src/a.rb"), None);
        assert_eq!(subfolder_after("src", "srcfoo/lib/b.rb"), None);
    }
}
