use serde::Serialize;
use std::collections::HashMap;

use super::credit::CreditShare;
use crate::git::LineAttribution;

/// Line count and credit share of a single file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileContribution {
    pub path: String,
    pub line_count: usize,
    pub credit_share: CreditShare,
}

impl FileContribution {
    /// Count attributed lines per contributor, as identified by `resolve`.
    pub fn from_attributions<F>(path: impl Into<String>, lines: &[LineAttribution], resolve: F) -> Self
    where
        F: Fn(&LineAttribution) -> String,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for line in lines {
            *counts.entry(resolve(line)).or_insert(0) += 1;
        }

        Self {
            path: path.into(),
            line_count: lines.len(),
            credit_share: CreditShare::from_line_counts(counts),
        }
    }

    pub fn from_author_lines<I, S>(path: impl Into<String>, counts: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let counts: Vec<(String, usize)> = counts.into_iter().map(|(c, n)| (c.into(), n)).collect();
        let line_count = counts.iter().map(|(_, n)| n).sum();

        Self {
            path: path.into(),
            line_count,
            credit_share: CreditShare::from_line_counts(counts),
        }
    }

    /// Binary or unreadable files count as zero lines.
    pub fn empty(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line_count: 0,
            credit_share: CreditShare::default(),
        }
    }

    /// Parent folder, `""` for files at the repository root.
    pub fn directory(&self) -> &str {
        self.path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }

    pub fn filename(&self) -> &str {
        self.path.rsplit_once('/').map(|(_, name)| name).unwrap_or(&self.path)
    }
}
