//! Project and member records.
//!
//! - `Project`: metadata fetched from the project host, persisted by the store
//! - `Member`: owner or contributor identity
//! - `ProjectSummary`: just enough identity to clone without a second lookup
//! - `FullName`: parsed `owner/name` pair

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub origin_id: u64,
    pub username: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: Option<u64>,
    pub origin_id: u64,
    pub name: String,
    /// Repository size in KB, as reported by the host
    pub size: u64,
    pub ssh_url: String,
    pub http_url: String,
    pub owner: Member,
    pub contributors: Vec<Member>,
}

impl Project {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.username, self.name)
    }

    pub fn too_large(&self, max_size_kb: u64) -> bool {
        self.size > max_size_kb
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            owner: self.owner.username.clone(),
            name: self.name.clone(),
            http_url: self.http_url.clone(),
            ssh_url: self.ssh_url.clone(),
        }
    }

    /// Credit identifier for a blame author.
    ///
    /// Authors whose email matches a known member are credited under the
    /// member's username; everyone else under their commit name.
    pub fn contributor_id(&self, author_name: &str, author_email: &str) -> String {
        std::iter::once(&self.owner)
            .chain(self.contributors.iter())
            .find(|member| {
                member
                    .email
                    .as_deref()
                    .is_some_and(|email| !email.is_empty() && email.eq_ignore_ascii_case(author_email))
            })
            .map(|member| member.username.clone())
            .unwrap_or_else(|| author_name.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectSummary {
    pub owner: String,
    pub name: String,
    pub http_url: String,
    pub ssh_url: String,
}

impl ProjectSummary {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FullName {
    pub owner: String,
    pub name: String,
}

impl FullName {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for FullName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(owner, name))
            }
            _ => Err(format!("expected owner/name, got {:?}", s)),
        }
    }
}
