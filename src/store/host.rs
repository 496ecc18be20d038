//! Remote project host.
//!
//! `GithubHost` fetches repository metadata and contributors from the GitHub
//! REST API and maps them onto a `Project`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::HostError;
use crate::models::{Member, Project};

#[async_trait]
pub trait ProjectHost: Send + Sync {
    async fn find(&self, owner: &str, name: &str) -> Result<Project, HostError>;
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    id: u64,
    name: String,
    size: u64,
    ssh_url: String,
    clone_url: String,
    owner: UserResponse,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: u64,
    login: String,
    email: Option<String>,
}

impl From<UserResponse> for Member {
    fn from(user: UserResponse) -> Self {
        Member {
            origin_id: user.id,
            username: user.login,
            email: user.email,
        }
    }
}

pub struct GithubHost {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GithubHost {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, HostError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("codepraise/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn get<T>(&self, path: &str, full_name: &str) -> Result<T, HostError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        debug!(url = %url, "Requesting project host");
        let response = req.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(HostError::NotFound(full_name.to_string()));
        }
        Ok(response.error_for_status()?.json().await?)
    }
}

#[async_trait]
impl ProjectHost for GithubHost {
    async fn find(&self, owner: &str, name: &str) -> Result<Project, HostError> {
        let full_name = format!("{}/{}", owner, name);
        let repo: RepoResponse = self.get(&format!("/repos/{}", full_name), &full_name).await?;
        let contributors: Vec<UserResponse> = self
            .get(&format!("/repos/{}/contributors", full_name), &full_name)
            .await?;

        Ok(Project {
            id: None,
            origin_id: repo.id,
            name: repo.name,
            size: repo.size,
            ssh_url: repo.ssh_url,
            http_url: repo.clone_url,
            owner: repo.owner.into(),
            contributors: contributors.into_iter().map(Member::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_response_maps_owner() {
        let repo: RepoResponse = serde_json::from_str(
            r#"{
                "id": 42,
                "name": "widgets",
                "size": 512,
                "ssh_url": "git@github.com:acme/widgets.git",
                "clone_url": "https://github.com/acme/widgets.git",
                "owner": { "id": 7, "login": "acme" },
                "stargazers_count": 3
            }"#,
        )
        .unwrap();

        assert_eq!(repo.size, 512);
        let owner: Member = repo.owner.into();
        assert_eq!(owner.username, "acme");
        assert_eq!(owner.origin_id, 7);
        assert!(owner.email.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let host = GithubHost::new("https://api.github.com/", None).unwrap();
        assert_eq!(host.base_url, "https://api.github.com");
    }
}
