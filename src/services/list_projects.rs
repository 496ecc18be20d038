use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{FullName, Project};
use crate::store::ProjectStore;

/// Look up a batch of projects named by a base64-encoded JSON array of
/// `"owner/name"` strings.
pub struct ListProjects {
    projects: Arc<dyn ProjectStore>,
}

impl ListProjects {
    pub fn new(projects: Arc<dyn ProjectStore>) -> Self {
        Self { projects }
    }

    pub fn call(&self, encoded: &str) -> Result<Vec<Project>> {
        let names = decode_list(encoded)?;
        Ok(self.projects.find_by_full_names(&names)?)
    }
}

pub fn decode_list(encoded: &str) -> Result<Vec<FullName>> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .or_else(|_| URL_SAFE.decode(encoded.trim()))
        .map_err(|e| AppError::InvalidRequest(format!("list is not base64: {}", e)))?;
    let raw: Vec<String> = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::InvalidRequest(format!("list is not a JSON array of names: {}", e)))?;

    raw.iter()
        .map(|name| name.parse::<FullName>().map_err(AppError::InvalidRequest))
        .collect()
}
