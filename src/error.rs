//! Application error types and HTTP response mapping.
//!
//! `AppError` is what a request can fail with; it implements Axum's
//! `IntoResponse` so handlers can return it directly. Component errors
//! (`StoreError`, `CloneError`, `ExtractionError`, `DispatchError`,
//! `HostError`) stay close to their source and convert into `AppError`.
//!
//! Error mappings:
//! - `ProjectNotFound`, `FolderNotFound`, `HostProjectNotFound` → 404
//! - `ProjectTooLarge`, `InvalidRequest` → 400
//! - `Storage`, `Clone`, `Extraction`, `Host`, `Internal` → 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Could not find folder: {0}")]
    FolderNotFound(String),

    #[error("Project too large to analyze: {size_kb} KB (limit {max_kb} KB)")]
    ProjectTooLarge { size_kb: u64, max_kb: u64 },

    #[error("Could not find project on host: {0}")]
    HostProjectNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Having trouble accessing the database: {0}")]
    Storage(#[from] StoreError),

    #[error("Could not clone this project: {0}")]
    Clone(#[from] CloneError),

    #[error("Could not appraise contributions: {0}")]
    Extraction(ExtractionError),

    #[error("Project host error: {0}")]
    Host(HostError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ProjectNotFound(_)
            | AppError::FolderNotFound(_)
            | AppError::HostProjectNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::ProjectTooLarge { .. } | AppError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, "bad_request")
            }
            AppError::Storage(_)
            | AppError::Clone(_)
            | AppError::Extraction(_)
            | AppError::Host(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::FolderNotFound(path) => AppError::FolderNotFound(path),
            other => AppError::Extraction(other),
        }
    }
}

impl From<HostError> for AppError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::NotFound(name) => AppError::HostProjectNotFound(name),
            other => AppError::Host(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, label) = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "status": label,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Project store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt project database: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Project already exists: {0}")]
    Duplicate(String),

    #[error("Lock poisoned")]
    LockPoisoned,
}

/// Job queue failures.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unknown queue: {0}")]
    UnknownQueue(String),

    #[error("Queue closed: {0}")]
    Closed(String),
}

/// Clone orchestration and worker failures.
#[derive(Error, Debug)]
pub enum CloneError {
    #[error("Local clone already exists at {}", .0.display())]
    CannotOverwriteLocalGitRepo(PathBuf),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed clone job: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Could not dispatch clone job: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Clone task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Blame extraction failures.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("{0} is not a file")]
    NotAFile(String),
}

/// Remote project host failures.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("{0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
