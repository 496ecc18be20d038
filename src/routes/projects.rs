use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::Project;
use crate::services::{AddedProject, Appraisal, AppraisalRequest};
use crate::state::AppState;

const APPRAISAL_CACHE_CONTROL: &str = "public, max-age=3600";

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/projects", get(list_projects))
        .route(
            "/api/v1/projects/{owner}/{project}",
            get(appraise_project).post(add_project),
        )
        // A wildcard never matches an empty tail
        .route("/api/v1/projects/{owner}/{project}/", get(appraise_project))
        .route("/api/v1/projects/{owner}/{project}/{*folder}", get(appraise_folder))
        .with_state(state)
}

async fn appraise_project(
    State(state): State<AppState>,
    Path((owner, project)): Path<(String, String)>,
) -> Result<Response> {
    appraise(
        state,
        AppraisalRequest {
            owner,
            project,
            folder: String::new(),
        },
    )
    .await
}

async fn appraise_folder(
    State(state): State<AppState>,
    Path((owner, project, folder)): Path<(String, String, String)>,
) -> Result<Response> {
    appraise(state, AppraisalRequest { owner, project, folder }).await
}

async fn appraise(state: AppState, request: AppraisalRequest) -> Result<Response> {
    // Blame walks the whole folder, keep it off the async workers
    let service = state.appraise.clone();
    let appraisal = tokio::task::spawn_blocking(move || service.call(&request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(match appraisal {
        Appraisal::Ready(result) => (
            [(header::CACHE_CONTROL, APPRAISAL_CACHE_CONTROL)],
            Json(result),
        )
            .into_response(),
        Appraisal::Processing { request_id } => (
            StatusCode::ACCEPTED,
            Json(json!({
                "status": "processing",
                "message": { "request_id": request_id },
            })),
        )
            .into_response(),
    })
}

async fn add_project(
    State(state): State<AppState>,
    Path((owner, project)): Path<(String, String)>,
) -> Result<(StatusCode, Json<Project>)> {
    Ok(match state.add_project.call(&owner, &project).await? {
        AddedProject::Existing(p) => (StatusCode::OK, Json(p)),
        AddedProject::Created(p) => (StatusCode::CREATED, Json(p)),
    })
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    list: Option<String>,
}

async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>> {
    let encoded = query
        .list
        .ok_or_else(|| AppError::InvalidRequest("missing list parameter".to_string()))?;
    let projects = state.list_projects.call(&encoded)?;
    Ok(Json(json!({ "projects": projects })))
}
