//! API route handlers - maps HTTP endpoints to the services.
//!
//! Each submodule defines routes for a feature area:
//! - `root`: API banner (GET /)
//! - `projects`: appraisal, adding and listing projects
//! - `progress`: clone progress as Server-Sent Events

pub mod progress;
pub mod projects;
pub mod root;

use axum::Router;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(root::routes())
        .merge(projects::routes(state.clone()))
        .merge(progress::routes(state))
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    pub async fn send(app: axum::Router, method: &str, uri: &str) -> Response {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    pub async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    pub async fn json_of(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let body = body_text(response).await;
        (status, serde_json::from_str(&body).unwrap())
    }
}
