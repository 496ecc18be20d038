use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

pub fn routes() -> Router {
    Router::new().route("/", get(banner))
}

async fn banner() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "CodePraise API v1 at /api/v1/",
    }))
}
