use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::Stream;
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::models::Progress;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/progress/{request_id}", get(progress_stream))
        .with_state(state)
}

/// SSE stream of clone progress for one request.
/// Ends after the first `finished`, when the job's topic is closed, or after
/// sitting idle for the request TTL.
async fn progress_stream(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.progress.subscribe(request_id);
    let channel = state.progress.clone();
    let idle_timeout = state.config.request_ttl;

    let stream = async_stream::stream! {
        loop {
            match tokio::time::timeout(idle_timeout, rx.recv()).await {
                Ok(Ok(event)) => {
                    let data = serde_json::to_string(&event).unwrap_or_default();
                    yield Ok(Event::default().event("progress").data(data));
                    if event.progress == Progress::Finished {
                        break;
                    }
                }
                Ok(Err(RecvError::Lagged(n))) => {
                    tracing::warn!(request_id = %request_id, skipped = n, "Progress stream lagged");
                }
                Ok(Err(RecvError::Closed)) => break,
                Err(_) => {
                    tracing::debug!(request_id = %request_id, "Progress stream idle, closing");
                    break;
                }
            }
        }

        drop(rx);
        channel.release_if_idle(request_id);
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
