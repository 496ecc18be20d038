//! Clone progress pub/sub.
//!
//! `ProgressChannel` keeps one broadcast topic per request id. Delivery is
//! best-effort: subscribers that attach late miss earlier events, which is why
//! workers keep republishing `finished` for a while.
//!
//! `JobReporter` is the worker-side publisher for one job. It never publishes
//! a progress value lower than one already sent, so subscribers see a
//! non-decreasing stream (only `finished` may repeat).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::git::CloneProgress;
use crate::models::{Progress, ProgressEvent};

const TOPIC_CAPACITY: usize = 64;

#[derive(Clone, Default)]
pub struct ProgressChannel {
    topics: Arc<Mutex<HashMap<Uuid, broadcast::Sender<ProgressEvent>>>>,
}

impl ProgressChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn sender(&self, request_id: Uuid) -> broadcast::Sender<ProgressEvent> {
        let mut topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        topics
            .entry(request_id)
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .clone()
    }

    pub fn publish(&self, request_id: Uuid, progress: Progress) {
        // No subscribers is fine
        let _ = self.sender(request_id).send(ProgressEvent {
            request_id,
            progress,
        });
    }

    pub fn subscribe(&self, request_id: Uuid) -> broadcast::Receiver<ProgressEvent> {
        self.sender(request_id).subscribe()
    }

    /// Drop the topic; current subscribers see the stream end.
    pub fn close(&self, request_id: Uuid) {
        self.topics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&request_id);
    }

    /// Drop the topic if nobody is listening any more. A later publish
    /// recreates it.
    pub fn release_if_idle(&self, request_id: Uuid) {
        let mut topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        if topics
            .get(&request_id)
            .is_some_and(|tx| tx.receiver_count() == 0)
        {
            topics.remove(&request_id);
        }
    }

    pub fn topic_count(&self) -> usize {
        self.topics.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

pub struct JobReporter {
    channel: ProgressChannel,
    request_id: Uuid,
    last: Option<Progress>,
}

impl JobReporter {
    pub fn new(channel: ProgressChannel, request_id: Uuid) -> Self {
        Self {
            channel,
            request_id,
            last: None,
        }
    }

    pub fn report(&mut self, progress: Progress) {
        if let Some(last) = self.last {
            if progress < last || (progress == last && progress != Progress::Finished) {
                return;
            }
        }
        self.channel.publish(self.request_id, progress);
        self.last = Some(progress);
    }

    pub fn report_clone(&mut self, progress: CloneProgress) {
        self.report(Progress::Percent(progress.percent()));
    }

    /// Republish `finished` `times` times, `interval` apart.
    pub async fn repeat_finished(&mut self, times: u32, interval: Duration) {
        for _ in 0..times {
            tokio::time::sleep(interval).await;
            self.report(Progress::Finished);
        }
    }
}
