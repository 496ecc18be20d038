//! Named in-process job queues.
//!
//! Producers only see the `JobDispatcher` trait; payloads are serialized
//! strings so a networked queue could stand in without touching callers.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

use crate::error::DispatchError;

pub trait JobDispatcher: Send + Sync {
    fn send(&self, queue: &str, payload: String) -> Result<(), DispatchError>;
}

#[derive(Clone, Default)]
pub struct ChannelQueue {
    queues: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<String>>>>,
}

impl ChannelQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) `name` and return its consuming end.
    pub fn register(&self, name: &str) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.queues
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), tx);
        rx
    }
}

impl JobDispatcher for ChannelQueue {
    fn send(&self, queue: &str, payload: String) -> Result<(), DispatchError> {
        let queues = self.queues.read().unwrap_or_else(|e| e.into_inner());
        let sender = queues
            .get(queue)
            .ok_or_else(|| DispatchError::UnknownQueue(queue.to_string()))?;
        sender
            .send(payload)
            .map_err(|_| DispatchError::Closed(queue.to_string()))
    }
}
