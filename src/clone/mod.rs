//! On-demand clone workflow.
//!
//! - `orchestrator`: decides whether a clone job is needed and dispatches it
//! - `queue`: job dispatcher trait and the in-process channel queue
//! - `worker`: clone workers consuming the queue
//! - `progress`: per-request progress pub/sub and the worker-side reporter

pub mod orchestrator;
pub mod progress;
pub mod queue;
pub mod worker;

pub use orchestrator::{CloneOrchestrator, CloneState};
pub use progress::{JobReporter, ProgressChannel};
pub use queue::{ChannelQueue, JobDispatcher};
pub use worker::{spawn_workers, CloneWorker};
