//! Data transfer objects shared across the crate.
//!
//! - `project`: Project, Member, ProjectSummary, FullName
//! - `clone`: CloneJob, Progress, ProgressEvent

pub mod clone;
pub mod project;

pub use clone::*;
pub use project::*;
