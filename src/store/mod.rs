//! External collaborators behind traits.
//!
//! - `projects`: project record store
//! - `host`: remote project host (GitHub)

pub mod host;
pub mod projects;

pub use host::{GithubHost, ProjectHost};
pub use projects::{JsonProjectStore, ProjectStore};
