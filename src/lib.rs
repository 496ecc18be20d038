//! CodePraise - contribution appraisal for git projects
//!
//! Attributes every line of a project's working copy to its author and rolls
//! the attribution up through the folder hierarchy.
//!
//! - `contributions`: credit-share math and folder aggregation
//! - `git`: blame extraction and the local clone store
//! - `clone`: clone orchestration, job queue, workers and progress events
//! - `store`: project records and the remote project host
//! - `services`: appraise/add/list transactions
//! - `routes`: HTTP API

pub mod clone;
pub mod config;
pub mod contributions;
pub mod error;
pub mod git;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
