//! Contribution aggregation engine.
//!
//! - `credit`: CreditShare and the line-weighted tally behind it
//! - `file`: per-file line count and credit share
//! - `folder`: recursive folder tree built from a flat file list
//! - `mapper`: blame of a local clone → folder tree

pub mod credit;
pub mod file;
pub mod folder;
pub mod mapper;

pub use credit::{CreditShare, CreditTally};
pub use file::FileContribution;
pub use folder::{build, normalize_path, FolderContributions};
pub use mapper::ContributionsMapper;
