//! Request-level transactions composed from the store, clone and
//! contributions layers.

pub mod add_project;
pub mod appraise;
pub mod list_projects;

pub use add_project::{AddProject, AddedProject};
pub use appraise::{Appraisal, AppraisalRequest, AppraiseProject, ProjectFolderContributions};
pub use list_projects::ListProjects;
