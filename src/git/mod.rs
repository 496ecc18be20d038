pub mod blame;
pub mod repository;
pub mod tree;

pub use blame::{BlameExtractor, FileBlame, LineAttribution};
pub use repository::{CloneProgress, GitRepoStore, RepositoryStore};
