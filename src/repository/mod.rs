mod base;
mod error;
mod repository;

pub use error::RepositoryError;
pub use repository::{Repository, RepositoryOptions};
