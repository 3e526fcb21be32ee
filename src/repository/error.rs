use std::fmt;

use crate::store::StoreError;

/// Hard repository error: construction-time failures only.
///
/// The CRUD, search, and pagination operations never produce one of
/// these; storage faults surface as result-envelope data instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Required construction parameters were missing or malformed.
    Configuration(String),
    /// The store failed while the database or container was being ensured.
    Store(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Configuration(message) => {
                write!(f, "repository configuration error: {}", message)
            }
            RepositoryError::Store(message) => {
                write!(f, "repository initialization failed: {}", message)
            }
        }
    }
}

impl std::error::Error for RepositoryError {}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        RepositoryError::Store(err.to_string())
    }
}
