//! Stores - the storage seam behind every repository.
//!
//! A store is a partitioned document-database service: databases hold
//! containers, containers hold documents addressed by partition key and
//! id. Repositories speak to the [`DocumentStore`] trait and never to a
//! concrete service; [`InMemoryStore`] is the bundled implementation for
//! tests and development.

mod in_memory;
mod store;

use std::fmt;

/// Addresses one container within one database.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContainerPath {
    pub database: String,
    pub container: String,
}

impl ContainerPath {
    pub fn new(database: impl Into<String>, container: impl Into<String>) -> Self {
        ContainerPath {
            database: database.into(),
            container: container.into(),
        }
    }
}

impl fmt::Display for ContainerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.database, self.container)
    }
}

/// Provisioned throughput for a newly created database.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Throughput {
    /// Fixed request units per second.
    Manual(u32),
    /// Autoscale up to the given request units per second.
    Autoscale(u32),
}

/// Status a store reports for a completed item operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCode {
    /// Read or replace succeeded.
    Ok,
    /// A new document was written.
    Created,
    /// The document was deleted.
    NoContent,
}

impl StatusCode {
    /// The HTTP status number document services report for this outcome.
    pub fn code(self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCode::Ok => write!(f, "200 OK"),
            StatusCode::Created => write!(f, "201 Created"),
            StatusCode::NoContent => write!(f, "204 No Content"),
        }
    }
}

/// Fault raised by a store operation.
///
/// Repositories never propagate these to callers; the safe-call boundary
/// converts them into result-envelope error text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The database, container, or document does not exist.
    NotFound(String),
    /// The write conflicted with existing state.
    Conflict(String),
    /// The service refused the call for exceeding provisioned throughput.
    Throttled(String),
    /// The call itself was malformed.
    InvalidRequest(String),
    /// Document bytes could not be serialized or deserialized.
    Serialization(String),
    /// Engine-internal failure.
    Internal(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(msg) => write!(f, "not found: {}", msg),
            StoreError::Conflict(msg) => write!(f, "conflict: {}", msg),
            StoreError::Throttled(msg) => write!(f, "request rate too large: {}", msg),
            StoreError::InvalidRequest(msg) => write!(f, "invalid request: {}", msg),
            StoreError::Serialization(msg) => write!(f, "serialization error: {}", msg),
            StoreError::Internal(msg) => write!(f, "internal storage error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub use in_memory::InMemoryStore;
pub use store::{DocumentStore, ItemResponse, PageResponse, QueryResponse};
