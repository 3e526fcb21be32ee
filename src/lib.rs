mod cursor;
mod outcome;
mod repository;
mod result;
mod search;
mod sort;
mod storable;
mod store;

pub use cursor::{ContinuationToken, ScanPosition, TokenError};
pub use outcome::Outcome;
pub use repository::{Repository, RepositoryError, RepositoryOptions};
pub use result::{CollectionResult, PaginatedResult, SingleResult};
pub use search::{PageRequest, SearchRequest};
pub use sort::{SortKey, SortOrder, SortValue};
pub use storable::{DocumentKey, PartitionKey, Storable};
pub use store::{
    ContainerPath, DocumentStore, InMemoryStore, ItemResponse, PageResponse, QueryResponse,
    StatusCode, StoreError, Throughput,
};

// Re-export the Storable derive macro from the stored_rust_macros crate
#[cfg(feature = "derive")]
pub use stored_rust_macros::Storable;
