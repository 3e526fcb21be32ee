//! DocumentStore - abstract partitioned document storage.

use crate::cursor::ScanPosition;
use crate::sort::SortOrder;
use crate::storable::{PartitionKey, Storable};

use super::{ContainerPath, StatusCode, StoreError, Throughput};

/// Response for a single-document operation.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemResponse<T> {
    /// The document as the store now holds it (or held it, for deletes).
    pub item: T,
    pub status_code: StatusCode,
    /// Request cost of the call, in request units.
    pub request_charge: f64,
}

/// Response for one page of a sorted scan.
#[derive(Clone, Debug, PartialEq)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    /// Resume point strictly after the last returned row. Present
    /// whenever the page is non-empty.
    pub next: Option<ScanPosition>,
    pub request_charge: f64,
}

/// Response for a filtered scan.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryResponse<T> {
    pub items: Vec<T>,
    pub request_charge: f64,
}

/// Abstract partitioned document storage.
///
/// Databases hold containers; containers hold documents addressed by
/// partition key and id. All faults come back as [`StoreError`]; the
/// status codes and request charges in the responses describe completed
/// calls only.
pub trait DocumentStore: Send + Sync {
    /// Opens the database, creating it with the given throughput if it
    /// does not exist. Throughput of an existing database is left alone.
    fn ensure_database(
        &self,
        database: &str,
        throughput: Option<Throughput>,
    ) -> Result<(), StoreError>;

    /// Opens the container, creating it if it does not exist. An existing
    /// container must carry the same partition-key path.
    fn ensure_container(
        &self,
        database: &str,
        container: &str,
        partition_key_path: &str,
    ) -> Result<(), StoreError>;

    /// Strict create. Fails with a conflict when the id already exists in
    /// the partition.
    fn create_item<T: Storable>(
        &self,
        container: &ContainerPath,
        partition_key: &PartitionKey,
        item: &T,
    ) -> Result<ItemResponse<T>, StoreError>;

    /// Create or replace.
    fn upsert_item<T: Storable>(
        &self,
        container: &ContainerPath,
        partition_key: &PartitionKey,
        item: &T,
    ) -> Result<ItemResponse<T>, StoreError>;

    /// Point read by partition key and id.
    fn read_item<T: Storable>(
        &self,
        container: &ContainerPath,
        partition_key: &PartitionKey,
        id: &str,
    ) -> Result<ItemResponse<T>, StoreError>;

    /// Deletes the document, returning it as it was stored.
    fn delete_item<T: Storable>(
        &self,
        container: &ContainerPath,
        partition_key: &PartitionKey,
        id: &str,
    ) -> Result<ItemResponse<T>, StoreError>;

    /// Fetches one page of the container scanned in `order`, resuming
    /// strictly after `resume` when given.
    fn query_page<T: Storable>(
        &self,
        container: &ContainerPath,
        order: &SortOrder<T>,
        page_size: usize,
        resume: Option<&ScanPosition>,
    ) -> Result<PageResponse<T>, StoreError>;

    /// Scans the container for documents matching a predicate, stopping
    /// at `max_items` or the store's own page bound, whichever is lower.
    fn query_filtered<T: Storable>(
        &self,
        container: &ContainerPath,
        filter: &dyn Fn(&T) -> bool,
        max_items: Option<usize>,
    ) -> Result<QueryResponse<T>, StoreError>;
}
