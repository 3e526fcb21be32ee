//! InMemoryStore - map-backed document store for testing and development.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::cursor::ScanPosition;
use crate::sort::{SortOrder, SortValue};
use crate::storable::{PartitionKey, Storable};

use super::store::{DocumentStore, ItemResponse, PageResponse, QueryResponse};
use super::{ContainerPath, StatusCode, StoreError, Throughput};

/// Nominal request cost reported for every call.
const REQUEST_CHARGE_PER_CALL: f64 = 1.0;

/// Rows a filtered scan returns at most, unless configured otherwise.
const DEFAULT_QUERY_PAGE_SIZE: usize = 100;

/// Internal stored representation of a document.
struct StoredDocument {
    bytes: Vec<u8>,
}

struct ContainerState {
    partition_key_path: String,
    documents: BTreeMap<(String, String), StoredDocument>,
}

struct DatabaseState {
    throughput: Option<Throughput>,
    containers: HashMap<String, ContainerState>,
}

/// In-memory document store backed by nested maps.
///
/// Documents are held as serialized JSON bytes keyed by
/// `(partition key, id)`. Clone-friendly via Arc: clones share document
/// state.
#[derive(Clone)]
pub struct InMemoryStore {
    databases: Arc<RwLock<HashMap<String, DatabaseState>>>,
    query_page_size: usize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            databases: Arc::new(RwLock::new(HashMap::new())),
            query_page_size: DEFAULT_QUERY_PAGE_SIZE,
        }
    }

    /// Cap filtered scans at `page_size` rows instead of the default.
    pub fn with_query_page_size(mut self, page_size: usize) -> Self {
        self.query_page_size = page_size;
        self
    }

    /// True when the container has been created.
    pub fn container_exists(&self, path: &ContainerPath) -> bool {
        self.databases
            .read()
            .map(|state| {
                state
                    .get(&path.database)
                    .is_some_and(|db| db.containers.contains_key(&path.container))
            })
            .unwrap_or(false)
    }

    /// Number of documents the container currently holds.
    pub fn item_count(&self, path: &ContainerPath) -> usize {
        self.databases
            .read()
            .map(|state| {
                state
                    .get(&path.database)
                    .and_then(|db| db.containers.get(&path.container))
                    .map(|container| container.documents.len())
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    /// Throughput the database was created with, if any.
    pub fn database_throughput(&self, database: &str) -> Option<Throughput> {
        self.databases
            .read()
            .ok()
            .and_then(|state| state.get(database).and_then(|db| db.throughput))
    }

    fn container<'a>(
        state: &'a HashMap<String, DatabaseState>,
        path: &ContainerPath,
    ) -> Result<&'a ContainerState, StoreError> {
        let Some(db) = state.get(&path.database) else {
            return Err(StoreError::NotFound(format!(
                "database '{}'",
                path.database
            )));
        };
        let Some(container) = db.containers.get(&path.container) else {
            return Err(StoreError::NotFound(format!("container '{}'", path)));
        };
        Ok(container)
    }

    fn container_mut<'a>(
        state: &'a mut HashMap<String, DatabaseState>,
        path: &ContainerPath,
    ) -> Result<&'a mut ContainerState, StoreError> {
        let Some(db) = state.get_mut(&path.database) else {
            return Err(StoreError::NotFound(format!(
                "database '{}'",
                path.database
            )));
        };
        let Some(container) = db.containers.get_mut(&path.container) else {
            return Err(StoreError::NotFound(format!("container '{}'", path)));
        };
        Ok(container)
    }

    fn encode<T: Storable>(item: &T) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(item).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn decode<T: Storable>(bytes: &[u8]) -> Result<T, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Decodes every document in the container, paired with the partition
    /// key it lives under, while the lock is held. Caller-supplied
    /// closures run against the returned copies, never under the lock.
    fn snapshot<T: Storable>(
        &self,
        container: &ContainerPath,
    ) -> Result<Vec<(String, T)>, StoreError> {
        let state = self
            .databases
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".into()))?;
        let container_state = Self::container(&state, container)?;

        let mut documents = Vec::with_capacity(container_state.documents.len());
        for ((partition_key, _), stored) in &container_state.documents {
            documents.push((partition_key.clone(), Self::decode::<T>(&stored.bytes)?));
        }
        Ok(documents)
    }
}

impl DocumentStore for InMemoryStore {
    fn ensure_database(
        &self,
        database: &str,
        throughput: Option<Throughput>,
    ) -> Result<(), StoreError> {
        if database.trim().is_empty() {
            return Err(StoreError::InvalidRequest("blank database name".into()));
        }
        let mut state = self
            .databases
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".into()))?;

        if !state.contains_key(database) {
            state.insert(
                database.to_string(),
                DatabaseState {
                    throughput,
                    containers: HashMap::new(),
                },
            );
        }
        Ok(())
    }

    fn ensure_container(
        &self,
        database: &str,
        container: &str,
        partition_key_path: &str,
    ) -> Result<(), StoreError> {
        if container.trim().is_empty() {
            return Err(StoreError::InvalidRequest("blank container id".into()));
        }
        let mut state = self
            .databases
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".into()))?;

        let Some(db) = state.get_mut(database) else {
            return Err(StoreError::NotFound(format!("database '{}'", database)));
        };
        match db.containers.get(container) {
            Some(existing) if existing.partition_key_path != partition_key_path => {
                Err(StoreError::Conflict(format!(
                    "container '{}' already exists with partition key path '{}'",
                    container, existing.partition_key_path
                )))
            }
            Some(_) => Ok(()),
            None => {
                db.containers.insert(
                    container.to_string(),
                    ContainerState {
                        partition_key_path: partition_key_path.to_string(),
                        documents: BTreeMap::new(),
                    },
                );
                Ok(())
            }
        }
    }

    fn create_item<T: Storable>(
        &self,
        container: &ContainerPath,
        partition_key: &PartitionKey,
        item: &T,
    ) -> Result<ItemResponse<T>, StoreError> {
        if item.id().trim().is_empty() {
            return Err(StoreError::InvalidRequest("blank document id".into()));
        }
        let bytes = Self::encode(item)?;
        let stored: T = Self::decode(&bytes)?;

        let mut state = self
            .databases
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".into()))?;
        let container_state = Self::container_mut(&mut state, container)?;

        let key = (partition_key.as_str().to_string(), item.id().to_string());
        if container_state.documents.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "document '{}' already exists in partition '{}'",
                item.id(),
                partition_key
            )));
        }
        container_state.documents.insert(key, StoredDocument { bytes });

        Ok(ItemResponse {
            item: stored,
            status_code: StatusCode::Created,
            request_charge: REQUEST_CHARGE_PER_CALL,
        })
    }

    fn upsert_item<T: Storable>(
        &self,
        container: &ContainerPath,
        partition_key: &PartitionKey,
        item: &T,
    ) -> Result<ItemResponse<T>, StoreError> {
        if item.id().trim().is_empty() {
            return Err(StoreError::InvalidRequest("blank document id".into()));
        }
        let bytes = Self::encode(item)?;
        let stored: T = Self::decode(&bytes)?;

        let mut state = self
            .databases
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".into()))?;
        let container_state = Self::container_mut(&mut state, container)?;

        let key = (partition_key.as_str().to_string(), item.id().to_string());
        let replaced = container_state
            .documents
            .insert(key, StoredDocument { bytes })
            .is_some();

        Ok(ItemResponse {
            item: stored,
            status_code: if replaced {
                StatusCode::Ok
            } else {
                StatusCode::Created
            },
            request_charge: REQUEST_CHARGE_PER_CALL,
        })
    }

    fn read_item<T: Storable>(
        &self,
        container: &ContainerPath,
        partition_key: &PartitionKey,
        id: &str,
    ) -> Result<ItemResponse<T>, StoreError> {
        let state = self
            .databases
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".into()))?;
        let container_state = Self::container(&state, container)?;

        let key = (partition_key.as_str().to_string(), id.to_string());
        let Some(stored) = container_state.documents.get(&key) else {
            return Err(StoreError::NotFound(format!(
                "document '{}' in partition '{}'",
                id, partition_key
            )));
        };

        Ok(ItemResponse {
            item: Self::decode(&stored.bytes)?,
            status_code: StatusCode::Ok,
            request_charge: REQUEST_CHARGE_PER_CALL,
        })
    }

    fn delete_item<T: Storable>(
        &self,
        container: &ContainerPath,
        partition_key: &PartitionKey,
        id: &str,
    ) -> Result<ItemResponse<T>, StoreError> {
        let mut state = self
            .databases
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".into()))?;
        let container_state = Self::container_mut(&mut state, container)?;

        let key = (partition_key.as_str().to_string(), id.to_string());
        let Some(removed) = container_state.documents.remove(&key) else {
            return Err(StoreError::NotFound(format!(
                "document '{}' in partition '{}'",
                id, partition_key
            )));
        };

        Ok(ItemResponse {
            item: Self::decode(&removed.bytes)?,
            status_code: StatusCode::NoContent,
            request_charge: REQUEST_CHARGE_PER_CALL,
        })
    }

    fn query_page<T: Storable>(
        &self,
        container: &ContainerPath,
        order: &SortOrder<T>,
        page_size: usize,
        resume: Option<&ScanPosition>,
    ) -> Result<PageResponse<T>, StoreError> {
        if page_size == 0 {
            return Err(StoreError::InvalidRequest("zero page size".into()));
        }
        let documents: Vec<(String, T)> = self.snapshot(container)?;

        // Decorate every document with its sort-key tuple and order the
        // whole container; the id-then-partition-key tiebreak keeps the
        // order total even when one id lives in several partitions, so a
        // resume point identifies exactly one row.
        let mut rows: Vec<(Vec<SortValue>, String, String, T)> = documents
            .into_iter()
            .map(|(partition_key, item)| {
                (
                    order.evaluate(&item),
                    item.id().to_string(),
                    partition_key,
                    item,
                )
            })
            .collect();
        rows.sort_by(|a, b| order.compare((&a.0, &a.1, &a.2), (&b.0, &b.1, &b.2)));

        let start = match resume {
            Some(position) => rows
                .iter()
                .position(|(keys, id, partition_key, _)| {
                    order.compare(
                        (keys.as_slice(), id.as_str(), partition_key.as_str()),
                        (
                            position.keys.as_slice(),
                            position.id.as_str(),
                            position.partition_key.as_str(),
                        ),
                    ) == Ordering::Greater
                })
                .unwrap_or(rows.len()),
            None => 0,
        };

        let mut items = Vec::new();
        let mut next = None;
        for (keys, id, partition_key, item) in rows.into_iter().skip(start).take(page_size) {
            next = Some(ScanPosition {
                keys,
                id,
                partition_key,
            });
            items.push(item);
        }

        Ok(PageResponse {
            items,
            next,
            request_charge: REQUEST_CHARGE_PER_CALL,
        })
    }

    fn query_filtered<T: Storable>(
        &self,
        container: &ContainerPath,
        filter: &dyn Fn(&T) -> bool,
        max_items: Option<usize>,
    ) -> Result<QueryResponse<T>, StoreError> {
        let cap = max_items
            .unwrap_or(self.query_page_size)
            .min(self.query_page_size);
        let documents: Vec<(String, T)> = self.snapshot(container)?;

        let mut items = Vec::new();
        for (_, item) in documents {
            if items.len() == cap {
                break;
            }
            if filter(&item) {
                items.push(item);
            }
        }

        Ok(QueryResponse {
            items,
            request_charge: REQUEST_CHARGE_PER_CALL,
        })
    }
}
