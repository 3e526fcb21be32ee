//! Repository - typed CRUD, search, and pagination over one container.
//!
//! A repository binds one record type to one container of a document
//! store. Construction ensures the database and container exist; the
//! operations stamp, write, read, and scan records, reporting back
//! through result envelopes that carry fault text instead of raising it.
//!
//! ## Example
//!
//! ```ignore
//! use stored_rust::{InMemoryStore, Repository, RepositoryOptions, SearchRequest, Storable};
//!
//! #[derive(Serialize, Deserialize, Clone, Storable)]
//! struct TodoItem {
//!     pub id: String,
//!     pub task: String,
//!     pub last_update: Option<SystemTime>,
//! }
//!
//! let store = InMemoryStore::new();
//! let repo: Repository<_, TodoItem> =
//!     Repository::connect(store, RepositoryOptions::new("todos-db", "todos"))?;
//!
//! let added = repo.add(item);
//! let found = repo.find(&SearchRequest::matching(|t: &TodoItem| t.task.contains("milk")));
//! ```

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::time::{Instant, SystemTime};

use crate::cursor::ContinuationToken;
use crate::outcome::Outcome;
use crate::result::{CollectionResult, PaginatedResult, SingleResult};
use crate::search::{PageRequest, SearchRequest};
use crate::sort::{SortKey, SortOrder};
use crate::storable::{DocumentKey, PartitionKey, Storable};
use crate::store::{ContainerPath, DocumentStore, Throughput};

use super::base::{append_error, collect_results, safe_call_single};
use super::error::RepositoryError;

/// Construction parameters for a repository.
pub struct RepositoryOptions {
    database: String,
    container: String,
    partition_key_path: String,
    throughput: Option<Throughput>,
}

impl RepositoryOptions {
    /// Options for the given database and container, with the partition
    /// key at the `/id` path and no provisioned throughput.
    pub fn new(database: impl Into<String>, container: impl Into<String>) -> Self {
        RepositoryOptions {
            database: database.into(),
            container: container.into(),
            partition_key_path: "/id".to_string(),
            throughput: None,
        }
    }

    /// Path of the document property holding the partition key.
    pub fn partition_key_path(mut self, path: impl Into<String>) -> Self {
        self.partition_key_path = path.into();
        self
    }

    /// Throughput to provision when the database is created.
    pub fn throughput(mut self, throughput: Throughput) -> Self {
        self.throughput = Some(throughput);
        self
    }

    fn validate(&self) -> Result<(), RepositoryError> {
        if self.database.trim().is_empty() {
            return Err(RepositoryError::Configuration(
                "database name must not be blank".to_string(),
            ));
        }
        if self.container.trim().is_empty() {
            return Err(RepositoryError::Configuration(
                "container id must not be blank".to_string(),
            ));
        }
        if !self.partition_key_path.starts_with('/') {
            return Err(RepositoryError::Configuration(format!(
                "partition key path '{}' must start with '/'",
                self.partition_key_path
            )));
        }
        Ok(())
    }
}

/// Typed repository over one container of a document store.
///
/// Write operations stamp a fresh last-update timestamp onto a copy of
/// the record before it goes out. Operations that reach the store report
/// through result envelopes; operations that cannot even be attempted
/// report [`Outcome::PreconditionFailed`] or [`Outcome::NotApplicable`]
/// without touching the store.
pub struct Repository<S, T> {
    store: S,
    path: ContainerPath,
    _record: PhantomData<T>,
}

impl<S: DocumentStore, T: Storable> Repository<S, T> {
    /// Opens the database and container, creating either if missing, and
    /// binds this repository to them.
    pub fn connect(store: S, options: RepositoryOptions) -> Result<Self, RepositoryError> {
        options.validate()?;
        store.ensure_database(&options.database, options.throughput)?;
        store.ensure_container(
            &options.database,
            &options.container,
            &options.partition_key_path,
        )?;
        let path = ContainerPath::new(options.database, options.container);
        log::debug!("repository bound to {}", path);
        Ok(Repository {
            store,
            path,
            _record: PhantomData,
        })
    }

    /// Name of the bound database.
    pub fn database_name(&self) -> &str {
        &self.path.database
    }

    /// Id of the bound container.
    pub fn container_id(&self) -> &str {
        &self.path.container
    }

    /// The underlying store handle.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Releases the store handle. Consuming the repository makes
    /// use-after-teardown unrepresentable.
    pub fn close(self) -> S {
        self.store
    }

    /// Stamps the record and writes it as a new document. A duplicate id
    /// comes back as fault text in the envelope.
    pub fn add(&self, item: T) -> SingleResult<T> {
        let stamped = item.with_last_update(SystemTime::now());
        let partition_key = stamped.partition_key();
        safe_call_single(|| self.store.create_item(&self.path, &partition_key, &stamped))
    }

    /// Stamps the record and writes it, replacing any existing document
    /// with the same id.
    pub fn add_or_update(&self, item: T) -> SingleResult<T> {
        let stamped = item.with_last_update(SystemTime::now());
        let partition_key = stamped.partition_key();
        safe_call_single(|| self.store.upsert_item(&self.path, &partition_key, &stamped))
    }

    /// Writes a batch of new documents, one per entry, each under its
    /// given partition key. Writes run in key order and do not stop on
    /// individual faults; the folded envelope carries the survivors and
    /// the accumulated fault text.
    pub fn add_range(&self, items: BTreeMap<PartitionKey, T>) -> Outcome<CollectionResult<T>> {
        if items.is_empty() {
            return Outcome::NotApplicable;
        }
        let mut results = Vec::with_capacity(items.len());
        for (partition_key, item) in items {
            let stamped = item.with_last_update(SystemTime::now());
            results.push(safe_call_single(|| {
                self.store.create_item(&self.path, &partition_key, &stamped)
            }));
        }
        Outcome::Completed(collect_results(results))
    }

    /// Point-reads the document addressed by the key. A blank id resolves
    /// no partition key, so the read is refused before touching the store.
    pub fn get(&self, key: &DocumentKey) -> Outcome<SingleResult<T>> {
        let Some(partition_key) = key.resolve() else {
            return Outcome::PreconditionFailed(unresolvable(key));
        };
        Outcome::Completed(safe_call_single(|| {
            self.store.read_item(&self.path, &partition_key, key.id())
        }))
    }

    /// Deletes the document addressed by the key, returning it as stored.
    pub fn remove(&self, key: &DocumentKey) -> Outcome<SingleResult<T>> {
        let Some(partition_key) = key.resolve() else {
            return Outcome::PreconditionFailed(unresolvable(key));
        };
        Outcome::Completed(safe_call_single(|| {
            self.store.delete_item(&self.path, &partition_key, key.id())
        }))
    }

    /// Deletes a batch of documents. Deletes run in order and do not stop
    /// on individual faults; unresolvable keys contribute their refusal
    /// reason to the folded envelope's fault text.
    pub fn remove_range(&self, keys: &[DocumentKey]) -> Outcome<CollectionResult<T>> {
        if keys.is_empty() {
            return Outcome::NotApplicable;
        }
        let mut results = Vec::with_capacity(keys.len());
        let mut refusals = Vec::new();
        for key in keys {
            match self.remove(key) {
                Outcome::Completed(result) => results.push(result),
                Outcome::PreconditionFailed(reason) => refusals.push(reason),
                Outcome::NotApplicable => {}
            }
        }
        let mut collection = collect_results(results);
        for reason in refusals {
            append_error(&mut collection.error_message, &reason);
        }
        Outcome::Completed(collection)
    }

    /// Returns the records matching the request's predicate, up to the
    /// store's page bound. A request without a predicate has nothing to
    /// search for and is reported as not applicable.
    pub fn find(&self, request: &SearchRequest<T>) -> Outcome<CollectionResult<T>> {
        let Some(filter) = request.filter() else {
            return Outcome::NotApplicable;
        };
        let started = Instant::now();
        match self.store.query_filtered(&self.path, filter, None) {
            Ok(response) => {
                let count = response.items.len();
                Outcome::Completed(CollectionResult {
                    items: response.items,
                    total_count: count,
                    page_size: count,
                    request_charge: Some(response.request_charge),
                    execution_time: started.elapsed(),
                    ..CollectionResult::default()
                })
            }
            Err(fault) => {
                log::debug!("storage fault captured: {}", fault);
                Outcome::Completed(CollectionResult {
                    error_message: Some(fault.to_string()),
                    ..CollectionResult::default()
                })
            }
        }
    }

    /// Returns the first record matching the request's predicate. No
    /// match is still a completed outcome, with an empty envelope.
    pub fn find_one(&self, request: &SearchRequest<T>) -> Outcome<SingleResult<T>> {
        let Some(filter) = request.filter() else {
            return Outcome::NotApplicable;
        };
        let started = Instant::now();
        match self.store.query_filtered(&self.path, filter, Some(1)) {
            Ok(response) => Outcome::Completed(SingleResult {
                item: response.items.into_iter().next(),
                request_charge: Some(response.request_charge),
                execution_time: started.elapsed(),
                ..SingleResult::default()
            }),
            Err(fault) => {
                log::debug!("storage fault captured: {}", fault);
                Outcome::Completed(SingleResult {
                    error_message: Some(fault.to_string()),
                    ..SingleResult::default()
                })
            }
        }
    }

    /// Fetches one page of the container in the requested sort order.
    ///
    /// A zero page size, a malformed token, or a token minted under a
    /// different sort order is refused before touching the store. An
    /// exhausted scan reports [`Outcome::NotApplicable`]; every returned
    /// page carries the token for the next one.
    pub fn get_paginated(&self, request: PageRequest<T>) -> Outcome<PaginatedResult<T>> {
        let (page_size, token, descending, mut keys) = request.into_parts();
        if page_size == 0 {
            return Outcome::PreconditionFailed(
                "page size must be greater than zero".to_string(),
            );
        }
        if keys.is_empty() {
            keys.push(SortKey::last_update());
        }
        let order = SortOrder::new(keys, descending);

        let resume = match token {
            None => None,
            Some(encoded) => match ContinuationToken::decode(&encoded) {
                Ok(decoded) => {
                    if decoded.descending() != order.is_descending()
                        || decoded.key_count() != order.key_count()
                    {
                        return Outcome::PreconditionFailed(
                            "continuation token does not match the requested sort order"
                                .to_string(),
                        );
                    }
                    Some(decoded.into_position())
                }
                Err(err) => {
                    return Outcome::PreconditionFailed(format!(
                        "invalid continuation token: {}",
                        err
                    ))
                }
            },
        };

        let started = Instant::now();
        match self
            .store
            .query_page(&self.path, &order, page_size, resume.as_ref())
        {
            Ok(page) if page.items.is_empty() => Outcome::NotApplicable,
            Ok(page) => {
                let mut error_message = None;
                let continuation_token = match page.next {
                    Some(position) => {
                        let token = ContinuationToken::new(
                            order.is_descending(),
                            order.key_count(),
                            position,
                        );
                        match token.encode() {
                            Ok(encoded) => Some(encoded),
                            Err(err) => {
                                append_error(
                                    &mut error_message,
                                    &format!("continuation token encode failed: {}", err),
                                );
                                None
                            }
                        }
                    }
                    None => None,
                };
                Outcome::Completed(PaginatedResult {
                    items: page.items,
                    continuation_token,
                    error_message,
                    execution_time: started.elapsed(),
                    request_charge: Some(page.request_charge),
                })
            }
            Err(fault) => {
                log::debug!("storage fault captured: {}", fault);
                Outcome::Completed(PaginatedResult {
                    error_message: Some(fault.to_string()),
                    ..PaginatedResult::default()
                })
            }
        }
    }
}

fn unresolvable(key: &DocumentKey) -> String {
    format!("no partition key resolvable for id '{}'", key.id())
}
