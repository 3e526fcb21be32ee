//! Storables - typed records a repository can persist.
//!
//! A storable record knows its own identity: a unique id within its
//! container, the partition key that addresses it, and the last-update
//! timestamp the repository stamps on every write.
//!
//! ## Example
//!
//! ```ignore
//! use stored_rust::Storable;
//!
//! #[derive(Serialize, Deserialize, Clone, Storable)]
//! struct TodoItem {
//!     pub id: String,
//!     pub task: String,
//!     pub last_update: Option<SystemTime>,
//! }
//!
//! let repo = Repository::connect(store, options)?;
//! let saved = repo.add(item);
//! ```

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

/// Trait for types that can be stored as documents.
pub trait Storable: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Returns the unique identifier for this record within its container.
    fn id(&self) -> &str;

    /// Returns the partition key addressing this record.
    /// Defaults to the canonical string form of the id.
    fn partition_key(&self) -> PartitionKey {
        PartitionKey::derive(self.id())
    }

    /// Returns the stored last-update timestamp, if the record has one.
    fn last_update(&self) -> Option<SystemTime>;

    /// Returns a copy of this record with the last-update timestamp set.
    /// Write operations stamp outgoing records through this; the value
    /// handed to the repository is never mutated in place.
    #[must_use]
    fn with_last_update(self, at: SystemTime) -> Self;
}

/// A partition key in its canonical string form.
///
/// The store addresses every document by partition key and id; keys
/// compare, hash, and serialize as their canonical string.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionKey(String);

impl PartitionKey {
    pub fn new(value: impl Into<String>) -> Self {
        PartitionKey(value.into())
    }

    /// Derives a key from any displayable identifier, using its canonical
    /// string form. This is the fallback when no explicit key is supplied.
    pub fn derive<V: fmt::Display + ?Sized>(id: &V) -> Self {
        PartitionKey(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PartitionKey {
    fn from(value: &str) -> Self {
        PartitionKey::new(value)
    }
}

impl From<String> for PartitionKey {
    fn from(value: String) -> Self {
        PartitionKey::new(value)
    }
}

/// An identifier plus an optional explicit partition key, used to address
/// a document when the record instance itself is not at hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentKey {
    id: String,
    partition_key: Option<PartitionKey>,
}

impl DocumentKey {
    /// A key with no explicit partition key; the partition key derives
    /// from the id.
    pub fn new(id: impl Into<String>) -> Self {
        DocumentKey {
            id: id.into(),
            partition_key: None,
        }
    }

    /// A key with an explicit partition key.
    pub fn with_partition_key(
        id: impl Into<String>,
        partition_key: impl Into<PartitionKey>,
    ) -> Self {
        DocumentKey {
            id: id.into(),
            partition_key: Some(partition_key.into()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn partition_key(&self) -> Option<&PartitionKey> {
        self.partition_key.as_ref()
    }

    /// Resolves the partition key for this document: the explicit key when
    /// set, otherwise the key derived from the id. Blank ids resolve to
    /// nothing, explicit key or not.
    pub(crate) fn resolve(&self) -> Option<PartitionKey> {
        if self.id.trim().is_empty() {
            return None;
        }
        match &self.partition_key {
            Some(key) => Some(key.clone()),
            None => Some(PartitionKey::derive(&self.id)),
        }
    }
}

impl From<&str> for DocumentKey {
    fn from(id: &str) -> Self {
        DocumentKey::new(id)
    }
}

impl From<String> for DocumentKey {
    fn from(id: String) -> Self {
        DocumentKey::new(id)
    }
}
