//! Search and page requests - the inputs to find, find_one, and
//! get_paginated.

use crate::sort::SortKey;

/// A search request: an optional boolean predicate over records.
///
/// A request without a predicate has nothing to search for; find and
/// find_one report it as not applicable rather than matching everything.
pub struct SearchRequest<T> {
    filter: Option<Box<dyn Fn(&T) -> bool + Send + Sync>>,
}

impl<T> SearchRequest<T> {
    /// A request with no predicate.
    pub fn new() -> Self {
        SearchRequest { filter: None }
    }

    /// A request matching records that satisfy the predicate.
    pub fn matching(filter: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        SearchRequest {
            filter: Some(Box::new(filter)),
        }
    }

    pub fn filter(&self) -> Option<&(dyn Fn(&T) -> bool + Send + Sync)> {
        self.filter.as_deref()
    }
}

impl<T> Default for SearchRequest<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Inputs for one page fetch of a sorted scan: page size, optional resume
/// token, scan direction, and sort keys.
///
/// ## Example
///
/// ```ignore
/// let request = PageRequest::new(25)
///     .descending()
///     .sort_by(SortKey::by(|item: &TodoItem| item.priority))
///     .continue_from(previous.continuation_token.clone());
/// ```
pub struct PageRequest<T> {
    page_size: usize,
    continuation_token: Option<String>,
    descending: bool,
    sort_keys: Vec<SortKey<T>>,
}

impl<T> PageRequest<T> {
    /// A first-page request: ascending, default sort order.
    pub fn new(page_size: usize) -> Self {
        PageRequest {
            page_size,
            continuation_token: None,
            descending: false,
            sort_keys: Vec::new(),
        }
    }

    /// Resumes the scan after a previously returned continuation token.
    pub fn continue_from(mut self, token: Option<String>) -> Self {
        self.continuation_token = token;
        self
    }

    /// Scans in descending order.
    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    /// Appends a sort key. Keys apply in the order added; a request with
    /// no keys sorts by the stamped last-update timestamp.
    pub fn sort_by(mut self, key: SortKey<T>) -> Self {
        self.sort_keys.push(key);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn continuation_token(&self) -> Option<&str> {
        self.continuation_token.as_deref()
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    pub(crate) fn into_parts(self) -> (usize, Option<String>, bool, Vec<SortKey<T>>) {
        (
            self.page_size,
            self.continuation_token,
            self.descending,
            self.sort_keys,
        )
    }
}
