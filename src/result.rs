//! Result envelopes - items, diagnostics, and cost for every store call.
//!
//! Every operation that reaches the store reports back through one of
//! these envelopes. A storage fault never escapes as an error: the
//! envelope carries the fault text instead, alongside whatever items,
//! status, timing, and request cost the call produced.

use std::time::Duration;

use crate::store::StatusCode;

/// Result envelope for operations on a single record.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleResult<T> {
    /// The affected record, present only when the call succeeded and
    /// produced one.
    pub item: Option<T>,
    /// Status reported by the store on success.
    pub status_code: Option<StatusCode>,
    /// Fault text captured from a failed call.
    pub error_message: Option<String>,
    /// Elapsed wall-clock time of the store call. Stays zero on faults;
    /// only the fault's message is captured.
    pub execution_time: Duration,
    /// Request cost charged by the store, in request units.
    pub request_charge: Option<f64>,
}

impl<T> SingleResult<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no fault was captured.
    pub fn is_ok(&self) -> bool {
        self.error_message.is_none()
    }
}

impl<T> Default for SingleResult<T> {
    fn default() -> Self {
        SingleResult {
            item: None,
            status_code: None,
            error_message: None,
            execution_time: Duration::ZERO,
            request_charge: None,
        }
    }
}

/// Result envelope for operations on a set of records.
///
/// `status_codes` runs parallel to `items` when the envelope was folded
/// from per-item results; search results leave it empty. `total_count`
/// always equals the number of items carried.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionResult<T> {
    pub items: Vec<T>,
    pub status_codes: Vec<Option<StatusCode>>,
    /// Accumulated fault text from failed calls, "; "-separated.
    pub error_message: Option<String>,
    /// Summed elapsed time across the underlying calls.
    pub execution_time: Duration,
    /// Summed request cost across the underlying calls.
    pub request_charge: Option<f64>,
    pub total_count: usize,
    pub page_size: usize,
    pub page_index: usize,
}

impl<T> CollectionResult<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no fault was captured.
    pub fn is_ok(&self) -> bool {
        self.error_message.is_none()
    }
}

impl<T> Default for CollectionResult<T> {
    fn default() -> Self {
        CollectionResult {
            items: Vec::new(),
            status_codes: Vec::new(),
            error_message: None,
            execution_time: Duration::ZERO,
            request_charge: None,
            total_count: 0,
            page_size: 0,
            page_index: 0,
        }
    }
}

/// Result envelope for one page of a sorted scan.
///
/// A non-empty page always carries a continuation token; passing it back
/// fetches the next page. Scan exhaustion is not represented here: an
/// empty page never reaches the caller as a result.
#[derive(Clone, Debug, PartialEq)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    /// Opaque resume token for the next page.
    pub continuation_token: Option<String>,
    /// Fault text captured from a failed page fetch.
    pub error_message: Option<String>,
    /// Elapsed wall-clock time of the page fetch. Stays zero on faults.
    pub execution_time: Duration,
    /// Request cost charged for the page fetch, in request units.
    pub request_charge: Option<f64>,
}

impl<T> PaginatedResult<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no fault was captured.
    pub fn is_ok(&self) -> bool {
        self.error_message.is_none()
    }
}

impl<T> Default for PaginatedResult<T> {
    fn default() -> Self {
        PaginatedResult {
            items: Vec::new(),
            continuation_token: None,
            error_message: None,
            execution_time: Duration::ZERO,
            request_charge: None,
        }
    }
}
