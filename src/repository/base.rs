//! Safe-call boundary - storage faults become result data, never errors.

use std::time::Instant;

use crate::result::{CollectionResult, SingleResult};
use crate::store::{ItemResponse, StoreError};

/// Runs one single-document store call and captures whatever happens into
/// a result envelope. A fault is downgraded to its message; elapsed time
/// is recorded on the success path only.
pub(crate) fn safe_call_single<T>(
    operation: impl FnOnce() -> Result<ItemResponse<T>, StoreError>,
) -> SingleResult<T> {
    let started = Instant::now();
    match operation() {
        Ok(response) => SingleResult {
            item: Some(response.item),
            status_code: Some(response.status_code),
            error_message: None,
            execution_time: started.elapsed(),
            request_charge: Some(response.request_charge),
        },
        Err(fault) => {
            log::debug!("storage fault captured: {}", fault);
            SingleResult {
                error_message: Some(fault.to_string()),
                ..SingleResult::default()
            }
        }
    }
}

/// Folds per-document envelopes into one collection envelope: surviving
/// items and their statuses in parallel, fault text accumulated, elapsed
/// times and request charges summed.
pub(crate) fn collect_results<T>(results: Vec<SingleResult<T>>) -> CollectionResult<T> {
    let mut collection = CollectionResult::default();
    for result in results {
        collection.execution_time += result.execution_time;
        if let Some(charge) = result.request_charge {
            *collection.request_charge.get_or_insert(0.0) += charge;
        }
        if let Some(message) = result.error_message {
            append_error(&mut collection.error_message, &message);
        }
        if let Some(item) = result.item {
            collection.items.push(item);
            collection.status_codes.push(result.status_code);
        }
    }
    collection.total_count = collection.items.len();
    collection.page_size = collection.items.len();
    collection
}

/// Appends fault text to an accumulator, "; "-separating messages.
pub(crate) fn append_error(slot: &mut Option<String>, message: &str) {
    match slot {
        Some(existing) => {
            existing.push_str("; ");
            existing.push_str(message);
        }
        None => *slot = Some(message.to_string()),
    }
}
