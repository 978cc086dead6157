//! Total ordering of call logs by owning user, then start time.

use calllog_core::models::CallLog;
use calllog_core::Result;

use crate::store::Store;

/// Stable sort by `(user_id, start_time)`.
///
/// Calls sharing both keys keep the order they arrived in.
pub fn order_calls(mut calls: Vec<CallLog>) -> Vec<CallLog> {
    calls.sort_by_key(|c| (c.user_id, c.start_time));
    calls
}

/// Every stored call log, ordered by [`order_calls`].
///
/// Rows are retrieved in identity order, so ties fall back to `call_id`.
pub fn ordered_calls(store: &Store) -> Result<Vec<CallLog>> {
    Ok(order_calls(store.call_logs()?))
}
