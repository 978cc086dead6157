//! Per-user call aggregation: average duration and call count.

use std::collections::BTreeMap;

use calllog_core::models::{CallDuration, UserAnalytics};
use calllog_core::Result;

use crate::store::Store;

// ── CallStats ─────────────────────────────────────────────────────────────────

/// Running duration total and call count for one user.
///
/// `total_time` is an `i128`: every duration fits, and so does the sum of up
/// to `2^62` of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallStats {
    pub total_time: i128,
    pub call_count: u64,
}

impl CallStats {
    /// Add one call's duration to the running totals.
    pub fn add(&mut self, duration: i128) {
        self.total_time += duration;
        self.call_count += 1;
    }

    /// `total_time / call_count` as a real number. `None` when no calls were
    /// added.
    pub fn avg_duration(&self) -> Option<f64> {
        if self.call_count == 0 {
            return None;
        }
        Some(self.total_time as f64 / self.call_count as f64)
    }
}

// ── CallAggregator ────────────────────────────────────────────────────────────

/// Stateless helper that groups call durations by owning user.
pub struct CallAggregator;

impl CallAggregator {
    /// Group `calls` by user and compute each user's totals.
    pub fn group_by_user(calls: &[CallDuration]) -> BTreeMap<i64, CallStats> {
        let mut map: BTreeMap<i64, CallStats> = BTreeMap::new();
        for call in calls {
            map.entry(call.user_id).or_default().add(call.duration());
        }
        map
    }

    /// One analytics row per user with at least one call, ascending by
    /// `user_id`.
    pub fn aggregate(calls: &[CallDuration]) -> Vec<UserAnalytics> {
        Self::group_by_user(calls)
            .into_iter()
            .filter_map(|(user_id, stats)| {
                stats.avg_duration().map(|avg_duration| UserAnalytics {
                    user_id,
                    avg_duration,
                    num_calls: stats.call_count,
                })
            })
            .collect()
    }
}

/// Aggregate every call log currently in `store`.
pub fn user_analytics(store: &Store) -> Result<Vec<UserAnalytics>> {
    let calls = store.call_durations()?;
    Ok(CallAggregator::aggregate(&calls))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
