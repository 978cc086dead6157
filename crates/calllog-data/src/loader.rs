//! CSV loading for users and call logs.
//!
//! Reads a CSV file, skips its header row, validates every remaining record
//! and bulk-inserts the accepted ones into the [`Store`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calllog_core::models::{NewCallLog, NewUser};
use calllog_core::settings::{IntegerPolicy, LoadOptions};
use calllog_core::validation::{CsvRecord, RowError};
use calllog_core::{PipelineError, Result};
use csv::ReaderBuilder;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::store::Store;

// ── Public types ──────────────────────────────────────────────────────────────

/// Row counts for one loaded file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Data records read (header excluded).
    pub read: u64,
    /// Records inserted into storage.
    pub accepted: u64,
    /// Records dropped for shape, empty fields or (under
    /// [`IntegerPolicy::Skip`]) bad integers.
    pub rejected: u64,
    /// Call logs dropped because their user does not exist.
    pub orphaned: u64,
}

/// Validated records from one file, in input order.
#[derive(Debug, Clone)]
pub struct LoadedRecords<T> {
    pub records: Vec<T>,
    pub report: LoadReport,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read `path`, skip its header and validate every record as a `T`.
///
/// Malformed rows are counted and skipped. A non-integer numeric field fails
/// the whole file under [`IntegerPolicy::Abort`] and is skipped under
/// [`IntegerPolicy::Skip`].
pub fn read_records<T: CsvRecord>(path: &Path, policy: IntegerPolicy) -> Result<LoadedRecords<T>> {
    let file = File::open(path).map_err(|source| PipelineError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let csv_error = |source: csv::Error| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if reader.headers().map_err(csv_error)?.is_empty() {
        warn!("No header row in {}; nothing to load", path.display());
    }

    let mut records: Vec<T> = Vec::new();
    let mut report = LoadReport::default();

    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        report.read += 1;

        match T::from_raw(record.iter()) {
            Ok(parsed) => {
                records.push(parsed);
                report.accepted += 1;
            }
            Err(RowError::Rejected(reason)) => {
                debug!(
                    "Rejected {} row at {}:{}: {}",
                    T::KIND,
                    path.display(),
                    line,
                    reason
                );
                report.rejected += 1;
            }
            Err(RowError::InvalidInteger { field, value }) => match policy {
                IntegerPolicy::Abort => {
                    return Err(PipelineError::IntegerParse {
                        path: path.to_path_buf(),
                        line,
                        field,
                        value,
                    });
                }
                IntegerPolicy::Skip => {
                    warn!(
                        "Skipping {} row at {}:{}: {} is not an integer ({:?})",
                        T::KIND,
                        path.display(),
                        line,
                        field,
                        value
                    );
                    report.rejected += 1;
                }
            },
        }
    }

    debug!(
        "File {}: {} read, {} accepted, {} rejected",
        path.display(),
        report.read,
        report.accepted,
        report.rejected,
    );

    Ok(LoadedRecords { records, report })
}

/// Load the users CSV at `path` into `store`.
pub fn load_users(path: &Path, store: &mut Store) -> Result<LoadReport> {
    let LoadedRecords { records, report } = read_records::<NewUser>(path, IntegerPolicy::Abort)?;
    store.insert_users(&records)?;
    info!(
        "Loaded {} users from {} ({} rejected)",
        report.accepted,
        path.display(),
        report.rejected
    );
    Ok(report)
}

/// Load the call-log CSV at `path` into `store`.
///
/// With `options.reject_orphan_calls` set, rows whose `userId` is not already
/// in the users table are dropped, so users must be loaded first.
pub fn load_call_logs(path: &Path, store: &mut Store, options: &LoadOptions) -> Result<LoadReport> {
    let LoadedRecords {
        mut records,
        mut report,
    } = read_records::<NewCallLog>(path, options.on_invalid_integer)?;

    if options.reject_orphan_calls {
        let known = store.user_ids()?;
        let before = records.len();
        records.retain(|call| {
            let keep = known.contains(&call.user_id);
            if !keep {
                warn!(
                    "Skipping call log for unknown user {} ({})",
                    call.user_id, call.phone_number
                );
            }
            keep
        });
        let orphaned = (before - records.len()) as u64;
        report.orphaned = orphaned;
        report.accepted -= orphaned;
    }

    store.insert_call_logs(&records)?;
    info!(
        "Loaded {} call logs from {} ({} rejected, {} orphaned)",
        report.accepted,
        path.display(),
        report.rejected,
        report.orphaned
    );
    Ok(report)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
