//! CSV report writers.
//!
//! Each report is first staged in a sibling temp file and only renamed into
//! place on [`StagedReport::commit`], so a failure part-way through never
//! leaves a truncated report behind.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use calllog_core::models::{CallLog, UserAnalytics};
use calllog_core::{PipelineError, Result};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

/// Column names of the analytics report.
pub const ANALYTICS_HEADER: [&str; 3] = ["userId", "avgDuration", "numCalls"];

/// Column names of the ordered-calls report.
pub const ORDERED_CALLS_HEADER: [&str; 6] = [
    "callId",
    "phoneNumber",
    "startTime",
    "endTime",
    "direction",
    "userId",
];

/// Write `header` followed by one CSV record per row to `sink`.
///
/// The header is written even when `rows` is empty.
pub fn write_records<W: Write, T: Serialize>(
    sink: W,
    header: &[&str],
    rows: &[T],
) -> csv::Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(sink);
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Classify a failed report write: I/O failures become
/// [`PipelineError::FileWrite`], anything else [`PipelineError::Csv`].
fn write_failure(path: &Path, source: csv::Error) -> PipelineError {
    if !source.is_io_error() {
        return PipelineError::Csv {
            path: path.to_path_buf(),
            source,
        };
    }
    let source = match source.into_kind() {
        csv::ErrorKind::Io(io) => io,
        other => std::io::Error::other(format!("{other:?}")),
    };
    PipelineError::FileWrite {
        path: path.to_path_buf(),
        source,
    }
}

// ── StagedReport ──────────────────────────────────────────────────────────────

/// A complete report sitting in its temp file, not yet visible at `path`.
///
/// Dropping it without [`commit`](Self::commit) discards the temp file.
#[derive(Debug)]
pub struct StagedReport {
    path: PathBuf,
    tmp: PathBuf,
    rows: usize,
}

impl StagedReport {
    /// Final location of the report.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the temp file onto the final path.
    pub fn commit(self) -> Result<()> {
        std::fs::rename(&self.tmp, &self.path).map_err(|source| PipelineError::FileWrite {
            path: self.path.clone(),
            source,
        })?;
        debug!("Wrote {} rows to {}", self.rows, self.path.display());
        Ok(())
    }
}

impl Drop for StagedReport {
    fn drop(&mut self) {
        // Already gone after a successful rename.
        let _ = std::fs::remove_file(&self.tmp);
    }
}

/// Write a report for `path` into its temp file.
pub fn stage_report<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: &[T],
) -> Result<StagedReport> {
    let staged = StagedReport {
        path: path.to_path_buf(),
        tmp: path.with_extension("csv.tmp"),
        rows: rows.len(),
    };
    let file = File::create(&staged.tmp).map_err(|source| PipelineError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    write_records(file, header, rows).map_err(|e| write_failure(path, e))?;
    Ok(staged)
}

/// Stage the `userId,avgDuration,numCalls` report.
pub fn stage_user_analytics(path: &Path, rows: &[UserAnalytics]) -> Result<StagedReport> {
    stage_report(path, &ANALYTICS_HEADER, rows)
}

/// Stage the `callId,phoneNumber,startTime,endTime,direction,userId` report.
pub fn stage_ordered_calls(path: &Path, rows: &[CallLog]) -> Result<StagedReport> {
    stage_report(path, &ORDERED_CALLS_HEADER, rows)
}
