//! End-to-end pipeline: load both CSVs, derive both reports, write them.
//!
//! Both reports are fully staged before either is renamed into place, so a
//! fatal error while loading, deriving or writing leaves no partial output
//! behind. Only a failure of the final rename itself can leave one report
//! updated and the other not.

use std::path::PathBuf;
use std::time::Instant;

use calllog_core::settings::{LoadOptions, Settings};
use calllog_core::Result;
use calllog_data::aggregator::user_analytics;
use calllog_data::loader::{load_call_logs, load_users, LoadReport};
use calllog_data::orderer::ordered_calls;
use calllog_data::report::{stage_ordered_calls, stage_user_analytics};
use calllog_data::store::Store;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

// ── Public types ──────────────────────────────────────────────────────────────

/// Input and output locations plus loader options for one run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub users_csv: PathBuf,
    pub call_logs_csv: PathBuf,
    pub analytics_csv: PathBuf,
    pub ordered_calls_csv: PathBuf,
    pub options: LoadOptions,
}

impl From<&Settings> for PipelineConfig {
    fn from(s: &Settings) -> Self {
        Self {
            users_csv: s.users.clone(),
            call_logs_csv: s.call_logs.clone(),
            analytics_csv: s.analytics_out.clone(),
            ordered_calls_csv: s.ordered_out.clone(),
            options: s.load_options(),
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    /// ISO-8601 timestamp when the run finished.
    pub generated_at: String,
    pub users: LoadReport,
    pub call_logs: LoadReport,
    /// Data rows in the analytics report.
    pub analytics_rows: usize,
    /// Data rows in the ordered-calls report.
    pub ordered_rows: usize,
    /// Wall-clock seconds spent loading both CSVs.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent aggregating and ordering.
    pub derive_time_seconds: f64,
    /// Wall-clock seconds spent writing both reports.
    pub write_time_seconds: f64,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline.
///
/// 1. Open an in-memory store and create the schema.
/// 2. Load users, then call logs.
/// 3. Aggregate per-user analytics and order the call log.
/// 4. Stage both reports, then commit them.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineSummary> {
    // ── Step 1: Store ─────────────────────────────────────────────────────────
    let mut store = Store::open_in_memory()?;

    // ── Step 2: Load ──────────────────────────────────────────────────────────
    let load_start = Instant::now();
    let users = load_users(&config.users_csv, &mut store)?;
    let call_logs = load_call_logs(&config.call_logs_csv, &mut store, &config.options)?;
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 3: Derive ────────────────────────────────────────────────────────
    let derive_start = Instant::now();
    let analytics = user_analytics(&store)?;
    let ordered = ordered_calls(&store)?;
    let derive_time = derive_start.elapsed().as_secs_f64();

    // ── Step 4: Write ─────────────────────────────────────────────────────────
    let write_start = Instant::now();
    let analytics_report = stage_user_analytics(&config.analytics_csv, &analytics)?;
    let ordered_report = stage_ordered_calls(&config.ordered_calls_csv, &ordered)?;
    analytics_report.commit()?;
    ordered_report.commit()?;
    let write_time = write_start.elapsed().as_secs_f64();

    info!(
        "Wrote {} analytics rows to {} and {} ordered calls to {}",
        analytics.len(),
        config.analytics_csv.display(),
        ordered.len(),
        config.ordered_calls_csv.display()
    );

    Ok(PipelineSummary {
        generated_at: Utc::now().to_rfc3339(),
        users,
        call_logs,
        analytics_rows: analytics.len(),
        ordered_rows: ordered.len(),
        load_time_seconds: load_time,
        derive_time_seconds: derive_time,
        write_time_seconds: write_time,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
