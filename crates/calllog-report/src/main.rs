mod bootstrap;

use anyhow::{Context, Result};
use calllog_core::settings::Settings;
use calllog_runtime::pipeline::{run_pipeline, PipelineConfig};

fn main() -> Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("calllog-report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Users: {}, Call logs: {}, Invalid integers: {:?}, Reject orphans: {}",
        settings.users.display(),
        settings.call_logs.display(),
        settings.on_invalid_integer,
        settings.reject_orphan_calls
    );

    bootstrap::ensure_output_dirs(&[
        settings.analytics_out.as_path(),
        settings.ordered_out.as_path(),
    ])?;

    let config = PipelineConfig::from(&settings);
    let summary = run_pipeline(&config).with_context(|| {
        format!(
            "Pipeline failed (reports: {}, {})",
            config.analytics_csv.display(),
            config.ordered_calls_csv.display()
        )
    })?;

    tracing::info!(
        "Done: {} users, {} call logs, {} analytics rows",
        summary.users.accepted,
        summary.call_logs.accepted,
        summary.analytics_rows
    );

    if settings.summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
