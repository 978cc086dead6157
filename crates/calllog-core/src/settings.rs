use clap::{CommandFactory, FromArgMatches, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

// ── Policies ───────────────────────────────────────────────────────────────────

/// What the call-log loader does with a row whose numeric field is not an
/// integer.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegerPolicy {
    /// Fail the whole file.
    #[default]
    Abort,
    /// Drop the row and keep loading.
    Skip,
}

/// Knobs that change how call-log rows are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub on_invalid_integer: IntegerPolicy,
    /// Drop call logs whose `userId` has no matching user.
    pub reject_orphan_calls: bool,
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Load user and call-log CSVs, then write per-user analytics and an ordered call log
#[derive(Parser, Debug, Clone)]
#[command(
    name = "calllog-report",
    about = "Load user and call-log CSVs, then write per-user analytics and an ordered call log",
    version
)]
pub struct Settings {
    /// Users CSV (`firstName,lastName`)
    #[arg(long, default_value = "resources/users.csv")]
    pub users: PathBuf,

    /// Call-log CSV (`phoneNumber,startTime,endTime,direction,userId`)
    #[arg(long, default_value = "resources/callLogs.csv")]
    pub call_logs: PathBuf,

    /// Output path for the per-user analytics report
    #[arg(long, default_value = "resources/userAnalytics.csv")]
    pub analytics_out: PathBuf,

    /// Output path for the ordered call log report
    #[arg(long, default_value = "resources/orderedCalls.csv")]
    pub ordered_out: PathBuf,

    /// What to do with a call-log row whose numeric field is not an integer
    #[arg(long, value_enum, default_value_t = IntegerPolicy::Abort)]
    pub on_invalid_integer: IntegerPolicy,

    /// Skip call logs that reference a user id not present in the users file
    #[arg(long)]
    pub reject_orphan_calls: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// JSON file supplying defaults for any option not given on the command line
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub summary: bool,
}

// ── PipelineFile ───────────────────────────────────────────────────────────────

/// Optional JSON configuration file. Every key is optional; unknown keys are
/// rejected so typos surface instead of being ignored.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct PipelineFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_logs: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics_out: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordered_out: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_invalid_integer: Option<IntegerPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_orphan_calls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl PipelineFile {
    /// Read and parse a configuration file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PipelineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file: Self = serde_json::from_str(&content)?;
        Ok(file)
    }

    /// Write the file as pretty JSON.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| PipelineError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse process arguments and merge the optional `--config` file.
    ///
    /// Exits the process on `--help`, `--version` or a usage error, as clap
    /// does by default.
    pub fn load() -> Result<Self> {
        Self::from_matches(Settings::command().get_matches())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list and
    /// reports usage errors instead of exiting.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Result<Self> {
        let matches = Settings::command()
            .try_get_matches_from(args)
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        Self::from_matches(matches)
    }

    fn from_matches(matches: clap::ArgMatches) -> Result<Self> {
        let mut settings = Settings::from_arg_matches(&matches)
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if let Some(path) = settings.config.clone() {
            let file = PipelineFile::load_from(&path)?;
            settings.merge_file(file, &matches)?;
        }

        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        Ok(settings)
    }

    /// Fill every option the command line left at its default from `file`.
    fn merge_file(&mut self, file: PipelineFile, matches: &clap::ArgMatches) -> Result<()> {
        // clap stores the arg id using the field name (underscores).
        if !is_arg_explicitly_set(matches, "users") {
            if let Some(v) = file.users {
                self.users = v;
            }
        }
        if !is_arg_explicitly_set(matches, "call_logs") {
            if let Some(v) = file.call_logs {
                self.call_logs = v;
            }
        }
        if !is_arg_explicitly_set(matches, "analytics_out") {
            if let Some(v) = file.analytics_out {
                self.analytics_out = v;
            }
        }
        if !is_arg_explicitly_set(matches, "ordered_out") {
            if let Some(v) = file.ordered_out {
                self.ordered_out = v;
            }
        }
        if !is_arg_explicitly_set(matches, "on_invalid_integer") {
            if let Some(v) = file.on_invalid_integer {
                self.on_invalid_integer = v;
            }
        }
        if !is_arg_explicitly_set(matches, "reject_orphan_calls") {
            if let Some(v) = file.reject_orphan_calls {
                self.reject_orphan_calls = v;
            }
        }
        if !is_arg_explicitly_set(matches, "log_level") {
            if let Some(v) = file.log_level {
                let upper = v.to_uppercase();
                if !["DEBUG", "INFO", "WARNING", "ERROR"].contains(&upper.as_str()) {
                    return Err(PipelineError::Config(format!("unknown log_level {v:?}")));
                }
                self.log_level = upper;
            }
        }
        Ok(())
    }

    /// The loader options selected by these settings.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            on_invalid_integer: self.on_invalid_integer,
            reject_orphan_calls: self.reject_orphan_calls,
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
