use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors produced by the call-log pipeline.
///
/// Per-row validation failures are not errors; see
/// [`crate::validation::Rejection`].
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report file could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV stream itself is malformed (bad quoting, invalid UTF-8, ...).
    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A numeric call-log field did not parse as an integer.
    #[error("Invalid integer for {field} in {path} at line {line}: {value:?}")]
    IntegerParse {
        path: PathBuf,
        line: u64,
        field: &'static str,
        value: String,
    },

    /// The storage engine rejected an operation.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be parsed or produced.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the call-log crates.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = PipelineError::FileRead {
            path: PathBuf::from("/some/users.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/users.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_file_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = PipelineError::FileWrite {
            path: PathBuf::from("/out/orderedCalls.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to write file /out/orderedCalls.csv"));
    }

    #[test]
    fn test_error_display_integer_parse() {
        let err = PipelineError::IntegerParse {
            path: PathBuf::from("calls.csv"),
            line: 4,
            field: "startTime",
            value: "noon".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid integer for startTime in calls.csv at line 4: \"noon\""
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = PipelineError::Config("unknown policy".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown policy");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PipelineError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: PipelineError = json_err.into();
        assert!(err.to_string().contains("Failed to process JSON"));
    }

    /// Names every variant; no wildcard arm.
    fn kind(err: &PipelineError) -> &'static str {
        match err {
            PipelineError::FileRead { .. } => "file-read",
            PipelineError::FileWrite { .. } => "file-write",
            PipelineError::Csv { .. } => "csv",
            PipelineError::IntegerParse { .. } => "integer-parse",
            PipelineError::Storage(_) => "storage",
            PipelineError::Config(_) => "config",
            PipelineError::Json(_) => "json",
            PipelineError::Io(_) => "io",
        }
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(kind(&PipelineError::Config(String::new())), "config");
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "x");
        assert_eq!(kind(&io_err.into()), "io");
    }

    #[test]
    fn test_error_from_rusqlite() {
        let err: PipelineError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(err.to_string().starts_with("Storage error:"));
    }
}
