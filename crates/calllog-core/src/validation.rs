//! Row validation: turns raw CSV fields into typed records.
//!
//! A row is either accepted as a [`NewUser`] / [`NewCallLog`], rejected as
//! malformed ([`Rejection`]), or flagged as carrying a non-integer value in a
//! numeric column ([`RowError::InvalidInteger`]). What happens to each outcome
//! is the loader's decision, not this module's.

use thiserror::Error;

use crate::models::{NewCallLog, NewUser};

// ── Rejection ─────────────────────────────────────────────────────────────────

/// Why a row was dropped before reaching storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("expected {expected} fields, found {found}")]
    Arity { expected: usize, found: usize },

    #[error("field {index} is empty")]
    EmptyField { index: usize },
}

/// Outcome of converting a cleaned row into a typed record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("{field} is not an integer: {value:?}")]
    InvalidInteger { field: &'static str, value: String },
}

// ── clean_fields ──────────────────────────────────────────────────────────────

/// Trim every field and check the row shape.
///
/// Returns the trimmed fields when there are exactly `arity` of them and none
/// is empty after trimming.
pub fn clean_fields<'a, I>(fields: I, arity: usize) -> Result<Vec<String>, Rejection>
where
    I: IntoIterator<Item = &'a str>,
{
    let cleaned: Vec<String> = fields.into_iter().map(|f| f.trim().to_string()).collect();

    if cleaned.len() != arity {
        return Err(Rejection::Arity {
            expected: arity,
            found: cleaned.len(),
        });
    }

    if let Some(index) = cleaned.iter().position(|f| f.is_empty()) {
        return Err(Rejection::EmptyField { index });
    }

    Ok(cleaned)
}

// ── CsvRecord ─────────────────────────────────────────────────────────────────

/// A record type that can be built from one validated CSV row.
pub trait CsvRecord: Sized {
    /// Exact number of fields a row must carry.
    const ARITY: usize;
    /// Short name used in log lines (`"user"`, `"call log"`).
    const KIND: &'static str;

    /// Build the record from fields already trimmed and arity-checked.
    fn from_fields(fields: Vec<String>) -> Result<Self, RowError>;

    /// Validate a raw row and build the record in one step.
    fn from_raw<'a, I>(fields: I) -> Result<Self, RowError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let cleaned = clean_fields(fields, Self::ARITY)?;
        Self::from_fields(cleaned)
    }
}

impl CsvRecord for NewUser {
    const ARITY: usize = 2;
    const KIND: &'static str = "user";

    fn from_fields(fields: Vec<String>) -> Result<Self, RowError> {
        let [first_name, last_name]: [String; 2] = fields.try_into().map_err(|v: Vec<String>| {
            Rejection::Arity {
                expected: Self::ARITY,
                found: v.len(),
            }
        })?;
        Ok(Self {
            first_name,
            last_name,
        })
    }
}

impl CsvRecord for NewCallLog {
    const ARITY: usize = 5;
    const KIND: &'static str = "call log";

    fn from_fields(fields: Vec<String>) -> Result<Self, RowError> {
        let [phone_number, start, end, direction, user]: [String; 5] =
            fields.try_into().map_err(|v: Vec<String>| Rejection::Arity {
                expected: Self::ARITY,
                found: v.len(),
            })?;

        Ok(Self {
            phone_number,
            start_time: parse_integer("startTime", &start)?,
            end_time: parse_integer("endTime", &end)?,
            direction,
            user_id: parse_integer("userId", &user)?,
        })
    }
}

fn parse_integer(field: &'static str, value: &str) -> Result<i64, RowError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| RowError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── clean_fields ─────────────────────────────────────────────────────────

    #[test]
    fn test_clean_fields_trims_whitespace() {
        let cleaned = clean_fields(["  Alice ", "\tSmith"], 2).unwrap();
        assert_eq!(cleaned, vec!["Alice", "Smith"]);
    }

    #[test]
    fn test_clean_fields_rejects_short_row() {
        let err = clean_fields(["Alice"], 2).unwrap_err();
        assert_eq!(
            err,
            Rejection::Arity {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_clean_fields_rejects_long_row() {
        let err = clean_fields(["Alice", "Smith", "extra"], 2).unwrap_err();
        assert!(matches!(err, Rejection::Arity { found: 3, .. }));
    }

    #[test]
    fn test_clean_fields_rejects_blank_field() {
        let err = clean_fields(["Alice", "   "], 2).unwrap_err();
        assert_eq!(err, Rejection::EmptyField { index: 1 });
    }

    #[test]
    fn test_clean_fields_reports_first_empty_index() {
        let err = clean_fields(["", "x", ""], 3).unwrap_err();
        assert_eq!(err, Rejection::EmptyField { index: 0 });
    }

    // ── NewUser ──────────────────────────────────────────────────────────────

    #[test]
    fn test_user_from_raw_accepts_clean_row() {
        let user = NewUser::from_raw([" Bob ", "Jones "]).unwrap();
        assert_eq!(user.first_name, "Bob");
        assert_eq!(user.last_name, "Jones");
    }

    #[test]
    fn test_user_from_raw_rejects_empty_first_name() {
        let err = NewUser::from_raw(["", "Doe"]).unwrap_err();
        assert_eq!(err, RowError::Rejected(Rejection::EmptyField { index: 0 }));
    }

    // ── NewCallLog ───────────────────────────────────────────────────────────

    #[test]
    fn test_call_log_from_raw_parses_integers() {
        let call =
            NewCallLog::from_raw(["555-0100", " 100 ", "200", " incoming ", "3"]).unwrap();
        assert_eq!(call.phone_number, "555-0100");
        assert_eq!(call.start_time, 100);
        assert_eq!(call.end_time, 200);
        assert_eq!(call.direction, "incoming");
        assert_eq!(call.user_id, 3);
    }

    #[test]
    fn test_call_log_from_raw_flags_non_integer_start() {
        let err = NewCallLog::from_raw(["555-0100", "noon", "200", "incoming", "3"]).unwrap_err();
        assert_eq!(
            err,
            RowError::InvalidInteger {
                field: "startTime",
                value: "noon".to_string()
            }
        );
    }

    #[test]
    fn test_call_log_from_raw_flags_non_integer_user() {
        let err = NewCallLog::from_raw(["555-0100", "1", "2", "incoming", "1.5"]).unwrap_err();
        assert!(matches!(
            err,
            RowError::InvalidInteger {
                field: "userId",
                ..
            }
        ));
    }

    #[test]
    fn test_call_log_shape_checked_before_integers() {
        // An empty numeric field is a rejection, not a parse failure.
        let err = NewCallLog::from_raw(["555-0100", "", "200", "incoming", "3"]).unwrap_err();
        assert_eq!(err, RowError::Rejected(Rejection::EmptyField { index: 1 }));
    }

    #[test]
    fn test_call_log_wrong_arity_rejected() {
        let err = NewCallLog::from_raw(["555-0100", "1", "2", "incoming"]).unwrap_err();
        assert!(matches!(err, RowError::Rejected(Rejection::Arity { .. })));
    }

    #[test]
    fn test_call_log_direction_not_validated() {
        let call = NewCallLog::from_raw(["x", "1", "2", "sideways", "1"]).unwrap();
        assert_eq!(call.direction, "sideways");
    }
}
