use serde::{Deserialize, Serialize};

/// A validated user row that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
}

/// A user as held in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identity assigned by storage on insert.
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// A validated call-log row that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCallLog {
    pub phone_number: String,
    pub start_time: i64,
    pub end_time: i64,
    /// Free text such as `"incoming"` or `"outgoing"`; not validated.
    pub direction: String,
    /// Owning user. Not checked against the users table unless the loader
    /// is asked to reject orphans.
    pub user_id: i64,
}

/// A call log as held in storage.
///
/// Field order and names match the ordered-calls report columns
/// `callId,phoneNumber,startTime,endTime,direction,userId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLog {
    /// Identity assigned by storage on insert.
    pub call_id: i64,
    pub phone_number: String,
    pub start_time: i64,
    pub end_time: i64,
    pub direction: String,
    pub user_id: i64,
}

/// The three columns the aggregator needs from a stored call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallDuration {
    pub start_time: i64,
    pub end_time: i64,
    pub user_id: i64,
}

impl CallDuration {
    /// `end_time - start_time`, widened so any pair of `i64` times fits.
    /// Negative when the row is inverted; nothing upstream rejects that.
    pub fn duration(&self) -> i128 {
        i128::from(self.end_time) - i128::from(self.start_time)
    }
}

/// One row of the per-user analytics report (`userId,avgDuration,numCalls`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalytics {
    pub user_id: i64,
    /// Mean call duration, not rounded.
    pub avg_duration: f64,
    pub num_calls: u64,
}
