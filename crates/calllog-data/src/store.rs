//! SQLite-backed storage for users and call logs.
//!
//! The store is an explicitly passed handle: every run (and every test)
//! opens its own in-memory database, so there is no shared global state.

use std::collections::HashSet;

use calllog_core::models::{CallDuration, CallLog, NewCallLog, NewUser, User};
use calllog_core::Result;
use rusqlite::{params, Connection};
use tracing::debug;

const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS users (
    userId    INTEGER PRIMARY KEY AUTOINCREMENT,
    firstName TEXT NOT NULL,
    lastName  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS callLogs (
    callId      INTEGER PRIMARY KEY AUTOINCREMENT,
    phoneNumber TEXT NOT NULL,
    startTime   INTEGER NOT NULL,
    endTime     INTEGER NOT NULL,
    direction   TEXT NOT NULL,
    userId      INTEGER NOT NULL,
    FOREIGN KEY (userId) REFERENCES users(userId)
);
";

/// Handle to the relational store backing one pipeline run.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open a fresh in-memory database and create the schema.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        // Orphan call logs are a loader policy, not a storage constraint.
        conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    /// Create both tables if they do not exist yet. Safe to call repeatedly.
    pub fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(CREATE_TABLES)?;
        Ok(())
    }

    // ── Writes ────────────────────────────────────────────────────────────────

    /// Insert `users` in order inside one transaction. Returns rows inserted.
    pub fn insert_users(&mut self, users: &[NewUser]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO users (firstName, lastName) VALUES (?1, ?2)")?;
            for user in users {
                stmt.execute(params![user.first_name, user.last_name])?;
            }
        }
        tx.commit()?;
        debug!("inserted {} users", users.len());
        Ok(users.len())
    }

    /// Insert `calls` in order inside one transaction. Returns rows inserted.
    pub fn insert_call_logs(&mut self, calls: &[NewCallLog]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO callLogs (phoneNumber, startTime, endTime, direction, userId)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for call in calls {
                stmt.execute(params![
                    call.phone_number,
                    call.start_time,
                    call.end_time,
                    call.direction,
                    call.user_id,
                ])?;
            }
        }
        tx.commit()?;
        debug!("inserted {} call logs", calls.len());
        Ok(calls.len())
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    /// All users in identity order.
    pub fn users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT userId, firstName, lastName FROM users ORDER BY userId")?;
        let rows = stmt.query_map([], |row| {
            Ok(User {
                user_id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Set of every stored user id.
    pub fn user_ids(&self) -> Result<HashSet<i64>> {
        let mut stmt = self.conn.prepare("SELECT userId FROM users")?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
        Ok(rows.collect::<rusqlite::Result<HashSet<_>>>()?)
    }

    /// All call logs in identity (insertion) order.
    pub fn call_logs(&self) -> Result<Vec<CallLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT callId, phoneNumber, startTime, endTime, direction, userId
             FROM callLogs ORDER BY callId",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CallLog {
                call_id: row.get(0)?,
                phone_number: row.get(1)?,
                start_time: row.get(2)?,
                end_time: row.get(3)?,
                direction: row.get(4)?,
                user_id: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Just the columns needed for duration aggregation, in identity order.
    pub fn call_durations(&self) -> Result<Vec<CallDuration>> {
        let mut stmt = self
            .conn
            .prepare("SELECT startTime, endTime, userId FROM callLogs ORDER BY callId")?;
        let rows = stmt.query_map([], |row| {
            Ok(CallDuration {
                start_time: row.get(0)?,
                end_time: row.get(1)?,
                user_id: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Number of rows in `table`.
    pub fn count(&self, table: Table) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        let n: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(n as u64)
    }
}

/// The two tables of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Users,
    CallLogs,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::CallLogs => "callLogs",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(first: &str, last: &str) -> NewUser {
        NewUser {
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    fn new_call(start: i64, end: i64, user_id: i64) -> NewCallLog {
        NewCallLog {
            phone_number: "555-0100".to_string(),
            start_time: start,
            end_time: end,
            direction: "incoming".to_string(),
            user_id,
        }
    }

    #[test]
    fn test_open_in_memory_creates_empty_tables() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.count(Table::Users).unwrap(), 0);
        assert_eq!(store.count(Table::CallLogs).unwrap(), 0);
    }

    #[test]
    fn test_create_tables_is_idempotent() {
        let mut store = Store::open_in_memory().unwrap();
        store.insert_users(&[new_user("Alice", "Smith")]).unwrap();
        store.create_tables().unwrap();
        assert_eq!(store.count(Table::Users).unwrap(), 1);
    }

    #[test]
    fn test_insert_users_assigns_monotonic_ids_in_order() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .insert_users(&[new_user("Alice", "Smith"), new_user("Bob", "Jones")])
            .unwrap();
        store.insert_users(&[new_user("Carol", "White")]).unwrap();

        let users = store.users().unwrap();
        let ids: Vec<i64> = users.iter().map(|u| u.user_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(users[0].first_name, "Alice");
        assert_eq!(users[2].last_name, "White");
    }

    #[test]
    fn test_insert_call_logs_round_trips_columns() {
        let mut store = Store::open_in_memory().unwrap();
        store.insert_call_logs(&[new_call(10, 25, 4)]).unwrap();

        let calls = store.call_logs().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].call_id, 1);
        assert_eq!(calls[0].phone_number, "555-0100");
        assert_eq!(calls[0].start_time, 10);
        assert_eq!(calls[0].end_time, 25);
        assert_eq!(calls[0].direction, "incoming");
        assert_eq!(calls[0].user_id, 4);
    }

    #[test]
    fn test_orphan_call_logs_accepted_by_storage() {
        let mut store = Store::open_in_memory().unwrap();
        // No users at all; the foreign key is not enforced.
        let inserted = store.insert_call_logs(&[new_call(1, 2, 99)]).unwrap();
        assert_eq!(inserted, 1);
    }

    #[test]
    fn test_call_durations_follow_insertion_order() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .insert_call_logs(&[new_call(50, 60, 2), new_call(10, 20, 1)])
            .unwrap();
        let durations = store.call_durations().unwrap();
        assert_eq!(durations[0].user_id, 2);
        assert_eq!(durations[1].user_id, 1);
    }

    #[test]
    fn test_user_ids() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .insert_users(&[new_user("A", "B"), new_user("C", "D")])
            .unwrap();
        let ids = store.user_ids().unwrap();
        assert!(ids.contains(&1));
        assert!(ids.contains(&2));
        assert!(!ids.contains(&3));
    }

    #[test]
    fn test_stores_are_independent() {
        let mut a = Store::open_in_memory().unwrap();
        let b = Store::open_in_memory().unwrap();
        a.insert_users(&[new_user("A", "B")]).unwrap();
        assert_eq!(b.count(Table::Users).unwrap(), 0);
    }
}
