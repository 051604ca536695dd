//! Database setup and helpers shared by the SQLite-backed stores.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef},
};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::create_user_table,
    expense::{create_comment_table, create_expense_table},
};

/// Create the tables for the domain models if they do not already exist.
///
/// Foreign key enforcement is switched on for `connection` so that deleting a
/// bill also deletes its comments.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction = connection.unchecked_transaction()?;

    create_user_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_comment_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Lock the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub fn lock_connection(
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

/// Read the result of an SQL `COUNT(...)` from column `index` of `row`.
pub(crate) fn get_count(row: &Row, index: usize) -> Result<usize, rusqlite::Error> {
    let count: i64 = row.get(index)?;

    usize::try_from(count).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(error))
    })
}

/// A point in time stored as an integer number of nanoseconds since the Unix epoch.
///
/// Integer timestamps compare correctly in SQL, which range queries rely on,
/// and convert back to the exact same [OffsetDateTime] in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub OffsetDateTime);

impl Timestamp {
    /// Convert `datetime`, clamping it to the earliest or latest instant that can be stored.
    ///
    /// Only nanosecond counts that fit in an `i64` can be stored, roughly the years 1677 to 2262.
    /// Use this for query bounds, where a far off date should match everything on that side.
    pub fn saturating(datetime: OffsetDateTime) -> Self {
        let nanos = datetime
            .unix_timestamp_nanos()
            .clamp(i128::from(i64::MIN), i128::from(i64::MAX));

        match OffsetDateTime::from_unix_timestamp_nanos(nanos) {
            Ok(clamped) => Self(clamped),
            Err(_) => Self(datetime),
        }
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let nanos = i64::try_from(self.0.unix_timestamp_nanos())
            .map_err(|error| rusqlite::Error::ToSqlConversionFailure(Box::new(error)))?;

        Ok(ToSqlOutput::from(nanos))
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let nanos = value.as_i64()?;

        OffsetDateTime::from_unix_timestamp_nanos(i128::from(nanos))
            .map(Timestamp)
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
