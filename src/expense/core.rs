//! Defines the bill model and the database functions for storing bills.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    database_id::ExpenseId,
    db::{Timestamp, get_count},
    expense::{BillType, Comment, Status, SubHead, comment::get_comments},
};

// ============================================================================
// MODELS
// ============================================================================

/// A bill: an expense or income waiting for, or having gone through, approval.
///
/// To create a new `Expense`, use [create_expense].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the bill.
    pub id: ExpenseId,
    /// Whether the bill is an expense or an income.
    pub bill_type: BillType,
    /// The budget the bill is charged to.
    pub sub_head: SubHead,
    /// The amount of money on the bill. Never negative.
    pub total: f64,
    /// What the bill is for.
    pub description: String,
    /// The user who submitted the bill.
    pub created_by: UserID,
    /// Where the bill is in the approval workflow.
    pub status: Status,
    /// The comments on the bill, oldest first.
    pub comments: Vec<Comment>,
    /// When the bill was submitted.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the bill, its status or its comments last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The fields needed to submit a bill.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// Whether the bill is an expense or an income.
    pub bill_type: BillType,
    /// The budget the bill is charged to.
    pub sub_head: SubHead,
    /// The amount of money on the bill, must not be negative.
    pub total: f64,
    /// What the bill is for.
    pub description: String,
    /// The user submitting the bill.
    pub created_by: UserID,
}

/// A partial update to a bill. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    /// The new bill type.
    pub bill_type: Option<BillType>,
    /// The new sub-head.
    pub sub_head: Option<SubHead>,
    /// The new total, must not be negative.
    pub total: Option<f64>,
    /// The new description.
    pub description: Option<String>,
}

/// Check that `total` is a finite, non-negative amount.
///
/// # Errors
/// Returns [Error::InvalidTotal] otherwise.
pub fn validate_total(total: f64) -> Result<f64, Error> {
    if total.is_finite() && total >= 0.0 {
        Ok(total)
    } else {
        Err(Error::InvalidTotal(total))
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Submit a new bill. The bill starts in [Status::Pending] with no comments.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidTotal] if the total is negative or not a finite number,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    validate_total(new_expense.total)?;

    let now = OffsetDateTime::now_utc();
    let status = Status::default();

    let id = connection
        .prepare(
            "INSERT INTO expense
                (bill_type, sub_head, total, description, created_by, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             RETURNING id",
        )?
        .query_row(
            params![
                new_expense.bill_type,
                new_expense.sub_head,
                new_expense.total,
                new_expense.description,
                new_expense.created_by.as_i64(),
                status,
                Timestamp(now),
            ],
            |row| row.get(0),
        )?;

    tracing::debug!("Created bill {id}");

    Ok(Expense {
        id,
        bill_type: new_expense.bill_type,
        sub_head: new_expense.sub_head,
        total: new_expense.total,
        description: new_expense.description,
        created_by: new_expense.created_by,
        status,
        comments: Vec::new(),
        created_at: now,
        updated_at: now,
    })
}

/// Retrieve a bill and its comments by the bill's `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid bill,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let mut expense = connection
        .prepare(&format!("SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_expense_row)?;

    expense.comments = get_comments(id, connection)?;

    Ok(expense)
}

/// Apply the fields set in `patch` to the bill with `id` and refresh its `updated_at`.
///
/// Returns the updated bill.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidTotal] if the new total is negative, in which case nothing is written,
/// - [Error::NotFound] if `id` does not refer to a valid bill,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    patch: ExpensePatch,
    connection: &Connection,
) -> Result<Expense, Error> {
    if let Some(total) = patch.total {
        validate_total(total)?;
    }

    let rows_affected = connection.execute(
        "UPDATE expense SET
            bill_type = COALESCE(?1, bill_type),
            sub_head = COALESCE(?2, sub_head),
            total = COALESCE(?3, total),
            description = COALESCE(?4, description),
            updated_at = ?5
        WHERE id = ?6",
        params![
            patch.bill_type,
            patch.sub_head,
            patch.total,
            patch.description,
            Timestamp(OffsetDateTime::now_utc()),
            id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_expense(id, connection)
}

/// Permanently delete the bill with `id` along with its comments.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid bill,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    tracing::debug!("Deleted bill {id}");

    Ok(())
}

/// Set the `updated_at` of the bill with `id` to `timestamp`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a valid bill.
pub(crate) fn touch_expense(
    id: ExpenseId,
    timestamp: OffsetDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expense SET updated_at = ?1 WHERE id = ?2",
        params![Timestamp(timestamp), id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Get the total number of bills in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_expenses(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expense;", [], |row| get_count(row, 0))
        .map_err(|error| error.into())
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bill_type TEXT NOT NULL,
            sub_head TEXT NOT NULL,
            total REAL NOT NULL CHECK (total >= 0),
            description TEXT NOT NULL DEFAULT '',
            created_by INTEGER NOT NULL,
            status TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_updated_at ON expense(updated_at);
        CREATE INDEX IF NOT EXISTS idx_expense_type_status ON expense(bill_type, status);",
    )
}

/// The columns read by [map_expense_row], in order.
pub(crate) const EXPENSE_COLUMNS: &str =
    "id, bill_type, sub_head, total, description, created_by, status, created_at, updated_at";

/// Map a database row selected with [EXPENSE_COLUMNS] to a bill without its comments.
pub(crate) fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let bill_type = row.get(1)?;
    let sub_head = row.get(2)?;
    let total = row.get(3)?;
    let description = row.get(4)?;
    let created_by = UserID::new(row.get(5)?);
    let status = row.get(6)?;
    let Timestamp(created_at) = row.get(7)?;
    let Timestamp(updated_at) = row.get(8)?;

    Ok(Expense {
        id,
        bill_type,
        sub_head,
        total,
        description,
        created_by,
        status,
        comments: Vec::new(),
        created_at,
        updated_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================
