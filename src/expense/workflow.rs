//! Moves bills through the approval workflow and records comments on them.

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::ExpenseId,
    db::Timestamp,
    expense::{
        Comment, CommentText, Expense, Status,
        comment::insert_comment,
        core::{get_expense, touch_expense},
    },
};

/// Set the status of the bill with `id`, optionally recording `comment` from `author`.
///
/// Any status may be set regardless of the current one. The status change and
/// the comment are written in a single transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid bill, in which case nothing is written,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_status(
    id: ExpenseId,
    status: Status,
    comment: Option<CommentText>,
    author: &str,
    connection: &Connection,
) -> Result<Expense, Error> {
    let now = OffsetDateTime::now_utc();
    let transaction = connection.unchecked_transaction()?;

    let rows_affected = transaction.execute(
        "UPDATE expense SET status = ?1, updated_at = ?2 WHERE id = ?3",
        rusqlite::params![status, Timestamp(now), id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    if let Some(comment) = comment {
        insert_comment(id, author, &comment, now, &transaction)?;
    }

    transaction.commit()?;

    tracing::info!("{author} set the status of bill {id} to {status}");

    get_expense(id, connection)
}

/// Append a comment from `author` to the bill with `id` without changing its status.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid bill,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn add_comment(
    id: ExpenseId,
    author: &str,
    text: &CommentText,
    connection: &Connection,
) -> Result<Comment, Error> {
    let now = OffsetDateTime::now_utc();
    let transaction = connection.unchecked_transaction()?;

    touch_expense(id, now, &transaction)?;
    let comment = insert_comment(id, author, text, now, &transaction)?;

    transaction.commit()?;

    Ok(comment)
}
