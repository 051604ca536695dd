//! Comments left on bills by the people reviewing them.
//!
//! Comments form an audit trail, so this module only has functions for adding
//! and reading them.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::{CommentId, ExpenseId},
    db::Timestamp,
};

/// A validated, non-empty comment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentText(String);

impl CommentText {
    /// Create comment text with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyComment] if `text` is empty or only whitespace.
    pub fn new(text: &str) -> Result<Self, Error> {
        let text = text.trim();

        if text.is_empty() {
            Err(Error::EmptyComment)
        } else {
            Ok(Self(text.to_owned()))
        }
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CommentText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A note attached to a bill, e.g. why it was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// The ID of the comment.
    pub id: CommentId,
    /// The username of the person who wrote the comment.
    pub author: String,
    /// What the comment says.
    pub text: String,
    /// When the comment was written.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Append a comment to the bill with `expense_id`.
///
/// The caller is responsible for checking that the bill exists and for
/// refreshing its `updated_at`.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error, e.g. the bill does not exist.
pub(crate) fn insert_comment(
    expense_id: ExpenseId,
    author: &str,
    text: &CommentText,
    timestamp: OffsetDateTime,
    connection: &Connection,
) -> Result<Comment, Error> {
    connection
        .prepare(
            "INSERT INTO comment (expense_id, author, text, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, author, text, created_at",
        )?
        .query_row(
            (expense_id, author, text.as_ref(), Timestamp(timestamp)),
            map_comment_row,
        )
        .map_err(Error::from)
}

/// Get the comments on the bill with `expense_id`, oldest first.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_comments(expense_id: ExpenseId, connection: &Connection) -> Result<Vec<Comment>, Error> {
    connection
        .prepare_cached(
            "SELECT id, author, text, created_at FROM comment
             WHERE expense_id = :expense_id
             ORDER BY id ASC",
        )?
        .query_map(&[(":expense_id", &expense_id)], map_comment_row)?
        .map(|maybe_comment| maybe_comment.map_err(Error::from))
        .collect()
}

/// Create the comment table.
///
/// Comments are deleted along with their bill.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_comment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS comment (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            expense_id INTEGER NOT NULL,
            author TEXT NOT NULL,
            text TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            FOREIGN KEY(expense_id) REFERENCES expense(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_comment_expense ON comment(expense_id);",
    )
}

fn map_comment_row(row: &Row) -> Result<Comment, rusqlite::Error> {
    let id = row.get(0)?;
    let author = row.get(1)?;
    let text = row.get(2)?;
    let Timestamp(timestamp) = row.get(3)?;

    Ok(Comment {
        id,
        author,
        text,
        timestamp,
    })
}

#[cfg(test)]
mod comment_text_tests {
    use crate::{Error, expense::CommentText};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(CommentText::new(""), Err(Error::EmptyComment));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(CommentText::new("\n\t \r"), Err(Error::EmptyComment));
    }

    #[test]
    fn new_trims_text() {
        let text = CommentText::new("  receipts attached ").unwrap();

        assert_eq!(text.as_ref(), "receipts attached");
    }
}
