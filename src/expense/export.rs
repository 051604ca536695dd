//! Writes bills as CSV for use in spreadsheets.

use std::io::Write;

use csv::Writer;
use rusqlite::Connection;
use time::format_description::well_known::Rfc3339;

use crate::{
    Error,
    database_id::ExpenseId,
    expense::{Expense, core::get_expense},
};

const CSV_HEADER: [&str; 9] = [
    "id",
    "bill_type",
    "sub_head",
    "total",
    "status",
    "description",
    "created_at",
    "updated_at",
    "comment_count",
];

/// Write a header row followed by one row per bill in `expenses` to `writer`.
///
/// # Errors
/// Returns [Error::CsvError] if a row could not be written or the writer could not be flushed.
pub fn write_expenses_csv<W: Write>(expenses: &[Expense], writer: W) -> Result<(), Error> {
    let mut wtr = Writer::from_writer(writer);

    wtr.write_record(CSV_HEADER).map_err(csv_error)?;

    for expense in expenses {
        let created_at = expense
            .created_at
            .format(&Rfc3339)
            .map_err(|error| Error::CsvError(error.to_string()))?;
        let updated_at = expense
            .updated_at
            .format(&Rfc3339)
            .map_err(|error| Error::CsvError(error.to_string()))?;

        wtr.write_record([
            expense.id.to_string().as_str(),
            expense.bill_type.as_str(),
            expense.sub_head.as_str(),
            &format!("{:.2}", expense.total),
            expense.status.as_str(),
            &expense.description,
            &created_at,
            &updated_at,
            &expense.comments.len().to_string(),
        ])
        .map_err(csv_error)?;
    }

    wtr.flush()
        .map_err(|error| Error::CsvError(error.to_string()))
}

/// Get the bills with the given `ids`, in the same order as `ids`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if any of `ids` does not refer to a valid bill,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_expenses_by_ids(
    ids: &[ExpenseId],
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    ids.iter().map(|&id| get_expense(id, connection)).collect()
}

fn csv_error(error: csv::Error) -> Error {
    Error::CsvError(error.to_string())
}
