//! Read-only queries over bills: date range filters, totals and status counts.
//!
//! Every function that returns bills orders them by `updated_at`, newest
//! first, with ties broken by the larger ID first.

use std::collections::BTreeMap;

use rusqlite::{Connection, params};
use time::{Date, UtcOffset};

use crate::{
    Error,
    db::{Timestamp, get_count},
    expense::{
        BillType, Expense, Status, SubHead,
        comment::get_comments,
        core::{EXPENSE_COLUMNS, map_expense_row},
    },
    pagination::page_offset,
    timezone::start_of_day,
};

/// An inclusive range of local calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Create a range covering every day from `start` to `end`, inclusive.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] if `start` is after `end`.
    pub fn new(start: Date, end: Date) -> Result<Self, Error> {
        if start > end {
            Err(Error::InvalidDateRange(start, end))
        } else {
            Ok(Self { start, end })
        }
    }

    /// The first day in the range.
    pub fn start(&self) -> Date {
        self.start
    }

    /// The last day in the range.
    pub fn end(&self) -> Date {
        self.end
    }
}

/// Optional equality filters applied on top of a date range. `None` matches any value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Only include bills charged to this sub-head.
    pub sub_head: Option<SubHead>,
    /// Only include bills in this status.
    pub status: Option<Status>,
    /// Only include bills of this type.
    pub bill_type: Option<BillType>,
}

/// Get the bills last updated within `range` that match `filter`.
///
/// The days in `range` start and end at midnight in the timezone given by `local_offset`.
/// Days too far in the past or future to be stored match every bill on that side of the range.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn filter_by_date_range(
    range: DateRange,
    filter: &ExpenseFilter,
    local_offset: UtcOffset,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let lower_bound = start_of_day(range.start, local_offset);
    // The day after `range.end` may not exist for `Date::MAX`, in which case there is no upper bound.
    let upper_bound = range
        .end
        .next_day()
        .map(|day| start_of_day(day, local_offset));

    query_expenses(
        Some(Timestamp::saturating(lower_bound)),
        upper_bound.map(Timestamp::saturating),
        filter,
        None,
        connection,
    )
}

/// Get every bill of `bill_type`.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_expenses_by_bill_type(
    bill_type: BillType,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let filter = ExpenseFilter {
        bill_type: Some(bill_type),
        ..Default::default()
    };

    query_expenses(None, None, &filter, None, connection)
}

/// Get page number `page` of the bills of `bill_type`, with `per_page` bills on each page.
///
/// Pages are numbered from one. A page past the last page is empty.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_expense_page_by_bill_type(
    bill_type: BillType,
    page: u64,
    per_page: u64,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let filter = ExpenseFilter {
        bill_type: Some(bill_type),
        ..Default::default()
    };
    let window = Window {
        limit: per_page,
        offset: page_offset(page, per_page),
    };

    query_expenses(None, None, &filter, Some(window), connection)
}

/// Count the bills of `bill_type`.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn count_expenses_by_bill_type(
    bill_type: BillType,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM expense WHERE bill_type = ?1",
            [bill_type],
            |row| get_count(row, 0),
        )
        .map_err(Error::from)
}

/// Get every rejected bill, across all time and bill types.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_all_rejected(connection: &Connection) -> Result<Vec<Expense>, Error> {
    let filter = ExpenseFilter {
        status: Some(Status::Rejected),
        ..Default::default()
    };

    query_expenses(None, None, &filter, None, connection)
}

/// Sum the totals of every bill of `bill_type`. Returns zero if there are no such bills.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_total_amount(bill_type: BillType, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(total), 0.0) FROM expense WHERE bill_type = ?1",
            [bill_type],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Count the bills in each status. Every status is present in the result, even with a count of zero.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_total_status_count(connection: &Connection) -> Result<BTreeMap<Status, usize>, Error> {
    let mut counts: BTreeMap<Status, usize> =
        Status::ALL.into_iter().map(|status| (status, 0)).collect();

    let mut statement =
        connection.prepare("SELECT status, COUNT(id) FROM expense GROUP BY status")?;
    let rows = statement.query_map([], |row| Ok((row.get(0)?, get_count(row, 1)?)))?;

    for row in rows {
        let (status, count): (Status, usize) = row?;
        counts.insert(status, count);
    }

    Ok(counts)
}

/// A slice of an ordered list of bills.
#[derive(Debug, Clone, Copy)]
struct Window {
    limit: u64,
    offset: u64,
}

/// Select bills with `updated_at` in the half-open range [`from`, `to`) that match `filter`.
///
/// A `None` bound leaves that side of the range open. Comments are only read for the bills in
/// `window`, or for every bill if there is no window.
fn query_expenses(
    from: Option<Timestamp>,
    to: Option<Timestamp>,
    filter: &ExpenseFilter,
    window: Option<Window>,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let mut query = format!(
        "SELECT {EXPENSE_COLUMNS} FROM expense
        WHERE (?1 IS NULL OR updated_at >= ?1)
            AND (?2 IS NULL OR updated_at < ?2)
            AND (?3 IS NULL OR sub_head = ?3)
            AND (?4 IS NULL OR status = ?4)
            AND (?5 IS NULL OR bill_type = ?5)
        ORDER BY updated_at DESC, id DESC"
    );

    if let Some(Window { limit, offset }) = window {
        // SQLite reads LIMIT and OFFSET as signed 64-bit integers.
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        query.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
    }

    let mut expenses = connection
        .prepare(&query)?
        .query_map(
            params![from, to, filter.sub_head, filter.status, filter.bill_type],
            map_expense_row,
        )?
        .collect::<Result<Vec<Expense>, rusqlite::Error>>()?;

    for expense in &mut expenses {
        expense.comments = get_comments(expense.id, connection)?;
    }

    Ok(expenses)
}
