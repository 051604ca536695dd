//! Defines the endpoint for filtering bills by the day they were last updated.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    db::lock_connection,
    expense::{
        Expense,
        domain::parse_optional,
        query::{DateRange, ExpenseFilter, filter_by_date_range},
    },
    extract::JsonBody,
    timezone::get_local_offset,
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The state needed to filter bills.
#[derive(Debug, Clone)]
pub struct FilterState {
    /// The database connection for reading bills.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for FilterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The JSON body for filtering bills.
///
/// Blank or missing sub-head, status and bill type match any value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterData {
    /// The first day to include, e.g. "2025-01-31".
    pub start_date: String,
    /// The last day to include, e.g. "2025-02-28".
    pub end_date: String,
    /// Only include bills charged to this sub-head.
    #[serde(default)]
    pub sub_head: Option<String>,
    /// Only include bills in this status.
    #[serde(default)]
    pub status: Option<String>,
    /// Only include bills of this type.
    #[serde(default)]
    pub bill_type: Option<String>,
}

fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// A route handler for getting the bills last updated between two local dates, inclusive.
pub async fn filter_date_endpoint(
    State(state): State<FilterState>,
    JsonBody(data): JsonBody<FilterData>,
) -> Result<Json<Vec<Expense>>, Error> {
    let range = DateRange::new(parse_date(&data.start_date)?, parse_date(&data.end_date)?)?;
    let filter = ExpenseFilter {
        sub_head: parse_optional(data.sub_head.as_deref())?,
        status: parse_optional(data.status.as_deref())?,
        bill_type: parse_optional(data.bill_type.as_deref())?,
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Err(Error::InvalidTimezoneError(state.local_timezone));
    };

    let connection = lock_connection(&state.db_connection)?;

    filter_by_date_range(range, &filter, local_offset, &connection).map(Json)
}
