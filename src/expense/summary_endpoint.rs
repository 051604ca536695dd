//! Defines the dashboard endpoints: totals, status counts and rejected bills.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    expense::{
        BillType, Expense, Status,
        domain::parse_optional,
        query::{get_all_rejected, get_total_amount, get_total_status_count},
        state::ExpenseState,
    },
    extract::QueryParams,
};

/// The query string for choosing which bills to total.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalQuery {
    /// Either "expense" or "income". Defaults to "expense".
    pub bill_type: Option<String>,
}

/// The summed total of one bill type.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TotalAmount {
    /// The bill type that was totalled.
    pub bill_type: BillType,
    /// The sum of the totals of every bill of `bill_type`.
    pub total: f64,
}

/// A route handler for getting the summed total of every bill of one type.
pub async fn get_total_endpoint(
    State(state): State<ExpenseState>,
    QueryParams(query): QueryParams<TotalQuery>,
) -> Result<Json<TotalAmount>, Error> {
    let bill_type =
        parse_optional::<BillType>(query.bill_type.as_deref())?.unwrap_or(BillType::Expense);

    let total = state.with_connection(|connection| get_total_amount(bill_type, connection))?;

    Ok(Json(TotalAmount { bill_type, total }))
}

/// A route handler for getting the number of bills in each status.
pub async fn get_status_count_endpoint(
    State(state): State<ExpenseState>,
) -> Result<Json<BTreeMap<Status, usize>>, Error> {
    state
        .with_connection(get_total_status_count)
        .map(Json)
}

/// A route handler for getting every rejected bill.
pub async fn get_rejected_endpoint(
    State(state): State<ExpenseState>,
) -> Result<Json<Vec<Expense>>, Error> {
    state.with_connection(get_all_rejected).map(Json)
}
