//! Defines the endpoint for editing the fields of a bill.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    Error,
    database_id::ExpenseId,
    expense::{
        BillType, Expense, SubHead,
        core::{ExpensePatch, update_expense},
        domain::parse_optional,
        state::ExpenseState,
    },
    extract::{JsonBody, PathParam},
};

/// The JSON body for editing a bill. Missing fields, and blank bill types or sub-heads, are left
/// unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseData {
    /// Either "expense" or "income".
    pub bill_type: Option<String>,
    /// The sub-head code, e.g. "BCA".
    pub sub_head: Option<String>,
    /// The amount of money on the bill.
    pub total: Option<f64>,
    /// What the bill is for.
    pub description: Option<String>,
}

/// A route handler for editing a bill, responds with the updated bill.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseState>,
    PathParam(expense_id): PathParam<ExpenseId>,
    JsonBody(data): JsonBody<UpdateExpenseData>,
) -> Result<Json<Expense>, Error> {
    let patch = ExpensePatch {
        bill_type: parse_optional::<BillType>(data.bill_type.as_deref())?,
        sub_head: parse_optional::<SubHead>(data.sub_head.as_deref())?,
        total: data.total,
        description: data.description.map(|description| description.trim().to_owned()),
    };

    let expense =
        state.with_connection(|connection| update_expense(expense_id, patch, connection))?;

    tracing::info!("Updated bill {expense_id}");

    Ok(Json(expense))
}
