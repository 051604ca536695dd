//! Defines the endpoint for submitting a new bill.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::{
    Error,
    auth::UserID,
    expense::{BillType, Expense, NewExpense, SubHead, core::create_expense, state::ExpenseState},
    extract::JsonBody,
};

/// The JSON body for submitting a bill.
///
/// The bill type and sub-head are parsed by the handler so that unknown values are reported
/// with the list of valid values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseData {
    /// Either "expense" or "income".
    pub bill_type: String,
    /// The sub-head code, e.g. "BCA".
    pub sub_head: String,
    /// The amount of money on the bill.
    pub total: f64,
    /// What the bill is for.
    #[serde(default)]
    pub description: Option<String>,
}

/// A route handler for submitting a new bill, responds with the stored bill.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    JsonBody(data): JsonBody<CreateExpenseData>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let new_expense = NewExpense {
        bill_type: data.bill_type.parse::<BillType>()?,
        sub_head: data.sub_head.parse::<SubHead>()?,
        total: data.total,
        description: data.description.unwrap_or_default().trim().to_owned(),
        created_by: user_id,
    };

    let expense = state.with_connection(|connection| create_expense(new_expense, connection))?;

    tracing::info!("User {user_id} submitted bill {}", expense.id);

    Ok((StatusCode::CREATED, Json(expense)))
}
