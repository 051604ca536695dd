//! Defines the endpoint for deleting a bill.

use axum::{extract::State, http::StatusCode};

use crate::{
    Error,
    database_id::ExpenseId,
    expense::{core::delete_expense, state::ExpenseState},
    extract::PathParam,
};

/// A route handler for permanently deleting a bill and its comments.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    PathParam(expense_id): PathParam<ExpenseId>,
) -> Result<StatusCode, Error> {
    state.with_connection(|connection| delete_expense(expense_id, connection))?;

    tracing::info!("Deleted bill {expense_id}");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        expense::{
            delete_endpoint::delete_expense_endpoint, get_expense, state::ExpenseState,
            test_utils::create_test_expense,
        },
        extract::PathParam,
    };

    fn get_test_state() -> ExpenseState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        ExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn deletes_bill() {
        let state = get_test_state();
        let expense = create_test_expense(10.0, &state.db_connection.lock().unwrap());

        let status = delete_expense_endpoint(State(state.clone()), PathParam(expense.id))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_expense(expense.id, &connection), Err(Error::NotFound));
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found() {
        let state = get_test_state();
        let expense = create_test_expense(10.0, &state.db_connection.lock().unwrap());
        delete_expense_endpoint(State(state.clone()), PathParam(expense.id))
            .await
            .unwrap();

        let result = delete_expense_endpoint(State(state), PathParam(expense.id)).await;

        assert_eq!(result, Err(Error::NotFound));
    }
}
