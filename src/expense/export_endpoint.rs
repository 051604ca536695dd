//! Defines the endpoint for downloading a selection of bills as CSV.

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    database_id::ExpenseId,
    expense::{
        export::{get_expenses_by_ids, write_expenses_csv},
        state::ExpenseState,
    },
    extract::JsonBody,
};

/// The JSON body listing the bills to export.
#[derive(Debug, Deserialize)]
pub struct ExportData {
    /// The IDs of the bills to export, in the order they should appear.
    pub ids: Vec<ExpenseId>,
}

/// A route handler that responds with the selected bills as a CSV file download.
pub async fn export_endpoint(
    State(state): State<ExpenseState>,
    JsonBody(data): JsonBody<ExportData>,
) -> Result<Response, Error> {
    let expenses = state.with_connection(|connection| get_expenses_by_ids(&data.ids, connection))?;

    let mut csv = Vec::new();
    write_expenses_csv(&expenses, &mut csv)?;

    tracing::info!("Exported {} bills", expenses.len());

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"bills.csv\""),
        ],
        csv,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{body::to_bytes, extract::State, http::header::CONTENT_TYPE};
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        expense::{
            export_endpoint::{ExportData, export_endpoint},
            state::ExpenseState,
            test_utils::create_test_expense,
        },
        extract::JsonBody,
    };

    fn get_test_state() -> ExpenseState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        ExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn responds_with_csv() {
        let state = get_test_state();
        let expense = create_test_expense(5.0, &state.db_connection.lock().unwrap());

        let response = export_endpoint(
            State(state),
            JsonBody(ExportData {
                ids: vec![expense.id],
            }),
        )
        .await
        .unwrap();

        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/csv; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let state = get_test_state();

        let result = export_endpoint(State(state), JsonBody(ExportData { ids: vec![42] })).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
