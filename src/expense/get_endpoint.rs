//! Defines the endpoints for reading a single bill and for reading pages of bills.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    database_id::ExpenseId,
    db::lock_connection,
    expense::{
        BillType, Expense,
        core::get_expense,
        query::{count_expenses_by_bill_type, get_expense_page_by_bill_type},
        state::ExpenseState,
    },
    extract::{JsonBody, QueryParams},
    pagination::{Page, PaginationConfig},
};

/// The query string for selecting a bill.
#[derive(Debug, Deserialize)]
pub struct ExpenseIdQuery {
    /// The ID of the bill.
    pub id: ExpenseId,
}

/// A route handler for getting a bill along with its comments.
pub async fn get_expense_endpoint(
    State(state): State<ExpenseState>,
    QueryParams(query): QueryParams<ExpenseIdQuery>,
) -> Result<Json<Expense>, Error> {
    state
        .with_connection(|connection| get_expense(query.id, connection))
        .map(Json)
}

/// The state needed to get a page of bills.
#[derive(Debug, Clone)]
pub struct BillPageState {
    /// The database connection for reading bills.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to split bills into pages.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for BillPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query string for choosing a page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// The one-based page number.
    pub page: Option<u64>,
    /// The number of bills on each page.
    pub per_page: Option<u64>,
}

/// The JSON body for choosing which bills to list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillTypeData {
    /// Either "expense" or "income".
    pub bill_type: String,
}

/// A page of bills, newest first.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillPage {
    /// The bills on this page.
    pub bill: Vec<Expense>,
    /// The one-based number of this page.
    pub page: u64,
    /// The maximum number of bills on a page.
    pub per_page: u64,
    /// The number of non-empty pages.
    pub page_count: u64,
    /// The number of bills across all pages.
    pub total_count: u64,
}

/// A route handler for getting a page of bills of one bill type.
pub async fn get_all_bill_endpoint(
    State(state): State<BillPageState>,
    QueryParams(query): QueryParams<PageQuery>,
    JsonBody(data): JsonBody<BillTypeData>,
) -> Result<Json<BillPage>, Error> {
    let bill_type: BillType = data.bill_type.parse()?;
    let (page, per_page) = state
        .pagination_config
        .resolve(query.page, query.per_page);

    let (expenses, total_count) = {
        let connection = lock_connection(&state.db_connection)?;
        let expenses = get_expense_page_by_bill_type(bill_type, page, per_page, &connection)?;
        let total_count = count_expenses_by_bill_type(bill_type, &connection)?;
        (expenses, total_count as u64)
    };

    let page = Page::new(expenses, page, per_page, total_count);

    Ok(Json(BillPage {
        bill: page.items,
        page: page.page,
        per_page: page.per_page,
        page_count: page.page_count,
        total_count: page.total_count,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        expense::{
            BillType, SubHead,
            get_endpoint::{
                BillPageState, BillTypeData, ExpenseIdQuery, PageQuery, get_all_bill_endpoint,
                get_expense_endpoint,
            },
            get_expenses_by_bill_type,
            state::ExpenseState,
            test_utils::{create_test_bill, create_test_expense},
        },
        extract::{JsonBody, QueryParams},
        pagination::PaginationConfig,
    };

    fn get_test_connection() -> Arc<Mutex<Connection>> {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        Arc::new(Mutex::new(conn))
    }

    #[tokio::test]
    async fn get_expense_returns_bill() {
        let db_connection = get_test_connection();
        let want = create_test_expense(42.0, &db_connection.lock().unwrap());
        let state = ExpenseState { db_connection };

        let Json(got) =
            get_expense_endpoint(State(state), QueryParams(ExpenseIdQuery { id: want.id }))
                .await
                .unwrap();

        assert_eq!(got, want);
    }

    #[tokio::test]
    async fn get_expense_with_unknown_id_is_not_found() {
        let state = ExpenseState {
            db_connection: get_test_connection(),
        };

        let result =
            get_expense_endpoint(State(state), QueryParams(ExpenseIdQuery { id: 42 })).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }

    fn get_page_state(bill_count: usize) -> BillPageState {
        let db_connection = get_test_connection();
        {
            let connection = db_connection.lock().unwrap();
            for i in 0..bill_count {
                create_test_expense(i as f64, &connection);
            }
            create_test_bill(BillType::Income, SubHead::Bba, 1.0, &connection);
        }

        BillPageState {
            db_connection,
            pagination_config: PaginationConfig::default(),
        }
    }

    fn expense_type() -> JsonBody<BillTypeData> {
        JsonBody(BillTypeData {
            bill_type: "expense".to_owned(),
        })
    }

    #[tokio::test]
    async fn get_all_bill_uses_default_page_size() {
        let state = get_page_state(10);

        let Json(page) = get_all_bill_endpoint(
            State(state),
            QueryParams(PageQuery::default()),
            expense_type(),
        )
        .await
        .unwrap();

        assert_eq!(page.bill.len(), 8);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.total_count, 10);
        assert!(page.bill.iter().all(|bill| bill.bill_type == BillType::Expense));
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let state = get_page_state(3);

        let Json(page) = get_all_bill_endpoint(
            State(state),
            QueryParams(PageQuery {
                page: Some(5),
                per_page: Some(2),
            }),
            expense_type(),
        )
        .await
        .unwrap();

        assert!(page.bill.is_empty());
        assert_eq!(page.page_count, 2);
    }

    #[tokio::test]
    async fn second_page_continues_where_first_ended() {
        let state = get_page_state(5);
        let all = get_expenses_by_bill_type(
            BillType::Expense,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let Json(page) = get_all_bill_endpoint(
            State(state),
            QueryParams(PageQuery {
                page: Some(2),
                per_page: Some(3),
            }),
            expense_type(),
        )
        .await
        .unwrap();

        assert_eq!(page.bill, all[3..]);
        assert_eq!(page.page, 2);
        assert_eq!(page.per_page, 3);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.total_count, 5);
    }

    #[tokio::test]
    async fn get_all_bill_rejects_unknown_type() {
        let state = get_page_state(0);

        let result = get_all_bill_endpoint(
            State(state),
            QueryParams(PageQuery::default()),
            JsonBody(BillTypeData {
                bill_type: "refund".to_owned(),
            }),
        )
        .await;

        assert_eq!(result.err(), Some(Error::InvalidBillType("refund".to_owned())));
    }
}
