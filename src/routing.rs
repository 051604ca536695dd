//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};

use crate::{
    AppState, Error,
    auth::{auth_guard, get_log_out, post_log_in},
    endpoints,
    expense::{
        create_comment_endpoint, create_expense_endpoint, delete_expense_endpoint,
        export_endpoint, filter_date_endpoint, get_all_bill_endpoint, get_expense_endpoint,
        get_rejected_endpoint, get_status_count_endpoint, get_total_endpoint,
        update_expense_endpoint, update_status_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out));

    let protected_routes = Router::new()
        .route(endpoints::CREATE_EXPENSE, post(create_expense_endpoint))
        .route(endpoints::CREATE_COMMENT, post(create_comment_endpoint))
        .route(endpoints::UPDATE_STATUS, patch(update_status_endpoint))
        .route(endpoints::GET_EXPENSE, get(get_expense_endpoint))
        .route(endpoints::GET_ALL_BILL, post(get_all_bill_endpoint))
        .route(endpoints::FILTER_DATE, post(filter_date_endpoint))
        .route(endpoints::UPDATE_EXPENSE, patch(update_expense_endpoint))
        .route(endpoints::GET_TOTAL, get(get_total_endpoint))
        .route(endpoints::GET_STATUS_COUNT, get(get_status_count_endpoint))
        .route(endpoints::GET_REJECTED, get(get_rejected_endpoint))
        .route(endpoints::DELETE_EXPENSE, delete(delete_expense_endpoint))
        .route(endpoints::EXPORT, post(export_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
