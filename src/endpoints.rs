//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/expense/deleteExpense/{id}', use [format_endpoint].

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";

/// The route to submit a new bill.
pub const CREATE_EXPENSE: &str = "/api/expense/createExpense";
/// The route to add a comment to a bill.
pub const CREATE_COMMENT: &str = "/api/expense/createComment";
/// The route to move a bill to another status.
pub const UPDATE_STATUS: &str = "/api/expense/updateStatus";
/// The route to get a single bill, selected with the `id` query parameter.
pub const GET_EXPENSE: &str = "/api/expense/getExpense";
/// The route to get a page of bills of one bill type.
pub const GET_ALL_BILL: &str = "/api/expense/getAllBill";
/// The route to filter bills by date range, sub-head, status and bill type.
pub const FILTER_DATE: &str = "/api/expense/filterDate";
/// The route to edit the fields of a bill.
pub const UPDATE_EXPENSE: &str = "/api/expense/updateExpense/{id}";
/// The route to get the summed total of one bill type.
pub const GET_TOTAL: &str = "/api/expense/getTotal";
/// The route to get the number of bills in each status.
pub const GET_STATUS_COUNT: &str = "/api/expense/getTotalExpense";
/// The route to get every rejected bill.
pub const GET_REJECTED: &str = "/api/expense/getRejected";
/// The route to delete a bill.
pub const DELETE_EXPENSE: &str = "/api/expense/deleteExpense/{id}";
/// The route to download a selection of bills as CSV.
pub const EXPORT: &str = "/api/expense/export";

/// Replace the first `{...}` parameter in `endpoint_path` with `id`.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let end = endpoint_path[start..]
        .find('}')
        .map(|offset| start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!("{}{}{}", &endpoint_path[..start], id, &endpoint_path[end..])
}
