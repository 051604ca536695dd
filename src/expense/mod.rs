//! Bill management for the approval workflow.
//!
//! This module contains everything related to bills:
//! - The `Expense` model, its enums and database functions for storing bills
//! - The status workflow and comments
//! - Read-only queries for filtering and summarising bills, and CSV export
//! - Route handlers for the bill API

mod comment;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod domain;
mod edit_endpoint;
mod export;
mod export_endpoint;
mod filter_endpoint;
mod get_endpoint;
mod query;
mod state;
mod status_endpoint;
mod summary_endpoint;
mod workflow;

#[cfg(test)]
mod test_utils;

pub use comment::{Comment, CommentText, create_comment_table};
pub use core::{
    Expense, ExpensePatch, NewExpense, count_expenses, create_expense, create_expense_table,
    delete_expense, get_expense, update_expense,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use domain::{BillType, Status, SubHead};
pub use edit_endpoint::update_expense_endpoint;
pub use export::write_expenses_csv;
pub use export_endpoint::export_endpoint;
pub use filter_endpoint::filter_date_endpoint;
pub use get_endpoint::{get_all_bill_endpoint, get_expense_endpoint};
pub use query::{
    DateRange, ExpenseFilter, filter_by_date_range, get_all_rejected, get_expenses_by_bill_type,
    get_total_amount, get_total_status_count,
};
pub use status_endpoint::{create_comment_endpoint, update_status_endpoint};
pub use summary_endpoint::{get_rejected_endpoint, get_status_count_endpoint, get_total_endpoint};
pub use workflow::{add_comment, update_status};
