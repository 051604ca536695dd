use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    auth::UserID,
    db::Timestamp,
    expense::{BillType, Expense, NewExpense, Status, SubHead, create_expense, get_expense},
};

/// Create a pending expense bill charged to [SubHead::Gen].
pub fn create_test_expense(total: f64, connection: &Connection) -> Expense {
    create_test_bill(BillType::Expense, SubHead::Gen, total, connection)
}

pub fn create_test_bill(
    bill_type: BillType,
    sub_head: SubHead,
    total: f64,
    connection: &Connection,
) -> Expense {
    create_expense(
        NewExpense {
            bill_type,
            sub_head,
            total,
            description: format!("{sub_head} {bill_type} of {total}"),
            created_by: UserID::new(1),
        },
        connection,
    )
    .expect("Could not create test bill")
}

/// Overwrite the status and `updated_at` of a bill without going through the workflow.
pub fn set_status_and_updated_at(
    id: i64,
    status: Status,
    updated_at: OffsetDateTime,
    connection: &Connection,
) -> Expense {
    connection
        .execute(
            "UPDATE expense SET status = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![status, Timestamp(updated_at), id],
        )
        .expect("Could not update test bill");

    get_expense(id, connection).expect("Could not get test bill")
}
