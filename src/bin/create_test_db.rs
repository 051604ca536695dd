use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use billflow_rs::{
    BillType, CommentText, NewExpense, PasswordHash, Status, SubHead, ValidatedPassword,
    add_comment, create_expense, create_user, initialize_db, update_status,
};

/// A utility for creating a test database for the REST API server of billflow_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Bills to create, with the status to move each one to.
const FIXTURE_BILLS: [(BillType, SubHead, f64, &str, Status); 6] = [
    (BillType::Expense, SubHead::Bca, 1200.0, "Lab equipment", Status::Pending),
    (BillType::Expense, SubHead::Exam, 340.5, "Exam paper printing", Status::Verified),
    (BillType::Expense, SubHead::Nss, 800.0, "Camp supplies", Status::Approved),
    (BillType::Expense, SubHead::Gen, 95.0, "Office stationery", Status::Rejected),
    (BillType::Income, SubHead::Bba, 5000.0, "Seminar fees", Status::Completed),
    (BillType::Income, SubHead::Ncc, 1500.0, "Annual grant", Status::Pending),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user \"test\" with the password \"test\"...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user("test", password_hash, &conn)?;

    println!("Creating bills...");

    for (bill_type, sub_head, total, description, status) in FIXTURE_BILLS {
        let expense = create_expense(
            NewExpense {
                bill_type,
                sub_head,
                total,
                description: description.to_owned(),
                created_by: user.id,
            },
            &conn,
        )?;

        if status == Status::Rejected {
            let comment = CommentText::new("The receipt is missing.")?;
            update_status(expense.id, status, Some(comment), &user.username, &conn)?;
        } else if status != Status::Pending {
            update_status(expense.id, status, None, &user.username, &conn)?;
        } else {
            let comment = CommentText::new("Waiting on the invoice.")?;
            add_comment(expense.id, &user.username, &comment, &conn)?;
        }
    }

    println!("Success!");

    Ok(())
}
