//! Shared state and helpers for the bill route handlers.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, Error, auth::UserID, db::lock_connection};

/// The state needed by the bill handlers that only touch the database.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The database connection for managing bills.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl ExpenseState {
    /// Lock the database connection and run `f` with it.
    ///
    /// # Errors
    /// Returns [Error::DatabaseLockError] if the lock is poisoned, otherwise the error from `f`.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let connection = lock_connection(&self.db_connection)?;
        f(&connection)
    }
}

/// Get the username of the logged in user, used as the author of comments.
///
/// # Errors
/// Returns [Error::NotLoggedIn] if the user no longer exists.
pub(crate) fn get_author(user_id: UserID, connection: &Connection) -> Result<String, Error> {
    match crate::auth::get_user_by_id(user_id, connection) {
        Ok(user) => Ok(user.username),
        Err(Error::NotFound) => {
            tracing::warn!("Request from user {user_id} who is not in the database");
            Err(Error::NotLoggedIn)
        }
        Err(error) => Err(error),
    }
}
