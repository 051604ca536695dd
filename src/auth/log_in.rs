//! This file defines the route handler for log-in requests.
//! The auth module handles the lower level authentication and cookie auth logic.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{UserID, cookie::set_auth_cookie, user::get_user_by_username},
    db::lock_connection,
    extract::JsonBody,
};

/// How long the auth cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The credentials sent to the log-in endpoint.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInData {
    /// The name the user registered with.
    pub username: String,
    /// Password entered during log-in.
    pub password: String,
    /// Whether to keep the user logged in for longer than the default session.
    #[serde(default)]
    pub remember_me: bool,
}

/// The user that was logged in.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggedInUser {
    /// The user's ID.
    pub id: UserID,
    /// The user's name.
    pub username: String,
}

/// Handler for log-in requests.
///
/// On a successful log-in request, the auth cookie is set and the user is returned as JSON.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The username is not registered or the password is not correct.
/// - An internal error occurred when verifying the password.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    JsonBody(user_data): JsonBody<LogInData>,
) -> Result<(PrivateCookieJar, Json<LoggedInUser>), Error> {
    let user = {
        let connection = lock_connection(&state.db_connection)?;

        match get_user_by_username(&user_data.username, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => {
                tracing::info!("Log-in attempt for unknown user {}", user_data.username);
                return Err(Error::InvalidCredentials);
            }
            Err(error) => return Err(error),
        }
    };

    if !user.password_hash.verify(&user_data.password)? {
        tracing::info!("Log-in attempt with wrong password for {}", user.username);
        return Err(Error::InvalidCredentials);
    }

    let cookie_duration = if user_data.remember_me {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let jar = set_auth_cookie(jar, user.id, cookie_duration)?;

    tracing::info!("{} logged in", user.username);

    Ok((
        jar,
        Json(LoggedInUser {
            id: user.id,
            username: user.username,
        }),
    ))
}

#[cfg(test)]
mod log_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;
    use time::{Duration, OffsetDateTime};

    use crate::{
        app_state::create_cookie_key,
        auth::{
            COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, PasswordHash, ValidatedPassword,
            create_user,
            log_in::{LogInState, LoggedInUser, post_log_in},
        },
        db::initialize,
        endpoints,
    };

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let password = ValidatedPassword::new_unchecked("averysafeandsecurepassword");
        create_user("alice", PasswordHash::new(password, 4).unwrap(), &connection).unwrap();

        let state = LogInState {
            cookie_key: create_cookie_key("foobar"),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = get_test_server();

        let response = server
            .post(endpoints::LOG_IN_API)
            .json(&json!({
                "username": "alice",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status_ok();
        let user = response.json::<LoggedInUser>();
        assert_eq!(user.username, "alice");
        let cookie = response.cookie(COOKIE_TOKEN);
        assert_date_time_close(
            cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION,
        );
    }

    #[tokio::test]
    async fn remember_me_extends_cookie() {
        let server = get_test_server();

        let response = server
            .post(endpoints::LOG_IN_API)
            .json(&json!({
                "username": "alice",
                "password": "averysafeandsecurepassword",
                "rememberMe": true,
            }))
            .await;

        response.assert_status_ok();
        let cookie = response.cookie(COOKIE_TOKEN);
        assert_date_time_close(
            cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + Duration::days(7),
        );
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let server = get_test_server();

        let response = server
            .post(endpoints::LOG_IN_API)
            .json(&json!({ "username": "alice", "password": "wrongpassword" }))
            .await;

        response.assert_status_unauthorized();
        assert!(response.maybe_cookie(COOKIE_TOKEN).is_none());
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_user() {
        let server = get_test_server();

        let response = server
            .post(endpoints::LOG_IN_API)
            .json(&json!({
                "username": "mallory",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status_unauthorized();
    }
}
