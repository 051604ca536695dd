//! Defines the route handler for logging out.

use axum::http::StatusCode;
use axum_extra::extract::PrivateCookieJar;

use crate::auth::cookie::invalidate_auth_cookie;

/// Log out the current user by invalidating their auth cookie.
///
/// Always succeeds, even if nobody was logged in.
pub async fn get_log_out(jar: PrivateCookieJar) -> (StatusCode, PrivateCookieJar) {
    (StatusCode::NO_CONTENT, invalidate_auth_cookie(jar))
}
