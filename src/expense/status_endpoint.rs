//! Defines the endpoints for moving a bill through the workflow and commenting on it.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::{
    Error,
    auth::UserID,
    database_id::ExpenseId,
    expense::{
        Comment, CommentText, Expense, Status,
        state::{ExpenseState, get_author},
        workflow::{add_comment, update_status},
    },
    extract::JsonBody,
};

/// The JSON body for changing the status of a bill.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusData {
    /// The ID of the bill.
    pub id: ExpenseId,
    /// The new status, e.g. "approved".
    pub status: String,
    /// An optional note explaining the change. A blank comment is ignored.
    #[serde(default)]
    pub comment: Option<String>,
}

/// A route handler for changing the status of a bill, responds with the updated bill.
pub async fn update_status_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    JsonBody(data): JsonBody<UpdateStatusData>,
) -> Result<Json<Expense>, Error> {
    let status: Status = data.status.parse()?;
    let comment = data
        .comment
        .as_deref()
        .and_then(|comment| CommentText::new(comment).ok());

    state
        .with_connection(|connection| {
            let author = get_author(user_id, connection)?;
            update_status(data.id, status, comment, &author, connection)
        })
        .map(Json)
}

/// The JSON body for commenting on a bill.
#[derive(Debug, Deserialize)]
pub struct CreateCommentData {
    /// The ID of the bill.
    pub id: ExpenseId,
    /// What the comment says.
    pub comment: String,
}

/// A route handler for commenting on a bill, responds with the new comment.
pub async fn create_comment_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    JsonBody(data): JsonBody<CreateCommentData>,
) -> Result<(StatusCode, Json<Comment>), Error> {
    let text = CommentText::new(&data.comment)?;

    let comment = state.with_connection(|connection| {
        let author = get_author(user_id, connection)?;
        add_comment(data.id, &author, &text, connection)
    })?;

    tracing::info!("User {user_id} commented on bill {}", data.id);

    Ok((StatusCode::CREATED, Json(comment)))
}
