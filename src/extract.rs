//! Request extractors that report rejections as [Error::InvalidRequest].
//!
//! axum's own `Json`, `Path` and `Query` extractors reject malformed input
//! with plain text responses and a mix of status codes. These wrappers give
//! every bad request the same JSON error body and a 400 status code.

use axum::extract::{
    FromRequest, FromRequestParts,
    rejection::{JsonRejection, PathRejection, QueryRejection},
};

use crate::Error;

/// A JSON request body, deserialized as `T`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// A path parameter, deserialized as `T`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct PathParam<T>(pub T);

/// The query string, deserialized as `T`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct QueryParams<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::post};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::{Value, json};

    use super::{JsonBody, PathParam, QueryParams};

    #[derive(Deserialize)]
    struct Body {
        total: f64,
    }

    #[derive(Deserialize)]
    struct Params {
        id: i64,
    }

    async fn handler(
        PathParam(id): PathParam<i64>,
        QueryParams(params): QueryParams<Params>,
        JsonBody(body): JsonBody<Body>,
    ) -> String {
        format!("{id} {} {}", params.id, body.total)
    }

    fn get_test_server() -> TestServer {
        let app = Router::new().route("/things/{id}", post(handler));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn accepts_well_formed_request() {
        let server = get_test_server();

        let response = server
            .post("/things/1")
            .add_query_param("id", 2)
            .json(&json!({ "total": 3.5 }))
            .await;

        response.assert_status_ok();
        response.assert_text("1 2 3.5");
    }

    #[tokio::test]
    async fn wrong_json_type_is_json_bad_request() {
        let server = get_test_server();

        let response = server
            .post("/things/1")
            .add_query_param("id", 2)
            .json(&json!({ "total": "abc" }))
            .await;

        response.assert_status_bad_request();
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn non_numeric_path_is_json_bad_request() {
        let server = get_test_server();

        let response = server
            .post("/things/abc")
            .add_query_param("id", 2)
            .json(&json!({ "total": 1.0 }))
            .await;

        response.assert_status_bad_request();
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn missing_query_is_json_bad_request() {
        let server = get_test_server();

        let response = server.post("/things/1").json(&json!({ "total": 1.0 })).await;

        response.assert_status_bad_request();
        assert!(response.json::<Value>()["error"].is_string());
    }
}
