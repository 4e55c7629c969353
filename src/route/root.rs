use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    message: &'static str,
}

impl IntoResponse for RootResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub async fn root() -> RootResponse {
    RootResponse {
        message: "Welcome to Bookstore API. Go to /docs for API documentation.",
    }
}
