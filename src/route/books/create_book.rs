use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    error::ApiError,
    extractor::{json::ApiJson, valid_api_key::ValidApiKey, validated::ValidatedFromRequest},
    server_error,
    state::ApiState,
    types::book::{Book, BookPayload},
};

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct CreateBookResponse {
    pub book: Book,
}

impl IntoResponse for CreateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

/// Create a new book
///
/// Add a new book to the system. The store assigns the id.
#[utoipa::path(
    post,
    path = "/books/",
    tag = "books",
    request_body = BookPayload,
    security(("api_key" = [])),
    responses(
        (status = 201, description = "The created book", body = Book),
        (status = 401, description = "Missing or invalid API key"),
        (status = 422, description = "Invalid book"),
    )
)]
#[tracing::instrument(name = "create_book", skip_all)]
pub async fn create_book(
    State(state): State<ApiState>,
    ValidApiKey(_): ValidApiKey,
    ValidatedFromRequest(ApiJson(payload)): ValidatedFromRequest<ApiJson<BookPayload>>,
) -> Result<CreateBookResponse, ApiError> {
    let mut session = state.store().begin().await.map_err(server_error!(state))?;

    let book = session
        .insert(&payload)
        .await
        .map_err(server_error!(state))?;

    session.commit().await.map_err(server_error!(state))?;

    tracing::info!(id = book.id, "Book created");

    Ok(CreateBookResponse { book })
}
