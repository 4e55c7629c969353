use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    error::{ApiError, BookNotFoundError},
    extractor::{
        json::ApiJson, path::ApiPath, valid_api_key::ValidApiKey, validated::ValidatedFromRequest,
    },
    server_error,
    state::ApiState,
    traits::ErrorVerbosityProvider,
    types::book::{Book, BookPayload},
};

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct UpdateBookResponse {
    pub book: Book,
}

impl IntoResponse for UpdateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Update a book
///
/// Replace every field of an existing book. The id never changes.
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookPayload,
    security(("api_key" = [])),
    responses(
        (status = 200, description = "The updated book", body = Book),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Invalid book or ID"),
    )
)]
#[tracing::instrument(name = "update_book", skip_all)]
pub async fn update_book(
    State(state): State<ApiState>,
    ValidApiKey(_): ValidApiKey,
    ApiPath(id): ApiPath<i64>,
    ValidatedFromRequest(ApiJson(payload)): ValidatedFromRequest<ApiJson<BookPayload>>,
) -> Result<UpdateBookResponse, ApiError> {
    let mut session = state.store().begin().await.map_err(server_error!(state))?;

    let book = session
        .update(id, &payload)
        .await
        .map_err(server_error!(state))?
        .ok_or_else(|| {
            tracing::debug!(id, "Book not found");

            BookNotFoundError::new(state.error_verbosity(), id)
        })?;

    session.commit().await.map_err(server_error!(state))?;

    tracing::info!(id, "Book updated");

    Ok(UpdateBookResponse { book })
}
