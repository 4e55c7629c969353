use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    error::{ApiError, BookNotFoundError},
    extractor::{path::ApiPath, valid_api_key::ValidApiKey},
    server_error,
    state::ApiState,
    traits::ErrorVerbosityProvider,
    types::book::Book,
};

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct DeleteBookResponse {
    pub book: Book,
}

impl IntoResponse for DeleteBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Delete a book
///
/// Delete a book from the system and return it as it was right before deletion.
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "The deleted book", body = Book),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Book not found"),
    )
)]
#[tracing::instrument(name = "delete_book", skip_all)]
pub async fn delete_book(
    State(state): State<ApiState>,
    ValidApiKey(_): ValidApiKey,
    ApiPath(id): ApiPath<i64>,
) -> Result<DeleteBookResponse, ApiError> {
    let mut session = state.store().begin().await.map_err(server_error!(state))?;

    let book = session
        .delete(id)
        .await
        .map_err(server_error!(state))?
        .ok_or_else(|| {
            tracing::debug!(id, "Book not found");

            BookNotFoundError::new(state.error_verbosity(), id)
        })?;

    session.commit().await.map_err(server_error!(state))?;

    tracing::info!(id, "Book deleted");

    Ok(DeleteBookResponse { book })
}
