use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    error::{ApiError, BookNotFoundError},
    extractor::path::ApiPath,
    server_error,
    state::ApiState,
    traits::ErrorVerbosityProvider,
    types::book::Book,
};

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct GetBookResponse {
    pub book: Book,
}

impl IntoResponse for GetBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Get a book by ID
///
/// Retrieve details of a specific book by its ID.
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "The book", body = Book),
        (status = 404, description = "Book not found"),
        (status = 422, description = "The ID is not an integer"),
    )
)]
#[tracing::instrument(name = "get_book", skip_all)]
pub async fn get_book(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<GetBookResponse, ApiError> {
    let mut session = state.store().begin().await.map_err(server_error!(state))?;

    let book = session
        .get(id)
        .await
        .map_err(server_error!(state))?
        .ok_or_else(|| {
            tracing::debug!(id, "Book not found");

            BookNotFoundError::new(state.error_verbosity(), id)
        })?;

    session.commit().await.map_err(server_error!(state))?;

    Ok(GetBookResponse { book })
}
