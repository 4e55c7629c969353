use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    error::ApiError,
    extractor::{query::ApiQuery, validated::ValidatedFromRequestParts},
    server_error,
    state::ApiState,
    types::pagination::{PaginatedBooks, Pagination},
};

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ListBooksResponse {
    pub page: PaginatedBooks,
}

impl IntoResponse for ListBooksResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// List all books
///
/// Retrieve a paginated list of all books in the system.
/// A page beyond the last book is empty, it is not an error.
#[utoipa::path(
    get,
    path = "/books/",
    tag = "books",
    params(Pagination),
    responses(
        (status = 200, description = "One page of books", body = PaginatedBooks),
        (status = 422, description = "`page` is below 1 or `size` is outside of 1..=100"),
    )
)]
#[tracing::instrument(name = "list_books", skip_all)]
pub async fn list_books(
    State(state): State<ApiState>,
    ValidatedFromRequestParts(ApiQuery(pagination)): ValidatedFromRequestParts<
        ApiQuery<Pagination>,
    >,
) -> Result<ListBooksResponse, ApiError> {
    let mut session = state.store().begin().await.map_err(server_error!(state))?;

    let books = session
        .list(pagination.offset(), pagination.limit())
        .await
        .map_err(server_error!(state))?;
    let total = session.count().await.map_err(server_error!(state))?;

    session.commit().await.map_err(server_error!(state))?;

    tracing::debug!(total, returned = books.len(), "Listed books");

    Ok(ListBooksResponse {
        page: PaginatedBooks {
            total,
            page: pagination.page,
            size: pagination.size,
            books,
        },
    })
}
