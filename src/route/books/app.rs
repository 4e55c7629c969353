use axum::{routing::get, Router};

use crate::state::ApiState;

use super::{
    create_book::create_book, delete_book::delete_book, get_book::get_book,
    list_books::list_books, update_book::update_book,
};

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/", get(list_books).post(create_book))
        .route(
            "/books/:id",
            get(get_book).put(update_book).delete(delete_book),
        )
}
