use axum::http::HeaderName;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    OpenApi,
};

use crate::{
    route::books::{create_book, delete_book, get_book, list_books, update_book},
    types::{
        book::{Book, BookPayload},
        pagination::PaginatedBooks,
    },
};

/// Name of the security scheme the mutating endpoints refer to.
pub const API_KEY_SECURITY_SCHEME: &str = "api_key";

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookstore API",
        description = "A RESTful API for managing a bookstore's inventory",
        version = "1.0.0"
    ),
    paths(
        list_books::list_books,
        create_book::create_book,
        get_book::get_book,
        update_book::update_book,
        delete_book::delete_book,
    ),
    components(schemas(Book, BookPayload, PaginatedBooks)),
    tags((name = "books", description = "Book inventory"))
)]
struct ApiDoc;

/// Builds the OpenAPI document, declaring the API key header the server actually checks.
pub fn openapi(api_key_header_name: &HeaderName) -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();

    let components = openapi.components.get_or_insert_with(Default::default);
    components.add_security_scheme(
        API_KEY_SECURITY_SCHEME,
        SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(
            api_key_header_name.as_str(),
        ))),
    );

    openapi
}
