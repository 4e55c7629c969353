use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::book::Book;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Query parameters selecting one page of books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Page number, starting at 1.
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Must be at least 1"))]
    #[param(minimum = 1, default = 1)]
    pub page: i64,
    /// Items per page.
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, default = 10)]
    pub size: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Number of records to skip. Saturates instead of overflowing for absurd page numbers,
    /// which simply yields an empty page.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }
}

/// One page of books together with the total number of books in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginatedBooks {
    /// Count of all books, not only those on this page.
    pub total: i64,
    pub page: i64,
    pub size: i64,
    pub books: Vec<Book>,
}
