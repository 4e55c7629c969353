pub mod book;
pub mod pagination;
pub mod used_api_key;
