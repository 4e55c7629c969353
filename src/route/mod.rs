pub mod books;
pub mod root;
