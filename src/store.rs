use std::{str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Sqlite, SqlitePool, Transaction,
};

use crate::types::book::{Book, BookPayload};

const IN_MEMORY_DATABASE_URL: &str = "sqlite::memory:";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to connect to the database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("Failed to create the schema: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("Failed to begin a transaction: {0}")]
    Begin(#[source] sqlx::Error),
    #[error("Failed to commit the transaction: {0}")]
    Commit(#[source] sqlx::Error),
    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Persists books in a single SQLite table.
///
/// Cheap to clone, the pool is shared.
#[derive(Debug, Clone)]
pub struct BookStore {
    pool: SqlitePool,
}

impl BookStore {
    /// Connects to the database and creates the schema if it does not exist yet.
    #[tracing::instrument(skip_all)]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        if database_url == IN_MEMORY_DATABASE_URL {
            return Self::in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(database_url).map_err(StoreError::Connect)?;

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        Self::from_pool(pool).await
    }

    /// A private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` opens its own database, so the pool is pinned to a
    /// single connection that is never recycled.
    #[tracing::instrument]
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect(IN_MEMORY_DATABASE_URL)
            .await
            .map_err(StoreError::Connect)?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::debug!("Schema ready");

        Ok(Self { pool })
    }

    /// Opens a session backed by one transaction.
    pub async fn begin(&self) -> Result<BookSession, StoreError> {
        let tx = self.pool.begin().await.map_err(StoreError::Begin)?;

        Ok(BookSession { tx })
    }
}

/// A unit of work against the store.
///
/// Changes become visible only after [`BookSession::commit`].
/// Dropping the session without committing rolls everything back.
pub struct BookSession {
    tx: Transaction<'static, Sqlite>,
}

impl BookSession {
    pub async fn get(&mut self, id: i64) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, published_year FROM books WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(book)
    }

    /// Books ordered by id.
    pub async fn list(&mut self, offset: i64, limit: i64) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, published_year FROM books ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(books)
    }

    pub async fn count(&mut self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(count)
    }

    pub async fn insert(&mut self, payload: &BookPayload) -> Result<Book, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, published_year)
            VALUES (?, ?, ?)
            RETURNING id, title, author, published_year
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(payload.published_year)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(book)
    }

    /// Overwrites every field but the id. Returns `None` if there is no such book.
    pub async fn update(
        &mut self,
        id: i64,
        payload: &BookPayload,
    ) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = ?, author = ?, published_year = ?
            WHERE id = ?
            RETURNING id, title, author, published_year
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(payload.published_year)
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(book)
    }

    /// Returns the book as it was right before deletion, or `None` if there is no such book.
    pub async fn delete(&mut self, id: i64) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            "DELETE FROM books WHERE id = ? RETURNING id, title, author, published_year",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(book)
    }

    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(StoreError::Commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str) -> BookPayload {
        BookPayload {
            title: title.to_string(),
            author: String::from("Test Author"),
            published_year: 2023,
        }
    }

    async fn store() -> BookStore {
        BookStore::in_memory()
            .await
            .expect("In-memory store is available")
    }

    async fn count(store: &BookStore) -> i64 {
        let mut session = store.begin().await.expect("Session begins");
        let count = session.count().await.expect("Count succeeds");

        count
    }

    #[tokio::test]
    async fn committed_insert_is_visible() {
        let store = store().await;

        let mut session = store.begin().await.unwrap();
        let book = session.insert(&payload("Test Book")).await.unwrap();
        session.commit().await.unwrap();

        let mut session = store.begin().await.unwrap();
        let fetched = session.get(book.id).await.unwrap();

        assert_eq!(fetched, Some(book));
    }

    #[tokio::test]
    async fn dropped_session_rolls_back() {
        let store = store().await;

        {
            let mut session = store.begin().await.unwrap();
            session.insert(&payload("Never Committed")).await.unwrap();
        }

        assert_eq!(count(&store).await, 0);
    }

    #[tokio::test]
    async fn list_pages_in_id_order() {
        let store = store().await;

        let mut session = store.begin().await.unwrap();
        for i in 0..5 {
            session.insert(&payload(&format!("Book {i}"))).await.unwrap();
        }
        session.commit().await.unwrap();

        let mut session = store.begin().await.unwrap();
        let page = session.list(2, 2).await.unwrap();
        let titles: Vec<_> = page.iter().map(|book| book.title.as_str()).collect();

        assert_eq!(titles, ["Book 2", "Book 3"]);
        assert!(session.list(10, 2).await.unwrap().is_empty());
        assert_eq!(session.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_books() {
        let store = store().await;
        let mut session = store.begin().await.unwrap();

        assert_eq!(session.update(42, &payload("Ghost")).await.unwrap(), None);
        assert_eq!(session.delete(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_keeps_the_id() {
        let store = store().await;
        let mut session = store.begin().await.unwrap();

        let book = session.insert(&payload("Old Title")).await.unwrap();
        let updated = session
            .update(
                book.id,
                &BookPayload {
                    title: String::from("New Title"),
                    author: String::from("New Author"),
                    published_year: 2024,
                },
            )
            .await
            .unwrap()
            .expect("Book exists");

        assert_eq!(updated.id, book.id);
        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.author, "New Author");
        assert_eq!(updated.published_year, 2024);
    }

    #[tokio::test]
    async fn delete_returns_the_previous_state_and_ids_are_not_reused() {
        let store = store().await;
        let mut session = store.begin().await.unwrap();

        let book = session.insert(&payload("Short Lived")).await.unwrap();
        let deleted = session.delete(book.id).await.unwrap();

        assert_eq!(deleted, Some(book.clone()));
        assert_eq!(session.get(book.id).await.unwrap(), None);

        let next = session.insert(&payload("Successor")).await.unwrap();

        assert!(next.id > book.id);
    }

    #[tokio::test]
    async fn connect_accepts_the_in_memory_url() {
        let store = BookStore::connect(IN_MEMORY_DATABASE_URL, 5).await.unwrap();

        assert_eq!(count(&store).await, 0);
    }
}
