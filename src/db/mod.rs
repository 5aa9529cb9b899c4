use crate::domain::{BookId, ReadingStatus};
use crate::models::{Book, BookEntry, EntryUpdate};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to `:memory:` would open its own empty database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false);

        if !in_memory {
            opt.max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn book_repo(&self) -> repositories::book::BookRepository {
        repositories::book::BookRepository::new(self.conn.clone())
    }

    fn entry_repo(&self) -> repositories::book_entry::BookEntryRepository {
        repositories::book_entry::BookEntryRepository::new(self.conn.clone())
    }

    // ========== Book Cache ==========

    pub async fn get_cached_book(&self, id: &BookId) -> Result<Option<Book>> {
        self.book_repo().get(id).await
    }

    pub async fn cache_book(&self, book: &Book) -> Result<Book> {
        self.book_repo().upsert(book).await
    }

    // ========== Book Entries ==========

    pub async fn get_book_entry(&self, book_id: &BookId) -> Result<Option<BookEntry>> {
        self.entry_repo().get(book_id).await
    }

    pub async fn list_book_entries(&self, status: Option<ReadingStatus>) -> Result<Vec<BookEntry>> {
        self.entry_repo().list(status).await
    }

    pub async fn get_entry_statuses(
        &self,
        book_ids: &[BookId],
    ) -> Result<HashMap<BookId, ReadingStatus>> {
        self.entry_repo().statuses_for(book_ids).await
    }

    pub async fn upsert_book_entry(&self, book_id: &BookId, status: ReadingStatus) -> Result<()> {
        self.entry_repo().upsert_status(book_id, status).await
    }

    pub async fn update_book_entry(&self, book_id: &BookId, update: &EntryUpdate) -> Result<bool> {
        self.entry_repo().update(book_id, update).await
    }

    pub async fn remove_book_entry(&self, book_id: &BookId) -> Result<bool> {
        self.entry_repo().remove(book_id).await
    }
}
