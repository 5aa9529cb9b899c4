//! Domain service for the book cache and the personal reading list.
//!
//! Book metadata is looked up cache-first and persisted on first fetch;
//! entries are created, partially updated, and removed on top of it.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{BookId, ReadingStatus};
use crate::models::{Book, BookEntry, EntryUpdate};
use crate::services::stats::{Dashboard, LibraryStats};

/// Errors specific to book operations.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("Book not found: {0}")]
    NotFound(BookId),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<sea_orm::DbErr> for BookError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for BookError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// A catalog search hit, annotated with the status of the matching entry if
/// the book is already on the list.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub book: Book,
    pub status: Option<ReadingStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub books: Vec<SearchHit>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
}

/// Domain service trait for books and entries.
///
/// # Examples
///
/// ```rust,ignore
/// use myreads::domain::{BookId, ReadingStatus};
/// use myreads::services::{BookError, BookService};
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn BookService>) -> Result<(), BookError> {
///     let entry = service.add_book(&BookId::new("OL45804W"), ReadingStatus::Reading).await?;
///     assert_eq!(entry.status, ReadingStatus::Reading);
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait BookService: Send + Sync {
    /// Returns the cached book, or fetches, caches, and returns it.
    ///
    /// # Errors
    ///
    /// - [`BookError::NotFound`] if the catalog has no such work
    /// - [`BookError::Catalog`] if the catalog request fails
    async fn get_book_details(&self, id: &BookId) -> Result<Book, BookError>;

    /// Adds a book to the list or, if already present, overwrites its status.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::NotFound`] if the book cannot be resolved.
    async fn add_book(&self, id: &BookId, status: ReadingStatus) -> Result<BookEntry, BookError>;

    /// Applies the present fields of `update`. `Ok(None)` if there is no entry.
    async fn update_book_entry(
        &self,
        id: &BookId,
        update: &EntryUpdate,
    ) -> Result<Option<BookEntry>, BookError>;

    async fn get_book_entry(&self, id: &BookId) -> Result<Option<BookEntry>, BookError>;

    /// Entries, optionally filtered by status, most recently updated first.
    async fn get_book_entries(
        &self,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<BookEntry>, BookError>;

    /// Deletes the entry; the cached book stays. Returns whether a row went.
    async fn remove_book(&self, id: &BookId) -> Result<bool, BookError>;

    /// # Errors
    ///
    /// Returns [`BookError::Catalog`] when the upstream search fails.
    async fn search_books(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<SearchResults, BookError>;

    async fn library_stats(&self) -> Result<LibraryStats, BookError>;

    async fn dashboard(&self) -> Result<Dashboard, BookError>;
}
