//! `SeaORM` implementation of the `BookService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::clients::Catalog;
use crate::constants::{DEFAULT_LANGUAGE, UNKNOWN_AUTHOR};
use crate::db::Store;
use crate::domain::{BookId, ReadingStatus};
use crate::models::{Book, BookEntry, EntryUpdate, timestamp_now};
use crate::services::book_service::{BookError, BookService, SearchHit, SearchResults};
use crate::services::stats::{Dashboard, LibraryStats};

pub struct SeaOrmBookService {
    store: Store,
    catalog: Arc<dyn Catalog>,
}

impl SeaOrmBookService {
    #[must_use]
    pub fn new(store: Store, catalog: Arc<dyn Catalog>) -> Self {
        Self { store, catalog }
    }

    fn ensure_well_formed(id: &BookId) -> Result<(), BookError> {
        if id.is_well_formed() {
            Ok(())
        } else {
            Err(BookError::Validation(format!("Invalid book ID: {id}")))
        }
    }

    async fn resolve_authors(&self, keys: &[String]) -> String {
        let lookups = keys.iter().map(|key| self.catalog.get_author_name(key));

        let names: Vec<String> = join_all(lookups)
            .await
            .into_iter()
            .zip(keys)
            .filter_map(|(result, key)| {
                result
                    .inspect_err(|e| {
                        debug!(author_key = %key, error = %e, "Author lookup failed, skipping");
                    })
                    .ok()
                    .flatten()
            })
            .collect();

        if names.is_empty() {
            UNKNOWN_AUTHOR.to_string()
        } else {
            names.join(", ")
        }
    }

    async fn fetch_and_cache(&self, id: &BookId) -> Result<Book, BookError> {
        let work = self
            .catalog
            .get_work(id)
            .await
            .map_err(|e| BookError::Catalog(e.to_string()))?
            .ok_or_else(|| BookError::NotFound(id.clone()))?;

        let author = self.resolve_authors(&work.author_keys).await;
        let now = timestamp_now();

        let book = Book {
            id: work.id,
            title: work.title,
            author,
            description: work.description,
            cover_image_url: work.cover_image_url,
            page_count: None,
            published_date: None,
            publisher: None,
            language: DEFAULT_LANGUAGE.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        let stored = self.store.cache_book(&book).await?;
        metrics::counter!("book_cache_fills_total").increment(1);
        debug!(book_id = %stored.id, title = %stored.title, "Cached book from catalog");

        Ok(stored)
    }
}

#[async_trait]
impl BookService for SeaOrmBookService {
    #[instrument(skip(self), fields(book_id = %id))]
    async fn get_book_details(&self, id: &BookId) -> Result<Book, BookError> {
        Self::ensure_well_formed(id)?;

        if let Some(book) = self.store.get_cached_book(id).await? {
            metrics::counter!("book_cache_hits_total").increment(1);
            return Ok(book);
        }

        self.fetch_and_cache(id).await
    }

    #[instrument(skip(self), fields(book_id = %id, status = %status))]
    async fn add_book(&self, id: &BookId, status: ReadingStatus) -> Result<BookEntry, BookError> {
        self.get_book_details(id).await?;

        self.store.upsert_book_entry(id, status).await?;
        info!("Book added to list");

        self.store
            .get_book_entry(id)
            .await?
            .ok_or_else(|| BookError::NotFound(id.clone()))
    }

    #[instrument(skip(self, update), fields(book_id = %id))]
    async fn update_book_entry(
        &self,
        id: &BookId,
        update: &EntryUpdate,
    ) -> Result<Option<BookEntry>, BookError> {
        if !self.store.update_book_entry(id, update).await? {
            return Ok(None);
        }

        Ok(self.store.get_book_entry(id).await?)
    }

    async fn get_book_entry(&self, id: &BookId) -> Result<Option<BookEntry>, BookError> {
        Ok(self.store.get_book_entry(id).await?)
    }

    async fn get_book_entries(
        &self,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<BookEntry>, BookError> {
        Ok(self.store.list_book_entries(status).await?)
    }

    #[instrument(skip(self), fields(book_id = %id))]
    async fn remove_book(&self, id: &BookId) -> Result<bool, BookError> {
        let removed = self.store.remove_book_entry(id).await?;
        if removed {
            info!("Book removed from list");
        }
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn search_books(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<SearchResults, BookError> {
        let found = self.catalog.search(query, page, limit).await.map_err(|e| {
            warn!(error = %e, "Catalog search failed");
            BookError::Catalog("Failed to search books".to_string())
        })?;

        let ids: Vec<BookId> = found.books.iter().map(|b| b.id.clone()).collect();
        let statuses = self.store.get_entry_statuses(&ids).await?;

        let books = found
            .books
            .into_iter()
            .map(|book| SearchHit {
                status: statuses.get(&book.id).copied(),
                book,
            })
            .collect();

        Ok(SearchResults {
            books,
            total: found.total,
            page: found.page,
            total_pages: found.total_pages,
        })
    }

    async fn library_stats(&self) -> Result<LibraryStats, BookError> {
        let entries = self.store.list_book_entries(None).await?;
        Ok(LibraryStats::from_entries(
            &entries,
            chrono::Utc::now().year(),
        ))
    }

    async fn dashboard(&self) -> Result<Dashboard, BookError> {
        let entries = self.store.list_book_entries(None).await?;
        Ok(Dashboard::from_entries(entries, chrono::Utc::now().year()))
    }
}
