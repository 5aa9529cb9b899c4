use std::collections::HashMap;

use crate::db::repositories::book::BookRepository;
use crate::domain::{BookId, ReadingStatus};
use crate::entities::{book_entries, books, prelude::*};
use crate::models::{BookEntry, EntryUpdate, timestamp_now};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};
use tracing::{info, warn};

/// Repository for personal tracking entries.
pub struct BookEntryRepository {
    conn: DatabaseConnection,
}

impl BookEntryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_row(entry: book_entries::Model, book: books::Model) -> Result<BookEntry> {
        let status = entry
            .status
            .parse::<ReadingStatus>()
            .with_context(|| format!("Corrupt status for entry {}", entry.id))?;

        Ok(BookEntry {
            id: entry.id,
            book_id: BookId::new(entry.book_id),
            status,
            rating: entry.rating,
            review: entry.review,
            start_date: entry.start_date,
            finish_date: entry.finish_date,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
            book: BookRepository::map_model(book),
        })
    }

    pub async fn get(&self, book_id: &BookId) -> Result<Option<BookEntry>> {
        let row = BookEntries::find()
            .filter(book_entries::Column::BookId.eq(book_id.as_str()))
            .find_also_related(Books)
            .one(&self.conn)
            .await?;

        match row {
            Some((entry, Some(book))) => Ok(Some(Self::map_row(entry, book)?)),
            Some((entry, None)) => {
                warn!(book_id = %entry.book_id, "Entry references a book missing from the cache");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Entries joined with their books, most recently updated first.
    pub async fn list(&self, status: Option<ReadingStatus>) -> Result<Vec<BookEntry>> {
        let mut query = BookEntries::find().find_also_related(Books);

        if let Some(status) = status {
            query = query.filter(book_entries::Column::Status.eq(status.as_str()));
        }

        let rows = query
            .order_by_desc(book_entries::Column::UpdatedAt)
            .order_by_desc(book_entries::Column::Id)
            .all(&self.conn)
            .await?;

        rows.into_iter()
            .filter_map(|(entry, book)| book.map(|b| (entry, b)))
            .map(|(entry, book)| Self::map_row(entry, book))
            .collect()
    }

    /// Statuses of whichever of `book_ids` are tracked.
    pub async fn statuses_for(&self, book_ids: &[BookId]) -> Result<HashMap<BookId, ReadingStatus>> {
        if book_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<&str> = book_ids.iter().map(BookId::as_str).collect();
        let rows = BookEntries::find()
            .filter(book_entries::Column::BookId.is_in(ids))
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let status = row.status.parse().ok()?;
                Some((BookId::new(row.book_id), status))
            })
            .collect())
    }

    /// Inserts an entry, or overwrites only the status of an existing one.
    pub async fn upsert_status(&self, book_id: &BookId, status: ReadingStatus) -> Result<()> {
        let now = timestamp_now();

        let active_model = book_entries::ActiveModel {
            book_id: Set(book_id.as_str().to_string()),
            status: Set(status.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        BookEntries::insert(active_model)
            .on_conflict(
                OnConflict::column(book_entries::Column::BookId)
                    .update_columns([
                        book_entries::Column::Status,
                        book_entries::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        info!(%book_id, %status, "Book entry saved");
        Ok(())
    }

    /// Applies the present fields of `update`. Returns `false` when no entry
    /// exists for `book_id`.
    pub async fn update(&self, book_id: &BookId, update: &EntryUpdate) -> Result<bool> {
        let Some(entry) = BookEntries::find()
            .filter(book_entries::Column::BookId.eq(book_id.as_str()))
            .one(&self.conn)
            .await?
        else {
            return Ok(false);
        };

        let mut active: book_entries::ActiveModel = entry.into();

        if let Some(status) = update.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(rating) = update.rating {
            active.rating = Set(Some(rating));
        }
        if let Some(review) = &update.review {
            active.review = Set(Some(review.clone()));
        }
        if let Some(start_date) = &update.start_date {
            active.start_date = Set(Some(start_date.clone()));
        }
        if let Some(finish_date) = &update.finish_date {
            active.finish_date = Set(Some(finish_date.clone()));
        }
        active.updated_at = Set(timestamp_now());

        active.update(&self.conn).await?;
        Ok(true)
    }

    pub async fn remove(&self, book_id: &BookId) -> Result<bool> {
        let result = BookEntries::delete_many()
            .filter(book_entries::Column::BookId.eq(book_id.as_str()))
            .exec(&self.conn)
            .await?;

        if result.rows_affected > 0 {
            info!(%book_id, "Book entry removed");
        }
        Ok(result.rows_affected > 0)
    }
}
