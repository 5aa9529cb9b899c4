use serde::{Deserialize, Serialize};

use crate::domain::{BookId, ReadingStatus};

/// Catalog metadata for a published work, as cached locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub page_count: Option<i32>,
    pub published_date: Option<String>,
    pub publisher: Option<String>,
    pub language: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Personal tracking record for one book, joined with its cached metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    pub id: i32,
    pub book_id: BookId,
    pub status: ReadingStatus,
    pub rating: Option<i32>,
    pub review: Option<String>,
    pub start_date: Option<String>,
    pub finish_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub book: Book,
}

/// Partial update of an entry. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryUpdate {
    #[serde(default)]
    pub status: Option<ReadingStatus>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub finish_date: Option<String>,
}

impl EntryUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.rating.is_none()
            && self.review.is_none()
            && self.start_date.is_none()
            && self.finish_date.is_none()
    }
}

/// One page of catalog search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub books: Vec<Book>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
}

/// Number of pages needed to show `total` results, `limit` per page.
///
/// ```
/// # use myreads::models::book::total_pages;
/// assert_eq!(total_pages(37, 20), 2);
/// assert_eq!(total_pages(40, 20), 2);
/// assert_eq!(total_pages(0, 20), 0);
/// ```
#[must_use]
pub const fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit as u64)
}

/// Zero-based offset of the first result on 1-based `page`.
#[must_use]
pub const fn page_offset(page: u32, limit: u32) -> u64 {
    (page.saturating_sub(1) as u64) * (limit as u64)
}

/// Current time as a fixed-width RFC 3339 string, so lexical order matches
/// chronological order in `ORDER BY` clauses.
#[must_use]
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
