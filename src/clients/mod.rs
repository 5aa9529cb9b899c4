pub mod openlibrary;

use anyhow::Result;

use crate::domain::BookId;
use crate::models::SearchPage;

/// A work as returned by the catalog detail endpoint, before author names
/// have been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogWork {
    pub id: BookId,
    pub title: String,
    pub author_keys: Vec<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
}

/// Read-only access to an external book catalog.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Full-text search. Fails when the catalog answers with a non-success
    /// status.
    async fn search(&self, query: &str, page: u32, limit: u32) -> Result<SearchPage>;

    /// Fetches one work. `Ok(None)` when the catalog does not know it.
    async fn get_work(&self, id: &BookId) -> Result<Option<CatalogWork>>;

    /// Resolves an author key to a display name. `Ok(None)` when the lookup
    /// did not succeed.
    async fn get_author_name(&self, author_key: &str) -> Result<Option<String>>;
}
