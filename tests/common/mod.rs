#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use myreads::clients::{Catalog, CatalogWork};
use myreads::config::Config;
use myreads::domain::BookId;
use myreads::models::book::total_pages;
use myreads::models::{Book, SearchPage};

pub const PASSWORD: &str = "correct horse battery staple";

/// In-process catalog with canned works and authors.
#[derive(Default)]
pub struct FakeCatalog {
    works: HashMap<String, CatalogWork>,
    authors: HashMap<String, String>,
    failing_authors: Vec<String>,
    search_total: u64,
    fail_search: AtomicBool,
    work_fetches: AtomicUsize,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
            .with_work("OL1W", "Dune", &["OL1A"])
            .with_work("OL2W", "The Hobbit", &["OL2A", "OL3A"])
            .with_work("OL3W", "Anonymous Verses", &[])
            .with_work("OL4W", "Good Omens", &["OL4A", "OL5A"])
            .with_work("OL5W", "Lost Letters", &["OL5A", "OL6A"])
            .with_author("OL1A", "Frank Herbert")
            .with_author("OL2A", "J.R.R. Tolkien")
            .with_author("OL3A", "Christopher Tolkien")
            .with_author("OL4A", "Terry Pratchett")
            .with_failing_author("OL5A")
            .with_failing_author("OL6A")
    }

    pub fn with_work(mut self, id: &str, title: &str, author_keys: &[&str]) -> Self {
        self.works.insert(
            id.to_string(),
            CatalogWork {
                id: BookId::new(id),
                title: title.to_string(),
                author_keys: author_keys.iter().map(|k| (*k).to_string()).collect(),
                description: Some(format!("About {title}")),
                cover_image_url: None,
            },
        );
        self
    }

    pub fn with_author(mut self, key: &str, name: &str) -> Self {
        self.authors.insert(key.to_string(), name.to_string());
        self
    }

    pub fn with_failing_author(mut self, key: &str) -> Self {
        self.failing_authors.push(key.to_string());
        self
    }

    pub fn with_search_total(mut self, total: u64) -> Self {
        self.search_total = total;
        self
    }

    pub fn fail_searches(&self) {
        self.fail_search.store(true, Ordering::SeqCst);
    }

    pub fn work_fetches(&self) -> usize {
        self.work_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Catalog for FakeCatalog {
    async fn search(&self, query: &str, page: u32, limit: u32) -> anyhow::Result<SearchPage> {
        if self.fail_search.load(Ordering::SeqCst) {
            anyhow::bail!("Open Library search returned 503");
        }

        let needle = query.to_lowercase();
        let mut ids: Vec<&String> = self
            .works
            .iter()
            .filter(|(_, work)| work.title.to_lowercase().contains(&needle))
            .map(|(id, _)| id)
            .collect();
        ids.sort();

        let books: Vec<Book> = ids
            .into_iter()
            .map(|id| {
                let work = &self.works[id];
                Book {
                    id: work.id.clone(),
                    title: work.title.clone(),
                    author: "Search Author".to_string(),
                    description: None,
                    cover_image_url: None,
                    page_count: None,
                    published_date: None,
                    publisher: None,
                    language: "en".to_string(),
                    created_at: String::new(),
                    updated_at: String::new(),
                }
            })
            .collect();

        let total = self.search_total.max(books.len() as u64);

        Ok(SearchPage {
            books,
            total,
            page,
            total_pages: total_pages(total, limit),
        })
    }

    async fn get_work(&self, id: &BookId) -> anyhow::Result<Option<CatalogWork>> {
        self.work_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.works.get(id.as_str()).cloned())
    }

    async fn get_author_name(&self, author_key: &str) -> anyhow::Result<Option<String>> {
        if self.failing_authors.iter().any(|k| k == author_key) {
            anyhow::bail!("author lookup for {author_key} timed out");
        }
        Ok(self.authors.get(author_key).cloned())
    }
}

/// In-memory database, cookies over plain HTTP, and a cheaply hashed
/// password.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.server.secure_cookies = false;
    config.observability.metrics_enabled = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.security.argon2_parallelism = 1;

    let hash = myreads::services::hash_password(PASSWORD, &config.security)
        .expect("Failed to hash test password");
    config.security.password_hash = Some(hash);
    config
}

pub fn fake_catalog() -> Arc<FakeCatalog> {
    Arc::new(FakeCatalog::new())
}
