use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Catalog, CatalogWork};
use crate::config::CatalogConfig;
use crate::constants::{DEFAULT_LANGUAGE, UNKNOWN_AUTHOR, UNTITLED};
use crate::domain::BookId;
use crate::models::{Book, SearchPage, page_offset, timestamp_now, total_pages};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
    #[serde(rename = "numFound", default)]
    num_found: u64,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    key: String,
    #[serde(default)]
    title: String,
    author_name: Option<Vec<String>>,
    first_publish_year: Option<i32>,
    cover_i: Option<i64>,
    number_of_pages_median: Option<i32>,
    publisher: Option<Vec<String>>,
    language: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct WorkResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    authors: Vec<WorkAuthor>,
    description: Option<TextValue>,
    #[serde(default)]
    covers: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct WorkAuthor {
    author: KeyRef,
}

#[derive(Debug, Deserialize)]
struct KeyRef {
    key: String,
}

/// Open Library delivers text fields either bare or wrapped as
/// `{"type": "/type/text", "value": "..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextValue {
    Plain(String),
    Typed { value: String },
}

impl TextValue {
    fn into_text(self) -> Option<String> {
        let text = match self {
            Self::Plain(s) | Self::Typed { value: s } => s,
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthorResponse {
    name: Option<String>,
}

#[derive(Clone)]
pub struct OpenLibraryClient {
    client: Client,
    base_url: String,
    covers_base_url: String,
}

impl OpenLibraryClient {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build catalog HTTP client: {e}"))?;

        Ok(Self::with_shared_client(client, config))
    }

    #[must_use]
    pub fn with_shared_client(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            covers_base_url: config.covers_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn cover_url(&self, cover_id: i64) -> Option<String> {
        (cover_id > 0).then(|| format!("{}/b/id/{}-M.jpg", self.covers_base_url, cover_id))
    }

    fn map_search_doc(&self, doc: SearchDoc, now: &str) -> Book {
        let id = doc
            .key
            .strip_prefix("/works/")
            .unwrap_or(&doc.key)
            .to_string();

        let author = doc
            .author_name
            .filter(|names| !names.is_empty())
            .map_or_else(|| UNKNOWN_AUTHOR.to_string(), |names| names.join(", "));

        Book {
            id: BookId::new(id),
            title: non_empty_or(doc.title, UNTITLED),
            author,
            description: None,
            cover_image_url: doc.cover_i.and_then(|c| self.cover_url(c)),
            page_count: doc.number_of_pages_median,
            published_date: doc.first_publish_year.map(|y| y.to_string()),
            publisher: doc.publisher.and_then(|p| p.into_iter().next()),
            language: doc
                .language
                .and_then(|l| l.into_iter().next())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    fn map_work(&self, id: &BookId, work: WorkResponse) -> CatalogWork {
        CatalogWork {
            id: id.clone(),
            title: non_empty_or(work.title, UNTITLED),
            author_keys: work
                .authors
                .into_iter()
                .map(|a| {
                    a.author
                        .key
                        .strip_prefix("/authors/")
                        .unwrap_or(&a.author.key)
                        .to_string()
                })
                .collect(),
            description: work.description.and_then(TextValue::into_text),
            cover_image_url: work.covers.into_iter().find_map(|c| self.cover_url(c)),
        }
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

#[async_trait::async_trait]
impl Catalog for OpenLibraryClient {
    async fn search(&self, query: &str, page: u32, limit: u32) -> Result<SearchPage> {
        let url = format!(
            "{}/search.json?q={}&limit={}&offset={}",
            self.base_url,
            urlencoding::encode(query),
            limit,
            page_offset(page, limit)
        );
        debug!(%url, "Searching catalog");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            metrics::counter!("catalog_requests_total", "endpoint" => "search", "outcome" => "error")
                .increment(1);
            return Err(anyhow::anyhow!("Open Library search failed: {status}"));
        }

        let data: SearchResponse = response.json().await?;
        metrics::counter!("catalog_requests_total", "endpoint" => "search", "outcome" => "success")
            .increment(1);

        let now = timestamp_now();
        let books = data
            .docs
            .into_iter()
            .map(|doc| self.map_search_doc(doc, &now))
            .collect();

        Ok(SearchPage {
            books,
            total: data.num_found,
            page,
            total_pages: total_pages(data.num_found, limit),
        })
    }

    async fn get_work(&self, id: &BookId) -> Result<Option<CatalogWork>> {
        let url = format!("{}/works/{}.json", self.base_url, urlencoding::encode(id.as_str()));
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            metrics::counter!("catalog_requests_total", "endpoint" => "work", "outcome" => "not_found")
                .increment(1);
            debug!(book_id = %id, status = %response.status(), "Catalog has no such work");
            return Ok(None);
        }

        let work: WorkResponse = response.json().await?;
        metrics::counter!("catalog_requests_total", "endpoint" => "work", "outcome" => "success")
            .increment(1);

        Ok(Some(self.map_work(id, work)))
    }

    async fn get_author_name(&self, author_key: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/authors/{}.json",
            self.base_url,
            urlencoding::encode(author_key)
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            warn!(author_key, status = %response.status(), "Author lookup failed");
            return Ok(None);
        }

        let author: AuthorResponse = response.json().await?;
        Ok(Some(
            author
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        ))
    }
}
