use crate::domain::BookId;
use crate::entities::{books, prelude::*};
use crate::models::Book;
use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};
use tracing::debug;

/// Repository for the local book cache.
pub struct BookRepository {
    conn: DatabaseConnection,
}

impl BookRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub(crate) fn map_model(model: books::Model) -> Book {
        Book {
            id: BookId::new(model.id),
            title: model.title,
            author: model.author,
            description: model.description,
            cover_image_url: model.cover_image_url,
            page_count: model.page_count,
            published_date: model.published_date,
            publisher: model.publisher,
            language: model.language,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    pub async fn get(&self, id: &BookId) -> Result<Option<Book>> {
        let row = Books::find_by_id(id.as_str()).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    /// Insert-or-replace keyed by book id, returning the stored row. A
    /// replaced row keeps its first `created_at`.
    pub async fn upsert(&self, book: &Book) -> Result<Book> {
        let active_model = books::ActiveModel {
            id: Set(book.id.as_str().to_string()),
            title: Set(book.title.clone()),
            author: Set(book.author.clone()),
            description: Set(book.description.clone()),
            cover_image_url: Set(book.cover_image_url.clone()),
            page_count: Set(book.page_count),
            published_date: Set(book.published_date.clone()),
            publisher: Set(book.publisher.clone()),
            language: Set(book.language.clone()),
            created_at: Set(book.created_at.clone()),
            updated_at: Set(book.updated_at.clone()),
        };

        Books::insert(active_model)
            .on_conflict(
                OnConflict::column(books::Column::Id)
                    .update_columns([
                        books::Column::Title,
                        books::Column::Author,
                        books::Column::Description,
                        books::Column::CoverImageUrl,
                        books::Column::PageCount,
                        books::Column::PublishedDate,
                        books::Column::Publisher,
                        books::Column::Language,
                        books::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        debug!(book_id = %book.id, "Cached book");

        self.get(&book.id)
            .await?
            .with_context(|| format!("Cached book {} vanished after upsert", book.id))
    }
}
