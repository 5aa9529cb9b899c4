mod common;

use std::sync::Arc;

use common::{FakeCatalog, fake_catalog};
use myreads::clients::Catalog;
use myreads::db::Store;
use myreads::domain::{BookId, ReadingStatus};
use myreads::models::EntryUpdate;
use myreads::services::{BookError, BookService, SeaOrmBookService};

async fn service_with(catalog: Arc<FakeCatalog>) -> (SeaOrmBookService, Store) {
    let store = Store::new("sqlite::memory:")
        .await
        .expect("Failed to open store");
    let service = SeaOrmBookService::new(store.clone(), catalog as Arc<dyn Catalog>);
    (service, store)
}

fn id(raw: &str) -> BookId {
    BookId::new(raw)
}

#[tokio::test]
async fn added_book_is_returned_with_its_status() {
    let (service, _) = service_with(fake_catalog()).await;

    let entry = service
        .add_book(&id("OL1W"), ReadingStatus::Reading)
        .await
        .unwrap();
    assert_eq!(entry.status, ReadingStatus::Reading);
    assert_eq!(entry.book.title, "Dune");
    assert_eq!(entry.book.author, "Frank Herbert");

    let fetched = service.get_book_entry(&id("OL1W")).await.unwrap().unwrap();
    assert_eq!(fetched.status, ReadingStatus::Reading);
    assert!(fetched.rating.is_none());
}

#[tokio::test]
async fn adding_twice_keeps_one_entry_with_latest_status() {
    let (service, _) = service_with(fake_catalog()).await;
    let book = id("OL1W");

    let first = service.add_book(&book, ReadingStatus::WantToRead).await.unwrap();
    service
        .update_book_entry(
            &book,
            &EntryUpdate {
                rating: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let second = service.add_book(&book, ReadingStatus::Read).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.status, ReadingStatus::Read);
    assert_eq!(second.rating, Some(4));

    let all = service.get_book_entries(None).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn partial_update_leaves_other_fields_alone() {
    let (service, _) = service_with(fake_catalog()).await;
    let book = id("OL2W");
    service.add_book(&book, ReadingStatus::Reading).await.unwrap();

    service
        .update_book_entry(
            &book,
            &EntryUpdate {
                review: Some("Long but lovely".to_string()),
                start_date: Some("2024-01-02".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let entry = service
        .update_book_entry(
            &book,
            &EntryUpdate {
                rating: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(entry.rating, Some(5));
    assert_eq!(entry.review.as_deref(), Some("Long but lovely"));
    assert_eq!(entry.start_date.as_deref(), Some("2024-01-02"));
    assert_eq!(entry.status, ReadingStatus::Reading);
}

#[tokio::test]
async fn updating_an_untracked_book_returns_none() {
    let (service, _) = service_with(fake_catalog()).await;

    let result = service
        .update_book_entry(
            &id("OL1W"),
            &EntryUpdate {
                rating: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn removing_an_entry_keeps_the_cached_book() {
    let catalog = fake_catalog();
    let (service, store) = service_with(catalog.clone()).await;
    let book = id("OL1W");

    service.add_book(&book, ReadingStatus::Read).await.unwrap();
    assert!(service.remove_book(&book).await.unwrap());
    assert!(!service.remove_book(&book).await.unwrap());

    assert!(service.get_book_entry(&book).await.unwrap().is_none());
    assert!(store.get_cached_book(&book).await.unwrap().is_some());

    let fetches = catalog.work_fetches();
    service.get_book_details(&book).await.unwrap();
    assert_eq!(catalog.work_fetches(), fetches);
}

#[tokio::test]
async fn cached_books_are_not_fetched_again() {
    let catalog = fake_catalog();
    let (service, _) = service_with(catalog.clone()).await;

    let first = service.get_book_details(&id("OL2W")).await.unwrap();
    let second = service.get_book_details(&id("OL2W")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(catalog.work_fetches(), 1);
}

#[tokio::test]
async fn first_fetch_returns_the_stored_row() {
    let (service, store) = service_with(fake_catalog()).await;

    let fetched = service.get_book_details(&id("OL1W")).await.unwrap();
    let stored = store.get_cached_book(&id("OL1W")).await.unwrap().unwrap();

    assert_eq!(fetched, stored);
    assert_eq!(fetched.created_at, fetched.updated_at);
}

#[tokio::test]
async fn authors_are_joined_and_failures_skipped() {
    let (service, _) = service_with(fake_catalog()).await;

    let hobbit = service.get_book_details(&id("OL2W")).await.unwrap();
    assert_eq!(hobbit.author, "J.R.R. Tolkien, Christopher Tolkien");

    let omens = service.get_book_details(&id("OL4W")).await.unwrap();
    assert_eq!(omens.author, "Terry Pratchett");

    let verses = service.get_book_details(&id("OL3W")).await.unwrap();
    assert_eq!(verses.author, "Unknown Author");
}

#[tokio::test]
async fn unknown_author_when_every_lookup_fails() {
    let (service, _) = service_with(fake_catalog()).await;

    let letters = service.get_book_details(&id("OL5W")).await.unwrap();
    assert_eq!(letters.author, "Unknown Author");
}

#[tokio::test]
async fn entries_are_listed_most_recently_updated_first() {
    let (service, _) = service_with(fake_catalog()).await;
    for book in ["OL1W", "OL2W", "OL3W"] {
        service.add_book(&id(book), ReadingStatus::WantToRead).await.unwrap();
    }

    let order: Vec<String> = service
        .get_book_entries(None)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.book_id.to_string())
        .collect();
    assert_eq!(order, ["OL3W", "OL2W", "OL1W"]);

    service
        .update_book_entry(
            &id("OL1W"),
            &EntryUpdate {
                rating: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let order: Vec<String> = service
        .get_book_entries(None)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.book_id.to_string())
        .collect();
    assert_eq!(order, ["OL1W", "OL3W", "OL2W"]);
}

#[tokio::test]
async fn unknown_work_is_not_found_and_not_added() {
    let (service, _) = service_with(fake_catalog()).await;

    let err = service.get_book_details(&id("OL999W")).await.unwrap_err();
    assert!(matches!(err, BookError::NotFound(_)));

    let err = service
        .add_book(&id("OL999W"), ReadingStatus::Reading)
        .await
        .unwrap_err();
    assert!(matches!(err, BookError::NotFound(_)));
    assert!(service.get_book_entries(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_ids_are_rejected() {
    let (service, _) = service_with(fake_catalog()).await;

    let err = service.get_book_details(&id("../etc")).await.unwrap_err();
    assert!(matches!(err, BookError::Validation(_)));
}

#[tokio::test]
async fn search_hits_carry_entry_status() {
    let (service, _) = service_with(fake_catalog()).await;
    service.add_book(&id("OL2W"), ReadingStatus::Read).await.unwrap();

    let results = service.search_books("the", 1, 20).await.unwrap();
    assert_eq!(results.books.len(), 1);
    assert_eq!(results.books[0].book.id, id("OL2W"));
    assert_eq!(results.books[0].status, Some(ReadingStatus::Read));

    let results = service.search_books("dune", 1, 20).await.unwrap();
    assert_eq!(results.books[0].status, None);
}

#[tokio::test]
async fn search_reports_total_pages() {
    let catalog = Arc::new(FakeCatalog::new().with_search_total(37));
    let (service, _) = service_with(catalog).await;

    let results = service.search_books("dune", 2, 20).await.unwrap();
    assert_eq!(results.total, 37);
    assert_eq!(results.page, 2);
    assert_eq!(results.total_pages, 2);
}

#[tokio::test]
async fn search_failure_is_a_catalog_error() {
    let catalog = fake_catalog();
    catalog.fail_searches();
    let (service, _) = service_with(catalog).await;

    let err = service.search_books("dune", 1, 20).await.unwrap_err();
    match err {
        BookError::Catalog(message) => assert_eq!(message, "Failed to search books"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn entries_filter_by_status_and_feed_stats() {
    let (service, _) = service_with(fake_catalog()).await;
    service.add_book(&id("OL1W"), ReadingStatus::Reading).await.unwrap();
    service.add_book(&id("OL2W"), ReadingStatus::Read).await.unwrap();
    service.add_book(&id("OL4W"), ReadingStatus::WantToRead).await.unwrap();

    service
        .update_book_entry(
            &id("OL2W"),
            &EntryUpdate {
                rating: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let reading = service
        .get_book_entries(Some(ReadingStatus::Reading))
        .await
        .unwrap();
    assert_eq!(reading.len(), 1);
    assert_eq!(reading[0].book_id, id("OL1W"));

    let stats = service.library_stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.reading, 1);
    assert_eq!(stats.read, 1);
    assert_eq!(stats.want_to_read, 1);
    assert!((stats.average_rating - 4.0).abs() < f64::EPSILON);

    let dashboard = service.dashboard().await.unwrap();
    assert_eq!(dashboard.currently_reading.len(), 1);
    assert_eq!(dashboard.recently_added.len(), 3);
}
