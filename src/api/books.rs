use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::types::{AddBookRequest, BookDetailsDto, RemovedDto, SearchParams, StatusFilter};
use super::validation::{
    parse_status_filter, validate_book_id, validate_entry_update, validate_limit, validate_page,
    validate_search_query,
};
use super::{ApiError, ApiJson, ApiResponse, AppState};
use crate::models::{BookEntry, EntryUpdate};
use crate::services::{LibraryStats, SearchResults};

/// GET /api/books[?status=]
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<ApiResponse<Vec<BookEntry>>>, ApiError> {
    let status = parse_status_filter(filter.status.as_deref())?;
    let entries = state.book_service().get_book_entries(status).await?;
    Ok(Json(ApiResponse::success(entries)))
}

/// POST /api/books
///
/// Adds a book to the list, or overwrites the status of an existing entry.
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<AddBookRequest>,
) -> Result<Json<ApiResponse<BookEntry>>, ApiError> {
    let id = validate_book_id(&payload.book_id)?;
    let entry = state.book_service().add_book(&id, payload.status).await?;
    Ok(Json(ApiResponse::success(entry)))
}

/// GET /api/books/search?q=&page=&limit=
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<SearchResults>>, ApiError> {
    let query = validate_search_query(&params.q)?;
    let page = validate_page(params.page)?;
    let limit = validate_limit(params.limit, state.config().catalog.page_size)?;

    let results = state
        .book_service()
        .search_books(query, page, limit)
        .await?;
    Ok(Json(ApiResponse::success(results)))
}

/// GET /api/books/{id}
///
/// Book metadata (fetched and cached on first access) plus the entry, if any.
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<BookDetailsDto>>, ApiError> {
    let id = validate_book_id(&id)?;
    let service = state.book_service();

    let (book, entry) = tokio::join!(service.get_book_details(&id), service.get_book_entry(&id));

    Ok(Json(ApiResponse::success(BookDetailsDto {
        book: book?,
        entry: entry?,
    })))
}

/// PATCH /api/books/{id}
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<EntryUpdate>,
) -> Result<Json<ApiResponse<BookEntry>>, ApiError> {
    let id = validate_book_id(&id)?;
    validate_entry_update(&update)?;

    let entry = state
        .book_service()
        .update_book_entry(&id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("Entry for book", &id))?;

    Ok(Json(ApiResponse::success(entry)))
}

/// DELETE /api/books/{id}
pub async fn remove_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RemovedDto>>, ApiError> {
    let id = validate_book_id(&id)?;
    let removed = state.book_service().remove_book(&id).await?;
    Ok(Json(ApiResponse::success(RemovedDto { removed })))
}

/// GET /api/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<LibraryStats>>, ApiError> {
    let stats = state.book_service().library_stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}
