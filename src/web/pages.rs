use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{PageError, views};
use crate::api::auth::{clear_session, is_unlocked, mark_unlocked};
use crate::api::validation::{
    EntryFields, parse_entry_fields, parse_status, parse_status_filter, validate_book_id,
    validate_page, validate_password,
};
use crate::api::{ApiError, AppState, SearchParams, StatusFilter};
use crate::domain::{BookId, ReadingStatus};
use crate::services::BookError;

type PageResult = Result<Response, PageError>;

#[derive(Debug, Deserialize)]
pub struct UnlockForm {
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct AddForm {
    #[serde(default, rename = "bookId")]
    book_id: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
pub struct BookActionForm {
    #[serde(default)]
    intent: String,
    status: Option<String>,
    rating: Option<String>,
    review: Option<String>,
    #[serde(rename = "startDate")]
    start_date: Option<String>,
    #[serde(rename = "finishDate")]
    finish_date: Option<String>,
}

impl BookActionForm {
    fn into_entry_fields(self) -> EntryFields {
        EntryFields {
            status: self.status,
            rating: self.rating,
            review: self.review,
            start_date: self.start_date,
            finish_date: self.finish_date,
        }
    }
}

/// Where to go after adding: straight back to the dashboard for books to read
/// later, otherwise to the detail page to fill in dates and a rating.
fn after_add(id: &BookId, status: ReadingStatus) -> Redirect {
    match status {
        ReadingStatus::WantToRead => Redirect::to("/dashboard"),
        ReadingStatus::Reading | ReadingStatus::Read => Redirect::to(&format!("/books/{id}")),
    }
}

/// GET /
pub async fn home(session: Session) -> Response {
    if is_unlocked(&session).await {
        return Redirect::to("/dashboard").into_response();
    }
    Html(views::home_page()).into_response()
}

/// GET /unlock
pub async fn unlock_form(session: Session) -> Response {
    if is_unlocked(&session).await {
        return Redirect::to("/dashboard").into_response();
    }
    Html(views::unlock_page(None)).into_response()
}

/// POST /unlock
pub async fn unlock_submit(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<UnlockForm>,
) -> Response {
    match try_unlock(&state, &session, &form.password).await {
        Ok(_) => {
            tracing::info!("Session unlocked");
            Redirect::to("/dashboard").into_response()
        }
        Err(err) => {
            let (status, message) = err.status_and_message();
            (status, Html(views::unlock_page(Some(&message)))).into_response()
        }
    }
}

async fn try_unlock(
    state: &AppState,
    session: &Session,
    password: &str,
) -> Result<time::OffsetDateTime, ApiError> {
    validate_password(password)?;
    state.auth_service().unlock(password).await?;
    mark_unlocked(session, state.config().server.session_duration_ms).await
}

/// POST /lock
pub async fn lock(session: Session) -> Redirect {
    clear_session(&session).await;
    Redirect::to("/")
}

/// GET /lock
pub async fn lock_redirect() -> Redirect {
    Redirect::to("/")
}

/// GET /dashboard
pub async fn dashboard(State(state): State<Arc<AppState>>) -> PageResult {
    let dashboard = state.book_service().dashboard().await?;
    Ok(Html(views::dashboard_page(&dashboard)).into_response())
}

/// GET /books[?status=]
pub async fn books(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<StatusFilter>,
) -> PageResult {
    let status = parse_status_filter(filter.status.as_deref())?;
    let service = state.book_service();

    let (entries, stats) = tokio::join!(service.get_book_entries(status), service.library_stats());

    Ok(Html(views::books_page(&entries?, &stats?, status)).into_response())
}

/// GET /books/search?q=&page=
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> PageResult {
    let query = params.q.trim();
    if query.is_empty() {
        return Ok(Html(views::search_page("", None, None)).into_response());
    }

    let page = validate_page(params.page)?;
    let limit = state.config().catalog.page_size;

    match state.book_service().search_books(query, page, limit).await {
        Ok(results) => Ok(Html(views::search_page(query, Some(&results), None)).into_response()),
        Err(BookError::Catalog(message)) => {
            Ok(Html(views::search_page(query, None, Some(&message))).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /books/search
pub async fn search_add(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddForm>,
) -> PageResult {
    let id = validate_book_id(&form.book_id)?;
    let status = parse_status(&form.status)?;

    state.book_service().add_book(&id, status).await?;

    Ok(after_add(&id, status).into_response())
}

/// GET /books/{id}
pub async fn book_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> PageResult {
    let id = validate_book_id(&id)?;
    render_book(&state, &id, StatusCode::OK, None).await
}

async fn render_book(
    state: &AppState,
    id: &BookId,
    status: StatusCode,
    error: Option<&str>,
) -> PageResult {
    let service = state.book_service();
    let (book, entry) = tokio::join!(service.get_book_details(id), service.get_book_entry(id));

    let html = views::book_page(&book?, entry?.as_ref(), error);
    Ok((status, Html(html)).into_response())
}

/// POST /books/{id} with `intent` of `add`, `update`, or `delete`.
pub async fn book_action(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(mut form): Form<BookActionForm>,
) -> PageResult {
    let id = validate_book_id(&id)?;
    let service = state.book_service();
    let intent = std::mem::take(&mut form.intent);

    match intent.as_str() {
        "add" => {
            let status = parse_status(form.status.as_deref().unwrap_or_default())?;
            service.add_book(&id, status).await?;
            Ok(after_add(&id, status).into_response())
        }
        "update" => {
            let update = match parse_entry_fields(form.into_entry_fields()) {
                Ok(update) => update,
                Err(err) => {
                    let (status, message) = err.status_and_message();
                    return render_book(&state, &id, status, Some(&message)).await;
                }
            };

            service
                .update_book_entry(&id, &update)
                .await?
                .ok_or_else(|| {
                    PageError::new(StatusCode::NOT_FOUND, "This book is not on your list")
                })?;

            Ok(Redirect::to("/books").into_response())
        }
        "delete" => {
            service.remove_book(&id).await?;
            Ok(Redirect::to("/books").into_response())
        }
        _ => Err(PageError::new(StatusCode::BAD_REQUEST, "Invalid action")),
    }
}
