//! HTML pages and form posts.

use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use std::sync::Arc;
use tower_sessions::Session;

use crate::api::{ApiError, AppState, auth::is_unlocked};
use crate::services::BookError;

mod pages;
pub mod views;

pub fn router() -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/dashboard", get(pages::dashboard))
        .route("/books", get(pages::books))
        .route(
            "/books/search",
            get(pages::search).post(pages::search_add),
        )
        .route(
            "/books/{id}",
            get(pages::book_detail).post(pages::book_action),
        )
        .route_layer(middleware::from_fn(require_unlocked));

    Router::new()
        .route("/", get(pages::home))
        .route("/unlock", get(pages::unlock_form).post(pages::unlock_submit))
        .route("/lock", get(pages::lock_redirect).post(pages::lock))
        .merge(protected)
}

/// Sends locked sessions to the unlock form.
async fn require_unlocked(session: Session, request: Request, next: Next) -> Response {
    if is_unlocked(&session).await {
        return next.run(request).await;
    }
    Redirect::to("/unlock").into_response()
}

/// Failure of a page handler, rendered as an HTML error page.
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    message: String,
}

impl PageError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<ApiError> for PageError {
    fn from(err: ApiError) -> Self {
        let (status, message) = err.status_and_message();
        Self { status, message }
    }
}

impl From<BookError> for PageError {
    fn from(err: BookError) -> Self {
        ApiError::from(err).into()
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (
            self.status,
            Html(views::error_page(self.status.as_u16(), &self.message, true)),
        )
            .into_response()
    }
}
