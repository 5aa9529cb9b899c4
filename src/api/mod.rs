use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, SessionManagerLayer, cookie::SameSite};

use crate::clients::Catalog;
use crate::config::Config;
use crate::state::SharedState;

mod assets;
pub mod auth;
mod books;
mod error;
mod extract;
mod observability;
pub mod types;
pub mod validation;

pub use error::ApiError;
pub use extract::ApiJson;
pub use types::*;

use crate::services::{AuthService, BookService};
use metrics_exporter_prometheus::PrometheusHandle;

pub const SESSION_COOKIE_NAME: &str = "myreads_session";

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        self.shared.config()
    }

    #[must_use]
    pub fn book_service(&self) -> &Arc<dyn BookService> {
        &self.shared.book_service
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

/// Like [`create_app_state_from_config`], with a caller-supplied catalog.
pub async fn create_app_state_with_catalog(
    config: Config,
    catalog: Arc<dyn Catalog>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::with_catalog(config, catalog).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let secure_cookies = state.config().server.secure_cookies;

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(secure_cookies)
        .with_http_only(true)
        .with_same_site(SameSite::Lax);

    let api_router = Router::new()
        .merge(create_protected_router())
        .route("/unlock", post(auth::unlock))
        .route("/lock", post(auth::lock));

    Router::new()
        .nest("/api", api_router)
        .merge(crate::web::router())
        .route("/assets/{*path}", get(assets::serve_asset))
        .layer(session_layer)
        .with_state(state)
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/books", get(books::list_books).post(books::add_book))
        .route("/books/search", get(books::search_books))
        .route(
            "/books/{id}",
            get(books::get_book)
                .patch(books::update_book)
                .delete(books::remove_book),
        )
        .route("/stats", get(books::get_stats))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn(auth::auth_middleware))
}
