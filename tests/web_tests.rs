mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use common::{PASSWORD, fake_catalog, test_config};
use http_body_util::BodyExt;
use myreads::clients::Catalog;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let state = myreads::api::create_app_state_with_catalog(
        test_config(),
        fake_catalog() as Arc<dyn Catalog>,
        None,
    )
    .await
    .expect("Failed to create app state");
    myreads::api::router(state)
}

fn form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("No redirect location")
        .to_str()
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

async fn unlock(app: &Router) -> String {
    let body = format!("password={}", urlencoding::encode(PASSWORD));
    let response = app.clone().oneshot(form("/unlock", None, &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("No session cookie set")
        .to_str()
        .unwrap();
    raw.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn locked_pages_redirect_to_unlock() {
    let app = spawn_app().await;

    for uri in ["/dashboard", "/books", "/books/search?q=dune", "/books/OL1W"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/unlock");
    }

    let response = app
        .clone()
        .oneshot(form("/books/OL1W", None, "intent=delete"))
        .await
        .unwrap();
    assert_eq!(location(&response), "/unlock");
}

#[tokio::test]
async fn home_and_unlock_pages_render() {
    let app = spawn_app().await;

    let response = app.clone().oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("href=\"/unlock\""));

    let response = app.clone().oneshot(get("/unlock", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("name=\"password\""));
}

#[tokio::test]
async fn wrong_password_rerenders_the_form() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(form("/unlock", None, "password=nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let html = body_text(response).await;
    assert!(html.contains("Invalid password"));

    let response = app
        .clone()
        .oneshot(form("/unlock", None, "password="))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unlocked_visitors_skip_the_landing_pages() {
    let app = spawn_app().await;
    let cookie = unlock(&app).await;

    for uri in ["/", "/unlock"] {
        let response = app.clone().oneshot(get(uri, Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");
    }

    let response = app
        .clone()
        .oneshot(get("/dashboard", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn adding_from_search_redirects_by_status() {
    let app = spawn_app().await;
    let cookie = unlock(&app).await;
    let cookie = Some(cookie.as_str());

    let response = app
        .clone()
        .oneshot(form(
            "/books/search",
            cookie,
            "bookId=OL1W&status=want_to_read",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let response = app
        .clone()
        .oneshot(form("/books/search", cookie, "bookId=OL2W&status=reading"))
        .await
        .unwrap();
    assert_eq!(location(&response), "/books/OL2W");

    let response = app
        .clone()
        .oneshot(form("/books/search", cookie, "bookId=OL2W&status=done"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.clone().oneshot(get("/books", cookie)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Dune"));
    assert!(html.contains("The Hobbit"));
}

#[tokio::test]
async fn search_page_shows_results_and_failures() {
    let catalog = fake_catalog();
    let state = myreads::api::create_app_state_with_catalog(
        test_config(),
        catalog.clone() as Arc<dyn Catalog>,
        None,
    )
    .await
    .unwrap();
    let app = myreads::api::router(state);
    let cookie = unlock(&app).await;
    let cookie = Some(cookie.as_str());

    let response = app
        .clone()
        .oneshot(get("/books/search", cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/books/search?q=hobbit", cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("The Hobbit"));

    catalog.fail_searches();
    let response = app
        .clone()
        .oneshot(get("/books/search?q=hobbit", cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Failed to search books"));
}

#[tokio::test]
async fn book_page_intents() {
    let app = spawn_app().await;
    let cookie = unlock(&app).await;
    let cookie = Some(cookie.as_str());

    let response = app
        .clone()
        .oneshot(get("/books/OL1W", cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("value=\"add\""));

    let response = app
        .clone()
        .oneshot(form("/books/OL1W", cookie, "intent=add&status=reading"))
        .await
        .unwrap();
    assert_eq!(location(&response), "/books/OL1W");

    let response = app
        .clone()
        .oneshot(form(
            "/books/OL1W",
            cookie,
            "intent=update&status=read&rating=4&review=&startDate=2024-01-01&finishDate=2024-02-01",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/books");

    let response = app
        .clone()
        .oneshot(form(
            "/books/OL1W",
            cookie,
            "intent=update&rating=9&startDate=2024-03-01&finishDate=2024-01-01",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("rating"));
    assert!(html.contains("Dune"));

    let response = app
        .clone()
        .oneshot(form("/books/OL1W", cookie, "intent=archive"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(form("/books/OL1W", cookie, "intent=delete"))
        .await
        .unwrap();
    assert_eq!(location(&response), "/books");

    let response = app
        .clone()
        .oneshot(form("/books/OL1W", cookie, "intent=update&rating=3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_book_page_is_404() {
    let app = spawn_app().await;
    let cookie = unlock(&app).await;

    let response = app
        .clone()
        .oneshot(get("/books/OL999W", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn lock_returns_home() {
    let app = spawn_app().await;
    let cookie = unlock(&app).await;

    let response = app.clone().oneshot(get("/lock", None)).await.unwrap();
    assert_eq!(location(&response), "/");

    let response = app
        .clone()
        .oneshot(form("/lock", Some(&cookie), ""))
        .await
        .unwrap();
    assert_eq!(location(&response), "/");

    let response = app
        .clone()
        .oneshot(get("/dashboard", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(location(&response), "/unlock");
}

#[tokio::test]
async fn stylesheet_is_served() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get("/assets/style.css", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css"
    );

    let response = app
        .oneshot(get("/assets/missing.css", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
