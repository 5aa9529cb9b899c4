//! Server-rendered HTML. Every interpolated value goes through `html_escape`.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::domain::ReadingStatus;
use crate::models::{Book, BookEntry};
use crate::services::{Dashboard, LibraryStats, SearchResults};

fn layout(title: &str, unlocked: bool, body: &str) -> String {
    let nav = if unlocked {
        r#"<nav class="nav">
  <a class="brand" href="/dashboard">MyReads</a>
  <a href="/dashboard">Dashboard</a>
  <a href="/books/search">Search Books</a>
  <a href="/books">My Books</a>
  <form method="post" action="/lock" class="inline"><button type="submit">Lock</button></form>
</nav>"#
    } else {
        r#"<nav class="nav"><a class="brand" href="/">MyReads</a></nav>"#
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | MyReads</title>
<link rel="stylesheet" href="/assets/style.css">
</head>
<body>
{nav}
<main>
{body}
</main>
</body>
</html>"#,
        title = text(title),
    )
}

fn error_banner(error: Option<&str>) -> String {
    error.map_or_else(String::new, |e| {
        format!(r#"<p class="error" role="alert">{}</p>"#, text(e))
    })
}

fn cover(book: &Book) -> String {
    match &book.cover_image_url {
        Some(url) => format!(
            r#"<img class="cover" src="{}" alt="{}" loading="lazy">"#,
            attr(url),
            attr(&book.title)
        ),
        None => r#"<div class="cover placeholder">No cover</div>"#.to_string(),
    }
}

fn stars(rating: Option<i32>) -> String {
    rating.map_or_else(String::new, |r| {
        let r = usize::try_from(r.clamp(0, 5)).unwrap_or(0);
        format!(
            r#"<span class="stars" title="{r} out of 5">{}{}</span>"#,
            "★".repeat(r),
            "☆".repeat(5 - r)
        )
    })
}

fn status_options(selected: Option<ReadingStatus>) -> String {
    ReadingStatus::ALL
        .iter()
        .fold(String::new(), |mut out, status| {
            let sel = if Some(*status) == selected {
                " selected"
            } else {
                ""
            };
            let _ = write!(
                out,
                r#"<option value="{}"{sel}>{}</option>"#,
                status.as_str(),
                status.label()
            );
            out
        })
}

fn entry_card(entry: &BookEntry) -> String {
    format!(
        r#"<li class="card">
  <a href="/books/{id}">{cover}</a>
  <div>
    <a href="/books/{id}"><strong>{title}</strong></a>
    <div class="muted">{author}</div>
    <span class="badge {status}">{label}</span> {stars}
  </div>
</li>"#,
        id = attr(entry.book_id.as_str()),
        cover = cover(&entry.book),
        title = text(&entry.book.title),
        author = text(&entry.book.author),
        status = entry.status.as_str(),
        label = entry.status.label(),
        stars = stars(entry.rating),
    )
}

fn entry_list(entries: &[BookEntry], empty: &str) -> String {
    if entries.is_empty() {
        return format!(r#"<p class="muted">{}</p>"#, text(empty));
    }
    let items: String = entries.iter().map(entry_card).collect();
    format!(r#"<ul class="grid">{items}</ul>"#)
}

#[must_use]
pub fn home_page() -> String {
    layout(
        "Welcome",
        false,
        r#"<section class="hero">
  <h1>Welcome to MyReads</h1>
  <p>Your personal library to track books you're reading, want to read, and have read.
  Rate, review, and organize your reading journey.</p>
  <a class="button" href="/unlock">Get Started</a>
</section>"#,
    )
}

#[must_use]
pub fn unlock_page(error: Option<&str>) -> String {
    let body = format!(
        r#"<section class="narrow">
  <h1>Unlock MyReads</h1>
  {error}
  <form method="post" action="/unlock">
    <label for="password">Password</label>
    <input id="password" name="password" type="password" autocomplete="current-password" required autofocus>
    <button type="submit">Unlock</button>
  </form>
</section>"#,
        error = error_banner(error),
    );
    layout("Unlock", false, &body)
}

fn stat_tile(label: &str, value: &str) -> String {
    format!(
        r#"<div class="stat"><span class="value">{}</span><span class="label">{}</span></div>"#,
        text(value),
        text(label)
    )
}

#[must_use]
pub fn dashboard_page(dashboard: &Dashboard) -> String {
    let stats = &dashboard.stats;
    let tiles = [
        stat_tile("Total Books", &stats.total.to_string()),
        stat_tile("Currently Reading", &stats.reading.to_string()),
        stat_tile("Read", &stats.read.to_string()),
        stat_tile("Want to Read", &stats.want_to_read.to_string()),
        stat_tile("Average Rating", &format!("{:.1}", stats.average_rating)),
        stat_tile("Read This Year", &stats.finished_this_year.to_string()),
    ]
    .concat();

    let body = format!(
        r#"<h1>Dashboard</h1>
<section class="stats">{tiles}</section>
<h2>Currently Reading</h2>
{reading}
<h2>Recently Added</h2>
{recent}"#,
        reading = entry_list(
            &dashboard.currently_reading,
            "You're not reading anything right now."
        ),
        recent = entry_list(
            &dashboard.recently_added,
            "No books yet. Search for something to read."
        ),
    );
    layout("Dashboard", true, &body)
}

#[must_use]
pub fn books_page(
    entries: &[BookEntry],
    stats: &LibraryStats,
    current: Option<ReadingStatus>,
) -> String {
    let mut tabs = format!(
        r#"<a class="tab{}" href="/books">All ({})</a>"#,
        if current.is_none() { " active" } else { "" },
        stats.total
    );
    for status in ReadingStatus::ALL {
        let _ = write!(
            tabs,
            r#"<a class="tab{active}" href="/books?status={value}">{label} ({count})</a>"#,
            active = if current == Some(status) { " active" } else { "" },
            value = status.as_str(),
            label = status.label(),
            count = stats.count(status),
        );
    }

    let body = format!(
        r#"<h1>My Books</h1>
<div class="tabs">{tabs}</div>
{list}"#,
        list = entry_list(entries, "No books in this list."),
    );
    layout("My Books", true, &body)
}

#[must_use]
pub fn search_page(query: &str, results: Option<&SearchResults>, error: Option<&str>) -> String {
    let mut body = format!(
        r#"<h1>Search Books</h1>
<form method="get" action="/books/search" class="search">
  <input name="q" type="search" value="{q}" placeholder="Title, author, or ISBN" required>
  <button type="submit">Search</button>
</form>
{error}"#,
        q = attr(query),
        error = error_banner(error),
    );

    if let Some(results) = results {
        let _ = write!(
            body,
            r#"<p class="muted">{} results</p><ul class="grid">"#,
            results.total
        );

        for hit in &results.books {
            let action = match hit.status {
                Some(status) => format!(
                    r#"<span class="badge {}">{}</span>"#,
                    status.as_str(),
                    status.label()
                ),
                None => format!(
                    r#"<form method="post" action="/books/search">
  <input type="hidden" name="bookId" value="{id}">
  <select name="status">{options}</select>
  <button type="submit">Add</button>
</form>"#,
                    id = attr(hit.book.id.as_str()),
                    options = status_options(None),
                ),
            };

            let year = hit
                .book
                .published_date
                .as_deref()
                .map(|y| format!(" ({})", text(y)))
                .unwrap_or_default();

            let _ = write!(
                body,
                r#"<li class="card">
  <a href="/books/{id}">{cover}</a>
  <div>
    <a href="/books/{id}"><strong>{title}</strong></a>{year}
    <div class="muted">{author}</div>
    {action}
  </div>
</li>"#,
                id = attr(hit.book.id.as_str()),
                cover = cover(&hit.book),
                title = text(&hit.book.title),
                author = text(&hit.book.author),
            );
        }
        body.push_str("</ul>");

        if results.total_pages > 1 {
            let q = urlencoding::encode(query);
            body.push_str(r#"<nav class="pager">"#);
            if results.page > 1 {
                let _ = write!(
                    body,
                    r#"<a href="/books/search?q={q}&amp;page={}">Previous</a>"#,
                    results.page - 1
                );
            }
            let _ = write!(
                body,
                "<span>Page {} of {}</span>",
                results.page, results.total_pages
            );
            if u64::from(results.page) < results.total_pages {
                let _ = write!(
                    body,
                    r#"<a href="/books/search?q={q}&amp;page={}">Next</a>"#,
                    results.page + 1
                );
            }
            body.push_str("</nav>");
        }
    }

    layout("Search Books", true, &body)
}

fn optional_row(label: &str, value: Option<&str>) -> String {
    value.map_or_else(String::new, |v| {
        format!("<dt>{}</dt><dd>{}</dd>", text(label), text(v))
    })
}

#[must_use]
pub fn book_page(book: &Book, entry: Option<&BookEntry>, error: Option<&str>) -> String {
    let page_count = book.page_count.map(|p| p.to_string());
    let meta = [
        optional_row("Published", book.published_date.as_deref()),
        optional_row("Publisher", book.publisher.as_deref()),
        optional_row("Pages", page_count.as_deref()),
        optional_row("Language", Some(&book.language)),
    ]
    .concat();

    let description = book.description.as_deref().map_or_else(String::new, |d| {
        format!(r#"<p class="description">{}</p>"#, text(d))
    });

    let id = attr(book.id.as_str());

    let tracking = match entry {
        None => format!(
            r#"<form method="post" action="/books/{id}" class="stack">
  <input type="hidden" name="intent" value="add">
  <label for="status">Add to list</label>
  <select id="status" name="status">{options}</select>
  <button type="submit">Add to My Books</button>
</form>"#,
            options = status_options(None),
        ),
        Some(entry) => format!(
            r#"<p><span class="badge {status}">{label}</span> {stars}</p>
{review}
<form method="post" action="/books/{id}" class="stack">
  <input type="hidden" name="intent" value="update">
  <label for="status">Status</label>
  <select id="status" name="status">{options}</select>
  <label for="rating">Rating</label>
  <select id="rating" name="rating">{ratings}</select>
  <label for="review">Review</label>
  <textarea id="review" name="review" rows="6" maxlength="5000">{review_text}</textarea>
  <label for="startDate">Started</label>
  <input id="startDate" name="startDate" type="date" value="{start}">
  <label for="finishDate">Finished</label>
  <input id="finishDate" name="finishDate" type="date" value="{finish}">
  <button type="submit">Save</button>
</form>
<form method="post" action="/books/{id}">
  <input type="hidden" name="intent" value="delete">
  <button type="submit" class="danger">Remove from My Books</button>
</form>"#,
            status = entry.status.as_str(),
            label = entry.status.label(),
            stars = stars(entry.rating),
            review = entry.review.as_deref().filter(|r| !r.is_empty()).map_or_else(
                String::new,
                |r| format!(r#"<blockquote>{}</blockquote>"#, text(r))
            ),
            options = status_options(Some(entry.status)),
            ratings = rating_options(entry.rating),
            review_text = text(entry.review.as_deref().unwrap_or_default()),
            start = attr(entry.start_date.as_deref().unwrap_or_default()),
            finish = attr(entry.finish_date.as_deref().unwrap_or_default()),
        ),
    };

    let body = format!(
        r#"<article class="book">
  {cover}
  <div>
    <h1>{title}</h1>
    <p class="muted">by {author}</p>
    <dl>{meta}</dl>
    {description}
    {error}
    {tracking}
  </div>
</article>"#,
        cover = cover(book),
        title = text(&book.title),
        author = text(&book.author),
        error = error_banner(error),
    );
    layout(&book.title, true, &body)
}

fn rating_options(current: Option<i32>) -> String {
    let mut out = String::from(r#"<option value="">No rating</option>"#);
    for r in 1..=5 {
        let sel = if current == Some(r) { " selected" } else { "" };
        let _ = write!(out, r#"<option value="{r}"{sel}>{r}</option>"#);
    }
    out
}

#[must_use]
pub fn error_page(status: u16, message: &str, unlocked: bool) -> String {
    let body = format!(
        r#"<section class="narrow">
  <h1>{status}</h1>
  <p>{}</p>
  <a href="/">Back home</a>
</section>"#,
        text(message)
    );
    layout("Error", unlocked, &body)
}
