use crate::clients::Catalog;
use crate::clients::openlibrary::OpenLibraryClient;
use crate::config::Config;

pub async fn cmd_search_books(config: &Config, query: &str, page: u32) -> anyhow::Result<()> {
    println!("Searching for: {query}");

    let client = OpenLibraryClient::new(&config.catalog)?;
    let results = client
        .search(query, page.max(1), config.catalog.page_size)
        .await?;

    if results.books.is_empty() {
        println!("No books found matching '{query}'");
        return Ok(());
    }

    println!();
    println!(
        "Search Results (page {} of {}, {} total):",
        results.page, results.total_pages, results.total
    );
    println!("{:-<60}", "");

    for book in &results.books {
        let year = book
            .published_date
            .as_deref()
            .map_or_else(String::new, |y| format!(" ({y})"));

        println!("• {}{}", book.title, year);
        println!("  by {} | ID: {}", book.author, book.id);
        println!();
    }

    if u64::from(results.page) < results.total_pages {
        println!(
            "More: myreads search \"{query}\" --page {}",
            results.page + 1
        );
    }

    Ok(())
}
