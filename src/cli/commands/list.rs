//! List books command handler

use crate::config::Config;
use crate::db::Store;
use crate::domain::ReadingStatus;

pub async fn cmd_list_books(config: &Config, status: Option<&str>) -> anyhow::Result<()> {
    let status = status.map(str::parse::<ReadingStatus>).transpose()?;

    let store = Store::new(&config.general.database_path).await?;
    let entries = store.list_book_entries(status).await?;

    if entries.is_empty() {
        println!("No books on your list.");
        println!();
        println!("Find some with: myreads search \"book title\"");
        return Ok(());
    }

    println!("My Books ({} total)", entries.len());
    println!("{:-<70}", "");

    for entry in entries {
        let status_indicator = match entry.status {
            ReadingStatus::Reading => "📖",
            ReadingStatus::Read => "✓",
            ReadingStatus::WantToRead => "•",
        };

        let rating = entry
            .rating
            .map_or_else(String::new, |r| format!(" {r}/5"));

        println!(
            "{} {} by {}{}",
            status_indicator, entry.book.title, entry.book.author, rating
        );
        println!("  ID: {} | Status: {}", entry.book_id, entry.status.label());
    }

    println!();
    println!("Legend: 📖 Reading | ✓ Read | • Want to Read");

    Ok(())
}
