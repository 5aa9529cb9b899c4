pub mod book;

pub use book::{
    Book, BookEntry, EntryUpdate, SearchPage, page_offset, timestamp_now, total_pages,
};
