pub mod prelude;

pub mod book_entries;
pub mod books;
