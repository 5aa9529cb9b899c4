pub use super::book_entries::Entity as BookEntries;
pub use super::books::Entity as Books;
