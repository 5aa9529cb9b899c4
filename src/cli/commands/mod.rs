mod hash_password;
mod list;
mod search;

pub use hash_password::cmd_hash_password;
pub use list::cmd_list_books;
pub use search::cmd_search_books;
