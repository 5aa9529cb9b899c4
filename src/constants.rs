pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

pub const UNTITLED: &str = "Untitled";

pub const DEFAULT_LANGUAGE: &str = "en";

pub mod limits {

    pub const MAX_REVIEW_CHARS: usize = 5000;

    pub const MAX_BOOK_ID_LEN: usize = 64;

    pub const MAX_SEARCH_LIMIT: u32 = 100;

    pub const MIN_RATING: i32 = 1;

    pub const MAX_RATING: i32 = 5;
}

pub mod dashboard {

    pub const RECENTLY_ADDED: usize = 4;

    pub const CURRENTLY_READING: usize = 4;
}

pub mod session {

    pub const UNLOCKED_KEY: &str = "unlocked";
}
