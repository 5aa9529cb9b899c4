pub mod book_service;
pub mod book_service_impl;
pub use book_service::{BookError, BookService, SearchHit, SearchResults};
pub use book_service_impl::SeaOrmBookService;

pub mod stats;
pub use stats::{Dashboard, LibraryStats};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::{PasswordAuthService, hash_password, verify_password};
