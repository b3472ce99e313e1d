//! Cache key generators for consistent key naming.

/// Key holding the whole book list, newest first.
pub const BOOK_LIST: &str = "books:all";

/// Prefix of single-book keys.
const BOOK_PREFIX: &str = "book";

/// Generate the cache key for a book by ID.
#[must_use]
pub fn book_by_id(id: &str) -> String {
    format!("{}:{}", BOOK_PREFIX, id)
}
