pub mod service;

use async_trait::async_trait;
use crate::books::dto::{BookLoanInfo, BookRequest, BookResponse};
use crate::core::library::LibraryResult;

pub const BOOK_ALREADY_EXISTS: &str = "The book with this isbn already exists!!!";
pub const BOOKS_NOT_FOUND: &str = "Book not found.";
pub const BOOK_BY_ID: &str = "A book with this id not found.";
pub const BOOK_BY_ISBN: &str = "A book with isbn not found.";
pub const AVAILABLE_BOOKS: &str = "There are no available books!";
pub const BOOK_DELETED: &str = "The book has been deleted.";

// CatalogService owns the book lifecycle: code uniqueness on create and update, the
// availability toggle, and the read projections. Requests reaching it are already validated
// and carry a resolved owner id.
#[async_trait]
pub(crate) trait CatalogService: Sync + Send {
    async fn create_book(&self, req: &BookRequest, owner_id: i64) -> LibraryResult<BookResponse>;

    // fails with NotFound when the catalog is empty
    async fn find_all(&self) -> LibraryResult<Vec<BookResponse>>;

    async fn find_by_id(&self, id: i64) -> LibraryResult<BookResponse>;

    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<BookResponse>;

    async fn take_the_book(&self, id: i64) -> LibraryResult<BookLoanInfo>;

    async fn update_status(&self, id: i64) -> LibraryResult<BookResponse>;

    async fn update_by_isbn(&self, isbn: &str, req: &BookRequest, owner_id: i64) -> LibraryResult<BookResponse>;

    async fn delete_by_isbn(&self, isbn: &str) -> LibraryResult<()>;

    // fails with NotFound when nothing is available
    async fn available_books(&self) -> LibraryResult<Vec<BookResponse>>;
}
