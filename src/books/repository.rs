pub mod ddb_book_repository;
pub mod memory_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::core::library::{BookStatus, LibraryResult};
use crate::core::repository::Repository;

// BookRepository is the persistence contract the catalog relies on. Implementations keep the
// book code unique: a write that would give two rows the same code fails with `DuplicateKey`.
// `save` is atomic for the single record it touches.
#[async_trait]
pub(crate) trait BookRepository: Repository<BookEntity> {
    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Option<BookEntity>>;

    async fn find_by_status_containing(&self, status: BookStatus) -> LibraryResult<Vec<BookEntity>>;

    async fn delete_by_isbn(&self, isbn: &str) -> LibraryResult<usize>;
}
