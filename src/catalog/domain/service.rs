use async_trait::async_trait;
use tracing::{debug, info, warn};
use crate::books::domain::model::BookEntity;
use crate::books::dto::{BookLoanInfo, BookRequest, BookResponse};
use crate::books::repository::BookRepository;
use crate::catalog::domain::{AVAILABLE_BOOKS, BOOK_ALREADY_EXISTS, BOOK_BY_ID, BOOK_BY_ISBN, BOOKS_NOT_FOUND, CatalogService};
use crate::core::domain::Configuration;
use crate::core::library::{BookStatus, LibraryError, LibraryResult};
use crate::core::repository::Repository;

pub(crate) struct CatalogServiceImpl {
    book_repository: Box<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(_config: &Configuration, book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            book_repository,
        }
    }

    async fn get_by_id(&self, id: i64, message: &str) -> LibraryResult<BookEntity> {
        self.book_repository.find_by_id(id).await?
            .ok_or_else(|| LibraryError::not_found(message))
    }

    async fn get_by_isbn(&self, isbn: &str, message: &str) -> LibraryResult<BookEntity> {
        self.book_repository.find_by_isbn(isbn).await?
            .ok_or_else(|| LibraryError::not_found(message))
    }

    // the store's unique index is the last line of defence against two writers racing on one code
    async fn save(&self, book: &BookEntity) -> LibraryResult<BookEntity> {
        self.book_repository.save(book).await.map_err(|err| match err {
            LibraryError::DuplicateKey { message } => {
                warn!(isbn = book.isbn.as_str(), reason = message.as_str(), "store rejected duplicate isbn");
                LibraryError::already_exists(BOOK_ALREADY_EXISTS)
            }
            other => other,
        })
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn create_book(&self, req: &BookRequest, owner_id: i64) -> LibraryResult<BookResponse> {
        if let Some(existing) = self.book_repository.find_by_isbn(req.isbn.as_str()).await? {
            warn!(isbn = req.isbn.as_str(), book_id = ?existing.book_id, "isbn already in catalog");
            return Err(LibraryError::already_exists(BOOK_ALREADY_EXISTS));
        }
        let saved = self.save(&req.to_entity(None, owner_id)).await?;
        info!(book_id = ?saved.book_id, isbn = saved.isbn.as_str(), owner_id, "book created");
        Ok(BookResponse::from(&saved))
    }

    async fn find_all(&self) -> LibraryResult<Vec<BookResponse>> {
        let books = self.book_repository.find_all().await?;
        debug!(count = books.len(), "listed books");
        if books.is_empty() {
            return Err(LibraryError::not_found(BOOKS_NOT_FOUND));
        }
        Ok(books.iter().map(BookResponse::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> LibraryResult<BookResponse> {
        self.get_by_id(id, BOOK_BY_ID).await.map(|b| BookResponse::from(&b))
    }

    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<BookResponse> {
        self.get_by_isbn(isbn, BOOK_BY_ISBN).await.map(|b| BookResponse::from(&b))
    }

    async fn take_the_book(&self, id: i64) -> LibraryResult<BookLoanInfo> {
        self.get_by_id(id, BOOK_BY_ISBN).await.map(|b| BookLoanInfo::from(&b))
    }

    async fn update_status(&self, id: i64) -> LibraryResult<BookResponse> {
        let mut book = self.get_by_id(id, BOOK_BY_ID).await?;
        book.toggle_status();
        let saved = self.save(&book).await?;
        info!(book_id = id, status = ?saved.status, "book status toggled");
        Ok(BookResponse::from(&saved))
    }

    async fn update_by_isbn(&self, isbn: &str, req: &BookRequest, owner_id: i64) -> LibraryResult<BookResponse> {
        // existence by the current code first, then uniqueness of the new one
        let existing = self.get_by_isbn(isbn, BOOK_BY_ISBN).await?;
        if req.isbn != existing.isbn {
            if let Some(other) = self.book_repository.find_by_isbn(req.isbn.as_str()).await? {
                if other.book_id != existing.book_id {
                    warn!(isbn = req.isbn.as_str(), book_id = ?other.book_id, "update would duplicate isbn");
                    return Err(LibraryError::already_exists(BOOK_ALREADY_EXISTS));
                }
            }
        }
        let mut book = req.to_entity(existing.book_id, owner_id);
        book.version = existing.version;
        book.created_at = existing.created_at;
        let saved = self.save(&book).await?;
        info!(book_id = ?saved.book_id, old_isbn = isbn, isbn = saved.isbn.as_str(), owner_id, "book updated");
        Ok(BookResponse::from(&saved))
    }

    async fn delete_by_isbn(&self, isbn: &str) -> LibraryResult<()> {
        let _ = self.get_by_isbn(isbn, BOOKS_NOT_FOUND).await?;
        let deleted = self.book_repository.delete_by_isbn(isbn).await?;
        if deleted == 0 {
            // removed by someone else between the lookup and the delete
            return Err(LibraryError::not_found(BOOKS_NOT_FOUND));
        }
        info!(isbn, "book deleted");
        Ok(())
    }

    async fn available_books(&self) -> LibraryResult<Vec<BookResponse>> {
        let books = self.book_repository.find_by_status_containing(BookStatus::Available).await?;
        debug!(count = books.len(), "listed available books");
        if books.is_empty() {
            return Err(LibraryError::not_found(AVAILABLE_BOOKS));
        }
        Ok(books.iter().map(BookResponse::from).collect())
    }
}
