use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{BookStatus, LibraryError, LibraryResult};
use crate::core::repository::Repository;

#[derive(Debug, Default)]
struct MemoryState {
    // last id handed out; ids are never reused, even after a delete
    last_id: i64,
    books: BTreeMap<i64, BookEntity>,
    // unique index isbn -> book_id
    isbns: HashMap<String, i64>,
}

// Process-local book store. Clones share the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBookRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> LibraryResult<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|err| LibraryError::runtime(
            format!("book store lock poisoned {}", err).as_str(), None))
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn save(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let now = Utc::now().naive_utc();
        match entity.book_id {
            None => {
                if state.isbns.contains_key(&entity.isbn) {
                    return Err(LibraryError::duplicate_key(
                        format!("isbn {} is already taken", entity.isbn).as_str()));
                }
                state.last_id += 1;
                let mut saved = entity.clone();
                saved.book_id = Some(state.last_id);
                saved.version = 0;
                saved.created_at = now;
                saved.updated_at = now;
                state.isbns.insert(saved.isbn.clone(), state.last_id);
                state.books.insert(state.last_id, saved.clone());
                Ok(saved)
            }
            Some(id) => {
                let (old_isbn, old_version) = match state.books.get(&id) {
                    Some(existing) => (existing.isbn.clone(), existing.version),
                    None => return Err(LibraryError::not_found(
                        format!("book not found for {}", id).as_str())),
                };
                if old_version != entity.version {
                    return Err(LibraryError::unavailable(
                        format!("book {} was modified concurrently", id).as_str(),
                        Some("version_mismatch".to_string()), true));
                }
                if let Some(owner) = state.isbns.get(&entity.isbn) {
                    if *owner != id {
                        return Err(LibraryError::duplicate_key(
                            format!("isbn {} is already taken", entity.isbn).as_str()));
                    }
                }
                let mut saved = entity.clone();
                saved.version = old_version + 1;
                saved.updated_at = now;
                state.isbns.remove(&old_isbn);
                state.isbns.insert(saved.isbn.clone(), id);
                state.books.insert(id, saved.clone());
                Ok(saved)
            }
        }
    }

    async fn find_by_id(&self, id: i64) -> LibraryResult<Option<BookEntity>> {
        Ok(self.lock()?.books.get(&id).cloned())
    }

    async fn find_all(&self) -> LibraryResult<Vec<BookEntity>> {
        Ok(self.lock()?.books.values().cloned().collect())
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Option<BookEntity>> {
        let state = self.lock()?;
        Ok(state.isbns.get(isbn).and_then(|id| state.books.get(id)).cloned())
    }

    async fn find_by_status_containing(&self, status: BookStatus) -> LibraryResult<Vec<BookEntity>> {
        Ok(self.lock()?.books.values()
            .filter(|b| b.status.contains(&status))
            .cloned()
            .collect())
    }

    async fn delete_by_isbn(&self, isbn: &str) -> LibraryResult<usize> {
        let mut state = self.lock()?;
        match state.isbns.remove(isbn) {
            Some(id) => {
                state.books.remove(&id);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use crate::books::domain::model::BookEntity;
    use crate::books::repository::BookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::core::library::{BookStatus, LibraryError};
    use crate::core::repository::Repository;

    #[tokio::test]
    async fn test_should_create_get_books() {
        let books_repo = MemoryBookRepository::new();
        let book = BookEntity::new("1234567890123", "test book", BookStatus::Available);
        let saved = books_repo.save(&book).await.expect("should create book");
        assert_eq!(Some(1), saved.book_id);
        assert_eq!(0, saved.version);

        let loaded = books_repo.find_by_id(1).await.expect("should query book").expect("should return book");
        assert_eq!(saved, loaded);
        let loaded = books_repo.find_by_isbn("1234567890123").await.expect("should query book").expect("should return book");
        assert_eq!(saved, loaded);
        assert_eq!(None, books_repo.find_by_id(2).await.expect("should query book"));
        assert_eq!(None, books_repo.find_by_isbn("0000000000000").await.expect("should query book"));
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_isbn_on_insert() {
        let books_repo = MemoryBookRepository::new();
        let book = BookEntity::new("1234567890123", "test book", BookStatus::Available);
        let _ = books_repo.save(&book).await.expect("should create book");
        let res = books_repo.save(&book).await;
        assert!(matches!(res, Err(LibraryError::DuplicateKey { .. })));
        assert_eq!(1, books_repo.find_all().await.expect("should list").len());
    }

    #[tokio::test]
    async fn test_should_update_in_place() {
        let books_repo = MemoryBookRepository::new();
        let mut saved = books_repo.save(&BookEntity::new("1234567890123", "test book", BookStatus::Available))
            .await.expect("should create book");
        saved.title = "new title".to_string();
        saved.isbn = "3210987654321".to_string();
        let updated = books_repo.save(&saved).await.expect("should update book");
        assert_eq!(saved.book_id, updated.book_id);
        assert_eq!(1, updated.version);

        assert_eq!(None, books_repo.find_by_isbn("1234567890123").await.expect("should query book"));
        let loaded = books_repo.find_by_isbn("3210987654321").await.expect("should query book").expect("should return book");
        assert_eq!("new title", loaded.title.as_str());
        // the old code is free again
        let _ = books_repo.save(&BookEntity::new("1234567890123", "other", BookStatus::Available))
            .await.expect("should reuse released isbn");
    }

    #[tokio::test]
    async fn test_should_reject_update_onto_taken_isbn() {
        let books_repo = MemoryBookRepository::new();
        let _ = books_repo.save(&BookEntity::new("1111111111111", "first", BookStatus::Available))
            .await.expect("should create book");
        let mut second = books_repo.save(&BookEntity::new("2222222222222", "second", BookStatus::Available))
            .await.expect("should create book");
        second.isbn = "1111111111111".to_string();
        let res = books_repo.save(&second).await;
        assert!(matches!(res, Err(LibraryError::DuplicateKey { .. })));
        let loaded = books_repo.find_by_isbn("2222222222222").await.expect("should query").expect("should keep book");
        assert_eq!("second", loaded.title.as_str());
    }

    #[tokio::test]
    async fn test_should_reject_stale_version() {
        let books_repo = MemoryBookRepository::new();
        let saved = books_repo.save(&BookEntity::new("1234567890123", "test book", BookStatus::Available))
            .await.expect("should create book");
        let _ = books_repo.save(&saved).await.expect("should update book");
        let res = books_repo.save(&saved).await;
        assert!(matches!(res, Err(LibraryError::CurrentlyUnavailable { retryable: true, .. })));
    }

    #[tokio::test]
    async fn test_should_find_by_status_containing() {
        let books_repo = MemoryBookRepository::new();
        for i in 0..6 {
            let status = if i % 2 == 0 { BookStatus::Available } else { BookStatus::Unavailable };
            let _ = books_repo.save(&BookEntity::new(format!("123456789012{}", i).as_str(), "title", status))
                .await.expect("should create book");
        }
        let mut both = BookEntity::new("9999999999999", "both", BookStatus::Available);
        both.status = BTreeSet::from([BookStatus::Available, BookStatus::Unavailable]);
        let _ = books_repo.save(&both).await.expect("should create book");

        let available = books_repo.find_by_status_containing(BookStatus::Available).await.expect("should list");
        assert_eq!(4, available.len());
        let unavailable = books_repo.find_by_status_containing(BookStatus::Unavailable).await.expect("should list");
        assert_eq!(4, unavailable.len());
    }

    #[tokio::test]
    async fn test_should_delete_books_without_reusing_ids() {
        let books_repo = MemoryBookRepository::new();
        let first = books_repo.save(&BookEntity::new("1234567890123", "test book", BookStatus::Available))
            .await.expect("should create book");
        assert_eq!(0, books_repo.delete_by_isbn("0000000000000").await.expect("should delete"));
        assert_eq!(1, books_repo.delete_by_isbn("1234567890123").await.expect("should delete"));
        assert_eq!(None, books_repo.find_by_id(1).await.expect("should query"));

        let second = books_repo.save(&BookEntity::new("1234567890123", "test book", BookStatus::Available))
            .await.expect("should create book");
        assert_ne!(first.book_id, second.book_id);
    }
}
