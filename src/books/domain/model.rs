use std::collections::BTreeSet;
use chrono::{NaiveDateTime, Utc};
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::core::library::{BookStatus, Genre};

// BookEntity is the stored shape of a catalog book. `isbn` is unique across the catalog and
// `status` is never empty once the book exists.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BookEntity {
    pub book_id: Option<i64>,
    pub version: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub description: String,
    pub genre: BTreeSet<Genre>,
    pub status: BTreeSet<BookStatus>,
    pub owner_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BookEntity {
    pub fn new(isbn: &str, title: &str, status: BookStatus) -> Self {
        Self {
            book_id: None,
            version: 0,
            title: title.to_string(),
            author: "unknown".to_string(),
            isbn: isbn.to_string(),
            description: title.to_string(),
            genre: BTreeSet::from([Genre::Novel]),
            status: BTreeSet::from([status]),
            owner_id: None,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    // replaces the availability marker(s) with the opposite of the current availability
    pub fn toggle_status(&mut self) {
        let next = if self.is_available() {
            BookStatus::Unavailable
        } else {
            BookStatus::Available
        };
        self.status = BTreeSet::from([next]);
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> Option<i64> {
        self.book_id
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Book for BookEntity {
    fn code(&self) -> &str {
        self.isbn.as_str()
    }

    fn statuses(&self) -> &BTreeSet<BookStatus> {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use crate::books::domain::Book;
    use crate::books::domain::model::BookEntity;
    use crate::core::domain::Identifiable;
    use crate::core::library::BookStatus;

    #[tokio::test]
    async fn test_should_build_books() {
        let book = BookEntity::new("1234567890123", "title", BookStatus::Available);
        assert_eq!("1234567890123", book.code());
        assert_eq!("title", book.title.as_str());
        assert_eq!(None, book.id());
        assert!(book.is_available());
    }

    #[tokio::test]
    async fn test_should_toggle_status_back_and_forth() {
        let mut book = BookEntity::new("1234567890123", "title", BookStatus::Available);
        book.toggle_status();
        assert_eq!(BTreeSet::from([BookStatus::Unavailable]), book.status);
        book.toggle_status();
        assert_eq!(BTreeSet::from([BookStatus::Available]), book.status);
    }

    #[tokio::test]
    async fn test_should_replace_whole_status_set_on_toggle() {
        let mut book = BookEntity::new("1234567890123", "title", BookStatus::Available);
        book.status.insert(BookStatus::Unavailable);
        book.toggle_status();
        assert_eq!(BTreeSet::from([BookStatus::Unavailable]), book.status);
    }
}
